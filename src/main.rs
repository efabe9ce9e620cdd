use clap::Parser;
use gpx_multiples::utils::error::{ErrorSeverity, MultiplesError};
use gpx_multiples::utils::logger::{self, LogFormat};
use gpx_multiples::utils::validation::Validate;
use gpx_multiples::{CliConfig, LocalStorage, MultiplesEngine, SmallMultiplesPipeline};

fn exit_code(e: &MultiplesError) -> i32 {
    match e.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let config = CliConfig::parse();

    // 初始化日誌
    let format = if config.log_json {
        LogFormat::Json
    } else {
        LogFormat::Compact
    };
    logger::init_logger(config.verbose, format);

    tracing::info!("Starting gpx-multiples");
    tracing::debug!("CLI config: {:?}", config);

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());
        std::process::exit(1);
    }

    let monitor_enabled = config.monitor;
    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }

    let storage = LocalStorage::new(config.output_path.clone());
    let pipeline = SmallMultiplesPipeline::new(storage, config);
    let engine = MultiplesEngine::new_with_monitoring(pipeline, monitor_enabled);

    match engine.run().await {
        Ok(output_path) => {
            tracing::info!("✅ Small multiples created");
            println!("✅ Small multiples created");
            println!("📁 Output saved to: {}", output_path);
        }
        Err(e) => {
            tracing::error!(
                "❌ Run failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            let code = exit_code(&e);
            if code > 0 {
                std::process::exit(code);
            }
        }
    }
}
