use anyhow::Context;
use clap::Parser;
use gpx_multiples::config::toml_config::TomlConfig;
use gpx_multiples::core::discovery::discover_files;
use gpx_multiples::core::ConfigProvider;
use gpx_multiples::utils::error::ErrorSeverity;
use gpx_multiples::utils::logger::{self, LogFormat};
use gpx_multiples::utils::validation::Validate;
use gpx_multiples::{plan_grid, LocalStorage, MultiplesEngine, SmallMultiplesPipeline};

#[derive(Parser)]
#[command(name = "toml-multiples")]
#[command(about = "Small multiples from GPX files, configured by a TOML file")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "multiples.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Override monitoring setting from config
    #[arg(long)]
    monitor: Option<bool>,

    /// Discover files and plan the grid without parsing or rendering
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // 載入 TOML 配置
    let config = match TomlConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    let format = if config.json_logs() {
        LogFormat::Json
    } else {
        LogFormat::Compact
    };
    logger::init_logger(args.verbose, format);
    tracing::info!("📁 Loaded configuration from: {}", args.config);

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());
        std::process::exit(1);
    }

    display_config_summary(&config, &args);

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - No files will be parsed or rendered");
        perform_dry_run(&config)?;
        return Ok(());
    }

    let monitor_enabled = args.monitor.unwrap_or_else(|| config.monitoring_enabled());
    let storage = LocalStorage::new(config.output_path().to_string());
    let pipeline = SmallMultiplesPipeline::new(storage, config);
    let engine = MultiplesEngine::new_with_monitoring(pipeline, monitor_enabled);

    match engine.run().await {
        Ok(output_path) => {
            println!("✅ Small multiples created");
            println!("📁 Output saved to: {}", output_path);
            Ok(())
        }
        Err(e) => {
            tracing::error!("❌ Run failed: {} (Category: {:?})", e, e.category());
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            let code = match e.severity() {
                ErrorSeverity::Low => return Ok(()),
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };
            std::process::exit(code);
        }
    }
}

fn display_config_summary(config: &TomlConfig, args: &Args) {
    println!("📋 Configuration Summary:");
    println!("  Run: {}", config.name());
    println!("  Input: {}", config.input_pattern());
    println!("  Output: {}", config.output_path());
    let modes: Vec<String> = config.plot_modes().iter().map(|m| m.to_string()).collect();
    println!("  Modes: {}", modes.join(", "));
    println!("  Minimum files: more than {}", config.min_files());
    println!("  Cell size: {}px", config.cell_size());
    println!("  CSV export: {}", config.export_csv());

    if args.dry_run {
        println!("  🔍 DRY RUN MODE ENABLED");
    }

    println!();
}

fn perform_dry_run(config: &TomlConfig) -> anyhow::Result<()> {
    println!("🔍 Dry Run Analysis:");

    let files = discover_files(config.input_pattern())
        .with_context(|| format!("discovering files for '{}'", config.input_pattern()))?;
    println!("  {} file(s) matched", files.len());
    for path in &files {
        println!("    {}", path.display());
    }

    if files.len() <= config.min_files() {
        println!(
            "  ⚠️ Not enough files: a real run needs at least {}",
            config.min_files() + 1
        );
        return Ok(());
    }

    let layout = plan_grid(files.len())?;
    println!(
        "  Grid: {} row(s) x {} column(s), {} spare cell(s)",
        layout.rows,
        layout.cols,
        layout.capacity() - files.len()
    );
    for mode in config.plot_modes() {
        println!(
            "  Would write {} ({}x{}px)",
            mode.file_name(),
            layout.cols as u32 * config.cell_size(),
            layout.rows as u32 * config.cell_size()
        );
    }

    println!();
    println!("✅ Dry run analysis complete.");
    Ok(())
}

