use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Compact,
    /// One JSON object per line, for runs whose logs feed another tool.
    Json,
}

fn default_filter(verbose: bool) -> EnvFilter {
    let directive = if verbose {
        "gpx_multiples=debug,info"
    } else {
        "gpx_multiples=info"
    };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive))
}

pub fn init_logger(verbose: bool, format: LogFormat) {
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false);

    let registry = tracing_subscriber::registry().with(default_filter(verbose));
    match format {
        LogFormat::Compact => registry.with(fmt_layer.compact()).init(),
        LogFormat::Json => registry.with(fmt_layer.json()).init(),
    }
}

