use crate::core::Pipeline;
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;
use std::time::{Duration, Instant};

pub struct MultiplesEngine<P: Pipeline> {
    pipeline: P,
    monitor_enabled: bool,
}

/// `H:MM:SS`, dropping sub-second precision.
pub fn format_elapsed(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    format!("{}:{:02}:{:02}", secs / 3600, (secs % 3600) / 60, secs % 60)
}

impl<P: Pipeline> MultiplesEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor_enabled,
        }
    }

    pub async fn run(&self) -> Result<String> {
        let started = Instant::now();
        let mut monitor = SystemMonitor::new(self.monitor_enabled);
        monitor.log_stats("Start");

        // Extract
        let batch = self.pipeline.extract().await?;
        tracing::info!("Loaded {} track(s)", batch.len());
        monitor.log_stats("Extract");

        // Transform
        let result = self.pipeline.transform(batch).await?;
        tracing::info!(
            "Planned {}x{} grid for {} track(s)",
            result.layout.rows,
            result.layout.cols,
            result.layout.cells.len()
        );
        monitor.log_stats("Transform");

        // Load
        let output_path = self.pipeline.load(result).await?;
        monitor.log_stats("Load");

        tracing::info!("Total time: {}", format_elapsed(started.elapsed()));
        Ok(output_path)
    }
}
