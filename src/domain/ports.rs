use crate::domain::model::{Batch, PlotMode, TransformResult};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::path::Path;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &Path) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    /// Directory or glob pattern the GPX files are discovered from.
    fn input_pattern(&self) -> &str;
    fn output_path(&self) -> &str;
    /// Runs with this many files or fewer are rejected.
    fn min_files(&self) -> usize;
    fn plot_modes(&self) -> Vec<PlotMode>;
    fn cell_size(&self) -> u32;
    fn export_csv(&self) -> bool;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Batch>;
    async fn transform(&self, batch: Batch) -> Result<TransformResult>;
    async fn load(&self, result: TransformResult) -> Result<String>;
}
