use crate::core::batch_loader::BatchLoader;
use crate::core::discovery::discover_files;
use crate::core::export::{csv_name, summary_to_json, track_to_csv};
use crate::core::grid::plan_grid;
use crate::core::{Batch, ConfigProvider, Pipeline, Storage, TransformResult};
use crate::domain::model::{FieldSet, RunSummary, TrackSummary};
use crate::render::render_small_multiples;
use crate::utils::error::Result;
use std::collections::HashSet;

pub const SUMMARY_FILE: &str = "summary.json";

/// GPX files in, small-multiple SVGs (plus optional CSV tables) out.
pub struct SmallMultiplesPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
}

impl<S: Storage, C: ConfigProvider> SmallMultiplesPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self { storage, config }
    }

    async fn write_csv_tables(&self, batch: &Batch) -> Result<()> {
        let mut used = HashSet::new();
        for (index, (path, track)) in batch.iter().enumerate() {
            let mut name = csv_name(index, path);
            if !used.insert(name.clone()) {
                name = format!("{}-{}.csv", name.trim_end_matches(".csv"), index);
                used.insert(name.clone());
            }
            let data = track_to_csv(track)?;
            self.storage.write_file(&name, &data).await?;
            tracing::debug!("Wrote {} ({} rows)", name, track.len());
        }
        tracing::info!("📄 Exported {} track table(s)", batch.len());
        Ok(())
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for SmallMultiplesPipeline<S, C> {
    async fn extract(&self) -> Result<Batch> {
        let paths = discover_files(self.config.input_pattern())?;
        let fields = FieldSet::for_modes(&self.config.plot_modes());
        tracing::debug!(
            "Discovered {} file(s), elevation fields: {}",
            paths.len(),
            fields.elevation
        );

        BatchLoader::new(&self.storage, fields, self.config.min_files())
            .load(&paths)
            .await
    }

    async fn transform(&self, batch: Batch) -> Result<TransformResult> {
        let layout = plan_grid(batch.len())?;
        let summaries = batch
            .iter()
            .map(|(path, track)| TrackSummary {
                path: path.to_path_buf(),
                points: track.len(),
                distance_km: track.total_distance_km(),
            })
            .collect();

        Ok(TransformResult {
            batch,
            layout,
            summaries,
        })
    }

    async fn load(&self, result: TransformResult) -> Result<String> {
        tracing::info!("Creating plot(s)...");
        let modes = self.config.plot_modes();

        for mode in &modes {
            let svg = render_small_multiples(
                &result.batch,
                &result.layout,
                *mode,
                self.config.cell_size(),
            )?;
            let name = mode.file_name();
            self.storage.write_file(&name, svg.as_bytes()).await?;
            tracing::info!("🖼️ Wrote {} ({} bytes)", name, svg.len());
        }

        if self.config.export_csv() {
            self.write_csv_tables(&result.batch).await?;
        }

        let summary = RunSummary {
            generated_at: chrono::Utc::now(),
            input: self.config.input_pattern().to_string(),
            modes,
            grid: result.layout,
            tracks: result.summaries,
        };
        self.storage
            .write_file(SUMMARY_FILE, &summary_to_json(&summary)?)
            .await?;

        Ok(self.config.output_path().to_string())
    }
}
