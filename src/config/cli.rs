use crate::core::batch_loader::DEFAULT_MIN_FILES;
use crate::core::ConfigProvider;
use crate::domain::model::PlotMode;
use crate::render::DEFAULT_CELL_SIZE;
use crate::utils::error::Result;
use crate::utils::validation::{validate_non_empty_string, validate_path, validate_range, Validate};
use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "gpx-multiples")]
#[command(about = "Print small multiples from a batch of GPX files")]
pub struct CliConfig {
    /// Directory (or quoted glob pattern) containing the GPX files
    #[arg(value_name = "GPX_DIRECTORY")]
    pub input: String,

    #[arg(short, long, help = "Plot the elevation graphs")]
    pub elevation: bool,

    #[arg(short, long, help = "Plot the track outlines")]
    pub tracks: bool,

    #[arg(long, default_value = "./output")]
    pub output_path: String,

    #[arg(long, default_value_t = DEFAULT_MIN_FILES, help = "Refuse to run with this many files or fewer")]
    pub min_files: usize,

    #[arg(long, default_value_t = DEFAULT_CELL_SIZE, help = "Edge length of one grid cell in pixels")]
    pub cell_size: u32,

    #[arg(long, help = "Also write every parsed track as CSV")]
    pub export_csv: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Log CPU and memory usage per phase")]
    pub monitor: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub log_json: bool,
}

impl ConfigProvider for CliConfig {
    fn input_pattern(&self) -> &str {
        &self.input
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn min_files(&self) -> usize {
        self.min_files
    }

    fn plot_modes(&self) -> Vec<PlotMode> {
        let mut modes = Vec::new();
        if self.elevation {
            modes.push(PlotMode::Elevation);
        }
        if self.tracks || !self.elevation {
            modes.push(PlotMode::Tracks);
        }
        modes
    }

    fn cell_size(&self) -> u32 {
        self.cell_size
    }

    fn export_csv(&self) -> bool {
        self.export_csv
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("input", &self.input)?;
        validate_path("output_path", &self.output_path)?;
        validate_range("cell_size", self.cell_size, 16, 4096)?;
        Ok(())
    }
}
