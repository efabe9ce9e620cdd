pub mod config;
pub mod core;
pub mod domain;
pub mod render;
pub mod utils;

pub use config::LocalStorage;
#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use crate::core::{
    batch_loader::{BatchLoader, DEFAULT_MIN_FILES},
    engine::MultiplesEngine,
    grid::plan_grid,
    pipeline::SmallMultiplesPipeline,
    track_parser::{parse_file, parse_reader, parse_str},
};
pub use domain::model::{Batch, FieldSet, GridCell, GridLayout, PlotMode, Track, TrackPoint};
pub use utils::error::{MultiplesError, Result};
