pub mod batch_loader;
pub mod discovery;
pub mod engine;
pub mod export;
pub mod geodesic;
pub mod grid;
pub mod namespace;
pub mod pipeline;
pub mod track_parser;

pub use crate::domain::model::{Batch, TransformResult};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
