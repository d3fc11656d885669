//! Clean library API for bundlemap.
//!
//! The CLI commands print output and return exit codes; these functions
//! return proper Result types that can be handled by calling code.
//!
//! # Example
//!
//! ```no_run
//! use bundlemap::{Config, chart};
//! use std::path::Path;
//!
//! let data = chart(Path::new("orders.json"), &Config::default())?;
//! println!("{} leaves, {} links", data.metadata.leaf_count, data.metadata.link_count);
//! # Ok::<(), bundlemap::BundlemapError>(())
//! ```

use crate::chart::{ChartData, generate_static_html};
use crate::config::{Config, ConfigError};
use crate::fs::{FileSystem, default_fs};
use crate::model::{Dataset, DatasetError};
use crate::transform::TransformError;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during bundlemap operations.
#[derive(Debug, Error)]
pub enum BundlemapError {
    /// Configuration file error.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The input document could not be parsed into a dataset.
    #[error("Dataset error: {0}")]
    Dataset(#[from] DatasetError),

    /// The pipeline could not turn the dataset into a chart.
    #[error("Transform error: {0}")]
    Transform(#[from] TransformError),

    /// IO error reading input or writing output.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Chart payload serialization error.
    #[error("Serialization error: {0}")]
    Serialize(serde_json::Error),
}

/// Read and parse the input JSON document.
pub fn load_dataset(input: &Path) -> Result<Dataset, BundlemapError> {
    load_dataset_with_fs(input, default_fs())
}

pub fn load_dataset_with_fs(
    input: &Path,
    fs: &dyn FileSystem,
) -> Result<Dataset, BundlemapError> {
    let content = fs.read_to_string(input)?;
    Ok(Dataset::from_json_str(&content)?)
}

/// Run the full pipeline against an input file: parse, derive groups,
/// aggregate, and build the chart payload.
pub fn chart(input: &Path, config: &Config) -> Result<ChartData, BundlemapError> {
    let dataset = load_dataset(input)?;
    chart_from_dataset(&dataset, config)
}

/// Run the pipeline against an already-parsed dataset.
pub fn chart_from_dataset(
    dataset: &Dataset,
    config: &Config,
) -> Result<ChartData, BundlemapError> {
    Ok(ChartData::build(dataset, config)?)
}

/// Build a self-contained HTML page with the chart payload inlined.
pub fn render_html(input: &Path, config: &Config) -> Result<String, BundlemapError> {
    let data = chart(input, config)?;
    generate_static_html(&data).map_err(BundlemapError::Serialize)
}
