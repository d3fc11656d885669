//! The data-to-chart pipeline: derive group columns, aggregate records, and
//! assemble the hierarchy and link list the layout consumes.

mod aggregate;
mod builder;
mod groups;

pub use aggregate::{AggregateEntry, Metric, aggregate};
pub use builder::{build_hierarchy, build_links};
pub use groups::GroupColumns;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransformError {
    #[error("Column '{column}' is missing from record {row}")]
    MissingColumn { column: String, row: usize },
    #[error("Metric column '{column}' has non-numeric value '{value}' in record {row}")]
    BadMetric {
        column: String,
        value: String,
        row: usize,
    },
    #[error("No group columns remain after applying the exclude list")]
    NoGroupColumns,
    #[error("Link endpoint '{key}' does not resolve to a leaf under group '{group}'")]
    UnresolvedLink { group: String, key: String },
}
