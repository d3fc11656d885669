pub mod api;
pub mod chart;
pub mod cli;
pub mod commands;
pub mod config;
pub mod fs;
pub mod model;
pub mod output;
pub mod style;
pub mod transform;

pub use api::{BundlemapError, chart, chart_from_dataset, load_dataset, render_html};
pub use chart::ChartData;
pub use cli::Cli;
pub use commands::{cmd_data, cmd_init, cmd_render, cmd_serve, cmd_summary};
pub use config::{Config, SortOrder};
pub use model::{Dataset, Hierarchy, Link, NodeId};
pub use transform::{AggregateEntry, GroupColumns, Metric, TransformError, aggregate};
