pub mod assets;
pub mod data;
pub mod routes;

pub use data::ChartData;
pub use routes::{generate_static_html, serve, serve_with_watch, WatchContext};
