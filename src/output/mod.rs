mod json;
mod summary;

pub use json::JsonOutput;
pub use summary::SummaryOutput;

use crate::chart::ChartData;
use std::io::Write;

pub trait OutputFormatter {
    fn format<W: Write>(&self, chart: &ChartData, writer: &mut W) -> std::io::Result<()>;
}
