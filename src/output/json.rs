use crate::chart::ChartData;
use crate::output::OutputFormatter;
use std::io::Write;

pub struct JsonOutput;

impl JsonOutput {
    pub fn new() -> Self {
        Self
    }
}

impl Default for JsonOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputFormatter for JsonOutput {
    fn format<W: Write>(&self, chart: &ChartData, writer: &mut W) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(chart).map_err(std::io::Error::other)?;
        writeln!(writer, "{}", json)
    }
}
