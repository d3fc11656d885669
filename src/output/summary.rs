use crate::chart::ChartData;
use crate::chart::data::ChartNode;
use crate::output::OutputFormatter;
use std::io::Write;

/// Markdown summary of the chart: one table per group column plus pairwise
/// link statistics. Rendered through the terminal skin when on a TTY.
pub struct SummaryOutput {
    /// Leaves shown per group table; the rest is folded into a remainder row.
    pub max_rows: usize,
}

impl SummaryOutput {
    pub fn new(max_rows: usize) -> Self {
        Self { max_rows }
    }
}

impl Default for SummaryOutput {
    fn default() -> Self {
        Self::new(10)
    }
}

impl OutputFormatter for SummaryOutput {
    fn format<W: Write>(&self, chart: &ChartData, writer: &mut W) -> std::io::Result<()> {
        writeln!(writer, "# Chart Summary\n")?;
        writeln!(
            writer,
            "{} records across {} group columns, {} leaves, {} links.\n",
            chart.metadata.record_count,
            chart.metadata.group_columns.len(),
            chart.metadata.leaf_count,
            chart.metadata.link_count,
        )?;

        for group in &chart.root.children {
            self.write_group(group, writer)?;
        }

        writeln!(writer, "## Links\n")?;
        if chart.links.is_empty() {
            writeln!(writer, "No group-column pairs, so no links.")?;
            return Ok(());
        }

        let total: i64 = chart.links.iter().map(|l| l.value).sum();
        writeln!(writer, "- Total link weight: {}", total)?;
        if let Some(strongest) = chart.links.iter().max_by_key(|l| l.value) {
            writeln!(
                writer,
                "- Strongest link: `{}` → `{}` ({})",
                strongest.source, strongest.target, strongest.value
            )?;
        }
        writeln!(
            writer,
            "- Max link value (width scale domain): {}",
            chart.metadata.max_link_value
        )?;

        Ok(())
    }
}

impl SummaryOutput {
    fn write_group<W: Write>(&self, group: &ChartNode, writer: &mut W) -> std::io::Result<()> {
        writeln!(writer, "## {}\n", group.display)?;
        writeln!(writer, "| Value | Aggregate |")?;
        writeln!(writer, "|---|---|")?;

        for leaf in group.children.iter().take(self.max_rows) {
            writeln!(
                writer,
                "| {} | {} |",
                leaf.display,
                leaf.value.unwrap_or(0)
            )?;
        }

        let hidden = group.children.len().saturating_sub(self.max_rows);
        if hidden > 0 {
            let rest: i64 = group.children[self.max_rows..]
                .iter()
                .map(|l| l.value.unwrap_or(0))
                .sum();
            writeln!(writer, "| ({} more) | {} |", hidden, rest)?;
        }

        writeln!(writer)?;
        Ok(())
    }
}
