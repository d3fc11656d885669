use crate::model::{Dataset, scalar_key};
use serde_json::Value;
use std::collections::HashMap;

use super::TransformError;

/// Rollup rule for one render pass: count records per group, or sum a
/// designated metric column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Metric {
    Count,
    Sum(String),
}

impl Metric {
    /// Count mode when no metric column is configured.
    pub fn from_column(metric_column: Option<&str>) -> Self {
        match metric_column {
            Some(col) if !col.is_empty() => Self::Sum(col.to_string()),
            _ => Self::Count,
        }
    }
}

/// One aggregate group: the key parts (one per grouping column, in column
/// order) and the rolled-up value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateEntry {
    pub parts: Vec<String>,
    pub value: i64,
}

impl AggregateEntry {
    /// The comma-joined composite key.
    pub fn key(&self) -> String {
        self.parts.join(",")
    }
}

/// Group records by the values of `columns` and roll up `metric` per group.
///
/// Entries come out in insertion order of first-seen key. A record missing
/// one of the grouping columns, or carrying a metric value with no leading
/// integer, is an error rather than a silently corrupted tally.
pub fn aggregate(
    columns: &[&str],
    dataset: &Dataset,
    metric: &Metric,
) -> Result<Vec<AggregateEntry>, TransformError> {
    let mut entries: Vec<AggregateEntry> = Vec::new();
    let mut index: HashMap<Vec<String>, usize> = HashMap::new();

    for (row, record) in dataset.records().iter().enumerate() {
        let mut parts = Vec::with_capacity(columns.len());
        for &column in columns {
            let value = record
                .get(column)
                .ok_or_else(|| TransformError::MissingColumn {
                    column: column.to_string(),
                    row,
                })?;
            parts.push(scalar_key(value));
        }

        let amount = match metric {
            Metric::Count => 1,
            Metric::Sum(column) => {
                let value = record
                    .get(column)
                    .ok_or_else(|| TransformError::MissingColumn {
                        column: column.clone(),
                        row,
                    })?;
                parse_metric(value).ok_or_else(|| TransformError::BadMetric {
                    column: column.clone(),
                    value: scalar_key(value),
                    row,
                })?
            }
        };

        match index.get(&parts) {
            Some(&i) => entries[i].value += amount,
            None => {
                index.insert(parts.clone(), entries.len());
                entries.push(AggregateEntry { parts, value: amount });
            }
        }
    }

    Ok(entries)
}

/// Leading-integer parse: integral numbers pass through, floats truncate,
/// strings contribute their leading digits ("12px" is 12). `None` when no
/// integer can be extracted.
fn parse_metric(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
        Value::String(s) => {
            let s = s.trim();
            let (sign, digits) = match s.strip_prefix('-') {
                Some(rest) => (-1, rest),
                None => (1, s.strip_prefix('+').unwrap_or(s)),
            };
            let leading: String = digits.chars().take_while(|c| c.is_ascii_digit()).collect();
            if leading.is_empty() {
                None
            } else {
                leading.parse::<i64>().ok().map(|n| sign * n)
            }
        }
        _ => None,
    }
}
