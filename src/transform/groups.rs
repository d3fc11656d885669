use crate::config::Config;
use crate::model::Dataset;

use super::TransformError;

/// The group columns derived for one render pass, in chart order.
///
/// Precedence rule: a non-empty include-list is taken verbatim (order
/// preserved, not validated against the schema); otherwise the first
/// record's columns minus the exclude-list, in natural key order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupColumns {
    names: Vec<String>,
}

impl GroupColumns {
    pub fn derive(config: &Config, dataset: &Dataset) -> Result<Self, TransformError> {
        let names = if !config.include_columns.is_empty() {
            config.include_columns.clone()
        } else {
            dataset
                .columns()
                .into_iter()
                .filter(|c| !config.exclude_columns.contains(c))
                .collect()
        };

        if names.is_empty() {
            return Err(TransformError::NoGroupColumns);
        }

        Ok(Self { names })
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Membership test following the same include/exclude precedence.
    pub fn contains(&self, column: &str) -> bool {
        self.names.iter().any(|n| n == column)
    }

    /// Every unordered pair `(names[i], names[j])` for `i < j`, in derivation
    /// order. This fixes pairwise aggregation order and link draw order.
    pub fn pairs(&self) -> Vec<(&str, &str)> {
        let mut pairs = Vec::new();
        for i in 0..self.names.len() {
            for j in (i + 1)..self.names.len() {
                pairs.push((self.names[i].as_str(), self.names[j].as_str()));
            }
        }
        pairs
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
