use serde_json::Value;
use thiserror::Error;

/// One input row: a mapping from column name to scalar value.
///
/// Key order is preserved by serde_json's `preserve_order` feature, which is
/// what makes schema derivation from the first record deterministic.
pub type Record = serde_json::Map<String, Value>;

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("Failed to parse dataset JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Dataset must be a JSON array of objects")]
    NotAnArray,
    #[error("Dataset row {0} is not an object")]
    RowNotAnObject(usize),
    #[error("Dataset is empty; schema cannot be derived")]
    Empty,
}

/// The full input dataset. Record order is irrelevant to the chart but is
/// preserved so aggregation keys come out in first-seen order.
#[derive(Debug, Clone)]
pub struct Dataset {
    records: Vec<Record>,
}

impl Dataset {
    /// Build a dataset from already-parsed records. Empty input is rejected,
    /// since the schema is read from the first record.
    pub fn new(records: Vec<Record>) -> Result<Self, DatasetError> {
        if records.is_empty() {
            return Err(DatasetError::Empty);
        }
        Ok(Self { records })
    }

    /// Parse a JSON document containing an array of flat objects.
    pub fn from_json_str(content: &str) -> Result<Self, DatasetError> {
        let value: Value = serde_json::from_str(content)?;
        let rows = match value {
            Value::Array(rows) => rows,
            _ => return Err(DatasetError::NotAnArray),
        };

        let mut records = Vec::with_capacity(rows.len());
        for (i, row) in rows.into_iter().enumerate() {
            match row {
                Value::Object(map) => records.push(map),
                _ => return Err(DatasetError::RowNotAnObject(i)),
            }
        }

        Self::new(records)
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Column names in natural key order, read from the first record.
    /// Uniform schema across records is assumed, not checked.
    pub fn columns(&self) -> Vec<String> {
        self.records[0].keys().cloned().collect()
    }
}

/// Render a scalar cell value as a grouping key.
pub fn scalar_key(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "null".to_string(),
        other => other.to_string(),
    }
}
