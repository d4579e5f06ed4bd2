//! Materialized result rows

use std::sync::Arc;

use crate::error::Error;
use crate::error::Result;
use crate::value::FromValue;
use crate::value::Value;

/// One row of a query result, addressable by position or by column name
///
/// Column names are shared between all rows of one result set.
#[derive(Clone, Debug, PartialEq)]
pub struct Row {
    columns: Arc<[String]>,
    values:  Vec<Value>,
}

impl Row {
    pub fn new(columns: Arc<[String]>, values: Vec<Value>) -> Self {
        Self { columns, values }
    }

    pub fn column_count(&self) -> usize {
        self.values.len()
    }

    pub fn column_name(&self, idx: usize) -> Option<&str> {
        self.columns.get(idx).map(String::as_str)
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Position of a column, matched exactly first and then ignoring ASCII case
    pub fn index_of(&self, column: &str) -> Option<usize> {
        self.columns
            .iter()
            .position(|c| c == column)
            .or_else(|| self.columns.iter().position(|c| c.eq_ignore_ascii_case(column)))
    }

    pub fn get_value(&self, idx: usize) -> Result<Value> {
        self.values.get(idx).cloned().ok_or_else(|| Error::ColumnNotFound(format!("#{}", idx)))
    }

    pub fn value(&self, column: &str) -> Result<Value> {
        let idx = self.index_of(column).ok_or_else(|| Error::ColumnNotFound(column.to_string()))?;
        self.get_value(idx)
    }

    /// Typed read by column name
    pub fn get<T: FromValue>(&self, column: &str) -> Result<T> {
        T::from_value(self.value(column)?)
    }

    /// Typed read by zero-based position
    pub fn get_at<T: FromValue>(&self, idx: usize) -> Result<T> {
        T::from_value(self.get_value(idx)?)
    }

    #[cfg(feature = "serde")]
    pub(crate) fn to_json(&self) -> serde_json::Value {
        use serde_json::json;

        let mut map = serde_json::Map::new();
        for (idx, value) in self.values.iter().enumerate() {
            let name = self.column_name(idx).map(str::to_string).unwrap_or_else(|| format!("column_{}", idx));
            let value = match value {
                Value::Integer(v) => json!(v),
                Value::Real(v) => json!(v),
                Value::Text(v) => json!(v),
                Value::Blob(v) => json!(v),
                Value::Null => serde_json::Value::Null,
            };
            map.insert(name, value);
        }
        serde_json::Value::Object(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Row {
        let columns: Arc<[String]> = vec!["RecID".to_string(), "name".to_string()].into();
        Row::new(columns, vec![Value::Integer(7), Value::Text("seven".to_string())])
    }

    #[test]
    fn test_lookup_exact_and_case_insensitive() {
        let row = sample();
        assert_eq!(row.index_of("RecID"), Some(0));
        assert_eq!(row.index_of("recid"), Some(0));
        assert_eq!(row.index_of("NAME"), Some(1));
        assert_eq!(row.index_of("missing"), None);
    }

    #[test]
    fn test_typed_reads() {
        let row = sample();
        assert_eq!(row.get::<i64>("RecID").unwrap(), 7);
        assert_eq!(row.get_at::<String>(1).unwrap(), "seven");
        assert_eq!(row.column_name(1), Some("name"));
        assert_eq!(row.column_count(), 2);
    }

    #[test]
    fn test_missing_column() {
        let row = sample();
        assert!(matches!(row.get::<i64>("missing"), Err(Error::ColumnNotFound(c)) if c == "missing"));
        assert!(row.get_value(9).is_err());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_to_json() {
        let json = sample().to_json();
        assert_eq!(json["RecID"], 7);
        assert_eq!(json["name"], "seven");
    }
}
