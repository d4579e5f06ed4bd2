use thiserror::Error;

use crate::value::ValueKind;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Database error: {0}")]
    Database(#[from] turso::Error),

    #[error("Metadata error: {0}")]
    Metadata(#[from] MetadataError),

    #[error("Statement error: no {operation} SQL declared for {entity}; {hint}")]
    Statement { entity: &'static str, operation: &'static str, hint: &'static str },

    #[error("Mapping error: column {column} of {entity} has unsupported kind {kind}")]
    Mapping { entity: &'static str, column: String, kind: ValueKind },

    #[error("Binding error: statement declares {expected} placeholders but {actual} values were supplied")]
    Binding { expected: usize, actual: usize },

    #[error("Type conversion error: expected {expected}, got {actual}")]
    TypeConversion { expected: &'static str, actual: String },

    #[error("Unexpected null value for non-nullable field")]
    UnexpectedNull,

    #[error("Column not found: {0}")]
    ColumnNotFound(String),

    #[cfg(feature = "serde")]
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Reasons a profile or row mapper cannot be built for an entity type.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MetadataError {
    #[error("no identifier attribute declared in {entity}")]
    MissingIdentifier { entity: &'static str },

    #[error("{entity} declares {count} identifier attributes, expected exactly one")]
    DuplicateIdentifier { entity: &'static str, count: usize },

    #[error("accessor <{accessor}> for attribute <{attribute}> not found in {entity}")]
    AccessorNotFound { entity: &'static str, attribute: String, accessor: String },

    #[error("zero-argument constructor not found in {entity}")]
    MissingConstructor { entity: &'static str },

    #[error("bad row mapper <{method}> in {entity}: {reason}")]
    InvalidRowMapper { entity: &'static str, method: String, reason: String },

    #[error("{entity} marks {count} operations as row mapper, expected at most one")]
    AmbiguousRowMapper { entity: &'static str, count: usize },

    #[error("update SQL of {entity} has a WHERE clause that does not reference identifier column {id_column}")]
    UpdatePredicate { entity: &'static str, id_column: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_statement() {
        let err = Error::Statement {
            entity:    "Item",
            operation: "create table",
            hint:      "declare create_table_sql or table_options",
        };
        let display = format!("{}", err);
        assert!(display.contains("Statement error"));
        assert!(display.contains("create table"));
        assert!(display.contains("Item"));
    }

    #[test]
    fn test_error_display_binding_counts() {
        let err = Error::Binding { expected: 2, actual: 3 };
        let display = format!("{}", err);
        assert!(display.contains("2 placeholders"));
        assert!(display.contains("3 values"));
    }

    #[test]
    fn test_error_display_mapping() {
        let err = Error::Mapping { entity: "Item", column: "payload".to_string(), kind: ValueKind::Bytes };
        let display = format!("{}", err);
        assert!(display.contains("payload"));
        assert!(display.contains("Bytes"));
    }

    #[test]
    fn test_error_display_type_conversion() {
        let err = Error::TypeConversion { expected: "Integer", actual: "Text(hello)".to_string() };
        let display = format!("{}", err);
        assert!(display.contains("Type conversion error"));
        assert!(display.contains("Integer"));
        assert!(display.contains("Text(hello)"));
    }

    #[test]
    fn test_error_display_column_not_found() {
        let err = Error::ColumnNotFound("user_id".to_string());
        assert!(format!("{}", err).contains("user_id"));
    }

    #[test]
    fn test_metadata_error_wraps() {
        let err: Error = MetadataError::MissingIdentifier { entity: "Item" }.into();
        let display = format!("{}", err);
        assert!(display.contains("Metadata error"));
        assert!(display.contains("no identifier attribute declared in Item"));
    }

    #[test]
    fn test_metadata_error_accessor_names_everything() {
        let err = MetadataError::AccessorNotFound {
            entity:    "Item",
            attribute: "name".to_string(),
            accessor:  "set_name".to_string(),
        };
        let display = format!("{}", err);
        assert!(display.contains("<set_name>"));
        assert!(display.contains("<name>"));
        assert!(display.contains("Item"));
    }

    #[test]
    fn test_result_type_alias() {
        fn returns_err() -> Result<i32> {
            Err(Error::UnexpectedNull)
        }

        assert!(returns_err().is_err());
    }
}
