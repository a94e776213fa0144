use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Delimiter joining nested object keys into a flat column key,
/// e.g. `{"a": {"b": 1}}` flattens to the key `a.b`.
pub const KEY_DELIMITER: &str = ".";

/// The semantic type assigned to a column at flatten time.
///
/// Derived once from the first non-null value observed down the column
/// and used afterwards to interpret textual edits to that column. It is
/// never re-derived after an edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    String,
    Number,
    Boolean,
    Array,
    Object,
    /// Every value in the column was null or missing.
    Null,
}

impl ColumnType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnType::String => "string",
            ColumnType::Number => "number",
            ColumnType::Boolean => "boolean",
            ColumnType::Array => "array",
            ColumnType::Object => "object",
            ColumnType::Null => "null",
        }
    }
}

impl std::fmt::Display for ColumnType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One column of the flattened table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnInfo {
    /// Flat key, nested path segments joined with [`KEY_DELIMITER`].
    pub key: String,

    /// Display path shown in a table header. Equal to `key` in this design.
    pub path: String,

    #[serde(rename = "type")]
    pub column_type: ColumnType,
}

impl ColumnInfo {
    pub fn new(key: impl Into<String>, column_type: ColumnType) -> Self {
        let key = key.into();
        ColumnInfo {
            path: key.clone(),
            key,
            column_type,
        }
    }
}

/// One row of the flattened table.
///
/// Rows are rectangular: every row produced by a single flatten call
/// carries exactly the same key set (the column set), with values the
/// source object lacked stored as `Value::Null`. `cells` is a
/// `serde_json::Map`, so keys iterate in sorted order, matching the
/// lexicographic column order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Row {
    /// Position of the source object in the loaded array.
    pub original_index: usize,

    pub cells: Map<String, Value>,
}

impl Row {
    pub fn new(original_index: usize, cells: Map<String, Value>) -> Self {
        Row {
            original_index,
            cells,
        }
    }

    /// The cell under `key`, treating a rectangularization null the same
    /// as a missing key.
    pub fn cell(&self, key: &str) -> &Value {
        self.cells.get(key).unwrap_or(&Value::Null)
    }
}

/// Structural failures of the table core.
///
/// These indicate a load, edit, or save cannot safely proceed and must
/// surface to the caller. Cell text that fails to coerce to its column
/// type is NOT an error and never appears here; it degrades to a string
/// value (see [`crate::table::cell::parse_cell`]).
#[derive(Debug, Error, PartialEq)]
pub enum TableError {
    #[error("expected a JSON array of objects at the top level, found {found}")]
    NotAnArray { found: &'static str },

    #[error("cannot rebuild nested object: column {key:?} needs an object at {segment:?}, but a non-object value is already there")]
    PathCollision { key: String, segment: String },

    #[error("no column named {key:?}")]
    UnknownColumn { key: String },

    #[error("row index {index} out of bounds for table of {len} rows")]
    RowOutOfBounds { index: usize, len: usize },
}

/// Short JSON type name used in error messages.
pub(crate) fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_column_type_serde_names() {
        assert_eq!(serde_json::to_value(ColumnType::Number).unwrap(), json!("number"));
        assert_eq!(
            serde_json::from_value::<ColumnType>(json!("boolean")).unwrap(),
            ColumnType::Boolean
        );
    }

    #[test]
    fn test_column_info_path_mirrors_key() {
        let col = ColumnInfo::new("b.c", ColumnType::String);
        assert_eq!(col.key, "b.c");
        assert_eq!(col.path, "b.c");
    }

    #[test]
    fn test_row_cell_missing_is_null() {
        let row = Row::new(0, Map::new());
        assert_eq!(row.cell("anything"), &Value::Null);
    }

    #[test]
    fn test_error_messages_name_the_problem() {
        let err = TableError::NotAnArray { found: "an object" };
        assert!(err.to_string().contains("an object"));

        let err = TableError::PathCollision {
            key: "a.b".to_string(),
            segment: "a".to_string(),
        };
        assert!(err.to_string().contains("a.b"));
    }
}
