//! # Flatiron - JSON Array Flattening for Tabular Editing
//!
//! A library for viewing and editing arrays of nested JSON objects as a
//! flat table: nested keys become dot-joined columns, every row carries
//! the full column set, and each column gets one inferred type that
//! governs how textual edits to its cells are interpreted.
//!
//! ## Quick Start
//!
//! ```rust
//! use flatiron::Table;
//! use serde_json::json;
//!
//! # fn main() -> anyhow::Result<()> {
//! let doc = json!([
//!     {"id": 1, "user": {"name": "alice"}},
//!     {"id": 2}
//! ]);
//!
//! let mut table = Table::from_value(doc)?;
//! // columns: ["id", "user.name"], rectangular rows
//!
//! table.set_cell(1, "user.name", "bob")?;
//! let saved = table.to_pretty_json()?;
//! # assert!(saved.contains("bob"));
//! # Ok(())
//! # }
//! ```
//!
//! ## Lower-level pieces
//!
//! The [`Table`] session wraps three pure transforms that can also be
//! used directly: [`flatten()`], [`unflatten()`], and the cell codec
//! ([`format_cell`] / [`parse_cell`]).

use anyhow::{Context, Result};
use serde_json::Value;
use std::path::Path;

pub mod table;

// Re-export commonly used types for convenience
pub use table::{
    flatten, format_cell, parse_cell, unflatten, ColumnInfo, ColumnType, Row, Table, TableError,
    KEY_DELIMITER,
};

/// Load a document from a JSON file into an editable table.
///
/// The file must hold a top-level JSON array.
pub fn load_table<P: AsRef<Path>>(path: P) -> Result<Table> {
    let text = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.as_ref().display()))?;
    Table::from_str(&text).with_context(|| format!("Failed to load {}", path.as_ref().display()))
}

/// Write a table back to disk as 2-space-indented JSON, the same shape
/// the document was loaded from (modulo dropped null leaves).
pub fn save_table<P: AsRef<Path>>(table: &Table, path: P) -> Result<()> {
    let text = table.to_pretty_json()?;
    std::fs::write(&path, text)
        .with_context(|| format!("Failed to write {}", path.as_ref().display()))
}

/// Convert a parsed document straight to rows and columns without a
/// [`Table`] session, rejecting anything but a top-level array.
pub fn flatten_document(value: Value) -> Result<(Vec<Row>, Vec<ColumnInfo>), TableError> {
    match value {
        Value::Array(elements) => Ok(flatten(&elements)),
        other => Err(TableError::NotAnArray {
            found: table::types::json_type_name(&other),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_flatten_document_rejects_scalar() {
        assert!(flatten_document(json!(42)).is_err());
    }

    #[test]
    fn test_flatten_document_basic() {
        let (rows, columns) = flatten_document(json!([{"a": {"b": 1}}])).unwrap();
        assert_eq!(columns[0].key, "a.b");
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn test_file_round_trip() {
        let dir = std::env::temp_dir().join("flatiron-lib-test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("doc.json");
        std::fs::write(&path, r#"[{"id": 1, "meta": {"tag": "x"}}]"#).unwrap();

        let mut table = load_table(&path).unwrap();
        table.set_cell(0, "meta.tag", "y").unwrap();
        save_table(&table, &path).unwrap();

        let reloaded: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(reloaded, json!([{"id": 1, "meta": {"tag": "y"}}]));
        std::fs::remove_dir_all(&dir).ok();
    }
}
