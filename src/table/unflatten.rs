//! Unflattening: rectangular rows back into nested JSON objects.
//!
//! Inverse of [`crate::table::flatten()`] for persistence, with one
//! documented asymmetry: null cells are dropped rather than written back,
//! so an explicit null in the source document and an absent key are
//! indistinguishable after a round trip.

use crate::table::types::{Row, TableError, KEY_DELIMITER};
use serde_json::{Map, Value};

/// Rebuild an array of nested JSON objects from flat rows.
///
/// Rows are emitted in the order given; callers wanting source-document
/// order sort by `original_index` first (see `Table::to_values`). The
/// `original_index` field itself is not written back.
///
/// Fails with [`TableError::PathCollision`] when two keys disagree about
/// the shape of a path, e.g. columns `a` and `a.b` both holding non-null
/// values. The collision is never resolved by silent overwrite.
pub fn unflatten(rows: &[Row]) -> Result<Vec<Value>, TableError> {
    rows.iter().map(unflatten_row).collect()
}

fn unflatten_row(row: &Row) -> Result<Value, TableError> {
    let mut result = Map::new();

    for (key, value) in &row.cells {
        // Nulls are not written back.
        if value.is_null() {
            continue;
        }
        insert_at_path(&mut result, key, value.clone())?;
    }

    Ok(Value::Object(result))
}

/// Walk/build nested objects along the delimiter-split path of `key`,
/// then assign `value` at the final segment.
fn insert_at_path(root: &mut Map<String, Value>, key: &str, value: Value) -> Result<(), TableError> {
    let mut current = root;
    let mut segments = key.split(KEY_DELIMITER).peekable();

    while let Some(segment) = segments.next() {
        if segments.peek().is_none() {
            // Leaf. An object already built here means some longer key
            // claimed this path first.
            if matches!(current.get(segment), Some(Value::Object(_))) {
                return Err(TableError::PathCollision {
                    key: key.to_string(),
                    segment: segment.to_string(),
                });
            }
            current.insert(segment.to_string(), value);
            return Ok(());
        }

        let slot = current
            .entry(segment.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        current = match slot {
            Value::Object(nested) => nested,
            _ => {
                return Err(TableError::PathCollision {
                    key: key.to_string(),
                    segment: segment.to_string(),
                })
            }
        };
    }

    Ok(())
}
