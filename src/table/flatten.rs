//! Flattening: nested JSON objects into rectangular rows of typed columns.
//!
//! Each source object is walked depth-first; nested objects are expanded
//! into delimiter-joined keys, while arrays and scalars stay as leaf
//! values. Column types are inferred in a single pass over the whole
//! array, first non-null value wins.

use crate::table::types::{ColumnInfo, ColumnType, Row, KEY_DELIMITER};
use serde_json::{Map, Value};
use std::collections::BTreeSet;

/// Flatten an array of JSON objects into rows and columns.
///
/// Pure function of its input. Non-object elements contribute no keys of
/// their own and come out as an all-null row. An empty input yields empty
/// rows and empty columns.
///
/// Guarantees:
/// - every returned row carries exactly the full column key set, with
///   missing source values stored as null;
/// - column order is the byte-wise lexicographic order of the flat keys,
///   independent of input element order.
pub fn flatten(values: &[Value]) -> (Vec<Row>, Vec<ColumnInfo>) {
    let mut raw_rows: Vec<Map<String, Value>> = Vec::with_capacity(values.len());
    let mut all_keys: BTreeSet<String> = BTreeSet::new();

    for value in values {
        let mut cells = Map::new();
        if let Value::Object(obj) = value {
            flatten_object(obj, "", &mut cells);
        }
        all_keys.extend(cells.keys().cloned());
        raw_rows.push(cells);
    }

    // BTreeSet iteration gives the sorted column order directly.
    let columns: Vec<ColumnInfo> = all_keys
        .iter()
        .map(|key| ColumnInfo::new(key.clone(), infer_column_type(&raw_rows, key)))
        .collect();

    let rows = raw_rows
        .into_iter()
        .enumerate()
        .map(|(index, mut cells)| {
            // Rectangularize: fill every column the source object lacked.
            for column in &columns {
                cells.entry(column.key.clone()).or_insert(Value::Null);
            }
            Row::new(index, cells)
        })
        .collect();

    (rows, columns)
}

/// Recursively expand one object's fields under `prefix`.
///
/// A nested object is always expanded, never stored as a column itself;
/// arrays, scalars, and nulls become leaves under their joined key.
fn flatten_object(obj: &Map<String, Value>, prefix: &str, out: &mut Map<String, Value>) {
    for (key, value) in obj {
        let flat_key = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{}{}{}", prefix, KEY_DELIMITER, key)
        };

        match value {
            Value::Object(nested) => flatten_object(nested, &flat_key, out),
            _ => {
                out.insert(flat_key, value.clone());
            }
        }
    }
}

/// Classify a column by its first non-null value, scanning rows in
/// original array order. A column with only nulls (or only missing
/// values) is typed [`ColumnType::Null`].
fn infer_column_type(rows: &[Map<String, Value>], key: &str) -> ColumnType {
    let first = rows
        .iter()
        .filter_map(|cells| cells.get(key))
        .find(|value| !value.is_null());

    match first {
        Some(Value::Array(_)) => ColumnType::Array,
        // Only reachable for objects nested inside an array leaf;
        // top-level objects are always expanded.
        Some(Value::Object(_)) => ColumnType::Object,
        Some(Value::Bool(_)) => ColumnType::Boolean,
        Some(Value::Number(_)) => ColumnType::Number,
        Some(_) => ColumnType::String,
        None => ColumnType::Null,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_nested_object_expands_into_dotted_column() {
        let input = vec![json!({"a": 1, "b": {"c": "x"}}), json!({"a": 2})];
        let (rows, columns) = flatten(&input);

        let keys: Vec<&str> = columns.iter().map(|c| c.key.as_str()).collect();
        assert_eq!(keys, vec!["a", "b.c"]);
        assert_eq!(columns[0].column_type, ColumnType::Number);
        assert_eq!(columns[1].column_type, ColumnType::String);

        assert_eq!(rows[0].original_index, 0);
        assert_eq!(rows[0].cell("a"), &json!(1));
        assert_eq!(rows[0].cell("b.c"), &json!("x"));
        assert_eq!(rows[1].original_index, 1);
        assert_eq!(rows[1].cell("a"), &json!(2));
        assert_eq!(rows[1].cell("b.c"), &Value::Null);
    }

    #[test]
    fn test_rows_are_rectangular() {
        let input = vec![
            json!({"x": 1}),
            json!({"y": {"z": true}}),
            json!({"x": 3, "w": null}),
        ];
        let (rows, columns) = flatten(&input);

        let keys: Vec<&String> = columns.iter().map(|c| &c.key).collect();
        for row in &rows {
            let row_keys: Vec<&String> = row.cells.keys().collect();
            assert_eq!(row_keys, keys);
        }
    }

    #[test]
    fn test_column_order_independent_of_input_order() {
        let a = vec![json!({"b": 1}), json!({"a": 2})];
        let b = vec![json!({"a": 2}), json!({"b": 1})];
        let (_, cols_a) = flatten(&a);
        let (_, cols_b) = flatten(&b);

        let keys_a: Vec<&str> = cols_a.iter().map(|c| c.key.as_str()).collect();
        let keys_b: Vec<&str> = cols_b.iter().map(|c| c.key.as_str()).collect();
        assert_eq!(keys_a, keys_b);
        assert_eq!(keys_a, vec!["a", "b"]);
    }

    #[test]
    fn test_arrays_stay_as_leaves() {
        let input = vec![json!({"tags": ["rust", "json"], "deep": {"list": [1, 2]}})];
        let (rows, columns) = flatten(&input);

        assert_eq!(columns[0].key, "deep.list");
        assert_eq!(columns[0].column_type, ColumnType::Array);
        assert_eq!(columns[1].key, "tags");
        assert_eq!(columns[1].column_type, ColumnType::Array);
        assert_eq!(rows[0].cell("tags"), &json!(["rust", "json"]));
    }

    #[test]
    fn test_first_non_null_wins_type_inference() {
        let input = vec![
            json!({"v": null}),
            json!({"v": true}),
            json!({"v": "later strings are ignored"}),
        ];
        let (_, columns) = flatten(&input);
        assert_eq!(columns[0].column_type, ColumnType::Boolean);
    }

    #[test]
    fn test_all_null_column_types_as_null() {
        let input = vec![json!({"v": null}), json!({})];
        let (_, columns) = flatten(&input);
        assert_eq!(columns[0].column_type, ColumnType::Null);
    }

    #[test]
    fn test_object_inside_array_element_keeps_object_type() {
        let input = vec![json!({"items": [{"id": 1}]})];
        let (_, columns) = flatten(&input);
        assert_eq!(columns[0].column_type, ColumnType::Array);
    }

    #[test]
    fn test_non_object_element_becomes_all_null_row() {
        let input = vec![json!({"a": 1}), json!(42)];
        let (rows, _) = flatten(&input);

        assert_eq!(rows[1].original_index, 1);
        assert_eq!(rows[1].cell("a"), &Value::Null);
    }

    #[test]
    fn test_empty_input() {
        let (rows, columns) = flatten(&[]);
        assert!(rows.is_empty());
        assert!(columns.is_empty());
    }

    #[test]
    fn test_deeply_nested_keys() {
        let input = vec![json!({"a": {"b": {"c": {"d": "deep"}}}})];
        let (rows, columns) = flatten(&input);

        assert_eq!(columns[0].key, "a.b.c.d");
        assert_eq!(rows[0].cell("a.b.c.d"), &json!("deep"));
    }
}
