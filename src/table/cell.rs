//! Cell codec: typed values to display text and edited text back to
//! typed values.
//!
//! `parse_cell` is total by contract. A keystroke-in-progress must never
//! block the table editor, so text that fails to coerce to the column's
//! declared type is stored as a plain string rather than rejected.

use crate::table::types::ColumnType;
use serde_json::Value;

/// Literal shown for (and parsed back to) a null cell.
const NULL_LITERAL: &str = "null";

/// Format a cell value for display or as the starting text of an edit.
///
/// Nulls render as the literal `null`, arrays and objects as their
/// compact JSON text, strings unquoted, numbers and booleans in their
/// standard form.
pub fn format_cell(value: &Value) -> String {
    match value {
        Value::Null => NULL_LITERAL.to_string(),
        Value::String(s) => s.clone(),
        // Display for Value is compact JSON, covering numbers, booleans,
        // arrays, and objects alike.
        other => other.to_string(),
    }
}

/// Parse user-entered text into a value for a column of the given type.
///
/// Never fails: `"null"` and the empty string become null regardless of
/// the declared type, and any text the type cannot absorb comes back as
/// a string value. The degrade-to-string branch is the contract, not an
/// error path.
pub fn parse_cell(text: &str, column_type: ColumnType) -> Value {
    if text.is_empty() || text == NULL_LITERAL {
        return Value::Null;
    }

    match column_type {
        ColumnType::Number => parse_number(text),
        ColumnType::Boolean => {
            if text.eq_ignore_ascii_case("true") {
                Value::Bool(true)
            } else if text.eq_ignore_ascii_case("false") {
                Value::Bool(false)
            } else {
                Value::String(text.to_string())
            }
        }
        ColumnType::Array | ColumnType::Object => match serde_json::from_str(text) {
            Ok(value) => value,
            Err(_) => Value::String(text.to_string()),
        },
        ColumnType::String | ColumnType::Null => Value::String(text.to_string()),
    }
}

/// Integers before floats so that "42" stays 42 rather than 42.0.
/// Non-finite floats have no JSON representation and degrade.
fn parse_number(text: &str) -> Value {
    if let Ok(n) = text.parse::<i64>() {
        return Value::Number(n.into());
    }
    if let Ok(n) = text.parse::<u64>() {
        return Value::Number(n.into());
    }
    if let Ok(f) = text.parse::<f64>() {
        if let Some(n) = serde_json::Number::from_f64(f) {
            return Value::Number(n);
        }
    }
    Value::String(text.to_string())
}
