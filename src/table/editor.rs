//! One loaded document as an editable table.
//!
//! A [`Table`] is built wholesale from a parsed JSON array, mutated in
//! place cell by cell while the surrounding editor runs, and converted
//! back to a JSON array on save. Rows and columns have no identity
//! beyond one load/edit/save cycle.

use crate::table::cell::{format_cell, parse_cell};
use crate::table::flatten::flatten;
use crate::table::types::{json_type_name, ColumnInfo, Row, TableError};
use crate::table::unflatten::unflatten;
use anyhow::{Context, Result};
use serde_json::Value;
use std::collections::BTreeMap;

/// A flattened document: rectangular rows over a fixed, sorted column set.
#[derive(Debug, Clone)]
pub struct Table {
    rows: Vec<Row>,
    columns: Vec<ColumnInfo>,
}

impl Table {
    /// Build a table from a parsed JSON document.
    ///
    /// The top-level value must be an array; anything else is a
    /// structural error. This is the one validation the surrounding
    /// application relies on at load time.
    pub fn from_value(value: Value) -> Result<Self, TableError> {
        match value {
            Value::Array(elements) => {
                let (rows, columns) = flatten(&elements);
                Ok(Table { rows, columns })
            }
            other => Err(TableError::NotAnArray {
                found: json_type_name(&other),
            }),
        }
    }

    /// Parse JSON text and build a table from it.
    pub fn from_str(text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text).context("Failed to parse JSON")?;
        Ok(Self::from_value(value)?)
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn columns(&self) -> &[ColumnInfo] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Look up a column by its flat key.
    pub fn column(&self, key: &str) -> Option<&ColumnInfo> {
        self.columns.iter().find(|c| c.key == key)
    }

    /// Display text for one cell.
    pub fn formatted_cell(&self, row_index: usize, column_key: &str) -> Result<String, TableError> {
        let row = self.row_at(row_index)?;
        self.column_info(column_key)?;
        Ok(format_cell(row.cell(column_key)))
    }

    /// Single-cell edit: parse `text` with the column's declared type and
    /// replace the value in place. Coercion failures store the raw text
    /// as a string; only bad coordinates are errors.
    pub fn set_cell(&mut self, row_index: usize, column_key: &str, text: &str) -> Result<(), TableError> {
        let column_type = self.column_info(column_key)?.column_type;
        self.row_at(row_index)?;
        let value = parse_cell(text, column_type);
        self.rows[row_index].cells.insert(column_key.to_string(), value);
        Ok(())
    }

    /// Batch edit: one parse, the result applied to every selected row.
    ///
    /// All indices are validated before any row is touched, so a bad
    /// selection leaves the table unchanged.
    pub fn set_cells(&mut self, row_indices: &[usize], column_key: &str, text: &str) -> Result<(), TableError> {
        let column_type = self.column_info(column_key)?.column_type;
        for &index in row_indices {
            self.row_at(index)?;
        }

        let value = parse_cell(text, column_type);
        for &index in row_indices {
            self.rows[index].cells.insert(column_key.to_string(), value.clone());
        }
        Ok(())
    }

    /// Row indices whose cells match every filter, in table order.
    ///
    /// A filter matches when its text appears case-insensitively in the
    /// formatted cell under its column key; blank filter text matches
    /// everything. Keys that name no column simply match nothing in any
    /// row, the same as a filter left behind after its column vanished.
    pub fn filter_rows(&self, filters: &BTreeMap<String, String>) -> Vec<usize> {
        self.rows
            .iter()
            .enumerate()
            .filter(|(_, row)| {
                filters.iter().all(|(key, text)| {
                    let text = text.trim();
                    if text.is_empty() {
                        return true;
                    }
                    if self.column(key).is_none() {
                        return false;
                    }
                    format_cell(row.cell(key))
                        .to_lowercase()
                        .contains(&text.to_lowercase())
                })
            })
            .map(|(index, _)| index)
            .collect()
    }

    /// Convert back to a JSON array for persistence.
    ///
    /// Rows are emitted by ascending `original_index`, restoring source
    /// document order, then unflattened with nulls dropped.
    pub fn to_values(&self) -> Result<Vec<Value>, TableError> {
        let mut ordered: Vec<&Row> = self.rows.iter().collect();
        ordered.sort_by_key(|row| row.original_index);
        let ordered: Vec<Row> = ordered.into_iter().cloned().collect();
        unflatten(&ordered)
    }

    /// The persisted form: a 2-space-indented JSON array.
    pub fn to_pretty_json(&self) -> Result<String> {
        let values = self.to_values()?;
        serde_json::to_string_pretty(&Value::Array(values)).context("Failed to serialize document")
    }

    fn column_info(&self, key: &str) -> Result<&ColumnInfo, TableError> {
        self.column(key).ok_or_else(|| TableError::UnknownColumn {
            key: key.to_string(),
        })
    }

    fn row_at(&self, index: usize) -> Result<&Row, TableError> {
        self.rows.get(index).ok_or(TableError::RowOutOfBounds {
            index,
            len: self.rows.len(),
        })
    }
}
