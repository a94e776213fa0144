//! The table core: nested JSON arrays as editable rows and typed columns.
//!
//! Four pieces, all pure transforms over explicit inputs:
//!
//! - **flatten**: nested objects into rectangular rows of sorted columns
//! - **unflatten**: flat rows back into nested objects for persistence
//! - **cell**: textual display and type-aware parsing of single cells
//! - **editor**: one loaded document as a mutable [`Table`] session

pub mod cell;
pub mod editor;
pub mod flatten;
pub mod types;
pub mod unflatten;

pub use cell::{format_cell, parse_cell};
pub use editor::Table;
pub use flatten::flatten;
pub use types::{ColumnInfo, ColumnType, Row, TableError, KEY_DELIMITER};
pub use unflatten::unflatten;
