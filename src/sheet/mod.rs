//! Positional spreadsheet primitives
//!
//! Cells, rows and tables as the query endpoint returns them, plus the
//! column addressing and date encoding every decoder builds on.

pub mod cell;
pub mod column;
pub mod date;
pub mod row;

pub use cell::Cell;
pub use column::Column;
pub use date::{format_display_date, format_sheet_datetime, parse_pseudo_date, parse_sheet_date};
pub use row::{ColumnInfo, Row, Table};
