//! Tabular data as plain strings.
//!
//! A [`Grid`] is a list of rows where row 0 is the header. Rows are not
//! guaranteed to share the header's width, so every read goes through
//! [`cell_at`], which treats missing cells as the empty string.

/// One row of string cells.
pub type Row = Vec<String>;

/// Header row followed by data rows.
pub type Grid = Vec<Row>;

/// Read a cell, treating out-of-range indices as empty.
pub fn cell_at(row: &[String], col: usize) -> &str {
    row.get(col).map(String::as_str).unwrap_or("")
}

/// True when the cell is empty after trimming.
pub fn is_blank(cell: &str) -> bool {
    cell.trim().is_empty()
}

/// The data rows of a grid (everything after the header).
pub fn data_rows(grid: &[Row]) -> &[Row] {
    grid.get(1..).unwrap_or(&[])
}

/// Header cell for a column, or `""` if the header is short or missing.
pub fn header_at(grid: &[Row], col: usize) -> &str {
    grid.first().map(|h| cell_at(h, col)).unwrap_or("")
}
