//! Date column stages.

use tidycsv_engine::engine::Row;

use super::map_typed_cells;
use crate::column_type::ColumnType;
use crate::dates::{fix_invalid_date, standardize_date_format};

fn is_date(t: ColumnType) -> bool {
    t == ColumnType::Date
}

pub fn standardize_dates(rows: &[Row], types: &[ColumnType]) -> Vec<Row> {
    map_typed_cells(rows, types, is_date, standardize_date_format)
}

/// Repair out-of-range years against `reference_year` (normally this year).
pub fn fix_invalid_dates(rows: &[Row], types: &[ColumnType], reference_year: i32) -> Vec<Row> {
    map_typed_cells(rows, types, is_date, |cell| {
        fix_invalid_date(cell, reference_year).unwrap_or_else(|| cell.to_string())
    })
}
