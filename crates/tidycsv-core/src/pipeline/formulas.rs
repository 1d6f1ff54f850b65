//! Formula evaluation stage.

use tidycsv_engine::engine::{CellValues, Row, evaluate_formula, format_number};
use tracing::debug;

use super::map_typed_cells;
use crate::column_type::ColumnType;

/// Replace `=` cells in formula columns with their value.
///
/// References resolve against one snapshot of the plain-number cells taken
/// before any formula runs (`A1` is the first data row). A formula that
/// fails to evaluate keeps its text.
pub fn evaluate_formulas(rows: &[Row], types: &[ColumnType]) -> Vec<Row> {
    if !types.contains(&ColumnType::Formula) {
        return rows.to_vec();
    }
    let values = CellValues::from_rows(rows);

    map_typed_cells(rows, types, |t| t == ColumnType::Formula, |cell| {
        if !cell.starts_with('=') {
            return cell.to_string();
        }
        match evaluate_formula(cell, &values) {
            Ok(n) => format_number(n),
            Err(err) => {
                debug!(formula = cell, error = %err, "formula left unevaluated");
                cell.to_string()
            }
        }
    })
}
