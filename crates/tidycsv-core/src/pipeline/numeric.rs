//! Currency formatting, number canonicalization and outlier marking.

use tidycsv_engine::engine::{Row, cell_at, format_number, is_blank, money_string, numeric_value};
use tidycsv_engine::stats::mean_and_std_dev;

use super::map_typed_cells;
use crate::column_type::{CURRENCY_SYMBOLS, ColumnType};

/// Suffix appended to outlier cells.
pub const OUTLIER_MARKER: &str = " [OUTLIER]";

/// Symbols checked in priority order when a value mentions several.
const SYMBOL_PRIORITY: [char; 4] = ['€', '£', '¥', '₹'];

fn is_currency(t: ColumnType) -> bool {
    t == ColumnType::Currency
}

/// `{symbol}{value:.2}`, where the symbol is the first of `€ £ ¥ ₹` found in
/// the value and `$` otherwise. `None` when no number can be read.
pub fn format_currency_value(value: &str) -> Option<String> {
    let symbol = SYMBOL_PRIORITY
        .iter()
        .find(|s| value.contains(**s))
        .copied()
        .unwrap_or('$');
    let n = numeric_value(value)?;
    Some(money_string(n, &symbol.to_string()))
}

pub fn format_currencies(rows: &[Row], types: &[ColumnType]) -> Vec<Row> {
    map_typed_cells(rows, types, is_currency, |cell| {
        format_currency_value(cell).unwrap_or_else(|| cell.to_string())
    })
}

/// Canonical rendering of number and currency cells.
///
/// Currency cells keep the leftmost symbol they contain (default `$`) and
/// two decimals; number cells use the shortest decimal form.
pub fn convert_to_numbers(rows: &[Row], types: &[ColumnType]) -> Vec<Row> {
    rows.iter()
        .map(|row| {
            row.iter()
                .enumerate()
                .map(|(col, cell)| {
                    let t = match types.get(col) {
                        Some(t) if t.is_numeric() && !is_blank(cell) => *t,
                        _ => return cell.clone(),
                    };
                    let Some(n) = numeric_value(cell) else {
                        return cell.clone();
                    };
                    if t == ColumnType::Currency {
                        let symbol = cell
                            .chars()
                            .find(|c| CURRENCY_SYMBOLS.contains(c))
                            .unwrap_or('$');
                        money_string(n, &symbol.to_string())
                    } else {
                        format_number(n)
                    }
                })
                .collect()
        })
        .collect()
}

/// Append [`OUTLIER_MARKER`] to numeric cells at least two population
/// standard deviations from their column mean.
///
/// Columns with zero spread never have outliers.
pub fn detect_outliers(rows: &[Row], types: &[ColumnType]) -> Vec<Row> {
    let spreads: Vec<Option<(f64, f64)>> = types
        .iter()
        .enumerate()
        .map(|(col, t)| {
            if !t.is_numeric() {
                return None;
            }
            let values: Vec<f64> = rows
                .iter()
                .filter_map(|row| numeric_value(cell_at(row, col)))
                .collect();
            mean_and_std_dev(&values).filter(|(_, std_dev)| *std_dev > 0.0)
        })
        .collect();

    rows.iter()
        .map(|row| {
            row.iter()
                .enumerate()
                .map(|(col, cell)| {
                    let Some(Some((mean, std_dev))) = spreads.get(col) else {
                        return cell.clone();
                    };
                    match numeric_value(cell) {
                        Some(v) if is_outlier(v, *mean, *std_dev) => format!("{}{}", cell, OUTLIER_MARKER),
                        _ => cell.clone(),
                    }
                })
                .collect()
        })
        .collect()
}

pub(crate) fn is_outlier(value: f64, mean: f64, std_dev: f64) -> bool {
    std_dev > 0.0 && (value - mean).abs() >= 2.0 * std_dev
}
