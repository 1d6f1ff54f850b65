//! Row and column removal stages.

use std::collections::HashSet;
use tidycsv_engine::engine::{Row, cell_at, is_blank};

pub fn remove_empty_rows(rows: &[Row]) -> Vec<Row> {
    rows.iter()
        .filter(|row| row.iter().any(|cell| !is_blank(cell)))
        .cloned()
        .collect()
}

/// Drop columns whose header and data cells are all blank.
///
/// Returns the new header with rows rebuilt to its width; cells beyond the
/// original header are dropped and missing ones become `""`.
pub fn remove_empty_columns(header: &[String], rows: &[Row]) -> (Row, Vec<Row>) {
    let keep: Vec<usize> = (0..header.len())
        .filter(|&col| {
            !is_blank(&header[col]) || rows.iter().any(|row| !is_blank(cell_at(row, col)))
        })
        .collect();

    let new_header = keep.iter().map(|&col| header[col].clone()).collect();
    let new_rows = rows
        .iter()
        .map(|row| keep.iter().map(|&col| cell_at(row, col).to_string()).collect())
        .collect();
    (new_header, new_rows)
}

/// Keep the first occurrence of each row; rows are compared by their cells
/// joined with `|`.
pub fn remove_duplicates(rows: &[Row]) -> Vec<Row> {
    let mut seen: HashSet<String> = HashSet::new();
    rows.iter()
        .filter(|row| seen.insert(row.join("|")))
        .cloned()
        .collect()
}
