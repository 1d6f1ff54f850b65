//! Snapshot of numeric cell values used by formula evaluation.

use std::collections::HashMap;

use super::cell_ref::CellRef;
use super::grid::Row;
use super::numeric::plain_number;
use super::range::CellRange;

/// Every plain-number data cell, keyed by its address.
///
/// Built once per pipeline run from the data rows (row 0 of the map is the
/// first data row). Formula cells are not numbers, so a formula that points
/// at another formula reads 0: there is no recalculation order.
#[derive(Clone, Debug, Default)]
pub struct CellValues {
    values: HashMap<CellRef, f64>,
    /// Bottom-right corner of the populated area.
    extent: Option<CellRef>,
}

impl CellValues {
    /// Index the plain numbers found in `rows`.
    pub fn from_rows(rows: &[Row]) -> Self {
        let mut values = CellValues::default();
        for (row_idx, row) in rows.iter().enumerate() {
            for (col_idx, cell) in row.iter().enumerate() {
                if let Some(n) = plain_number(cell) {
                    values.insert(CellRef::new(col_idx, row_idx), n);
                }
            }
        }
        values
    }

    pub fn get(&self, cell: &CellRef) -> Option<f64> {
        self.values.get(cell).copied()
    }

    pub fn insert(&mut self, cell: CellRef, value: f64) {
        self.extent = Some(match self.extent {
            Some(e) => CellRef::new(e.col.max(cell.col), e.row.max(cell.row)),
            None => cell,
        });
        self.values.insert(cell, value);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Numeric values inside `range`, row-major.
    ///
    /// Only the part of the range overlapping populated cells is visited,
    /// so `SUM(A1:A1000000)` over a short grid stays cheap.
    pub fn range_values(&self, range: &CellRange) -> Vec<f64> {
        let Some(extent) = self.extent else {
            return Vec::new();
        };
        if range.start.col > extent.col || range.start.row > extent.row {
            return Vec::new();
        }
        let clipped = CellRange::new(
            range.start,
            CellRef::new(range.end.col.min(extent.col), range.end.row.min(extent.row)),
        );
        clipped.cells().filter_map(|cell| self.get(&cell)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::parse_range;

    #[test]
    fn test_range_values_clip_to_populated_cells() {
        let mut values = CellValues::default();
        values.insert(CellRef::new(0, 0), 1.0);
        values.insert(CellRef::new(1, 2), 2.0);
        assert_eq!(values.extent, Some(CellRef::new(1, 2)));

        let huge = CellRange::new(CellRef::new(0, 0), CellRef::new(701, 999_999));
        assert_eq!(values.range_values(&huge), vec![1.0, 2.0]);
        assert_eq!(values.range_values(&parse_range("B2:B5").unwrap()), vec![2.0]);
        assert!(values.range_values(&parse_range("C1:C9").unwrap()).is_empty());
        assert!(values.range_values(&parse_range("A4:B9").unwrap()).is_empty());
        assert!(CellValues::default().range_values(&huge).is_empty());
    }
}
