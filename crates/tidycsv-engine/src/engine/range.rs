//! Rectangular cell ranges (`A1:B5`) and cell-reference scanning.

use regex::Regex;
use std::sync::OnceLock;

use super::cell_ref::CellRef;

/// Ranges larger than this are treated as unresolvable.
pub const MAX_RANGE_CELLS: usize = 1_000_000;

/// An inclusive rectangle of cells with normalized bounds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CellRange {
    pub start: CellRef,
    pub end: CellRef,
}

impl CellRange {
    /// Build a range from two corners in any order.
    pub fn new(a: CellRef, b: CellRef) -> Self {
        CellRange {
            start: CellRef::new(a.col.min(b.col), a.row.min(b.row)),
            end: CellRef::new(a.col.max(b.col), a.row.max(b.row)),
        }
    }

    /// Number of cells covered, or `None` on overflow.
    pub fn cell_count(&self) -> Option<usize> {
        let rows = self.end.row - self.start.row + 1;
        let cols = self.end.col - self.start.col + 1;
        rows.checked_mul(cols)
    }

    /// Cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = CellRef> + '_ {
        (self.start.row..=self.end.row).flat_map(move |row| {
            (self.start.col..=self.end.col).map(move |col| CellRef::new(col, row))
        })
    }
}

/// Parse a cell range like "A1:B5". Letters may be in either case here,
/// since range calls such as `sum(a1:a3)` are matched case-insensitively.
pub fn parse_range(range: &str) -> Option<CellRange> {
    let (start, end) = range.split_once(':')?;
    let start = CellRef::parse(&start.trim().to_ascii_uppercase())?;
    let end = CellRef::parse(&end.trim().to_ascii_uppercase())?;
    let range = CellRange::new(start, end);
    match range.cell_count() {
        Some(n) if n <= MAX_RANGE_CELLS => Some(range),
        _ => None,
    }
}

/// Matches bare upper-case cell references such as `A1` or `AB12`.
///
/// Captures:
/// - group 1: column letters
/// - group 2: row number
pub fn cell_ref_re() -> &'static Regex {
    static CELL_RE: OnceLock<Regex> = OnceLock::new();
    CELL_RE.get_or_init(|| {
        Regex::new(r"\b([A-Z]+)([0-9]+)\b").expect("cell reference regex must compile")
    })
}

/// All cell references mentioned in an expression, in order of appearance.
pub fn referenced_cells(expr: &str) -> Vec<CellRef> {
    cell_ref_re()
        .captures_iter(expr)
        .filter_map(|caps| CellRef::parse(&format!("{}{}", &caps[1], &caps[2])))
        .collect()
}
