//! `A1`-style addresses of data cells.
//!
//! Formulas address the data rows only: `A1` is the first column of the
//! first row *after* the header, so the header never has an address.
//! Letters must be upper case; `a1` is not a reference.
//!
//! ```
//! use tidycsv_engine::engine::CellRef;
//!
//! let cell = CellRef::parse("B3").unwrap();
//! assert_eq!((cell.col, cell.row), (1, 2));
//! assert_eq!(cell.to_string(), "B3");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::grid::{Row, cell_at};
use crate::error::FormulaError;

/// Zero-based column and data-row index.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct CellRef {
    pub col: usize,
    pub row: usize,
}

impl CellRef {
    pub fn new(col: usize, row: usize) -> CellRef {
        CellRef { col, row }
    }

    /// Parse `letters` + `digits`; `None` for anything else, for row 0 and
    /// for column numbers that overflow.
    pub fn parse(name: &str) -> Option<CellRef> {
        let split = name.find(|c: char| !c.is_ascii_uppercase())?;
        let (letters, digits) = name.split_at(split);
        if letters.is_empty() || digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }

        let col = letters
            .bytes()
            .try_fold(0usize, |acc, b| {
                acc.checked_mul(26)?.checked_add(usize::from(b - b'A') + 1)
            })?
            .checked_sub(1)?;
        let row = digits.parse::<usize>().ok()?.checked_sub(1)?;
        Some(CellRef::new(col, row))
    }

    /// Column letters for a zero-based index: 0 → `A`, 25 → `Z`, 26 → `AA`.
    pub fn column_letters(col: usize) -> String {
        let mut letters = Vec::new();
        let mut n = col as u128 + 1;
        while n > 0 {
            n -= 1;
            letters.push(b'A' + (n % 26) as u8);
            n /= 26;
        }
        letters.iter().rev().map(|&b| b as char).collect()
    }

    /// The addressed cell in `data` (rows without the header); `""` when
    /// out of range.
    pub fn lookup<'a>(&self, data: &'a [Row]) -> &'a str {
        data.get(self.row).map(|row| cell_at(row, self.col)).unwrap_or("")
    }
}

impl FromStr for CellRef {
    type Err = FormulaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CellRef::parse(s).ok_or_else(|| FormulaError::Syntax {
            position: 0,
            message: format!("invalid cell reference '{}'", s),
        })
    }
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", CellRef::column_letters(self.col), self.row + 1)
    }
}
