//! Built-in range functions and their metadata.
//!
//! Conventions:
//! - Formula-facing built-in names are ALL CAPS (e.g. `SUM`, `AVG`); matching
//!   is case-insensitive.
//! - A range call is replaced by its numeric result before arithmetic
//!   evaluation. If you add a new built-in, add it to `RANGE_BUILTINS`.

use regex::Regex;
use std::sync::OnceLock;

use crate::engine::{CellRange, CellValues};

pub struct RangeBuiltin {
    pub name: &'static str,
    pub description: &'static str,
    aggregate: fn(&[f64]) -> f64,
}

impl RangeBuiltin {
    /// Aggregate the numeric cells of `range`.
    pub fn apply(&self, values: &CellValues, range: &CellRange) -> f64 {
        (self.aggregate)(&values.range_values(range))
    }
}

fn sum(values: &[f64]) -> f64 {
    values.iter().sum()
}

fn avg(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        sum(values) / values.len() as f64
    }
}

pub const RANGE_BUILTINS: &[RangeBuiltin] = &[
    RangeBuiltin {
        name: "SUM",
        description: "Sum of numeric values in a cell range",
        aggregate: sum,
    },
    RangeBuiltin {
        name: "AVG",
        description: "Average of numeric values in a cell range",
        aggregate: avg,
    },
];

/// Function names that mark a column as holding formulas, even without `=`.
pub const FORMULA_FUNCTION_NAMES: &[&str] = &["SUM", "AVG", "COUNT", "MAX", "MIN"];

/// Regex that matches built-in range calls like `SUM(A1:B5)`.
///
/// Captures:
/// - group 1: function name (e.g. `SUM`)
/// - group 2: start cell ref (e.g. `A1`)
/// - group 3: end cell ref (e.g. `B5`)
pub fn range_fn_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        let names = RANGE_BUILTINS
            .iter()
            .map(|b| b.name)
            .collect::<Vec<_>>()
            .join("|");
        Regex::new(&format!(
            r"(?i)\b({})\(\s*([A-Z]+[0-9]+)\s*:\s*([A-Z]+[0-9]+)\s*\)",
            names
        ))
        .expect("built-in range regex must compile")
    })
}

pub fn find_builtin(name: &str) -> Option<&'static RangeBuiltin> {
    RANGE_BUILTINS
        .iter()
        .find(|b| b.name.eq_ignore_ascii_case(name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{CellRef, parse_range};

    fn column(values: &[f64]) -> CellValues {
        let mut map = CellValues::default();
        for (row, v) in values.iter().enumerate() {
            map.insert(CellRef::new(0, row), *v);
        }
        map
    }

    #[test]
    fn test_find_builtin_is_case_insensitive() {
        assert_eq!(find_builtin("sum").map(|b| b.name), Some("SUM"));
        assert_eq!(find_builtin("Avg").map(|b| b.name), Some("AVG"));
        assert!(find_builtin("COUNT").is_none());
    }

    #[test]
    fn test_range_regex_captures_bounds() {
        let caps = range_fn_re().captures("1 + sum(A1:B5)").unwrap();
        assert_eq!(&caps[1], "sum");
        assert_eq!(&caps[2], "A1");
        assert_eq!(&caps[3], "B5");
        assert!(!range_fn_re().is_match("SUM(A1)"));
    }

    #[test]
    fn test_sum_and_avg_skip_missing_cells() {
        let values = column(&[10.0, 20.0, 30.0]);
        let range = parse_range("A1:A5").unwrap();
        assert_eq!(find_builtin("SUM").unwrap().apply(&values, &range), 60.0);
        assert_eq!(find_builtin("AVG").unwrap().apply(&values, &range), 20.0);
    }

    #[test]
    fn test_avg_of_empty_range_is_zero() {
        let values = CellValues::default();
        let range = parse_range("C1:C3").unwrap();
        assert_eq!(find_builtin("AVG").unwrap().apply(&values, &range), 0.0);
    }
}
