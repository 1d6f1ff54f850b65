//! Formula preprocessing.
//!
//! Before a formula reaches the arithmetic evaluator every reference must be
//! replaced by a number. This happens in two passes, left to right:
//!
//! - **Range functions**: `SUM(A1:B5)` → the sum of the numeric cells in the
//!   block, `AVG(A1:A3)` → their mean
//! - **Cell references**: `A1` → the cell's value, or `0` when the cell is not
//!   a plain number
//!
//! There is no dependency ordering: values come from one snapshot taken
//! before any formula is evaluated.

use regex::Captures;

use super::format::format_number;
use super::range::{cell_ref_re, parse_range};
use super::values::CellValues;
use super::cell_ref::CellRef;

/// Replace every built-in range call with its numeric result.
///
/// Calls whose range exceeds the size limit are left as written, which makes
/// the evaluator reject the formula.
pub fn expand_range_functions(expr: &str, values: &CellValues) -> String {
    crate::builtins::range_fn_re()
        .replace_all(expr, |caps: &Captures| {
            let whole = caps[0].to_string();
            let Some(builtin) = crate::builtins::find_builtin(&caps[1]) else {
                return whole;
            };
            let Some(range) = parse_range(&format!("{}:{}", &caps[2], &caps[3])) else {
                return whole;
            };
            wrap_number(builtin.apply(values, &range))
        })
        .into_owned()
}

/// Replace bare cell references with their snapshot value (0 if absent).
pub fn substitute_cell_refs(expr: &str, values: &CellValues) -> String {
    cell_ref_re()
        .replace_all(expr, |caps: &Captures| {
            let name = format!("{}{}", &caps[1], &caps[2]);
            match CellRef::parse(&name) {
                Some(cell) => wrap_number(values.get(&cell).unwrap_or(0.0)),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}

/// Run both passes: ranges first, then single references.
pub fn preprocess_formula(expr: &str, values: &CellValues) -> String {
    let expanded = expand_range_functions(expr, values);
    substitute_cell_refs(&expanded, values)
}

// Negative values are parenthesized so `2^A1` with A1 = -1 keeps its meaning.
fn wrap_number(n: f64) -> String {
    if n < 0.0 {
        format!("({})", format_number(n))
    } else {
        format_number(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values() -> CellValues {
        let mut v = CellValues::default();
        v.insert(CellRef::new(0, 0), 10.0); // A1
        v.insert(CellRef::new(0, 1), 20.0); // A2
        v.insert(CellRef::new(0, 2), 30.0); // A3
        v.insert(CellRef::new(1, 0), -2.5); // B1
        v
    }

    #[test]
    fn test_substitute_cell_refs() {
        assert_eq!(substitute_cell_refs("A1 + A2", &values()), "10 + 20");
        assert_eq!(substitute_cell_refs("A1*B1", &values()), "10*(-2.5)");
        assert_eq!(substitute_cell_refs("Z9 + 1", &values()), "0 + 1");
    }

    #[test]
    fn test_expand_range_functions() {
        assert_eq!(expand_range_functions("SUM(A1:A3)", &values()), "60");
        assert_eq!(expand_range_functions("avg(A1:A3) / 2", &values()), "20 / 2");
        assert_eq!(expand_range_functions("SUM(A3:A1)", &values()), "60");
    }

    #[test]
    fn test_preprocess_formula_mixed() {
        assert_eq!(
            preprocess_formula("SUM(A1:A3) * 2 + A2", &values()),
            "60 * 2 + 20"
        );
    }

    #[test]
    fn test_unknown_functions_are_left_alone() {
        assert_eq!(
            preprocess_formula("MAX(A1:A3)", &values()),
            "MAX(10:30)"
        );
    }
}
