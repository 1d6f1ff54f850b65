//! Column type detection.
//!
//! Each column gets one [`ColumnType`] from its data rows. Checks run in a
//! fixed order and the first match wins:
//!
//! 1. `empty`    - every value is blank
//! 2. `date`     - any value looks like a date
//! 3. `phone`    - any value is 7-15 digits once punctuation is removed
//! 4. `number` / `currency` - every non-blank value is numeric
//! 5. `formula`  - any value looks like a formula
//! 6. `text`     - everything else
//!
//! Date, phone and formula need a single matching value; number and currency
//! need every value.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

use tidycsv_engine::builtins::FORMULA_FUNCTION_NAMES;
use tidycsv_engine::engine::{Row, cell_at, data_rows, is_blank, plain_number};

use crate::dates::parse_loose_date;

/// Semantic type of a column.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Empty,
    Date,
    Phone,
    Number,
    Currency,
    Formula,
    Text,
}

impl ColumnType {
    pub fn as_str(self) -> &'static str {
        match self {
            ColumnType::Empty => "empty",
            ColumnType::Date => "date",
            ColumnType::Phone => "phone",
            ColumnType::Number => "number",
            ColumnType::Currency => "currency",
            ColumnType::Formula => "formula",
            ColumnType::Text => "text",
        }
    }

    /// Number and currency columns are the ones statistics care about.
    pub fn is_numeric(self) -> bool {
        matches!(self, ColumnType::Number | ColumnType::Currency)
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub const CURRENCY_SYMBOLS: [char; 5] = ['$', '€', '£', '¥', '₹'];

/// Classify every header column of `grid`.
///
/// Missing cells read as blank; a grid with only a header yields `Empty`
/// for each column and an empty grid yields no types.
pub fn detect_column_types(grid: &[Row]) -> Vec<ColumnType> {
    let Some(header) = grid.first() else {
        return Vec::new();
    };
    let rows = data_rows(grid);
    (0..header.len())
        .map(|col| {
            let values: Vec<&str> = rows.iter().map(|row| cell_at(row, col)).collect();
            classify_column(&values)
        })
        .collect()
}

/// Classify one column from its data values.
pub fn classify_column(values: &[&str]) -> ColumnType {
    if values.iter().all(|v| is_blank(v)) {
        return ColumnType::Empty;
    }
    if values.iter().any(|v| is_likely_date(v)) {
        return ColumnType::Date;
    }
    if values.iter().any(|v| is_likely_phone(v)) {
        return ColumnType::Phone;
    }
    if values.iter().all(|v| is_blank(v) || is_likely_numeric(v)) {
        if values.iter().any(|v| is_likely_currency(v)) {
            return ColumnType::Currency;
        }
        return ColumnType::Number;
    }
    if values.iter().any(|v| is_likely_formula(v)) {
        return ColumnType::Formula;
    }
    ColumnType::Text
}

fn date_patterns() -> &'static [Regex] {
    static RE: OnceLock<Vec<Regex>> = OnceLock::new();
    RE.get_or_init(|| {
        [
            r"^\d{4}[-/]\d{1,2}[-/]\d{1,2}$",
            r"^\d{1,2}[-/]\d{1,2}[-/]\d{4}$",
            r"^\d{1,2}[-/]\d{1,2}[-/]\d{2}$",
            r"^\d{1,2}[-\s.]\w{3,9}[-\s.]\d{2,4}$",
        ]
        .iter()
        .map(|p| Regex::new(p).expect("date pattern must compile"))
        .collect()
    })
}

pub fn is_likely_date(value: &str) -> bool {
    if is_blank(value) {
        return false;
    }
    date_patterns().iter().any(|re| re.is_match(value)) || parse_loose_date(value).is_some()
}

/// 7 to 15 digits once whitespace, dashes, parentheses, `+` and `.` are gone.
///
/// Plain decimals such as `72000.75` pass too; the date and phone checks
/// run before the numeric one.
pub fn is_likely_phone(value: &str) -> bool {
    if is_blank(value) {
        return false;
    }
    let digits: String = value
        .chars()
        .filter(|c| !(c.is_whitespace() || matches!(c, '-' | '(' | ')' | '+' | '.')))
        .collect();
    (7..=15).contains(&digits.len()) && digits.chars().all(|c| c.is_ascii_digit())
}

pub fn is_likely_numeric(value: &str) -> bool {
    if is_blank(value) {
        return false;
    }
    let normalized: String = value
        .chars()
        .filter(|c| !(CURRENCY_SYMBOLS.contains(c) || c.is_whitespace() || *c == ','))
        .collect();
    plain_number(&normalized).is_some()
}

fn currency_suffix_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d+\s*[$€£¥₹]").expect("currency regex must compile"))
}

pub fn is_likely_currency(value: &str) -> bool {
    if is_blank(value) {
        return false;
    }
    value.starts_with(CURRENCY_SYMBOLS)
        || currency_suffix_re().is_match(value)
        || value.ends_with(".00")
}

fn ref_arithmetic_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[A-Z]+\d+[+\-*/][A-Z]+\d+").expect("formula regex must compile")
    })
}

pub fn is_likely_formula(value: &str) -> bool {
    if is_blank(value) {
        return false;
    }
    value.starts_with('=')
        || ref_arithmetic_re().is_match(value)
        || FORMULA_FUNCTION_NAMES
            .iter()
            .any(|name| value.strip_prefix(name).is_some_and(|rest| rest.starts_with('(')))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tidycsv_engine::engine::Grid;

    fn grid(rows: &[&[&str]]) -> Grid {
        rows.iter()
            .map(|r| r.iter().map(|c| c.to_string()).collect())
            .collect()
    }

    #[test]
    fn test_detect_column_types_examples() {
        let g = grid(&[
            &["Email", "Price", "Date"],
            &["a@b.com", "$10.00", "2023-01-01"],
            &["c@d.com", "$20.00", ""],
        ]);
        assert_eq!(
            detect_column_types(&g),
            vec![ColumnType::Text, ColumnType::Currency, ColumnType::Date]
        );
    }

    #[test]
    fn test_detect_column_types_all_kinds() {
        let g = grid(&[
            &["blank", "phone", "qty", "total", "label"],
            &["", "(555) 123-4567", "3", "=A1*2", "alpha"],
            &[" ", "", "4", "SUM(A1:A2)", "beta"],
        ]);
        assert_eq!(
            detect_column_types(&g),
            vec![
                ColumnType::Empty,
                ColumnType::Phone,
                ColumnType::Number,
                ColumnType::Formula,
                ColumnType::Text,
            ]
        );
    }

    #[test]
    fn test_short_rows_read_blank() {
        let g = grid(&[&["a", "b"], &["x"]]);
        assert_eq!(
            detect_column_types(&g),
            vec![ColumnType::Text, ColumnType::Empty]
        );
    }

    #[test]
    fn test_header_only_and_empty_grids() {
        assert_eq!(
            detect_column_types(&grid(&[&["a", "b"]])),
            vec![ColumnType::Empty, ColumnType::Empty]
        );
        assert!(detect_column_types(&[]).is_empty());
    }

    #[test]
    fn test_one_text_value_demotes_numbers() {
        assert_eq!(classify_column(&["1", "2", "n/a"]), ColumnType::Text);
        assert_eq!(classify_column(&["1,200", "€ 3"]), ColumnType::Currency);
        assert_eq!(classify_column(&["1.5", "2"]), ColumnType::Number);
    }

    #[test]
    fn test_precedence_date_before_phone() {
        assert_eq!(classify_column(&["5551234567", "2023-01-01"]), ColumnType::Date);
        // Long decimals pass the phone check before the numeric one.
        assert_eq!(classify_column(&["72000.75"]), ColumnType::Phone);
    }

    #[test]
    fn test_is_likely_date() {
        assert!(is_likely_date("2023/1/5"));
        assert!(is_likely_date("12/31/2023"));
        assert!(is_likely_date("12/31/23"));
        assert!(is_likely_date("15 January 2023"));
        assert!(is_likely_date("Jan 15, 2023"));
        assert!(!is_likely_date("12345"));
        assert!(!is_likely_date("hello"));
    }

    #[test]
    fn test_is_likely_currency() {
        assert!(is_likely_currency("$5"));
        assert!(is_likely_currency("100 €"));
        assert!(is_likely_currency("12.00"));
        assert!(!is_likely_currency("12.5"));
        assert!(!is_likely_currency("1.005"));
        assert!(!is_likely_currency("2.001"));
        assert_eq!(classify_column(&["1.005", "2.001"]), ColumnType::Number);
        assert_eq!(classify_column(&["1.5", "3.00"]), ColumnType::Currency);
    }

    #[test]
    fn test_is_likely_formula() {
        assert!(is_likely_formula("=1+1"));
        assert!(is_likely_formula("A1+B2"));
        assert!(is_likely_formula("MAX(A1:A3)"));
        assert!(!is_likely_formula("max(A1:A3)"));
        assert!(!is_likely_formula("SUMMARY"));
    }

    #[test]
    fn test_column_type_tags() {
        assert_eq!(ColumnType::Currency.to_string(), "currency");
        assert!(ColumnType::Number.is_numeric());
        assert!(!ColumnType::Date.is_numeric());
    }
}
