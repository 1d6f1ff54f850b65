//! Whitespace, encoding and letter-case stages.

use regex::{Captures, Regex};
use std::sync::OnceLock;
use tidycsv_engine::engine::{Row, is_blank};

use crate::column_type::ColumnType;

/// Mojibake sequences and their repairs, applied in this order.
const ENCODING_FIXES: [(&str, &str); 10] = [
    ("â€™", "'"),
    ("â€œ", "\""),
    ("â€", "\""),
    ("Â", ""),
    ("Ã©", "é"),
    ("Ã¨", "è"),
    ("Ã¢", "â"),
    ("Ã®", "î"),
    ("Ã´", "ô"),
    ("Ã»", "û"),
];

pub fn trim(rows: &[Row]) -> Vec<Row> {
    rows.iter()
        .map(|row| row.iter().map(|cell| cell.trim().to_string()).collect())
        .collect()
}

pub fn fix_encoding(rows: &[Row]) -> Vec<Row> {
    rows.iter()
        .map(|row| row.iter().map(|cell| repair_mojibake(cell)).collect())
        .collect()
}

fn repair_mojibake(cell: &str) -> String {
    ENCODING_FIXES
        .iter()
        .fold(cell.to_string(), |acc, (from, to)| acc.replace(from, to))
}

fn word_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\w\S*").expect("word regex must compile"))
}

/// Upper-case the first letter of each word and lower-case the rest.
pub fn title_case(value: &str) -> String {
    word_re()
        .replace_all(value, |caps: &Captures| {
            let mut chars = caps[0].chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.as_str().to_lowercase().chars()).collect(),
                None => String::new(),
            }
        })
        .into_owned()
}

#[derive(Clone, Copy)]
enum CaseRule {
    Title,
    Upper,
    Keep,
}

fn case_rule(header: &str, column_type: Option<ColumnType>) -> CaseRule {
    let header = header.to_lowercase();
    if column_type == Some(ColumnType::Text) || header.contains("name") {
        CaseRule::Title
    } else if header.contains("code") || header.contains("id") {
        CaseRule::Upper
    } else {
        CaseRule::Keep
    }
}

/// Title-case text columns and any column whose header mentions `name`;
/// otherwise upper-case columns whose header mentions `code` or `id`.
pub fn normalize_case(header: &[String], rows: &[Row], types: &[ColumnType]) -> Vec<Row> {
    rows.iter()
        .map(|row| {
            row.iter()
                .enumerate()
                .map(|(col, cell)| {
                    if is_blank(cell) {
                        return cell.clone();
                    }
                    let header = header.get(col).map(String::as_str).unwrap_or("");
                    match case_rule(header, types.get(col).copied()) {
                        CaseRule::Title => title_case(cell),
                        CaseRule::Upper => cell.to_uppercase(),
                        CaseRule::Keep => cell.clone(),
                    }
                })
                .collect()
        })
        .collect()
}
