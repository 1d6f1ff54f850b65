//! Phone number formatting.

use tidycsv_engine::engine::Row;

use super::map_typed_cells;
use crate::column_type::ColumnType;

/// Format a phone cell from its digits.
///
/// - More than 10 digits: the extra leading digits are a country code
///   (`+1`, `+91`, or whatever precedes the last ten) and the last ten form
///   the national number.
/// - Exactly 10 national digits: `(XXX) XXX-XXXX`, after the code if any.
/// - 5 to 9 digits: groups of three separated by spaces.
/// - Anything shorter is left alone.
pub fn format_phone_number(value: &str) -> String {
    let digits: String = value.chars().filter(|c| c.is_ascii_digit()).collect();

    let (country_code, national) = if digits.len() > 10 {
        let split = digits.len() - 10;
        (Some(&digits[..split]), &digits[split..])
    } else {
        (None, digits.as_str())
    };

    if national.len() == 10 {
        let local = format!("({}) {}-{}", &national[..3], &national[3..6], &national[6..]);
        return match country_code {
            Some(code) => format!("+{} {}", code, local),
            None => local,
        };
    }

    if digits.len() > 4 {
        return digits
            .as_bytes()
            .chunks(3)
            .map(|chunk| String::from_utf8_lossy(chunk).into_owned())
            .collect::<Vec<_>>()
            .join(" ");
    }

    value.to_string()
}

pub fn format_phones(rows: &[Row], types: &[ColumnType]) -> Vec<Row> {
    map_typed_cells(rows, types, |t| t == ColumnType::Phone, format_phone_number)
}
