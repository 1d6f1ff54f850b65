//! Date recognition and normalization.
//!
//! All output uses ISO `YYYY-MM-DD`. Parsing goes through `chrono`, so a
//! day or month out of range (`02/30/2023`) is simply unparseable.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%Y.%m.%d",
    "%m/%d/%Y",
    "%d %b %Y",
    "%d-%b-%Y",
    "%d.%b.%Y",
    "%d %B %Y",
    "%d-%B-%Y",
    "%b %d, %Y",
    "%B %d, %Y",
    "%b %d %Y",
    "%B %d %Y",
];

const DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Generic date parser for free-form cells.
///
/// Understands ISO dates and date-times (including RFC 3339 offsets),
/// day-month-name forms like `15 Jan 2023` or `15-Jan-2023`, US
/// `Jan 15, 2023` and `1/15/2023`, and dotted `2023.01.15`. A bare number
/// is never a date.
pub fn parse_loose_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if value.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.date_naive());
    }
    for format in DATE_TIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
            return Some(dt.date());
        }
    }
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(value, format).ok())
}

/// Rewrite a date cell as `YYYY-MM-DD`, or return it trimmed but otherwise
/// unchanged when it cannot be read.
///
/// - `/` separated: a 4-digit first part is `YYYY/MM/DD`; otherwise a first
///   part of at most 12 means `MM/DD/YYYY`, anything larger `DD/MM/YYYY`.
/// - `-` separated: a 4-digit first part is `YYYY-MM-DD`, else `DD-MM-YYYY`.
/// - Everything else, and numeric forms that fail, go to [`parse_loose_date`].
pub fn standardize_date_format(value: &str) -> String {
    match parse_date_cell(value) {
        Some(date) => date.format("%Y-%m-%d").to_string(),
        None => value.trim().to_string(),
    }
}

/// Read a date cell with the rules of [`standardize_date_format`].
pub fn parse_date_cell(value: &str) -> Option<NaiveDate> {
    standardize(value.trim())
}

fn standardize(value: &str) -> Option<NaiveDate> {
    let separator = if value.contains('/') {
        '/'
    } else if value.contains('-') {
        '-'
    } else {
        return parse_loose_date(value);
    };

    let parts: Vec<&str> = value.split(separator).collect();
    if parts.len() != 3 {
        return None;
    }

    let year_first = parts[0].trim().len() == 4;
    let (year, month, day) = if year_first {
        (parts[0], parts[1], parts[2])
    } else if separator == '/' && leading_int(parts[0]).is_some_and(|n| n <= 12) {
        (parts[2], parts[0], parts[1])
    } else {
        (parts[2], parts[1], parts[0])
    };

    date_from_parts(year, month, day).or_else(|| parse_loose_date(value))
}

fn date_from_parts(year: &str, month: &str, day: &str) -> Option<NaiveDate> {
    let year_text = year.trim();
    let year = exact_int(year_text)?;
    let year = if year_text.len() == 2 {
        expand_two_digit_year(year)
    } else {
        year
    };
    let month = u32::try_from(exact_int(month)?).ok()?;
    let day = u32::try_from(exact_int(day)?).ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Two-digit years follow chrono's `%y` pivot: 00-68 are 2000s, 69-99 1900s.
fn expand_two_digit_year(year: i32) -> i32 {
    if year < 69 { 2000 + year } else { 1900 + year }
}

fn exact_int(part: &str) -> Option<i32> {
    let part = part.trim();
    if part.is_empty() || !part.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    part.parse().ok()
}

/// Leading integer of a string (`"15T10:00"` → 15), like a lenient
/// `parseInt`. Leading whitespace and one sign are accepted.
pub fn leading_int(value: &str) -> Option<i64> {
    let value = value.trim_start();
    let (negative, rest) = match value.as_bytes().first() {
        Some(b'-') => (true, &value[1..]),
        Some(b'+') => (false, &value[1..]),
        _ => (false, value),
    };
    let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    let n: i64 = digits.parse().ok()?;
    Some(if negative { -n } else { n })
}

/// Repair an implausible year in a `Y-M-D` style cell.
///
/// The cell is split on `-` and `/`; with three integer parts the first is
/// read as the year. Years before 1900 or after `reference_year + 100` are
/// corrected (500-999 gain a leading 1, far-future years become
/// `reference_year`, anything else becomes 1900) and the cell is rewritten as
/// zero-padded `YYYY-MM-DD`. Every other cell comes back as `None`.
pub fn fix_invalid_date(value: &str, reference_year: i32) -> Option<String> {
    let parts: Vec<&str> = value.split(['-', '/']).collect();
    if parts.len() != 3 {
        return None;
    }
    let year = leading_int(parts[0])?;
    let month = leading_int(parts[1])?;
    let day = leading_int(parts[2])?;

    let ceiling = i64::from(reference_year) + 100;
    if (1900..=ceiling).contains(&year) {
        return None;
    }

    let year = if year > 500 && year < 1000 {
        year + 1000
    } else if year > ceiling {
        i64::from(reference_year)
    } else {
        1900
    };
    Some(format!("{}-{:02}-{:02}", year, month, day))
}
