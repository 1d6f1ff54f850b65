//! CSV import/export functionality

use crate::error::{CleanError, Result};
use std::io::Write;
use std::path::Path;
use tidycsv_engine::engine::{Grid, Row};

/// Files above this size are refused by [`read_csv`].
pub const MAX_CSV_FILE_BYTES: u64 = 64 * 1_048_576; // 64 MiB

/// Parse CSV text into a grid of trimmed string cells.
///
/// Quotes group commas and newlines into one field and `""` inside quotes is
/// a literal quote. `\r\n` counts as a single row break. Rows whose cells are
/// all blank are dropped. Never fails: malformed quoting just runs to the
/// end of the input.
pub fn parse_csv(text: &str) -> Grid {
    let mut grid = Vec::new();
    let mut row: Row = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                field.push('"');
                chars.next();
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                row.push(field.trim().to_string());
                field.clear();
            }
            '\r' if !in_quotes && chars.peek() == Some(&'\n') => {
                chars.next();
                end_row(&mut grid, &mut row, &mut field);
            }
            '\n' if !in_quotes => end_row(&mut grid, &mut row, &mut field),
            _ => field.push(c),
        }
    }

    if !field.is_empty() || !row.is_empty() {
        end_row(&mut grid, &mut row, &mut field);
    }
    grid
}

fn end_row(grid: &mut Grid, row: &mut Row, field: &mut String) {
    row.push(field.trim().to_string());
    field.clear();
    let finished = std::mem::take(row);
    if finished.iter().any(|cell| !cell.is_empty()) {
        grid.push(finished);
    }
}

/// Serialize a grid as CSV text: rows joined by `\n`, no trailing newline.
pub fn serialize_csv(grid: &[Row]) -> String {
    grid.iter()
        .map(|row| {
            row.iter()
                .map(|cell| escape_csv_field(cell))
                .collect::<Vec<_>>()
                .join(",")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Escape a field for CSV output.
///
/// Cells are written verbatim otherwise: a cleaned formula like `=A1+B1`
/// stays a formula.
pub fn escape_csv_field(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Read and parse a CSV file.
///
/// A leading UTF-8 byte order mark is dropped. A file with no non-blank row
/// is reported as [`CleanError::EmptyCsv`].
pub fn read_csv(path: &Path) -> Result<Grid> {
    let size = std::fs::metadata(path)?.len();
    if size > MAX_CSV_FILE_BYTES {
        return Err(CleanError::FileTooLarge {
            size,
            limit: MAX_CSV_FILE_BYTES,
        });
    }

    let content = std::fs::read_to_string(path)?;
    let content = content.strip_prefix('\u{feff}').unwrap_or(&content);
    let grid = parse_csv(content);
    if grid.is_empty() {
        return Err(CleanError::EmptyCsv);
    }
    Ok(grid)
}

/// Write a grid to `path` as CSV with a trailing newline.
pub fn write_csv(path: &Path, grid: &[Row]) -> Result<()> {
    let mut file = std::fs::File::create(path)?;
    writeln!(file, "{}", serialize_csv(grid))?;
    Ok(())
}
