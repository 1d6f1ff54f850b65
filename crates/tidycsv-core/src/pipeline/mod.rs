//! The cleaning pipeline.
//!
//! A run splits the header from the data rows, detects column types once on
//! the input grid and then applies every enabled [`Stage`] in the fixed
//! order of [`Stage::ALL`]. Stages are plain functions over rows; a cell
//! a stage cannot handle keeps its previous value.
//!
//! ```
//! use tidycsv_core::pipeline::{ProcessOptions, process};
//! use tidycsv_core::storage::parse_csv;
//!
//! let grid = parse_csv("name,phone\nann,5551234567\nann,5551234567\n");
//! let cleaned = process(&grid, &ProcessOptions::default());
//! assert_eq!(cleaned.len(), 2);
//! assert_eq!(cleaned[1][1], "(555) 123-4567");
//! ```

mod dates;
mod formulas;
mod numeric;
mod options;
mod phone;
mod structure;
mod text;

pub use dates::{fix_invalid_dates, standardize_dates};
pub use formulas::evaluate_formulas;
pub(crate) use numeric::is_outlier;
pub use numeric::{OUTLIER_MARKER, convert_to_numbers, detect_outliers, format_currencies, format_currency_value};
pub use options::ProcessOptions;
pub use phone::{format_phone_number, format_phones};
pub use structure::{remove_duplicates, remove_empty_columns, remove_empty_rows};
pub use text::{fix_encoding, normalize_case, title_case, trim};

use chrono::Datelike;
use std::fmt;
use std::str::FromStr;
use tidycsv_engine::engine::{Grid, Row, is_blank};
use tracing::{debug, info};

use crate::column_type::{ColumnType, detect_column_types};
use crate::error::CleanError;

/// One transformation step.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Stage {
    Trim,
    FixEncoding,
    RemoveEmptyRows,
    RemoveEmptyColumns,
    StandardizeDates,
    FixInvalidDates,
    RemoveDuplicates,
    FormatCurrencies,
    FormatPhones,
    EvaluateFormulas,
    NormalizeCase,
    ConvertToNumbers,
    DetectOutliers,
}

impl Stage {
    /// Every stage in execution order.
    pub const ALL: [Stage; 13] = [
        Stage::Trim,
        Stage::FixEncoding,
        Stage::RemoveEmptyRows,
        Stage::RemoveEmptyColumns,
        Stage::StandardizeDates,
        Stage::FixInvalidDates,
        Stage::RemoveDuplicates,
        Stage::FormatCurrencies,
        Stage::FormatPhones,
        Stage::EvaluateFormulas,
        Stage::NormalizeCase,
        Stage::ConvertToNumbers,
        Stage::DetectOutliers,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Stage::Trim => "trim",
            Stage::FixEncoding => "fix-encoding",
            Stage::RemoveEmptyRows => "remove-empty-rows",
            Stage::RemoveEmptyColumns => "remove-empty-columns",
            Stage::StandardizeDates => "standardize-dates",
            Stage::FixInvalidDates => "fix-invalid-dates",
            Stage::RemoveDuplicates => "remove-duplicates",
            Stage::FormatCurrencies => "format-currencies",
            Stage::FormatPhones => "format-phones",
            Stage::EvaluateFormulas => "evaluate-formulas",
            Stage::NormalizeCase => "normalize-case",
            Stage::ConvertToNumbers => "convert-to-numbers",
            Stage::DetectOutliers => "detect-outliers",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Stage::Trim => "Strip leading and trailing whitespace from every cell",
            Stage::FixEncoding => "Repair common UTF-8 mojibake sequences",
            Stage::RemoveEmptyRows => "Drop rows whose cells are all blank",
            Stage::RemoveEmptyColumns => "Drop columns with a blank header and no data",
            Stage::StandardizeDates => "Rewrite date columns as YYYY-MM-DD",
            Stage::FixInvalidDates => "Repair implausible years in date columns",
            Stage::RemoveDuplicates => "Keep the first of identical rows",
            Stage::FormatCurrencies => "Render currency columns with symbol and 2 decimals",
            Stage::FormatPhones => "Format phone columns as (XXX) XXX-XXXX",
            Stage::EvaluateFormulas => "Replace =formulas with their computed value",
            Stage::NormalizeCase => "Title-case text and name columns, upper-case codes and ids",
            Stage::ConvertToNumbers => "Canonicalize number and currency columns",
            Stage::DetectOutliers => "Append [OUTLIER] to values 2+ std devs from the mean",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Stage {
    type Err = CleanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Stage::ALL
            .iter()
            .copied()
            .find(|stage| stage.name().eq_ignore_ascii_case(needle))
            .ok_or_else(|| CleanError::UnknownStage(needle.to_string()))
    }
}

/// A configured clean-up run.
#[derive(Clone, Debug)]
pub struct Pipeline {
    options: ProcessOptions,
    reference_year: i32,
}

impl Pipeline {
    /// A pipeline whose date repair uses the current local year.
    pub fn new(options: ProcessOptions) -> Self {
        Pipeline {
            options,
            reference_year: chrono::Local::now().year(),
        }
    }

    /// Pin the year `fix-invalid-dates` measures against.
    pub fn with_reference_year(mut self, year: i32) -> Self {
        self.reference_year = year;
        self
    }

    pub fn options(&self) -> &ProcessOptions {
        &self.options
    }

    /// Enabled stages in execution order.
    pub fn stages(&self) -> Vec<Stage> {
        Stage::ALL
            .iter()
            .copied()
            .filter(|stage| self.options.is_enabled(*stage))
            .collect()
    }

    /// Clean `grid`. Row 0 is the header; an empty grid stays empty.
    pub fn run(&self, grid: &[Row]) -> Grid {
        let Some(first) = grid.first() else {
            return Vec::new();
        };
        let mut header: Row = first.clone();
        let mut rows: Vec<Row> = grid[1..].to_vec();
        let mut types = detect_column_types(grid);
        let input_rows = rows.len();

        for stage in self.stages() {
            let before = rows.len();
            rows = match stage {
                Stage::Trim => trim(&rows),
                Stage::FixEncoding => fix_encoding(&rows),
                Stage::RemoveEmptyRows => remove_empty_rows(&rows),
                Stage::RemoveEmptyColumns => {
                    let (new_header, new_rows) = remove_empty_columns(&header, &rows);
                    header = new_header;
                    if self.options.recompute_types {
                        types = recompute_types(&header, &new_rows);
                        debug!(types = ?types, "recomputed column types");
                    }
                    new_rows
                }
                Stage::StandardizeDates => standardize_dates(&rows, &types),
                Stage::FixInvalidDates => fix_invalid_dates(&rows, &types, self.reference_year),
                Stage::RemoveDuplicates => remove_duplicates(&rows),
                Stage::FormatCurrencies => format_currencies(&rows, &types),
                Stage::FormatPhones => format_phones(&rows, &types),
                Stage::EvaluateFormulas => evaluate_formulas(&rows, &types),
                Stage::NormalizeCase => normalize_case(&header, &rows, &types),
                Stage::ConvertToNumbers => convert_to_numbers(&rows, &types),
                Stage::DetectOutliers => detect_outliers(&rows, &types),
            };
            debug!(stage = %stage, rows_before = before, rows_after = rows.len(), "applied stage");
        }

        info!(
            stages = self.stages().len(),
            rows_in = input_rows,
            rows_out = rows.len(),
            columns = header.len(),
            "pipeline finished"
        );

        let mut out = Vec::with_capacity(rows.len() + 1);
        out.push(header);
        out.extend(rows);
        out
    }
}

/// Clean `grid` with `options` using the current year for date repair.
pub fn process(grid: &[Row], options: &ProcessOptions) -> Grid {
    Pipeline::new(*options).run(grid)
}

fn recompute_types(header: &Row, rows: &[Row]) -> Vec<ColumnType> {
    let mut grid = Vec::with_capacity(rows.len() + 1);
    grid.push(header.clone());
    grid.extend_from_slice(rows);
    detect_column_types(&grid)
}

/// Apply `f` to every non-blank cell of the columns whose type satisfies
/// `targets`. Cells past the end of `types` are never touched.
pub(crate) fn map_typed_cells<P, F>(rows: &[Row], types: &[ColumnType], targets: P, mut f: F) -> Vec<Row>
where
    P: Fn(ColumnType) -> bool,
    F: FnMut(&str) -> String,
{
    rows.iter()
        .map(|row| {
            row.iter()
                .enumerate()
                .map(|(col, cell)| match types.get(col) {
                    Some(t) if targets(*t) && !is_blank(cell) => f(cell),
                    _ => cell.clone(),
                })
                .collect()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(rows: &[&[&str]]) -> Grid {
        rows.iter()
            .map(|r| r.iter().map(|c| c.to_string()).collect())
            .collect()
    }

    fn pipeline(options: ProcessOptions) -> Pipeline {
        Pipeline::new(options).with_reference_year(2024)
    }

    #[test]
    fn test_stage_names_round_trip() {
        for stage in Stage::ALL {
            assert_eq!(stage.name().parse::<Stage>().unwrap(), stage);
        }
        assert_eq!("  TRIM ".parse::<Stage>().unwrap(), Stage::Trim);
        assert!(matches!(
            "shuffle".parse::<Stage>(),
            Err(CleanError::UnknownStage(name)) if name == "shuffle"
        ));
    }

    #[test]
    fn test_stages_follow_fixed_order() {
        let p = pipeline(ProcessOptions::only(&[
            Stage::DetectOutliers,
            Stage::Trim,
            Stage::EvaluateFormulas,
        ]));
        assert_eq!(
            p.stages(),
            vec![Stage::Trim, Stage::EvaluateFormulas, Stage::DetectOutliers]
        );
    }

    #[test]
    fn test_empty_and_header_only_grids() {
        let p = pipeline(ProcessOptions::default());
        assert!(p.run(&[]).is_empty());
        assert_eq!(p.run(&grid(&[&["a", "b"]])), grid(&[&["a", "b"]]));
    }

    #[test]
    fn test_default_pipeline_end_to_end() {
        let input = grid(&[
            &["Name", "Joined", "Phone", "Salary", "Bonus"],
            &[" ann ", "1/15/1985", "5551234567", "$75000", "=D1*0.1"],
            &["bob", "2023/02/15", "15551234567", "$72,000.75", "=1/0"],
            &["", "", "", "", ""],
            &[" ann ", "1/15/1985", "5551234567", "$75000", "=D1*0.1"],
        ]);
        let out = pipeline(ProcessOptions::default()).run(&input);
        assert_eq!(
            out,
            grid(&[
                &["Name", "Joined", "Phone", "Salary", "Bonus"],
                &["ann", "1985-01-15", "(555) 123-4567", "$75000.00", "0"],
                &["bob", "2023-02-15", "+1 (555) 123-4567", "$72000.75", "=1/0"],
            ])
        );
    }

    #[test]
    fn test_formula_sees_values_from_earlier_stages() {
        let input = grid(&[&["a", "b"], &[" 4 ", "=A1*2"]]);
        let out = pipeline(ProcessOptions::only(&[Stage::Trim, Stage::EvaluateFormulas])).run(&input);
        assert_eq!(out[1], vec!["4", "8"]);
    }

    #[test]
    fn test_remove_empty_columns_keeps_stale_types() {
        // Dropping the blank middle column shifts "price" left while the
        // type vector still says column 1 is empty.
        let input = grid(&[&["id", "", "price"], &["a", "", "$5"], &["b", "", "$7"]]);
        let mut options = ProcessOptions::only(&[Stage::RemoveEmptyColumns, Stage::FormatCurrencies]);

        let stale = pipeline(options).run(&input);
        assert_eq!(stale, grid(&[&["id", "price"], &["a", "$5"], &["b", "$7"]]));

        options.recompute_types = true;
        let strict = pipeline(options).run(&input);
        assert_eq!(strict, grid(&[&["id", "price"], &["a", "$5.00"], &["b", "$7.00"]]));
    }

    #[test]
    fn test_outlier_pipeline() {
        let input = grid(&[&["v"], &["10"], &["10"], &["10"], &["10"], &["1000"]]);
        let out = pipeline(ProcessOptions::default().with(Stage::DetectOutliers, true)).run(&input);
        assert_eq!(out[5], vec!["1000 [OUTLIER]"]);
        assert_eq!(out[1], vec!["10"]);
    }

    #[test]
    fn test_second_run_changes_nothing() {
        let input = grid(&[
            &["when", "price", "label"],
            &[" 2023-01-15 ", "$10", " x "],
            &["2023-01-15", "$10", "x"],
            &["", "", ""],
        ]);
        let options = ProcessOptions::only(&[
            Stage::Trim,
            Stage::RemoveEmptyRows,
            Stage::RemoveDuplicates,
            Stage::StandardizeDates,
            Stage::FormatCurrencies,
        ]);
        let once = pipeline(options).run(&input);
        let twice = pipeline(options).run(&once);
        assert_eq!(once, twice);
        assert_eq!(once, grid(&[&["when", "price", "label"], &["2023-01-15", "$10.00", "x"]]));
    }

    #[test]
    fn test_map_typed_cells_skips_blank_and_untyped() {
        let rows = grid(&[&["a", "", "c", "extra"]]);
        let types = [ColumnType::Text, ColumnType::Text, ColumnType::Number];
        let out = map_typed_cells(&rows, &types, |t| t == ColumnType::Text, |c| c.to_uppercase());
        assert_eq!(out, grid(&[&["A", "", "c", "extra"]]));
    }
}
