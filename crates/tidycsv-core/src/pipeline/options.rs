//! Stage switches for a clean-up run.

use serde::{Deserialize, Serialize};

use super::Stage;

/// One flag per stage plus the strict type mode.
///
/// Deserializes from TOML with kebab-case keys matching the stage names
/// (`remove-empty-columns = true`); missing keys keep their defaults and
/// unknown keys are rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub struct ProcessOptions {
    pub trim: bool,
    pub fix_encoding: bool,
    pub remove_empty_rows: bool,
    pub remove_empty_columns: bool,
    pub standardize_dates: bool,
    pub fix_invalid_dates: bool,
    pub remove_duplicates: bool,
    pub format_currencies: bool,
    pub format_phones: bool,
    pub evaluate_formulas: bool,
    pub normalize_case: bool,
    pub convert_to_numbers: bool,
    pub detect_outliers: bool,
    /// Re-classify columns after `remove-empty-columns` instead of reusing
    /// the types detected on the input grid.
    pub recompute_types: bool,
}

impl Default for ProcessOptions {
    fn default() -> Self {
        ProcessOptions {
            trim: true,
            fix_encoding: true,
            remove_empty_rows: true,
            remove_empty_columns: false,
            standardize_dates: true,
            fix_invalid_dates: true,
            remove_duplicates: true,
            format_currencies: true,
            format_phones: true,
            evaluate_formulas: true,
            normalize_case: false,
            convert_to_numbers: true,
            detect_outliers: false,
            recompute_types: false,
        }
    }
}

impl ProcessOptions {
    /// Every stage switched off.
    pub fn none() -> Self {
        ProcessOptions {
            trim: false,
            fix_encoding: false,
            remove_empty_rows: false,
            remove_empty_columns: false,
            standardize_dates: false,
            fix_invalid_dates: false,
            remove_duplicates: false,
            format_currencies: false,
            format_phones: false,
            evaluate_formulas: false,
            normalize_case: false,
            convert_to_numbers: false,
            detect_outliers: false,
            recompute_types: false,
        }
    }

    /// Only the given stages switched on.
    pub fn only(stages: &[Stage]) -> Self {
        let mut options = Self::none();
        for &stage in stages {
            options.set(stage, true);
        }
        options
    }

    pub fn is_enabled(&self, stage: Stage) -> bool {
        match stage {
            Stage::Trim => self.trim,
            Stage::FixEncoding => self.fix_encoding,
            Stage::RemoveEmptyRows => self.remove_empty_rows,
            Stage::RemoveEmptyColumns => self.remove_empty_columns,
            Stage::StandardizeDates => self.standardize_dates,
            Stage::FixInvalidDates => self.fix_invalid_dates,
            Stage::RemoveDuplicates => self.remove_duplicates,
            Stage::FormatCurrencies => self.format_currencies,
            Stage::FormatPhones => self.format_phones,
            Stage::EvaluateFormulas => self.evaluate_formulas,
            Stage::NormalizeCase => self.normalize_case,
            Stage::ConvertToNumbers => self.convert_to_numbers,
            Stage::DetectOutliers => self.detect_outliers,
        }
    }

    pub fn set(&mut self, stage: Stage, enabled: bool) {
        let flag = match stage {
            Stage::Trim => &mut self.trim,
            Stage::FixEncoding => &mut self.fix_encoding,
            Stage::RemoveEmptyRows => &mut self.remove_empty_rows,
            Stage::RemoveEmptyColumns => &mut self.remove_empty_columns,
            Stage::StandardizeDates => &mut self.standardize_dates,
            Stage::FixInvalidDates => &mut self.fix_invalid_dates,
            Stage::RemoveDuplicates => &mut self.remove_duplicates,
            Stage::FormatCurrencies => &mut self.format_currencies,
            Stage::FormatPhones => &mut self.format_phones,
            Stage::EvaluateFormulas => &mut self.evaluate_formulas,
            Stage::NormalizeCase => &mut self.normalize_case,
            Stage::ConvertToNumbers => &mut self.convert_to_numbers,
            Stage::DetectOutliers => &mut self.detect_outliers,
        };
        *flag = enabled;
    }

    /// Builder form of [`ProcessOptions::set`].
    pub fn with(mut self, stage: Stage, enabled: bool) -> Self {
        self.set(stage, enabled);
        self
    }
}
