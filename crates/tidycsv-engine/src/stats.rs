//! Descriptive statistics over grid columns.
//!
//! Every function reads data rows only (the header is skipped) and extracts
//! numbers with [`numeric_value`], so `"$1,200"` counts as `1200`. Nothing is
//! cached: statistics are recomputed from whatever grid is passed in.

use serde::Serialize;

use crate::engine::{Grid, Row, cell_at, data_rows, fixed_decimal_string, header_at, numeric_value};

/// Numeric summary of one column.
///
/// When no cell parses, `is_empty` is true, `count` is 0 and every other
/// field is `None`.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnStatistics {
    pub count: usize,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub sum: Option<f64>,
    pub mean: Option<f64>,
    pub median: Option<f64>,
    pub std_dev: Option<f64>,
    pub range: Option<f64>,
    pub q1: Option<f64>,
    pub q3: Option<f64>,
    pub iqr: Option<f64>,
    /// `std_dev / mean * 100`; `None` when the mean is zero.
    pub coefficient_of_variation: Option<f64>,
    pub is_empty: bool,
}

impl ColumnStatistics {
    fn empty() -> Self {
        ColumnStatistics {
            is_empty: true,
            ..Default::default()
        }
    }
}

/// Numeric values of a column, skipping blanks and unparseable cells.
pub fn column_values(grid: &[Row], col: usize) -> Vec<f64> {
    data_rows(grid)
        .iter()
        .filter_map(|row| numeric_value(cell_at(row, col)))
        .collect()
}

/// Population mean and standard deviation. `None` for an empty slice.
pub fn mean_and_std_dev(values: &[f64]) -> Option<(f64, f64)> {
    if values.is_empty() {
        return None;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    Some((mean, variance.sqrt()))
}

/// Summarize the numeric content of column `col`.
pub fn column_statistics(grid: &[Row], col: usize) -> ColumnStatistics {
    summarize(&column_values(grid, col))
}

/// Summarize an arbitrary list of values.
pub fn summarize(values: &[f64]) -> ColumnStatistics {
    let Some((mean, std_dev)) = mean_and_std_dev(values) else {
        return ColumnStatistics::empty();
    };

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let count = sorted.len();
    let min = sorted[0];
    let max = sorted[count - 1];
    let sum: f64 = values.iter().sum();

    let mid = count / 2;
    let median = if count % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    };

    // Index quartiles, no interpolation.
    let q1 = sorted[count / 4];
    let q3 = sorted[(count * 3) / 4];

    ColumnStatistics {
        count,
        min: Some(min),
        max: Some(max),
        sum: Some(sum),
        mean: Some(mean),
        median: Some(median),
        std_dev: Some(std_dev),
        range: Some(max - min),
        q1: Some(q1),
        q3: Some(q3),
        iqr: Some(q3 - q1),
        coefficient_of_variation: (mean != 0.0).then(|| std_dev / mean * 100.0),
        is_empty: false,
    }
}

/// Pearson correlation between two columns over rows where both parse.
///
/// Returns `None` with fewer than two complete pairs or when either column
/// is constant across those pairs. The result is clamped to `[-1, 1]`.
pub fn correlation(grid: &[Row], col_a: usize, col_b: usize) -> Option<f64> {
    let pairs: Vec<(f64, f64)> = paired_values(grid, col_a, col_b);
    pearson(&pairs)
}

/// Rows where both columns carry a number.
pub fn paired_values(grid: &[Row], col_a: usize, col_b: usize) -> Vec<(f64, f64)> {
    data_rows(grid)
        .iter()
        .filter_map(|row| {
            let a = numeric_value(cell_at(row, col_a))?;
            let b = numeric_value(cell_at(row, col_b))?;
            Some((a, b))
        })
        .collect()
}

fn pearson(pairs: &[(f64, f64)]) -> Option<f64> {
    if pairs.len() < 2 {
        return None;
    }
    let n = pairs.len() as f64;
    let mean_a = pairs.iter().map(|(a, _)| a).sum::<f64>() / n;
    let mean_b = pairs.iter().map(|(_, b)| b).sum::<f64>() / n;

    let mut numerator = 0.0;
    let mut denom_a = 0.0;
    let mut denom_b = 0.0;
    for (a, b) in pairs {
        let da = a - mean_a;
        let db = b - mean_b;
        numerator += da * db;
        denom_a += da * da;
        denom_b += db * db;
    }

    if denom_a == 0.0 || denom_b == 0.0 {
        return None;
    }
    Some((numerator / (denom_a * denom_b).sqrt()).clamp(-1.0, 1.0))
}

/// Population skewness: the mean of cubed z-scores.
pub fn skewness(values: &[f64]) -> f64 {
    let Some((mean, std_dev)) = mean_and_std_dev(values) else {
        return 0.0;
    };
    if std_dev == 0.0 {
        return 0.0;
    }
    values
        .iter()
        .map(|v| ((v - mean) / std_dev).powi(3))
        .sum::<f64>()
        / values.len() as f64
}

/// Statistics for one column, labelled with its header.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ColumnSummary {
    pub index: usize,
    pub name: String,
    pub stats: ColumnStatistics,
}

/// Statistics for every column with at least one number, in column order.
pub fn data_summary(grid: &[Row]) -> Vec<ColumnSummary> {
    if grid.len() < 2 {
        return Vec::new();
    }
    (0..grid[0].len())
        .filter_map(|index| {
            let stats = column_statistics(grid, index);
            (!stats.is_empty).then(|| ColumnSummary {
                index,
                name: header_at(grid, index).to_string(),
                stats,
            })
        })
        .collect()
}

/// Columns spread widely enough to be worth rescaling.
pub fn columns_for_normalization(grid: &[Row]) -> Vec<usize> {
    data_summary(grid)
        .into_iter()
        .filter(|summary| {
            let range = summary.stats.range.unwrap_or(0.0);
            let std_dev = summary.stats.std_dev.unwrap_or(0.0);
            range > 100.0 || std_dev > 10.0
        })
        .map(|summary| summary.index)
        .collect()
}

/// Min-max scale a column into `[0, 1]`, rendered with 4 decimals.
///
/// The header row and cells without a number are copied as is. The grid is
/// returned unchanged when the column has no numbers or is constant.
pub fn normalize_column(grid: &[Row], col: usize) -> Grid {
    let stats = column_statistics(grid, col);
    let (Some(min), Some(max)) = (stats.min, stats.max) else {
        return grid.to_vec();
    };
    if min == max {
        return grid.to_vec();
    }
    let range = max - min;

    grid.iter()
        .enumerate()
        .map(|(row_idx, row)| {
            let mut row = row.clone();
            if row_idx == 0 {
                return row;
            }
            if let Some(v) = numeric_value(cell_at(&row, col))
                && let Some(cell) = row.get_mut(col)
            {
                *cell = fixed_decimal_string((v - min) / range, 4);
            }
            row
        })
        .collect()
}
