//! Data preparation for chart views.
//!
//! This module turns grid columns into frontend-agnostic series:
//! - [`bar_chart`]: value frequencies for categorical columns
//! - [`histogram`]: equal-width bins over a numeric column
//! - [`scatter`]: paired numeric points from two columns
//! - [`correlation_heatmap`]: the Pearson matrix of every numeric column
//!
//! Rendering is left to whoever consumes these structs.

use serde::Serialize;

use crate::engine::{Row, cell_at, data_rows, fixed_decimal_string, header_at, numeric_value};
use crate::stats::{column_values, correlation, paired_values};

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BarBucket {
    pub label: String,
    pub count: usize,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BarChart {
    pub title: String,
    pub data: Vec<BarBucket>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistogramBin {
    pub bin_start: f64,
    pub bin_end: f64,
    pub label: String,
    pub count: usize,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Histogram {
    pub title: String,
    pub data: Vec<HistogramBin>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScatterPlot {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub data: Vec<(f64, f64)>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct HeatmapCell {
    pub x: String,
    pub y: String,
    pub correlation: Option<f64>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Heatmap {
    pub title: String,
    pub data: Vec<HeatmapCell>,
}

/// The `limit` most frequent trimmed values of a column.
///
/// Ties keep first-seen order. A column with no values yields a single
/// `No Data` bucket. `None` when the grid has no data rows.
pub fn bar_chart(grid: &[Row], col: usize, limit: usize) -> Option<BarChart> {
    if grid.len() < 2 {
        return None;
    }
    let header = header_at(grid, col);

    let mut buckets: Vec<BarBucket> = Vec::new();
    for row in data_rows(grid) {
        let value = cell_at(row, col).trim();
        if value.is_empty() {
            continue;
        }
        match buckets.iter_mut().find(|b| b.label == value) {
            Some(bucket) => bucket.count += 1,
            None => buckets.push(BarBucket {
                label: value.to_string(),
                count: 1,
            }),
        }
    }

    if buckets.is_empty() {
        return Some(BarChart {
            title: format!("No data for {}", header),
            data: vec![BarBucket {
                label: "No Data".to_string(),
                count: 0,
            }],
        });
    }

    // Stable sort keeps first-seen order among equal counts.
    buckets.sort_by(|a, b| b.count.cmp(&a.count));
    buckets.truncate(limit);

    Some(BarChart {
        title: format!("Distribution of {}", header),
        data: buckets,
    })
}

/// Split a numeric column into `bins` equal-width buckets between min and max.
///
/// The maximum lands in the last bin. A constant column puts every value in
/// the first bin.
pub fn histogram(grid: &[Row], col: usize, bins: usize) -> Option<Histogram> {
    if grid.len() < 2 || bins == 0 {
        return None;
    }
    let values = column_values(grid, col);
    if values.is_empty() {
        return None;
    }

    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let width = (max - min) / bins as f64;

    let mut data: Vec<HistogramBin> = (0..bins)
        .map(|i| {
            let bin_start = min + i as f64 * width;
            let bin_end = bin_start + width;
            HistogramBin {
                bin_start,
                bin_end,
                label: format!(
                    "{} - {}",
                    fixed_decimal_string(bin_start, 2),
                    fixed_decimal_string(bin_end, 2)
                ),
                count: 0,
            }
        })
        .collect();

    for v in values {
        let index = if width > 0.0 {
            (((v - min) / width).floor() as usize).min(bins - 1)
        } else {
            0
        };
        data[index].count += 1;
    }

    Some(Histogram {
        title: format!("Histogram of {}", header_at(grid, col)),
        data,
    })
}

/// Numeric `(x, y)` points from two columns.
pub fn scatter(grid: &[Row], x_col: usize, y_col: usize) -> Option<ScatterPlot> {
    if grid.len() < 2 {
        return None;
    }
    let points = paired_values(grid, x_col, y_col);
    if points.is_empty() {
        return None;
    }
    let x_label = header_at(grid, x_col).to_string();
    let y_label = header_at(grid, y_col).to_string();
    Some(ScatterPlot {
        title: format!("{} vs {}", x_label, y_label),
        x_label,
        y_label,
        data: points,
    })
}

/// Correlation matrix over every column holding at least one number.
///
/// The diagonal is 1. `None` when fewer than two such columns exist.
pub fn correlation_heatmap(grid: &[Row]) -> Option<Heatmap> {
    if grid.len() < 2 {
        return None;
    }
    let numeric: Vec<usize> = (0..grid[0].len())
        .filter(|&col| {
            data_rows(grid)
                .iter()
                .any(|row| numeric_value(cell_at(row, col)).is_some())
        })
        .collect();
    if numeric.len() < 2 {
        return None;
    }

    let mut data = Vec::with_capacity(numeric.len() * numeric.len());
    for &a in &numeric {
        for &b in &numeric {
            data.push(HeatmapCell {
                x: header_at(grid, a).to_string(),
                y: header_at(grid, b).to_string(),
                correlation: if a == b { Some(1.0) } else { correlation(grid, a, b) },
            });
        }
    }

    Some(Heatmap {
        title: "Correlation Heatmap".to_string(),
        data,
    })
}
