//! Automatic findings over a cleaned grid.
//!
//! [`generate_insights`] looks at number and currency columns for outliers,
//! skewed distributions and strong pairwise correlations, and at the first
//! date column against the first numeric column for a trend over time.

use chrono::NaiveDate;
use serde::Serialize;
use tidycsv_engine::engine::{Row, cell_at, data_rows, fixed_decimal_string, header_at, numeric_value};
use tidycsv_engine::stats::{column_statistics, correlation, mean_and_std_dev, skewness};

use crate::column_type::ColumnType;
use crate::dates::{parse_date_cell, parse_loose_date};
use crate::pipeline::is_outlier;

const SKEW_THRESHOLD: f64 = 0.5;
const STRONG_CORRELATION: f64 = 0.7;
const VERY_STRONG_CORRELATION: f64 = 0.9;
const TREND_THRESHOLD_PERCENT: f64 = 20.0;
const STEEP_TREND_PERCENT: f64 = 50.0;
const STABLE_PERCENT: f64 = 5.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightKind {
    Outlier,
    Skew,
    Correlation,
    Trend,
}

/// Ordered from most to least important.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Importance {
    High,
    Medium,
    Low,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Insight {
    pub kind: InsightKind,
    pub title: String,
    pub description: String,
    pub importance: Importance,
    /// Column indexes the finding is about.
    pub columns: Vec<usize>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum CorrelationStrength {
    #[serde(rename = "strong")]
    Strong,
    #[serde(rename = "very strong")]
    VeryStrong,
}

impl CorrelationStrength {
    fn label(self) -> &'static str {
        match self {
            CorrelationStrength::Strong => "strong",
            CorrelationStrength::VeryStrong => "very strong",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Positive,
    Negative,
}

impl Direction {
    fn label(self) -> &'static str {
        match self {
            Direction::Positive => "positive",
            Direction::Negative => "negative",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CorrelationPair {
    pub columns: (usize, usize),
    pub names: (String, String),
    pub correlation: f64,
    pub strength: CorrelationStrength,
    pub direction: Direction,
}

/// One dated observation of the trend series.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub value: f64,
}

/// Everything [`generate_insights`] found.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct InsightReport {
    /// Sorted by importance, most important first.
    pub insights: Vec<Insight>,
    pub correlations: Vec<CorrelationPair>,
    /// Date-sorted series behind the trend check (empty without one).
    pub trend: Vec<TrendPoint>,
}

/// Inspect `grid` using the column types detected for it.
pub fn generate_insights(grid: &[Row], types: &[ColumnType]) -> InsightReport {
    let mut report = InsightReport::default();
    if grid.len() < 2 {
        return report;
    }

    let numeric: Vec<usize> = columns_of(types, |t| t.is_numeric());
    let dates: Vec<usize> = columns_of(types, |t| t == ColumnType::Date);

    for &col in &numeric {
        column_insights(grid, col, &mut report.insights);
    }

    for (i, &a) in numeric.iter().enumerate() {
        for &b in &numeric[i + 1..] {
            let Some(pair) = correlation_pair(grid, a, b) else {
                continue;
            };
            report.insights.push(Insight {
                kind: InsightKind::Correlation,
                title: format!(
                    "Strong correlation between \"{}\" and \"{}\"",
                    pair.names.0, pair.names.1
                ),
                description: format!(
                    "There's a {} {} correlation ({})",
                    pair.strength.label(),
                    pair.direction.label(),
                    fixed_decimal_string(pair.correlation, 2)
                ),
                importance: match pair.strength {
                    CorrelationStrength::VeryStrong => Importance::High,
                    CorrelationStrength::Strong => Importance::Medium,
                },
                columns: vec![a, b],
            });
            report.correlations.push(pair);
        }
    }

    if let (Some(&date_col), Some(&value_col)) = (dates.first(), numeric.first()) {
        let series = trend_series(grid, date_col, value_col);
        if series.len() > 3 {
            if let Some(insight) = trend_insight(grid, date_col, value_col, &series) {
                report.insights.push(insight);
            }
            report.trend = series;
        }
    }

    report.insights.sort_by_key(|insight| insight.importance);
    report
}

fn columns_of(types: &[ColumnType], pred: impl Fn(ColumnType) -> bool) -> Vec<usize> {
    types
        .iter()
        .enumerate()
        .filter(|(_, t)| pred(**t))
        .map(|(col, _)| col)
        .collect()
}

fn column_insights(grid: &[Row], col: usize, out: &mut Vec<Insight>) {
    let stats = column_statistics(grid, col);
    let (Some(mean), Some(std_dev)) = (stats.mean, stats.std_dev) else {
        return;
    };
    let header = header_at(grid, col);

    let has_outliers = data_rows(grid)
        .iter()
        .filter_map(|row| numeric_value(cell_at(row, col)))
        .any(|v| is_outlier(v, mean, std_dev));
    if has_outliers {
        out.push(Insight {
            kind: InsightKind::Outlier,
            title: format!("Outliers detected in \"{}\"", header),
            description: format!(
                "This column contains values that deviate significantly from the average ({}).",
                fixed_decimal_string(mean, 2)
            ),
            importance: Importance::High,
            columns: vec![col],
        });
    }

    // Unreadable cells count as zero here, unlike the statistics above.
    let values: Vec<f64> = data_rows(grid)
        .iter()
        .map(|row| numeric_value(cell_at(row, col)).unwrap_or(0.0))
        .collect();
    let skew = skewness(&values);
    if skew.abs() > SKEW_THRESHOLD {
        let (direction, side) = if skew > 0.0 {
            ("positively", "below")
        } else {
            ("negatively", "above")
        };
        out.push(Insight {
            kind: InsightKind::Skew,
            title: format!("Skewed distribution in \"{}\"", header),
            description: format!(
                "The data is {} skewed, with most values {} the average.",
                direction, side
            ),
            importance: Importance::Medium,
            columns: vec![col],
        });
    }
}

/// The correlation between two columns when it is strong (`|r| > 0.7`).
pub fn correlation_pair(grid: &[Row], a: usize, b: usize) -> Option<CorrelationPair> {
    let r = correlation(grid, a, b)?;
    if r.abs() <= STRONG_CORRELATION {
        return None;
    }
    Some(CorrelationPair {
        columns: (a, b),
        names: (header_at(grid, a).to_string(), header_at(grid, b).to_string()),
        correlation: r,
        strength: if r.abs() > VERY_STRONG_CORRELATION {
            CorrelationStrength::VeryStrong
        } else {
            CorrelationStrength::Strong
        },
        direction: if r > 0.0 {
            Direction::Positive
        } else {
            Direction::Negative
        },
    })
}

/// Rows with both a readable date and a number, sorted by date.
pub fn trend_series(grid: &[Row], date_col: usize, value_col: usize) -> Vec<TrendPoint> {
    let mut points: Vec<TrendPoint> = data_rows(grid)
        .iter()
        .filter_map(|row| {
            let cell = cell_at(row, date_col);
            let date = parse_date_cell(cell).or_else(|| parse_loose_date(cell))?;
            let value = numeric_value(cell_at(row, value_col))?;
            Some(TrendPoint { date, value })
        })
        .collect();
    points.sort_by_key(|p| p.date);
    points
}

/// Percent change from the first to the last point; `None` with no points
/// or a zero starting value.
pub fn percent_change(points: &[TrendPoint]) -> Option<f64> {
    let first = points.first()?.value;
    let last = points.last()?.value;
    if first == 0.0 {
        return None;
    }
    Some((last - first) / first.abs() * 100.0)
}

fn trend_insight(
    grid: &[Row],
    date_col: usize,
    value_col: usize,
    series: &[TrendPoint],
) -> Option<Insight> {
    let change = percent_change(series)?;
    if change.abs() <= TREND_THRESHOLD_PERCENT {
        return None;
    }
    let (label, word) = if change > 0.0 {
        ("Increasing", "increase")
    } else {
        ("Decreasing", "decrease")
    };
    Some(Insight {
        kind: InsightKind::Trend,
        title: format!("{} trend in \"{}\" over time", label, header_at(grid, value_col)),
        description: format!(
            "There's a {}% {} from first to last value",
            fixed_decimal_string(change.abs(), 0),
            word
        ),
        importance: if change.abs() > STEEP_TREND_PERCENT {
            Importance::High
        } else {
            Importance::Medium
        },
        columns: vec![date_col, value_col],
    })
}

/// Plain-language summary of a trend series.
pub fn trend_summary(points: &[TrendPoint]) -> String {
    if points.is_empty() {
        return "No trend data available".to_string();
    }
    let Some(change) = percent_change(points) else {
        return "Values start at zero, so no percentage change can be given".to_string();
    };

    let rates: Vec<f64> = points
        .windows(2)
        .filter(|pair| pair[0].value != 0.0)
        .map(|pair| (pair[1].value - pair[0].value) / pair[0].value.abs())
        .collect();
    let average_rate = if rates.is_empty() {
        0.0
    } else {
        rates.iter().sum::<f64>() / rates.len() as f64 * 100.0
    };

    if change.abs() < STABLE_PERCENT {
        return "Values remain stable over the time period".to_string();
    }

    let mut summary = if change > 0.0 {
        format!(
            "Values have increased by {}% over the time period",
            fixed_decimal_string(change, 1)
        )
    } else {
        format!(
            "Values have decreased by {}% over the time period",
            fixed_decimal_string(change.abs(), 1)
        )
    };
    if change > 0.0 && average_rate > 0.0 {
        summary.push_str(&format!(
            ", with an average increase of {}% between consecutive data points.",
            fixed_decimal_string(average_rate, 1)
        ));
    } else if change < 0.0 && average_rate < 0.0 {
        summary.push_str(&format!(
            ", with an average decrease of {}% between consecutive data points.",
            fixed_decimal_string(average_rate.abs(), 1)
        ));
    }
    summary
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VolatilityLevel {
    Low,
    Moderate,
    High,
}

/// Coefficient of variation of a series, classified.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Volatility {
    pub level: VolatilityLevel,
    /// `std_dev / mean * 100`.
    pub percent: f64,
}

impl Volatility {
    pub fn describe(&self) -> String {
        let pct = fixed_decimal_string(self.percent, 1);
        match self.level {
            VolatilityLevel::Low => format!(
                "Low volatility ({}%). The data shows stable, predictable behavior with minimal fluctuations.",
                pct
            ),
            VolatilityLevel::Moderate => format!(
                "Moderate volatility ({}%). The data shows some fluctuations but maintains a relatively consistent pattern.",
                pct
            ),
            VolatilityLevel::High => format!(
                "High volatility ({}%). The data shows significant fluctuations, indicating unstable or unpredictable behavior.",
                pct
            ),
        }
    }
}

/// Classify the spread of a series: below 10% is low, below 25% moderate.
///
/// Needs at least three points and a non-zero mean.
pub fn volatility(points: &[TrendPoint]) -> Option<Volatility> {
    if points.len() < 3 {
        return None;
    }
    let values: Vec<f64> = points.iter().map(|p| p.value).collect();
    let (mean, std_dev) = mean_and_std_dev(&values)?;
    if mean == 0.0 {
        return None;
    }
    let percent = std_dev / mean * 100.0;
    let level = if percent < 10.0 {
        VolatilityLevel::Low
    } else if percent < 25.0 {
        VolatilityLevel::Moderate
    } else {
        VolatilityLevel::High
    };
    Some(Volatility { level, percent })
}
