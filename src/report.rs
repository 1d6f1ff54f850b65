//! Text and JSON rendering of the `--types`, `--stats` and `--insights`
//! reports.

use serde::Serialize;
use std::fmt::Write;
use tidycsv_core::ColumnType;
use tidycsv_core::insights::{InsightReport, Volatility, trend_summary, volatility};
use tidycsv_engine::engine::{Row, format_number, header_at};
use tidycsv_engine::stats::ColumnSummary;

#[derive(Debug, Serialize)]
pub struct TypedColumn {
    pub index: usize,
    pub name: String,
    #[serde(rename = "type")]
    pub column_type: ColumnType,
}

#[derive(Debug, Serialize)]
pub struct InsightsSection {
    #[serde(flatten)]
    pub report: InsightReport,
    pub trend_summary: Option<String>,
    pub volatility: Option<Volatility>,
}

impl InsightsSection {
    pub fn new(report: InsightReport) -> Self {
        let (trend_summary, volatility) = if report.trend.is_empty() {
            (None, None)
        } else {
            (Some(trend_summary(&report.trend)), volatility(&report.trend))
        };
        InsightsSection {
            report,
            trend_summary,
            volatility,
        }
    }
}

/// Everything requested on the command line; absent sections are skipped.
#[derive(Debug, Default, Serialize)]
pub struct Report {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub types: Option<Vec<TypedColumn>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<Vec<ColumnSummary>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub insights: Option<InsightsSection>,
}

impl Report {
    pub fn is_empty(&self) -> bool {
        self.types.is_none() && self.stats.is_none() && self.insights.is_none()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn to_text(&self) -> String {
        let mut out = String::new();
        if let Some(types) = &self.types {
            render_types(&mut out, types);
        }
        if let Some(stats) = &self.stats {
            render_stats(&mut out, stats);
        }
        if let Some(insights) = &self.insights {
            render_insights(&mut out, insights);
        }
        out
    }
}

pub fn typed_columns(grid: &[Row], types: &[ColumnType]) -> Vec<TypedColumn> {
    types
        .iter()
        .enumerate()
        .map(|(index, column_type)| TypedColumn {
            index,
            name: header_at(grid, index).to_string(),
            column_type: *column_type,
        })
        .collect()
}

fn render_types(out: &mut String, types: &[TypedColumn]) {
    let _ = writeln!(out, "Column types:");
    for column in types {
        let _ = writeln!(out, "  {:>3}  {:<24} {}", column.index, column.name, column.column_type);
    }
}

fn opt(value: Option<f64>) -> String {
    value.map(format_number).unwrap_or_else(|| "-".to_string())
}

fn render_stats(out: &mut String, stats: &[ColumnSummary]) {
    let _ = writeln!(out, "Statistics:");
    if stats.is_empty() {
        let _ = writeln!(out, "  (no numeric columns)");
        return;
    }
    for summary in stats {
        let s = &summary.stats;
        let _ = writeln!(out, "  {} (column {})", summary.name, summary.index);
        let _ = writeln!(
            out,
            "    count {}  sum {}  mean {}  median {}",
            s.count,
            opt(s.sum),
            opt(s.mean),
            opt(s.median)
        );
        let _ = writeln!(
            out,
            "    min {}  max {}  range {}  std dev {}",
            opt(s.min),
            opt(s.max),
            opt(s.range),
            opt(s.std_dev)
        );
        let _ = writeln!(
            out,
            "    q1 {}  q3 {}  iqr {}  cv {}",
            opt(s.q1),
            opt(s.q3),
            opt(s.iqr),
            s.coefficient_of_variation
                .map(|cv| format!("{:.1}%", cv))
                .unwrap_or_else(|| "-".to_string())
        );
    }
}

fn render_insights(out: &mut String, section: &InsightsSection) {
    let _ = writeln!(out, "Insights:");
    if section.report.insights.is_empty() {
        let _ = writeln!(out, "  (nothing notable)");
    }
    for insight in &section.report.insights {
        let importance = format!("{:?}", insight.importance).to_lowercase();
        let _ = writeln!(out, "  [{}] {}", importance, insight.title);
        let _ = writeln!(out, "      {}", insight.description);
    }
    if let Some(summary) = &section.trend_summary {
        let _ = writeln!(out, "Trend: {}", summary);
    }
    if let Some(v) = &section.volatility {
        let _ = writeln!(out, "Volatility: {}", v.describe());
    }
}
