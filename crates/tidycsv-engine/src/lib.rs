//! tidycsv_engine - Grid primitives, formula evaluation, statistics and chart data.

pub mod builtins;
pub mod chart;
pub mod engine;
pub mod error;
pub mod stats;

pub use error::{FormulaError, FormulaResult};
