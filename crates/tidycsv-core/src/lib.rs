//! tidycsv-core - CSV storage, column typing, the cleaning pipeline and insights.

pub mod column_type;
pub mod dates;
pub mod error;
pub mod insights;
pub mod pipeline;
pub mod storage;

pub use column_type::{ColumnType, detect_column_types};
pub use error::{CleanError, Result};
pub use insights::{InsightReport, generate_insights};
pub use pipeline::{Pipeline, ProcessOptions, Stage, process};

pub use tidycsv_engine::engine::{Grid, Row};
