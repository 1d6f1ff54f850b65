//! Error types for tidycsv core.

use thiserror::Error;

/// Errors that can occur while loading, saving or configuring a clean-up run.
///
/// Cell-level problems never show up here: stages leave a cell untouched
/// when they cannot transform it.
#[derive(Error, Debug)]
pub enum CleanError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("File is too large ({size} bytes, limit {limit} bytes)")]
    FileTooLarge { size: u64, limit: u64 },

    #[error("CSV file is empty")]
    EmptyCsv,

    #[error("Unknown stage: {0}")]
    UnknownStage(String),
}

pub type Result<T> = std::result::Result<T, CleanError>;
