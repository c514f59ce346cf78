//! Error types for data operations.

use thiserror::Error;

/// Result type for data operations.
pub type Result<T> = std::result::Result<T, DataError>;

/// Errors that can occur while reading or reshaping raw records.
#[derive(Debug, Error)]
pub enum DataError {
    /// No source exists for the requested industry
    #[error("No data source for industry: {industry}")]
    NotFound {
        /// Industry that was requested
        industry: String,
    },

    /// Data parsing error
    #[error("Data parsing error: {0}")]
    Parse(String),

    /// CSV reading error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Polars error
    #[error("Polars error: {0}")]
    Polars(#[from] polars::prelude::PolarsError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl DataError {
    /// Build a [`DataError::NotFound`] for an industry.
    pub fn not_found(industry: impl Into<String>) -> Self {
        Self::NotFound {
            industry: industry.into(),
        }
    }

    /// Whether this error means the industry has no source.
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
