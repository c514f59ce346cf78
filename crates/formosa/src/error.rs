//! Error types for the Formosa pipeline.

use formosa_data::DataError;
use formosa_rules::RuleError;
use thiserror::Error;

/// Errors that can occur while analyzing or querying industries.
#[derive(Debug, Error)]
pub enum FormosaError {
    /// Loading or reshaping records failed.
    #[error(transparent)]
    Data(#[from] DataError),

    /// Evaluating a rule set failed.
    #[error(transparent)]
    Rules(#[from] RuleError),

    /// No ranking data exists for the industry, even after a preload.
    #[error("No ranking data found for '{industry}'. Available industries: {available:?}")]
    IndustryNotFound {
        /// Requested industry
        industry: String,
        /// Industries with ranking data
        available: Vec<String>,
    },
}

impl FormosaError {
    /// Whether the error means the industry has no data.
    pub const fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::IndustryNotFound { .. } | Self::Data(DataError::NotFound { .. })
        )
    }
}

/// Result type alias for Formosa operations.
pub type Result<T> = std::result::Result<T, FormosaError>;
