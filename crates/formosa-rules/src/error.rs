//! Error types for rule evaluation.

use thiserror::Error;

/// Result type for rule evaluation.
pub type Result<T> = std::result::Result<T, RuleError>;

/// Errors that can occur while evaluating a rule set.
///
/// Absent metric columns are not errors: they evaluate as all-null and the
/// affected flags fail.
#[derive(Debug, Error)]
pub enum RuleError {
    /// Polars DataFrame error
    #[error("DataFrame error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// Computation error
    #[error("Computation error: {0}")]
    Computation(String),
}
