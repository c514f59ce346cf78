//! Long-format financial-statement records.

use crate::error::{DataError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// One observation of one named metric for one stock at one reporting period.
///
/// `stock_name` and `industry` are carried through for display only. The name can
/// vary slightly between rows of the same stock, and the same stock can appear
/// under several industry spellings, so neither is used as a join key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    /// Period-end date (quarterly cadence)
    pub date: NaiveDate,
    /// Stable stock identifier
    pub stock_id: String,
    /// Display name
    pub stock_name: String,
    /// Free-text industry label
    pub industry: String,
    /// Metric name, e.g. `RetainedEarnings`
    #[serde(rename = "type")]
    pub metric: String,
    /// Metric value
    pub value: f64,
}

impl RawRecord {
    /// Create a new record.
    pub fn new(
        date: NaiveDate,
        stock_id: impl Into<String>,
        stock_name: impl Into<String>,
        industry: impl Into<String>,
        metric: impl Into<String>,
        value: f64,
    ) -> Self {
        Self {
            date,
            stock_id: stock_id.into(),
            stock_name: stock_name.into(),
            industry: industry.into(),
            metric: metric.into(),
            value,
        }
    }
}

/// Parse a period date.
///
/// Accepts `YYYY-MM-DD`, optionally followed by a time component
/// (`2024-03-31 00:00:00`, `2024-03-31T00:00:00`).
pub fn parse_date(raw: &str) -> Result<NaiveDate> {
    let trimmed = raw.trim();
    let day = trimmed.get(..10).unwrap_or(trimmed);
    NaiveDate::parse_from_str(day, "%Y-%m-%d")
        .map_err(|e| DataError::Parse(format!("invalid date '{}': {}", raw, e)))
}

/// One entry of the stock directory.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct StockEntry {
    /// Stock identifier
    pub stock_id: String,
    /// Display name
    pub stock_name: String,
    /// Source the stock was listed under
    pub industry_category: String,
}

/// Date range and size of a record batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coverage {
    /// Earliest period date
    pub first_period: NaiveDate,
    /// Latest period date
    pub last_period: NaiveDate,
    /// Number of distinct stocks
    pub stocks: usize,
    /// Number of distinct period dates
    pub periods: usize,
    /// Number of records
    pub records: usize,
}

/// Summarize the periods and stocks covered by a batch.
///
/// Returns `None` for an empty batch.
pub fn coverage(records: &[RawRecord]) -> Option<Coverage> {
    let first_period = records.iter().map(|r| r.date).min()?;
    let last_period = records.iter().map(|r| r.date).max()?;
    let stocks: BTreeSet<&str> = records.iter().map(|r| r.stock_id.as_str()).collect();
    let periods: BTreeSet<NaiveDate> = records.iter().map(|r| r.date).collect();

    Some(Coverage {
        first_period,
        last_period,
        stocks: stocks.len(),
        periods: periods.len(),
        records: records.len(),
    })
}
