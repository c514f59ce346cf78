//! Long-to-wide reshaping.
//!
//! Raw records carry one metric per row. The rule sets need one row per stock and
//! period with one column per metric, so [`reshape`] pivots a batch after
//! dropping rows that differ only in their industry label.

use crate::error::Result;
use crate::metrics::columns;
use crate::record::RawRecord;
use chrono::NaiveDate;
use polars::prelude::*;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use tracing::debug;

/// Index of a wide row: `(date, stock_id, stock_name, industry)`.
type RowKey = (NaiveDate, String, String, String);

/// Wide per-period table: one row per `(date, stock_id, stock_name, industry)`,
/// one nullable `Float64` column per metric.
///
/// Dates are stored as ISO `YYYY-MM-DD` strings, which order the same way as the
/// dates themselves. Rows are sorted by the index, metric columns by name.
#[derive(Debug, Clone)]
pub struct WideTable {
    frame: DataFrame,
    metrics: Vec<String>,
}

impl WideTable {
    /// Underlying DataFrame.
    pub const fn frame(&self) -> &DataFrame {
        &self.frame
    }

    /// Consume the table, returning the DataFrame.
    pub fn into_frame(self) -> DataFrame {
        self.frame
    }

    /// Lazy view over an independent copy of the table.
    pub fn lazy(&self) -> LazyFrame {
        self.frame.clone().lazy()
    }

    /// Metric columns, sorted by name.
    pub fn metrics(&self) -> &[String] {
        &self.metrics
    }

    /// Whether a metric column is present.
    pub fn has_metric(&self, metric: &str) -> bool {
        self.metrics.iter().any(|m| m == metric)
    }

    /// Number of wide rows.
    pub fn height(&self) -> usize {
        self.frame.height()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.frame.height() == 0
    }
}

/// Drop records that agree on every field except `industry`, keeping the first.
pub fn dedup_ignoring_industry(records: &[RawRecord]) -> Vec<&RawRecord> {
    let mut seen = HashSet::with_capacity(records.len());
    records
        .iter()
        .filter(|r| {
            seen.insert((
                r.date,
                r.stock_id.as_str(),
                r.stock_name.as_str(),
                r.metric.as_str(),
                r.value.to_bits(),
            ))
        })
        .collect()
}

/// Pivot a long-format batch into a [`WideTable`].
///
/// Rows are first deduplicated ignoring `industry`. If an `(index, metric)` pair
/// still occurs more than once, the first record in input order wins.
/// No other validation happens: metrics that never occur are simply absent.
pub fn reshape(records: &[RawRecord]) -> Result<WideTable> {
    let unique = dedup_ignoring_industry(records);

    let mut rows: BTreeMap<RowKey, BTreeMap<&str, f64>> = BTreeMap::new();
    let mut metrics: BTreeSet<&str> = BTreeSet::new();

    for record in &unique {
        let key = (
            record.date,
            record.stock_id.clone(),
            record.stock_name.clone(),
            record.industry.clone(),
        );
        rows.entry(key)
            .or_default()
            .entry(record.metric.as_str())
            .or_insert(record.value);
        metrics.insert(record.metric.as_str());
    }

    let height = rows.len();
    let mut dates = Vec::with_capacity(height);
    let mut stock_ids = Vec::with_capacity(height);
    let mut stock_names = Vec::with_capacity(height);
    let mut industries = Vec::with_capacity(height);
    let mut values: BTreeMap<&str, Vec<Option<f64>>> = metrics
        .iter()
        .map(|m| (*m, Vec::with_capacity(height)))
        .collect();

    for ((date, stock_id, stock_name, industry), cells) in &rows {
        dates.push(date.format("%Y-%m-%d").to_string());
        stock_ids.push(stock_id.as_str());
        stock_names.push(stock_name.as_str());
        industries.push(industry.as_str());
        for (metric, column) in values.iter_mut() {
            column.push(cells.get(metric).copied());
        }
    }

    let mut columns_out: Vec<Column> = vec![
        Series::new(columns::DATE.into(), dates).into(),
        Series::new(columns::STOCK_ID.into(), stock_ids).into(),
        Series::new(columns::STOCK_NAME.into(), stock_names).into(),
        Series::new(columns::INDUSTRY.into(), industries).into(),
    ];
    for (metric, column) in values {
        columns_out.push(Series::new(metric.into(), column).into());
    }

    let frame = DataFrame::new(columns_out)?;
    debug!(
        input = records.len(),
        unique = unique.len(),
        rows = frame.height(),
        metrics = metrics.len(),
        "reshaped records"
    );

    Ok(WideTable {
        frame,
        metrics: metrics.into_iter().map(str::to_string).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(date: &str, id: &str, name: &str, industry: &str, metric: &str, value: f64) -> RawRecord {
        RawRecord::new(
            NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            id,
            name,
            industry,
            metric,
            value,
        )
    }

    #[test]
    fn test_dedup_ignores_industry_only() {
        let records = vec![
            rec("2024-03-31", "9911", "Sakura", "Home", "EPS", 1.5),
            rec("2024-03-31", "9911", "Sakura", "Home Living", "EPS", 1.5),
            rec("2024-03-31", "9911", "Sakura", "Home", "EPS", 1.6),
        ];

        let unique = dedup_ignoring_industry(&records);
        assert_eq!(unique.len(), 2);
        assert_eq!(unique[0].industry, "Home");
        assert_eq!(unique[1].value, 1.6);
    }

    #[test]
    fn test_reshape_pivots_metrics() {
        let records = vec![
            rec("2024-03-31", "2330", "TSMC", "Semi", "EPS", 8.7),
            rec("2024-03-31", "2330", "TSMC", "Semi", "Revenue", 592.6),
            rec("2023-12-31", "2330", "TSMC", "Semi", "EPS", 9.2),
            rec("2024-03-31", "2303", "UMC", "Semi", "EPS", 0.83),
        ];

        let wide = reshape(&records).unwrap();
        assert_eq!(wide.height(), 3);
        assert_eq!(wide.metrics(), ["EPS", "Revenue"]);
        assert!(wide.has_metric("Revenue"));
        assert!(!wide.has_metric("GrossProfit"));

        let frame = wide.frame();
        let dates = frame.column("date").unwrap().str().unwrap();
        let ids = frame.column("stock_id").unwrap().str().unwrap();
        assert_eq!(dates.get(0), Some("2023-12-31"));
        assert_eq!(ids.get(1), Some("2303"));
        assert_eq!(ids.get(2), Some("2330"));

        let revenue = frame.column("Revenue").unwrap().f64().unwrap();
        assert_eq!(revenue.get(1), None);
        assert_eq!(revenue.get(2), Some(592.6));
    }

    #[test]
    fn test_reshape_first_occurrence_wins() {
        let records = vec![
            rec("2024-03-31", "2330", "TSMC", "Semi", "EPS", 8.7),
            rec("2024-03-31", "2330", "TSMC", "Semi", "EPS", 9.9),
        ];

        let wide = reshape(&records).unwrap();
        assert_eq!(wide.height(), 1);
        let eps = wide.frame().column("EPS").unwrap().f64().unwrap();
        assert_eq!(eps.get(0), Some(8.7));
    }

    #[test]
    fn test_reshape_empty_batch() {
        let wide = reshape(&[]).unwrap();
        assert!(wide.is_empty());
        assert!(wide.metrics().is_empty());
        assert_eq!(wide.frame().width(), 4);
    }
}
