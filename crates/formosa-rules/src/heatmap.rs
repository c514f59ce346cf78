//! Stock x period pass/fail matrix.

use crate::error::Result;
use crate::evaluation::{PASSED_INT, PassRate};
use formosa_data::metrics::columns::{DATE, STOCK_ID};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// One stock's row in the heatmap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatmapRow {
    /// Stock identifier
    pub stock_id: String,
    /// Canonical display name
    pub stock_name: String,
    /// Fraction of periods passed
    pub pass_rate: f64,
    /// Display label, `"<name> (<id>)  —  <pct>%"`
    pub label: String,
    /// 1 where the stock passed in that period, 0 otherwise (including absent periods)
    pub cells: Vec<u8>,
}

/// Pass matrix over every post-cutoff period of an industry.
///
/// Rows are ordered by descending pass rate, columns by ascending date.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HeatmapMatrix {
    /// Period dates (`YYYY-MM-DD`), ascending
    pub periods: Vec<String>,
    /// Stock rows, best first
    pub rows: Vec<HeatmapRow>,
}

impl HeatmapMatrix {
    /// Build the matrix from an augmented table carrying `PassedInt`.
    ///
    /// When a stock has more than one row for a period, the first one wins.
    pub fn build(augmented: &polars::prelude::DataFrame, rates: &[PassRate]) -> Result<Self> {
        let ids = augmented.column(STOCK_ID)?.str()?;
        let dates = augmented.column(DATE)?.str()?;
        let passed = augmented.column(PASSED_INT)?.i32()?;

        let mut periods = BTreeSet::new();
        let mut cells: HashMap<(&str, &str), u8> = HashMap::new();
        for ((id, date), pass) in ids.into_iter().zip(dates).zip(passed) {
            let (Some(id), Some(date)) = (id, date) else {
                continue;
            };
            periods.insert(date);
            cells
                .entry((id, date))
                .or_insert(u8::from(pass.unwrap_or(0) > 0));
        }

        let periods: Vec<&str> = periods.into_iter().collect();
        let rows = rates
            .iter()
            .map(|rate| HeatmapRow {
                stock_id: rate.stock_id.clone(),
                stock_name: rate.stock_name.clone(),
                pass_rate: rate.pass_rate,
                label: rate.label(),
                cells: periods
                    .iter()
                    .map(|date| {
                        cells
                            .get(&(rate.stock_id.as_str(), *date))
                            .copied()
                            .unwrap_or(0)
                    })
                    .collect(),
            })
            .collect();

        Ok(Self {
            periods: periods.into_iter().map(str::to_string).collect(),
            rows,
        })
    }

    /// Whether the matrix has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Cell for a stock and period.
    pub fn value(&self, stock_id: &str, period: &str) -> Option<u8> {
        let col = self.periods.iter().position(|p| p == period)?;
        self.rows
            .iter()
            .find(|r| r.stock_id == stock_id)
            .and_then(|r| r.cells.get(col).copied())
    }
}
