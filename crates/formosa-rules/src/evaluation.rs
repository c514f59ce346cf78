//! Shared evaluation machinery.
//!
//! Every rule set goes through the same pipeline once its derived columns
//! exist:
//!
//! 1. pad absent metric columns with nulls and sort by `(stock_id, date)`
//! 2. [`RuleSet::derive`] on the full history
//! 3. keep periods on or after the cutoff and add `PassedInt`
//! 4. per-stock pass rates, the heatmap matrix, the top-N subset and the ranking
//!
//! Flags are null-safe: any null operand makes a flag `false`.

use crate::catalog::RuleCategory;
use crate::error::Result;
use crate::heatmap::HeatmapMatrix;
use crate::ranking::{RankingRow, RankingTable};
use crate::traits::RuleSet;
use chrono::NaiveDate;
use formosa_data::WideTable;
use formosa_data::metrics::columns::{DATE, STOCK_ID, STOCK_NAME};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// Integer (0/1) copy of a rule set's composite pass column.
pub const PASSED_INT: &str = "PassedInt";

const PASSED_COUNT: &str = "passed";
const PERIOD_COUNT: &str = "periods";

const DEFAULT_CUTOFF: NaiveDate = match NaiveDate::from_ymd_opt(2020, 1, 1) {
    Some(date) => date,
    None => panic!("invalid default cutoff"),
};

/// Configuration shared by all rule sets
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationConfig {
    /// First period counted for pass rates and rankings (default: 2020-01-01).
    /// Earlier periods still feed the 4-period lags.
    pub cutoff: NaiveDate,
    /// Number of stocks kept in the top-N subset and ranking (default: 5)
    pub top_n: usize,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            cutoff: DEFAULT_CUTOFF,
            top_n: 5,
        }
    }
}

impl EvaluationConfig {
    /// Cutoff in the same ISO form as the wide table's `date` column.
    pub fn cutoff_key(&self) -> String {
        self.cutoff.format("%Y-%m-%d").to_string()
    }
}

/// Pass statistics of one stock over the post-cutoff periods.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PassRate {
    /// Stock identifier
    pub stock_id: String,
    /// Canonical display name (first name seen after the cutoff)
    pub stock_name: String,
    /// Periods where every rule passed
    pub passed: u32,
    /// Periods observed
    pub periods: u32,
    /// `passed / periods`, rounded to 2 decimals
    pub pass_rate: f64,
}

impl PassRate {
    /// Heatmap row label, e.g. `台積電 (2330)  —  75%`.
    pub fn label(&self) -> String {
        format!(
            "{} ({})  —  {:.0}%",
            self.stock_name,
            self.stock_id,
            self.pass_rate * 100.0
        )
    }
}

/// All products of one rule set over one industry.
#[derive(Debug, Clone)]
pub struct Evaluation {
    /// Rule set that produced this evaluation
    pub category: RuleCategory,
    /// Post-cutoff rows with every derived column, flag and `PassedInt`
    pub augmented: DataFrame,
    /// Post-cutoff rows of the top-N stocks, with canonical names
    pub top: DataFrame,
    /// Per-stock pass rates, best first (ties by ascending stock id)
    pub pass_rates: Vec<PassRate>,
    /// Stock x period pass matrix
    pub heatmap: HeatmapMatrix,
    /// Averaged metrics of the top-N stocks
    pub ranking: RankingTable,
}

impl Evaluation {
    /// Pass rate of one stock.
    pub fn pass_rate(&self, stock_id: &str) -> Option<f64> {
        self.pass_rates
            .iter()
            .find(|p| p.stock_id == stock_id)
            .map(|p| p.pass_rate)
    }
}

/// Round to 2 decimals, half away from zero.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Null-fill those of `columns` that were present in the source table.
///
/// Absent columns stay all-null so every flag reading them fails.
pub(crate) fn fill_present(columns: &[&str], available: &[String]) -> Vec<Expr> {
    columns
        .iter()
        .filter(|c| available.iter().any(|a| a == *c))
        .map(|c| col(*c).fill_null(lit(0.0)))
        .collect()
}

/// `num / den`, null where the denominator is zero or null.
pub(crate) fn ratio(num: Expr, den: Expr) -> Expr {
    when(den.clone().neq(lit(0.0)))
        .then(num / den)
        .otherwise(lit(NULL))
}

/// Boolean flag where a null comparison counts as a failure.
pub(crate) fn flag(condition: Expr, name: &str) -> Expr {
    condition.fill_null(lit(false)).alias(name)
}

/// Run a rule set over a wide table.
pub fn evaluate<R: RuleSet + ?Sized>(
    rules: &R,
    table: &WideTable,
    config: &EvaluationConfig,
) -> Result<Evaluation> {
    let padding: Vec<Expr> = rules
        .required_columns()
        .iter()
        .filter(|c| !table.has_metric(c))
        .map(|c| lit(NULL).cast(DataType::Float64).alias(*c))
        .collect();
    if !padding.is_empty() {
        debug!(rules = rules.name(), missing = padding.len(), "padding absent metric columns");
    }

    let mut data = table.lazy();
    if !padding.is_empty() {
        data = data.with_columns(padding);
    }
    let data = data.sort(
        [STOCK_ID, DATE],
        SortMultipleOptions::default().with_maintain_order(true),
    );

    let augmented = rules
        .derive(data, table.metrics())?
        .filter(col(DATE).gt_eq(lit(config.cutoff_key())))
        .with_columns([col(rules.pass_column())
            .cast(DataType::Int32)
            .alias(PASSED_INT)])
        .collect()?;

    let pass_rates = pass_rates(&augmented)?;
    let heatmap = HeatmapMatrix::build(&augmented, &pass_rates)?;
    let top = top_subset(&augmented, &pass_rates, config.top_n)?;
    let ranking = ranking(rules, &top, &pass_rates)?;

    debug!(
        rules = rules.name(),
        rows = augmented.height(),
        stocks = pass_rates.len(),
        ranked = ranking.len(),
        "evaluated rule set"
    );

    Ok(Evaluation {
        category: rules.category(),
        augmented,
        top,
        pass_rates,
        heatmap,
        ranking,
    })
}

/// Per-stock pass rates of an augmented table, best first.
pub fn pass_rates(augmented: &DataFrame) -> Result<Vec<PassRate>> {
    let grouped = augmented
        .clone()
        .lazy()
        .group_by_stable([col(STOCK_ID)])
        .agg([
            col(STOCK_NAME).first(),
            col(PASSED_INT)
                .sum()
                .cast(DataType::Int64)
                .alias(PASSED_COUNT),
            col(PASSED_INT)
                .count()
                .cast(DataType::Int64)
                .alias(PERIOD_COUNT),
        ])
        .collect()?;

    let ids = grouped.column(STOCK_ID)?.str()?;
    let names = grouped.column(STOCK_NAME)?.str()?;
    let passed = grouped.column(PASSED_COUNT)?.i64()?;
    let periods = grouped.column(PERIOD_COUNT)?.i64()?;

    let mut rates: Vec<PassRate> = ids
        .into_iter()
        .zip(names)
        .zip(passed.into_iter().zip(periods))
        .filter_map(|((id, name), (passed, periods))| {
            let periods = periods.unwrap_or(0);
            if periods <= 0 {
                return None;
            }
            let passed = passed.unwrap_or(0);
            Some(PassRate {
                stock_id: id?.to_string(),
                stock_name: name.unwrap_or_default().to_string(),
                passed: passed as u32,
                periods: periods as u32,
                pass_rate: round2(passed as f64 / periods as f64),
            })
        })
        .collect();

    rates.sort_by(|a, b| b.pass_rate.total_cmp(&a.pass_rate));
    Ok(rates)
}

/// Rows of the best `n` stocks, with each stock's canonical name.
fn top_subset(augmented: &DataFrame, rates: &[PassRate], n: usize) -> Result<DataFrame> {
    let names: HashMap<&str, &str> = rates
        .iter()
        .take(n)
        .map(|r| (r.stock_id.as_str(), r.stock_name.as_str()))
        .collect();

    let ids = augmented.column(STOCK_ID)?.str()?;
    let mask: Vec<bool> = ids
        .into_iter()
        .map(|id| id.is_some_and(|id| names.contains_key(id)))
        .collect();
    let mut top = augmented.filter(&BooleanChunked::from_slice("top".into(), &mask))?;

    let canonical: Vec<&str> = top
        .column(STOCK_ID)?
        .str()?
        .into_iter()
        .map(|id| id.and_then(|id| names.get(id).copied()).unwrap_or_default())
        .collect();
    top.with_column(Series::new(STOCK_NAME.into(), canonical))?;

    Ok(top)
}

fn ranking<R: RuleSet + ?Sized>(
    rules: &R,
    top: &DataFrame,
    rates: &[PassRate],
) -> Result<RankingTable> {
    let metrics = rules.ranking_metrics();
    let labels = metrics.iter().map(|m| m.label.to_string()).collect();
    let mut table = RankingTable::empty(rules.category(), labels);
    if top.height() == 0 {
        return Ok(table);
    }

    let means = top
        .clone()
        .lazy()
        .group_by_stable([col(STOCK_ID)])
        .agg(
            metrics
                .iter()
                .map(|m| col(m.column).mean().alias(m.column))
                .collect::<Vec<_>>(),
        )
        .collect()?;

    let by_id: HashMap<&str, &PassRate> = rates.iter().map(|r| (r.stock_id.as_str(), r)).collect();
    let ids = means.column(STOCK_ID)?.str()?;

    let mut columns = Vec::with_capacity(metrics.len());
    for metric in metrics {
        columns.push(means.column(metric.column)?.f64()?.clone());
    }

    for (idx, id) in ids.into_iter().enumerate() {
        let Some(id) = id else { continue };
        let Some(rate) = by_id.get(id) else { continue };
        let values = metrics
            .iter()
            .zip(&columns)
            .map(|(metric, column)| {
                column
                    .get(idx)
                    .filter(|v| v.is_finite())
                    .map(|v| round2(v * metric.scale))
            })
            .collect();
        table.rows.push(RankingRow {
            stock_id: id.to_string(),
            stock_name: rate.stock_name.clone(),
            pass_rate: rate.pass_rate,
            metrics: values,
        });
    }

    table.sort(rules.ranking_order());
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn augmented() -> DataFrame {
        df! {
            "date" => ["2020-03-31", "2020-06-30", "2020-03-31", "2020-06-30", "2020-03-31"],
            "stock_id" => ["1101", "1101", "1102", "1102", "1103"],
            "stock_name" => ["台泥", "台泥*", "亞泥", "亞泥", "嘉泥"],
            "PassedInt" => [1i32, 0, 1, 1, 0],
        }
        .unwrap()
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(0.666_666), 0.67);
        assert_eq!(round2(-1.234), -1.23);
        assert_eq!(round2(10000.0), 10000.0);
    }

    #[test]
    fn test_default_config() {
        let config = EvaluationConfig::default();
        assert_eq!(config.cutoff_key(), "2020-01-01");
        assert_eq!(config.top_n, 5);
    }

    #[test]
    fn test_pass_rates_order_and_names() {
        let rates = pass_rates(&augmented()).unwrap();

        let ids: Vec<_> = rates.iter().map(|r| r.stock_id.as_str()).collect();
        assert_eq!(ids, ["1102", "1101", "1103"]);
        assert_eq!(rates[0].pass_rate, 1.0);
        assert_eq!(rates[1].pass_rate, 0.5);
        assert_eq!(rates[1].stock_name, "台泥");
        assert_eq!(rates[1].passed, 1);
        assert_eq!(rates[1].periods, 2);
        assert_eq!(rates[1].label(), "台泥 (1101)  —  50%");
    }

    #[test]
    fn test_top_subset_uses_canonical_names() {
        let frame = augmented();
        let rates = pass_rates(&frame).unwrap();
        let top = top_subset(&frame, &rates, 2).unwrap();

        assert_eq!(top.height(), 4);
        let names = top.column("stock_name").unwrap().str().unwrap();
        assert!(names.into_iter().all(|n| n != Some("台泥*")));
    }
}
