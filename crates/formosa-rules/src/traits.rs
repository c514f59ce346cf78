//! Core rule-set trait.

use crate::catalog::RuleCategory;
use crate::error::Result;
use crate::evaluation::{Evaluation, EvaluationConfig};
use crate::ranking::{RankingMetric, RankingOrder};
use formosa_data::WideTable;
use polars::prelude::*;
use std::fmt::Debug;

/// A named set of pass/fail tests over one financial statement.
///
/// Implementors only describe their derived columns, flags and ranking
/// metrics. The shared machinery in [`crate::evaluation`] handles cutoff
/// filtering, pass-rate aggregation, the heatmap, top-N selection and the
/// ranking table.
pub trait RuleSet: Send + Sync + Debug {
    /// Rule set name (unique identifier).
    fn name(&self) -> &'static str;

    /// Short description of the composite test.
    fn description(&self) -> &'static str;

    /// Statement this rule set evaluates.
    fn category(&self) -> RuleCategory;

    /// Metric columns read from the wide table.
    ///
    /// Absent columns are added as all-null before [`derive`](Self::derive) runs.
    fn required_columns(&self) -> &'static [&'static str];

    /// Name of the composite boolean column.
    fn pass_column(&self) -> &'static str;

    /// Individual boolean flag columns, in the order they are reported.
    fn flag_columns(&self) -> &'static [&'static str];

    /// Add derived columns, flags and the composite pass column.
    ///
    /// `data` is sorted by `(stock_id, date)` and holds the full history, so
    /// lagged comparisons can reach periods before the cutoff. `available`
    /// lists the metric columns that were present before null-padding.
    fn derive(&self, data: LazyFrame, available: &[String]) -> Result<LazyFrame>;

    /// Columns averaged per stock in the ranking table.
    fn ranking_metrics(&self) -> &'static [RankingMetric];

    /// Row order of the ranking table.
    fn ranking_order(&self) -> RankingOrder;

    /// Run the full evaluation over a wide table.
    fn evaluate(&self, table: &WideTable, config: &EvaluationConfig) -> Result<Evaluation> {
        crate::evaluation::evaluate(self, table, config)
    }
}
