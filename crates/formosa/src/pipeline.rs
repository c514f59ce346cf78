//! Single-industry pipeline and the preload sweep.
//!
//! One industry runs load -> reshape -> three rule sets to completion before
//! the next one starts. Each rule set reads the same wide table and builds
//! its own augmented copy.

use crate::error::Result;
use crate::registry::{IndustryRankings, RankingRegistry};
use formosa_data::{Coverage, RecordSource, WideTable, coverage, reshape};
use formosa_rules::{
    BuffettBalanceSheet, BuffettIncomeStatement, Evaluation, EvaluationConfig, FeroldiCashFlow,
    RuleCategory, RuleSet,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Configuration for pipeline runs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Evaluation settings shared by the three rule sets
    pub evaluation: EvaluationConfig,
    /// Skip industries that are already registered during a preload (default: true)
    pub skip_loaded: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            evaluation: EvaluationConfig::default(),
            skip_loaded: true,
        }
    }
}

/// Everything one industry run produces.
#[derive(Debug, Clone)]
pub struct IndustryAnalysis {
    /// Industry name
    pub industry: String,
    /// Period range and size of the raw batch (`None` when empty)
    pub coverage: Option<Coverage>,
    /// Wide table the rule sets were evaluated on
    pub table: WideTable,
    /// Buffett balance-sheet evaluation
    pub balance: Evaluation,
    /// Buffett income-statement evaluation
    pub income: Evaluation,
    /// Feroldi cash-flow evaluation
    pub cashflow: Evaluation,
}

impl IndustryAnalysis {
    /// Evaluation for one category.
    pub const fn evaluation(&self, category: RuleCategory) -> &Evaluation {
        match category {
            RuleCategory::Balance => &self.balance,
            RuleCategory::Income => &self.income,
            RuleCategory::CashFlow => &self.cashflow,
        }
    }

    /// Copy of the three ranking tables.
    pub fn rankings(&self) -> IndustryRankings {
        IndustryRankings {
            balance: self.balance.ranking.clone(),
            income: self.income.ranking.clone(),
            cashflow: self.cashflow.ranking.clone(),
        }
    }
}

/// Run one industry end to end.
///
/// # Errors
///
/// Returns a not-found error if the source has no such industry, or any
/// load or evaluation error.
pub fn analyze_industry(
    source: &dyn RecordSource,
    industry: &str,
    config: &EvaluationConfig,
) -> Result<IndustryAnalysis> {
    let records = source.load(industry)?;
    let coverage = coverage(&records);
    let table = reshape(&records)?;
    debug!(%industry, records = records.len(), rows = table.height(), "reshaped industry");

    let balance = BuffettBalanceSheet.evaluate(&table, config)?;
    let income = BuffettIncomeStatement.evaluate(&table, config)?;
    let cashflow = FeroldiCashFlow.evaluate(&table, config)?;

    Ok(IndustryAnalysis {
        industry: industry.to_string(),
        coverage,
        table,
        balance,
        income,
        cashflow,
    })
}

/// Analyze an industry and register its rankings.
pub fn analyze_and_register(
    source: &dyn RecordSource,
    registry: &RankingRegistry,
    industry: &str,
    config: &EvaluationConfig,
) -> Result<Arc<IndustryRankings>> {
    let analysis = analyze_industry(source, industry, config)?;
    Ok(registry.register(industry, analysis.rankings()))
}

/// One industry that failed during a preload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreloadFailure {
    /// Industry name
    pub industry: String,
    /// Error message
    pub error: String,
}

/// Outcome of a preload sweep.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreloadReport {
    /// Industries analyzed and registered
    pub loaded: Vec<String>,
    /// Industries skipped because they were already registered
    pub skipped: Vec<String>,
    /// Industries whose pipeline failed
    pub failed: Vec<PreloadFailure>,
}

impl PreloadReport {
    /// Number of industries visited.
    pub fn total(&self) -> usize {
        self.loaded.len() + self.skipped.len() + self.failed.len()
    }

    /// Whether every visited industry succeeded or was skipped.
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Progress of a preload sweep, reported after each industry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreloadStep<'a> {
    /// The industry was analyzed and registered
    Loaded(&'a str),
    /// The industry was already registered
    Skipped(&'a str),
    /// The industry's pipeline failed
    Failed(&'a str),
}

/// Analyze and register every industry of a source.
///
/// A failing industry is logged and recorded in the report; the sweep carries on.
///
/// # Errors
///
/// Only fails if the source cannot list its industries.
pub fn preload_all(
    source: &dyn RecordSource,
    registry: &RankingRegistry,
    config: &PipelineConfig,
) -> Result<PreloadReport> {
    preload_with_progress(source, registry, config, |_| {})
}

/// [`preload_all`] with a callback after each industry.
pub fn preload_with_progress<F>(
    source: &dyn RecordSource,
    registry: &RankingRegistry,
    config: &PipelineConfig,
    mut on_step: F,
) -> Result<PreloadReport>
where
    F: FnMut(PreloadStep<'_>),
{
    let mut report = PreloadReport::default();

    for industry in source.industries()? {
        if config.skip_loaded && registry.contains(&industry) {
            on_step(PreloadStep::Skipped(&industry));
            report.skipped.push(industry);
            continue;
        }

        match analyze_and_register(source, registry, &industry, &config.evaluation) {
            Ok(_) => {
                on_step(PreloadStep::Loaded(&industry));
                report.loaded.push(industry);
            }
            Err(e) => {
                warn!(%industry, error = %e, "failed to load rankings");
                on_step(PreloadStep::Failed(&industry));
                report.failed.push(PreloadFailure {
                    industry,
                    error: e.to_string(),
                });
            }
        }
    }

    info!(
        loaded = report.loaded.len(),
        skipped = report.skipped.len(),
        failed = report.failed.len(),
        "preload complete"
    );
    Ok(report)
}
