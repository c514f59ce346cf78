//! Buffett Income Statement Rules
//!
//! Four tests per stock-period:
//! - gross margin above 30%
//! - interest expense below 25% of operating income
//! - net profit margin above 5%
//! - positive EPS, no lower than the same quarter a year earlier
//!
//! Income lines present in the table are zero-filled first. Ratios over a zero
//! denominator are missing and fail their test.

use crate::balance::YOY_LAG;
use crate::catalog::RuleCategory;
use crate::error::Result;
use crate::evaluation::{fill_present, flag, ratio};
use crate::ranking::{RankingMetric, RankingOrder};
use crate::traits::RuleSet;
use formosa_data::metrics::columns::STOCK_ID;
use formosa_data::metrics::income_statement::{
    EPS, GROSS_PROFIT, INCOME_AFTER_TAXES, INTEREST_EXPENSE, OPERATING_INCOME, PRE_TAX_INCOME,
    REVENUE, TAX,
};
use polars::prelude::*;

/// Minimum gross margin that passes.
pub const MIN_GROSS_MARGIN: f64 = 0.30;

/// Maximum interest margin that passes.
pub const MAX_INTEREST_MARGIN: f64 = 0.25;

/// Minimum net profit margin that passes.
pub const MIN_NET_MARGIN: f64 = 0.05;

/// Derived column names
pub mod columns {
    /// Gross profit over revenue
    pub const GROSS_MARGIN: &str = "GrossMargin";
    /// Interest expense over operating income
    pub const INTEREST_MARGIN: &str = "InterestMargin";
    /// Income after taxes over revenue
    pub const NET_PROFIT_MARGIN: &str = "NetProfitMargin";
    /// EPS four periods earlier
    pub const EPS_4Q_AGO: &str = "EPS_4Q_Ago";
    /// EPS minus the 4-period-ago value
    pub const EPS_GROWTH_4Q: &str = "EPS_Growth_4Q";
    /// Gross margin > 30%
    pub const PASSED_GROSS_MARGIN: &str = "PassedGrossMargin";
    /// Interest margin < 25%
    pub const PASSED_INTEREST_MARGIN: &str = "PassedInterestMargin";
    /// Net margin > 5%
    pub const PASSED_NET_MARGIN: &str = "PassedNetMargin";
    /// EPS > 0 and not below last year's
    pub const PASSED_EPS: &str = "PassedEPS";
    /// All four income flags
    pub const PASSED: &str = "PassedAllBuffettIncomeRules";
}

use columns::*;

const FILLED: &[&str] = &[
    GROSS_PROFIT,
    REVENUE,
    INTEREST_EXPENSE,
    OPERATING_INCOME,
    TAX,
    PRE_TAX_INCOME,
    INCOME_AFTER_TAXES,
    EPS,
];

const REQUIRED: &[&str] = &[
    REVENUE,
    GROSS_PROFIT,
    OPERATING_INCOME,
    INTEREST_EXPENSE,
    INCOME_AFTER_TAXES,
    EPS,
];

const FLAGS: &[&str] = &[
    PASSED_GROSS_MARGIN,
    PASSED_INTEREST_MARGIN,
    PASSED_NET_MARGIN,
    PASSED_EPS,
];

const RANKING: &[RankingMetric] = &[
    RankingMetric::scaled("Avg Gross Margin (%)", GROSS_MARGIN, 100.0),
    RankingMetric::scaled("Avg Interest Margin (%)", INTEREST_MARGIN, 100.0),
    RankingMetric::scaled("Avg Net Profit Margin (%)", NET_PROFIT_MARGIN, 100.0),
    RankingMetric::new("Avg EPS", EPS),
];

/// Buffett income-statement rule set
#[derive(Debug, Clone, Copy, Default)]
pub struct BuffettIncomeStatement;

impl RuleSet for BuffettIncomeStatement {
    fn name(&self) -> &'static str {
        "buffett_income_statement"
    }

    fn description(&self) -> &'static str {
        "Gross margin > 30%, interest margin < 25%, net margin > 5%, positive non-decreasing EPS"
    }

    fn category(&self) -> RuleCategory {
        RuleCategory::Income
    }

    fn required_columns(&self) -> &'static [&'static str] {
        REQUIRED
    }

    fn pass_column(&self) -> &'static str {
        PASSED
    }

    fn flag_columns(&self) -> &'static [&'static str] {
        FLAGS
    }

    fn derive(&self, data: LazyFrame, available: &[String]) -> Result<LazyFrame> {
        let mut data = data;
        let fills = fill_present(FILLED, available);
        if !fills.is_empty() {
            data = data.with_columns(fills);
        }

        let result = data
            .with_columns([
                ratio(col(GROSS_PROFIT), col(REVENUE)).alias(GROSS_MARGIN),
                ratio(col(INTEREST_EXPENSE), col(OPERATING_INCOME)).alias(INTEREST_MARGIN),
                ratio(col(INCOME_AFTER_TAXES), col(REVENUE)).alias(NET_PROFIT_MARGIN),
                col(EPS)
                    .shift(lit(YOY_LAG))
                    .over([col(STOCK_ID)])
                    .alias(EPS_4Q_AGO),
            ])
            .with_columns([
                (col(EPS) - col(EPS_4Q_AGO)).alias(EPS_GROWTH_4Q),
                flag(
                    col(GROSS_MARGIN).gt(lit(MIN_GROSS_MARGIN)),
                    PASSED_GROSS_MARGIN,
                ),
                flag(
                    col(INTEREST_MARGIN).lt(lit(MAX_INTEREST_MARGIN)),
                    PASSED_INTEREST_MARGIN,
                ),
                flag(
                    col(NET_PROFIT_MARGIN).gt(lit(MIN_NET_MARGIN)),
                    PASSED_NET_MARGIN,
                ),
                flag(
                    col(EPS)
                        .gt(lit(0.0))
                        .and(col(EPS_4Q_AGO).is_not_null())
                        .and(col(EPS).gt_eq(col(EPS_4Q_AGO))),
                    PASSED_EPS,
                ),
            ])
            .with_columns([(col(PASSED_GROSS_MARGIN)
                .and(col(PASSED_INTEREST_MARGIN))
                .and(col(PASSED_NET_MARGIN))
                .and(col(PASSED_EPS)))
            .alias(PASSED)]);

        Ok(result)
    }

    fn ranking_metrics(&self) -> &'static [RankingMetric] {
        RANKING
    }

    fn ranking_order(&self) -> RankingOrder {
        RankingOrder::GroupOrder
    }
}
