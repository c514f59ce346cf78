//! Buffett Balance Sheet Rules
//!
//! A stock-period passes when:
//! - cash exceeds total borrowings (short + long term)
//! - debt-to-equity is below 0.8
//! - retained earnings grew over the same quarter a year earlier
//!
//! Zero equity is treated as missing. When a stock carries no debt the
//! cash/debt percentage is pinned to [`UNBOUNDED_CASH_COVER_PCT`].

use crate::catalog::RuleCategory;
use crate::error::Result;
use crate::evaluation::{fill_present, flag, ratio};
use crate::ranking::{RankingMetric, RankingOrder};
use crate::traits::RuleSet;
use formosa_data::metrics::balance_sheet::{
    CASH, EQUITY, LONG_TERM_BORROWINGS, RETAINED_EARNINGS, SHORT_TERM_BORROWINGS,
};
use formosa_data::metrics::columns::STOCK_ID;
use polars::prelude::*;

/// Maximum debt-to-equity ratio that passes.
pub const MAX_DEBT_TO_EQUITY: f64 = 0.8;

/// Cash/debt percentage reported when total debt is zero.
pub const UNBOUNDED_CASH_COVER_PCT: f64 = 10_000.0;

/// Periods between a quarter and the same quarter one year earlier.
pub const YOY_LAG: i64 = 4;

/// Derived column names
pub mod columns {
    /// Short plus long-term borrowings
    pub const TOTAL_DEBT: &str = "TotalDebt";
    /// Total debt over equity
    pub const DEBT_TO_EQUITY: &str = "DebtToEquity";
    /// Retained earnings four periods earlier
    pub const RETAINED_EARNINGS_4Q_AGO: &str = "RetainedEarnings_4Q_Ago";
    /// Retained earnings minus the 4-period-ago value
    pub const RETAINED_EARNINGS_GROWTH: &str = "RetainedEarningsGrowth";
    /// Cash as a percentage of total debt
    pub const CASH_OVER_DEBT_PCT: &str = "CashOverDebt_Pct";
    /// Retained earnings growth as a percentage of the 4-period-ago value
    pub const RETAINED_EARNINGS_GROWTH_PCT: &str = "RetainedEarningsGrowth_Pct";
    /// Cash > total debt
    pub const HAS_MORE_CASH_THAN_DEBT: &str = "HasMoreCashThanDebt";
    /// Debt-to-equity < 0.8
    pub const LOW_DEBT_TO_EQUITY: &str = "LowDebtToEquity";
    /// Retained earnings growth > 0
    pub const POSITIVE_RETAINED_EARNINGS_GROWTH: &str = "PositiveRetainedEarningsGrowth";
    /// All three balance flags
    pub const PASSED: &str = "PassedAllBuffettRules";
}

use columns::*;

const REQUIRED: &[&str] = &[
    CASH,
    SHORT_TERM_BORROWINGS,
    LONG_TERM_BORROWINGS,
    EQUITY,
    RETAINED_EARNINGS,
];

const FLAGS: &[&str] = &[
    HAS_MORE_CASH_THAN_DEBT,
    LOW_DEBT_TO_EQUITY,
    POSITIVE_RETAINED_EARNINGS_GROWTH,
];

const RANKING: &[RankingMetric] = &[
    RankingMetric::new("Avg % Cash/Debt", CASH_OVER_DEBT_PCT),
    RankingMetric::new("Avg Debt/Equity", DEBT_TO_EQUITY),
    RankingMetric::new("Avg % Ret. Earnings Growth", RETAINED_EARNINGS_GROWTH_PCT),
];

/// Buffett balance-sheet rule set
#[derive(Debug, Clone, Copy, Default)]
pub struct BuffettBalanceSheet;

impl RuleSet for BuffettBalanceSheet {
    fn name(&self) -> &'static str {
        "buffett_balance_sheet"
    }

    fn description(&self) -> &'static str {
        "Cash above total debt, debt/equity below 0.8, growing retained earnings"
    }

    fn category(&self) -> RuleCategory {
        RuleCategory::Balance
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
        let fills = fill_present(&[CASH, SHORT_TERM_BORROWINGS, LONG_TERM_BORROWINGS], available);
        if !fills.is_empty() {
            data = data.with_columns(fills);
        }

        let result = data
            .with_columns([
                when(col(EQUITY).neq(lit(0.0)))
                    .then(col(EQUITY))
                    .otherwise(lit(NULL))
                    .alias(EQUITY),
                (col(SHORT_TERM_BORROWINGS) + col(LONG_TERM_BORROWINGS)).alias(TOTAL_DEBT),
                col(RETAINED_EARNINGS)
                    .shift(lit(YOY_LAG))
                    .over([col(STOCK_ID)])
                    .alias(RETAINED_EARNINGS_4Q_AGO),
            ])
            .with_columns([
                (col(TOTAL_DEBT) / col(EQUITY)).alias(DEBT_TO_EQUITY),
                (col(RETAINED_EARNINGS) - col(RETAINED_EARNINGS_4Q_AGO))
                    .alias(RETAINED_EARNINGS_GROWTH),
                when(col(TOTAL_DEBT).eq(lit(0.0)))
                    .then(lit(UNBOUNDED_CASH_COVER_PCT))
                    .otherwise(ratio(col(CASH), col(TOTAL_DEBT)) * lit(100.0))
                    .alias(CASH_OVER_DEBT_PCT),
            ])
            .with_columns([
                when(col(RETAINED_EARNINGS_4Q_AGO).gt(lit(0.0)))
                    .then(
                        col(RETAINED_EARNINGS_GROWTH) / col(RETAINED_EARNINGS_4Q_AGO)
                            * lit(100.0),
                    )
                    .otherwise(lit(NULL))
                    .alias(RETAINED_EARNINGS_GROWTH_PCT),
                flag(col(CASH).gt(col(TOTAL_DEBT)), HAS_MORE_CASH_THAN_DEBT),
                flag(
                    col(DEBT_TO_EQUITY).lt(lit(MAX_DEBT_TO_EQUITY)),
                    LOW_DEBT_TO_EQUITY,
                ),
                flag(
                    col(RETAINED_EARNINGS_GROWTH).gt(lit(0.0)),
                    POSITIVE_RETAINED_EARNINGS_GROWTH,
                ),
            ])
            .with_columns([(col(HAS_MORE_CASH_THAN_DEBT)
                .and(col(LOW_DEBT_TO_EQUITY))
                .and(col(POSITIVE_RETAINED_EARNINGS_GROWTH)))
            .alias(PASSED)]);

        Ok(result)
    }

    fn ranking_metrics(&self) -> &'static [RankingMetric] {
        RANKING
    }

    fn ranking_order(&self) -> RankingOrder {
        RankingOrder::Descending(0)
    }
}
