//! Feroldi Cash Flow Rules
//!
//! Strict four-point test per stock-period:
//! - operating cash flow is positive
//! - free cash flow (operating cash flow minus |capex|) is positive
//! - long-term debt did not grow (issued minus repaid is at most zero)
//! - |capex| is covered by operating cash flow

use crate::catalog::RuleCategory;
use crate::error::Result;
use crate::evaluation::{fill_present, flag};
use crate::ranking::{RankingMetric, RankingOrder};
use crate::traits::RuleSet;
use formosa_data::metrics::cash_flow::{
    CAPEX, OPERATING_CASH_FLOW, PROCEEDS_FROM_LONG_TERM_DEBT, REPAYMENT_OF_LONG_TERM_DEBT,
};
use polars::prelude::*;

/// Derived column names
pub mod columns {
    /// Operating cash flow minus |capex|
    pub const FREE_CASH_FLOW: &str = "FreeCashFlow";
    /// Proceeds from long-term debt
    pub const DEBT_ISSUED: &str = "DebtIssued";
    /// Repayment of long-term debt
    pub const DEBT_REPAID: &str = "DebtRepaid";
    /// Debt issued minus debt repaid
    pub const NET_DEBT_CHANGE: &str = "NetDebtChange";
    /// Operating cash flow > 0
    pub const POSITIVE_OPERATING_CASH_FLOW: &str = "PositiveOperatingCashFlow";
    /// Free cash flow > 0
    pub const POSITIVE_FREE_CASH_FLOW: &str = "PositiveFreeCashFlow";
    /// Net debt change <= 0
    pub const NO_NET_BORROWING: &str = "NoNetBorrowing";
    /// |capex| < operating cash flow
    pub const CAPEX_COVERED: &str = "CapexCoveredByOperatingCashFlow";
    /// All four cash-flow flags
    pub const PASSED: &str = "PassedAllFeroldiRules";
}

use columns::*;

const REQUIRED: &[&str] = &[
    OPERATING_CASH_FLOW,
    CAPEX,
    PROCEEDS_FROM_LONG_TERM_DEBT,
    REPAYMENT_OF_LONG_TERM_DEBT,
];

const FLAGS: &[&str] = &[
    POSITIVE_OPERATING_CASH_FLOW,
    POSITIVE_FREE_CASH_FLOW,
    NO_NET_BORROWING,
    CAPEX_COVERED,
];

const RANKING: &[RankingMetric] = &[
    RankingMetric::new("Avg Free Cash Flow", FREE_CASH_FLOW),
    RankingMetric::new("Avg Net Debt Change", NET_DEBT_CHANGE),
];

/// Feroldi cash-flow rule set
#[derive(Debug, Clone, Copy, Default)]
pub struct FeroldiCashFlow;

impl RuleSet for FeroldiCashFlow {
    fn name(&self) -> &'static str {
        "feroldi_cash_flow"
    }

    fn description(&self) -> &'static str {
        "Positive operating and free cash flow, no net new long-term debt, capex below operating cash flow"
    }

    fn category(&self) -> RuleCategory {
        RuleCategory::CashFlow
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
        let fills = fill_present(REQUIRED, available);
        if !fills.is_empty() {
            data = data.with_columns(fills);
        }

        let result = data
            .with_columns([
                (col(OPERATING_CASH_FLOW) - col(CAPEX).abs()).alias(FREE_CASH_FLOW),
                col(PROCEEDS_FROM_LONG_TERM_DEBT).alias(DEBT_ISSUED),
                col(REPAYMENT_OF_LONG_TERM_DEBT).alias(DEBT_REPAID),
            ])
            .with_columns([(col(DEBT_ISSUED) - col(DEBT_REPAID)).alias(NET_DEBT_CHANGE)])
            .with_columns([
                flag(
                    col(OPERATING_CASH_FLOW).gt(lit(0.0)),
                    POSITIVE_OPERATING_CASH_FLOW,
                ),
                flag(col(FREE_CASH_FLOW).gt(lit(0.0)), POSITIVE_FREE_CASH_FLOW),
                flag(col(NET_DEBT_CHANGE).lt_eq(lit(0.0)), NO_NET_BORROWING),
                flag(
                    col(CAPEX).abs().lt(col(OPERATING_CASH_FLOW)),
                    CAPEX_COVERED,
                ),
            ])
            .with_columns([(col(POSITIVE_OPERATING_CASH_FLOW)
                .and(col(POSITIVE_FREE_CASH_FLOW))
                .and(col(NO_NET_BORROWING))
                .and(col(CAPEX_COVERED)))
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

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    fn derive_one(ocf: f64, capex: f64, issued: f64, repaid: f64) -> DataFrame {
        let lf = df! {
            "date" => ["2021-06-30"],
            "stock_id" => ["2912"],
            OPERATING_CASH_FLOW => [ocf],
            CAPEX => [capex],
            PROCEEDS_FROM_LONG_TERM_DEBT => [issued],
            REPAYMENT_OF_LONG_TERM_DEBT => [repaid],
        }
        .unwrap()
        .lazy();
        let available: Vec<String> = REQUIRED.iter().map(|c| c.to_string()).collect();

        FeroldiCashFlow.derive(lf, &available).unwrap().collect().unwrap()
    }

    fn bool_at(df: &DataFrame, name: &str) -> bool {
        df.column(name).unwrap().bool().unwrap().get(0).unwrap()
    }

    #[rstest]
    #[case::all_pass(50.0, -20.0, 0.0, 10.0, [true, true, true, true])]
    #[case::operating_outflow(-5.0, 0.0, 0.0, 10.0, [false, false, true, false])]
    #[case::capex_eats_cash(50.0, -60.0, 0.0, 10.0, [true, false, true, false])]
    #[case::net_borrowing(50.0, -20.0, 30.0, 10.0, [true, true, false, true])]
    #[case::capex_equals_cash(50.0, 50.0, 0.0, 0.0, [true, false, true, false])]
    fn test_composite_is_conjunction(
        #[case] ocf: f64,
        #[case] capex: f64,
        #[case] issued: f64,
        #[case] repaid: f64,
        #[case] expected: [bool; 4],
    ) {
        let df = derive_one(ocf, capex, issued, repaid);

        for (name, want) in FLAGS.iter().zip(expected) {
            assert_eq!(bool_at(&df, name), want, "{}", name);
        }
        assert_eq!(bool_at(&df, PASSED), expected.iter().all(|f| *f));
    }

    #[test]
    fn test_derived_values() {
        let df = derive_one(50.0, -20.0, 0.0, 10.0);
        let at = |name: &str| df.column(name).unwrap().f64().unwrap().get(0).unwrap();

        assert_relative_eq!(at(FREE_CASH_FLOW), 30.0);
        assert_relative_eq!(at(DEBT_ISSUED), 0.0);
        assert_relative_eq!(at(DEBT_REPAID), 10.0);
        assert_relative_eq!(at(NET_DEBT_CHANGE), -10.0);
    }

    #[test]
    fn test_missing_values_are_zero_filled() {
        let lf = df! {
            "date" => ["2021-06-30"],
            "stock_id" => ["2912"],
            OPERATING_CASH_FLOW => [Some(50.0)],
            CAPEX => [None::<f64>],
            PROCEEDS_FROM_LONG_TERM_DEBT => [None::<f64>],
            REPAYMENT_OF_LONG_TERM_DEBT => [None::<f64>],
        }
        .unwrap()
        .lazy();
        let available: Vec<String> = REQUIRED.iter().map(|c| c.to_string()).collect();

        let df = FeroldiCashFlow.derive(lf, &available).unwrap().collect().unwrap();
        assert!(bool_at(&df, PASSED));
    }
}
