#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/formosa-metrics/formosa/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod balance;
pub mod cashflow;
pub mod catalog;
pub mod error;
pub mod evaluation;
pub mod heatmap;
pub mod income;
pub mod ranking;
pub mod traits;

pub use balance::BuffettBalanceSheet;
pub use cashflow::FeroldiCashFlow;
pub use catalog::{RuleCategory, RuleInfo, all_rule_sets, available_rules, rule_set};
pub use error::{Result, RuleError};
pub use evaluation::{Evaluation, EvaluationConfig, PassRate};
pub use heatmap::{HeatmapMatrix, HeatmapRow};
pub use income::BuffettIncomeStatement;
pub use ranking::{RankingMetric, RankingOrder, RankingRow, RankingTable};
pub use traits::RuleSet;
