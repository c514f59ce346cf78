//! Rule catalog
//!
//! Central list of the available rule sets. Allows lookup by category and
//! instantiation for a full analysis run.

use crate::balance::BuffettBalanceSheet;
use crate::cashflow::FeroldiCashFlow;
use crate::income::BuffettIncomeStatement;
use crate::traits::RuleSet;
use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Financial statement a rule set is evaluated on.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleCategory {
    /// Balance sheet (Buffett)
    #[display("balance")]
    Balance,
    /// Income statement (Buffett)
    #[display("income")]
    Income,
    /// Cash flow statement (Feroldi)
    #[display("cashflow")]
    CashFlow,
}

impl RuleCategory {
    /// All categories in presentation order.
    pub const fn all() -> [Self; 3] {
        [Self::Balance, Self::Income, Self::CashFlow]
    }

    /// Stable key used in registries and file names.
    pub const fn key(&self) -> &'static str {
        match self {
            Self::Balance => "balance",
            Self::Income => "income",
            Self::CashFlow => "cashflow",
        }
    }

    /// Section heading for reports.
    pub const fn title(&self) -> &'static str {
        match self {
            Self::Balance => "Balance Sheet Ranking",
            Self::Income => "Income Statement Ranking",
            Self::CashFlow => "Cash Flow Ranking",
        }
    }
}

impl FromStr for RuleCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace(['-', '_', ' '], "").as_str() {
            "balance" | "balancesheet" | "bal" => Ok(Self::Balance),
            "income" | "incomestatement" | "inc" => Ok(Self::Income),
            "cashflow" | "cash" | "cf" => Ok(Self::CashFlow),
            _ => Err(format!("Unknown rule category: {}", s)),
        }
    }
}

/// Rule set metadata
#[derive(Debug, Clone)]
pub struct RuleInfo {
    /// Rule set name (unique identifier)
    pub name: &'static str,
    /// Category the rule set belongs to
    pub category: RuleCategory,
    /// Brief description of the composite test
    pub description: &'static str,
    /// Metric columns read from the wide table
    pub required_columns: &'static [&'static str],
}

/// Get all available rule set info
pub fn available_rules() -> Vec<RuleInfo> {
    all_rule_sets()
        .iter()
        .map(|rules| RuleInfo {
            name: rules.name(),
            category: rules.category(),
            description: rules.description(),
            required_columns: rules.required_columns(),
        })
        .collect()
}

/// Instantiate the rule set for a category.
pub fn rule_set(category: RuleCategory) -> Box<dyn RuleSet> {
    match category {
        RuleCategory::Balance => Box::new(BuffettBalanceSheet),
        RuleCategory::Income => Box::new(BuffettIncomeStatement),
        RuleCategory::CashFlow => Box::new(FeroldiCashFlow),
    }
}

/// Instantiate every rule set, in category order.
pub fn all_rule_sets() -> Vec<Box<dyn RuleSet>> {
    RuleCategory::all().into_iter().map(rule_set).collect()
}
