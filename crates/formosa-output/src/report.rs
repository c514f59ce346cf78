//! Best-stock report for one industry.

use crate::table::TableView;
use chrono::{DateTime, Utc};
use formosa_rules::{RankingTable, RuleCategory};
use serde::{Deserialize, Serialize};

/// The top rows of an industry's three ranking tables.
///
/// This is the tabular input handed to downstream consumers that pick an
/// overall best stock. It carries data only, no prose.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BestStockReport {
    /// Industry name
    pub industry: String,

    /// Report generation timestamp
    pub generated_at: DateTime<Utc>,

    /// Balance sheet ranking (top rows)
    pub balance: RankingTable,

    /// Income statement ranking (top rows)
    pub income: RankingTable,

    /// Cash flow ranking (top rows)
    pub cashflow: RankingTable,
}

impl BestStockReport {
    /// Build a report keeping the first `top_n` rows of each ranking.
    pub fn new(
        industry: impl Into<String>,
        balance: &RankingTable,
        income: &RankingTable,
        cashflow: &RankingTable,
        top_n: usize,
    ) -> Self {
        Self {
            industry: industry.into(),
            generated_at: Utc::now(),
            balance: balance.truncated(top_n),
            income: income.truncated(top_n),
            cashflow: cashflow.truncated(top_n),
        }
    }

    /// The three tables in presentation order.
    pub fn sections(&self) -> [&RankingTable; 3] {
        [&self.balance, &self.income, &self.cashflow]
    }

    /// Table for one category.
    pub const fn table(&self, category: RuleCategory) -> &RankingTable {
        match category {
            RuleCategory::Balance => &self.balance,
            RuleCategory::Income => &self.income,
            RuleCategory::CashFlow => &self.cashflow,
        }
    }

    /// Whether every section is empty.
    pub fn is_empty(&self) -> bool {
        self.sections().iter().all(|t| t.is_empty())
    }

    /// Render as Markdown, one `###` section per ranking.
    ///
    /// Empty rankings render as a "no qualifying stocks" line.
    pub fn to_markdown(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!("## Top ranked stocks: {}\n\n", self.industry));
        for table in self.sections() {
            output.push_str(&format!("### {}\n", table.category.title()));
            if table.is_empty() {
                output.push_str("_No qualifying stocks._\n\n");
            } else {
                output.push_str(&table.to_markdown());
                output.push('\n');
            }
        }

        output
    }

    /// Render for a terminal.
    pub fn to_ascii_table(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!("\nTop ranked stocks: {}\n", self.industry));
        output.push_str(&"=".repeat(60));
        output.push('\n');
        for table in self.sections() {
            output.push_str(&format!("\n{}\n", table.category.title()));
            if table.is_empty() {
                output.push_str("(no qualifying stocks)\n");
            } else {
                output.push_str(&table.to_ascii_table());
            }
        }

        output
    }
}
