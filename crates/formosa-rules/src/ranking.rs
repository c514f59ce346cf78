//! Per-stock ranking tables.

use crate::catalog::RuleCategory;
use serde::{Deserialize, Serialize};

/// One averaged column of a ranking table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankingMetric {
    /// Display label, e.g. `Avg Gross Margin (%)`
    pub label: &'static str,
    /// Source column in the augmented table
    pub column: &'static str,
    /// Multiplier applied to the mean before rounding
    pub scale: f64,
}

impl RankingMetric {
    /// Unscaled metric.
    pub const fn new(label: &'static str, column: &'static str) -> Self {
        Self {
            label,
            column,
            scale: 1.0,
        }
    }

    /// Metric whose mean is multiplied by `scale`.
    pub const fn scaled(label: &'static str, column: &'static str, scale: f64) -> Self {
        Self {
            label,
            column,
            scale,
        }
    }
}

/// How ranking rows are ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankingOrder {
    /// Descending by the metric at this index; missing values go last.
    Descending(usize),
    /// Keep aggregation order (ascending stock id).
    GroupOrder,
}

/// One stock in a ranking table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingRow {
    /// Stock identifier
    pub stock_id: String,
    /// Canonical display name
    pub stock_name: String,
    /// Fraction of post-cutoff periods passed, in `[0, 1]`
    pub pass_rate: f64,
    /// Averaged metrics, aligned with [`RankingTable::metric_labels`]
    pub metrics: Vec<Option<f64>>,
}

impl RankingRow {
    /// `% Passed` rendered as a whole percentage, e.g. `75%`.
    pub fn passed_pct(&self) -> String {
        format!("{:.0}%", self.pass_rate * 100.0)
    }
}

/// Ranking of an industry's stocks under one rule set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingTable {
    /// Rule set this table belongs to
    pub category: RuleCategory,
    /// Labels of the averaged metric columns
    pub metric_labels: Vec<String>,
    /// Rows, best first
    pub rows: Vec<RankingRow>,
}

impl RankingTable {
    /// Create an empty table for a category.
    pub fn empty(category: RuleCategory, metric_labels: Vec<String>) -> Self {
        Self {
            category,
            metric_labels,
            rows: Vec::new(),
        }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// First `n` rows.
    pub fn head(&self, n: usize) -> &[RankingRow] {
        &self.rows[..n.min(self.rows.len())]
    }

    /// Copy holding only the first `n` rows.
    pub fn truncated(&self, n: usize) -> Self {
        Self {
            category: self.category,
            metric_labels: self.metric_labels.clone(),
            rows: self.head(n).to_vec(),
        }
    }

    /// All column headers: `stock_id`, `stock_name`, `% Passed`, then the metric labels.
    pub fn columns(&self) -> Vec<String> {
        let mut headers = vec![
            "stock_id".to_string(),
            "stock_name".to_string(),
            "% Passed".to_string(),
        ];
        headers.extend(self.metric_labels.iter().cloned());
        headers
    }

    /// Value of a metric for a stock, by label.
    pub fn value(&self, stock_id: &str, label: &str) -> Option<f64> {
        let idx = self.metric_labels.iter().position(|l| l == label)?;
        self.rows
            .iter()
            .find(|r| r.stock_id == stock_id)
            .and_then(|r| r.metrics.get(idx).copied().flatten())
    }

    /// Row for a stock.
    pub fn row(&self, stock_id: &str) -> Option<&RankingRow> {
        self.rows.iter().find(|r| r.stock_id == stock_id)
    }

    pub(crate) fn sort(&mut self, order: RankingOrder) {
        if let RankingOrder::Descending(idx) = order {
            // stable: ties keep ascending stock id
            self.rows.sort_by(|a, b| {
                let va = a.metrics.get(idx).copied().flatten();
                let vb = b.metrics.get(idx).copied().flatten();
                match (va, vb) {
                    (Some(x), Some(y)) => y.total_cmp(&x),
                    (Some(_), None) => std::cmp::Ordering::Less,
                    (None, Some(_)) => std::cmp::Ordering::Greater,
                    (None, None) => std::cmp::Ordering::Equal,
                }
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: &str, value: Option<f64>) -> RankingRow {
        RankingRow {
            stock_id: id.to_string(),
            stock_name: format!("Stock {}", id),
            pass_rate: 0.5,
            metrics: vec![value],
        }
    }

    #[test]
    fn test_descending_sort_puts_missing_last() {
        let mut table = RankingTable {
            category: RuleCategory::CashFlow,
            metric_labels: vec!["Avg Free Cash Flow".to_string()],
            rows: vec![row("1101", None), row("1102", Some(5.0)), row("1103", Some(9.0))],
        };
        table.sort(RankingOrder::Descending(0));

        let ids: Vec<_> = table.rows.iter().map(|r| r.stock_id.as_str()).collect();
        assert_eq!(ids, ["1103", "1102", "1101"]);
        assert_eq!(table.head(2).len(), 2);
        assert_eq!(table.head(10).len(), 3);
    }

    #[test]
    fn test_columns_and_lookup() {
        let table = RankingTable {
            category: RuleCategory::CashFlow,
            metric_labels: vec!["Avg Free Cash Flow".to_string()],
            rows: vec![row("1101", Some(3.25))],
        };

        assert_eq!(
            table.columns(),
            ["stock_id", "stock_name", "% Passed", "Avg Free Cash Flow"]
        );
        assert_eq!(table.value("1101", "Avg Free Cash Flow"), Some(3.25));
        assert_eq!(table.value("1101", "Avg EPS"), None);
        assert_eq!(table.rows[0].passed_pct(), "50%");
    }
}
