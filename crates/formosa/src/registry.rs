//! Process-wide store of per-industry ranking tables.

use formosa_rules::{RankingTable, RuleCategory};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::info;

/// The three ranking tables of one industry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndustryRankings {
    /// Balance sheet ranking
    pub balance: RankingTable,
    /// Income statement ranking
    pub income: RankingTable,
    /// Cash flow ranking
    pub cashflow: RankingTable,
}

impl IndustryRankings {
    /// Ranking for one category.
    pub const fn get(&self, category: RuleCategory) -> &RankingTable {
        match category {
            RuleCategory::Balance => &self.balance,
            RuleCategory::Income => &self.income,
            RuleCategory::CashFlow => &self.cashflow,
        }
    }
}

/// Mapping `industry -> {balance, income, cashflow}` rankings.
///
/// All three tables of an industry are replaced together, so readers always
/// see a consistent triple. Entries are never evicted.
#[derive(Debug, Default)]
pub struct RankingRegistry {
    entries: Mutex<HashMap<String, Arc<IndustryRankings>>>,
}

impl RankingRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Arc<IndustryRankings>>> {
        // entries are replaced whole, so a poisoned map is still consistent
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Insert or replace an industry's rankings, returning the stored entry.
    pub fn register(
        &self,
        industry: impl Into<String>,
        rankings: IndustryRankings,
    ) -> Arc<IndustryRankings> {
        let industry = industry.into();
        info!(
            %industry,
            balance = rankings.balance.len(),
            income = rankings.income.len(),
            cashflow = rankings.cashflow.len(),
            "registered rankings"
        );
        let entry = Arc::new(rankings);
        self.lock().insert(industry, Arc::clone(&entry));
        entry
    }

    /// Rankings of an industry, if registered.
    pub fn get(&self, industry: &str) -> Option<Arc<IndustryRankings>> {
        self.lock().get(industry).cloned()
    }

    /// Whether an industry is registered.
    pub fn contains(&self, industry: &str) -> bool {
        self.lock().contains_key(industry)
    }

    /// Registered industry names, sorted.
    pub fn industries(&self) -> Vec<String> {
        let mut names: Vec<String> = self.lock().keys().cloned().collect();
        names.sort();
        names
    }

    /// Number of registered industries.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether no industry is registered.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use formosa_rules::RankingRow;

    fn rankings(stock_id: &str) -> IndustryRankings {
        let table = |category| RankingTable {
            category,
            metric_labels: vec![],
            rows: vec![RankingRow {
                stock_id: stock_id.to_string(),
                stock_name: String::new(),
                pass_rate: 1.0,
                metrics: vec![],
            }],
        };
        IndustryRankings {
            balance: table(RuleCategory::Balance),
            income: table(RuleCategory::Income),
            cashflow: table(RuleCategory::CashFlow),
        }
    }

    #[test]
    fn test_register_and_get() {
        let registry = RankingRegistry::new();
        assert!(registry.is_empty());
        assert!(registry.get("水泥工業").is_none());

        registry.register("水泥工業", rankings("1101"));
        registry.register("食品工業", rankings("1216"));

        assert_eq!(registry.len(), 2);
        assert!(registry.contains("水泥工業"));
        let entry = registry.get("水泥工業").unwrap();
        assert_eq!(entry.get(RuleCategory::Income).rows[0].stock_id, "1101");
    }

    #[test]
    fn test_register_replaces_whole_entry() {
        let registry = RankingRegistry::new();
        registry.register("水泥工業", rankings("1101"));
        let before = registry.get("水泥工業").unwrap();

        registry.register("水泥工業", rankings("1102"));

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("水泥工業").unwrap().balance.rows[0].stock_id, "1102");
        // earlier readers keep their snapshot
        assert_eq!(before.balance.rows[0].stock_id, "1101");
    }

    #[test]
    fn test_industries_sorted() {
        let registry = RankingRegistry::new();
        registry.register("b", rankings("2"));
        registry.register("a", rankings("1"));
        assert_eq!(registry.industries(), ["a", "b"]);
    }

    #[test]
    fn test_shared_across_threads() {
        let registry = Arc::new(RankingRegistry::new());
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let registry = Arc::clone(&registry);
                std::thread::spawn(move || registry.register(format!("industry-{}", i), rankings("1")))
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(registry.len(), 4);
    }
}
