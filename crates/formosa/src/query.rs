//! "Best stock in industry X" queries.

use crate::error::{FormosaError, Result};
use crate::pipeline::{PipelineConfig, preload_all};
use crate::registry::RankingRegistry;
use formosa_data::RecordSource;
use formosa_output::BestStockReport;
use tracing::{debug, warn};

/// Top rows of an industry's three rankings.
///
/// On a registry miss, every industry of `source` is preloaded first. A
/// preload that cannot even list the industries is logged and treated as a
/// miss.
///
/// # Errors
///
/// Returns [`FormosaError::IndustryNotFound`], listing the registered
/// industries, when the industry still has no rankings.
pub fn best_stock(
    source: &dyn RecordSource,
    registry: &RankingRegistry,
    industry: &str,
    config: &PipelineConfig,
) -> Result<BestStockReport> {
    let rankings = match registry.get(industry) {
        Some(rankings) => Some(rankings),
        None => {
            debug!(%industry, "registry miss, preloading");
            if let Err(e) = preload_all(source, registry, config) {
                warn!(error = %e, "preload failed");
            }
            registry.get(industry)
        }
    };

    let rankings = rankings.ok_or_else(|| FormosaError::IndustryNotFound {
        industry: industry.to_string(),
        available: registry.industries(),
    })?;

    Ok(BestStockReport::new(
        industry,
        &rankings.balance,
        &rankings.income,
        &rankings.cashflow,
        config.evaluation.top_n,
    ))
}
