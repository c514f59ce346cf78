#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/formosa-metrics/formosa/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod engine;
pub mod error;
pub mod pipeline;
pub mod query;
pub mod registry;

// Re-export main types from sub-crates
pub use formosa_data as data;
pub use formosa_output as output;
pub use formosa_rules as rules;

pub use engine::Engine;
pub use error::{FormosaError, Result};
pub use pipeline::{
    IndustryAnalysis, PipelineConfig, PreloadFailure, PreloadReport, PreloadStep,
    analyze_and_register, analyze_industry, preload_all, preload_with_progress,
};
pub use query::best_stock;
pub use registry::{IndustryRankings, RankingRegistry};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
