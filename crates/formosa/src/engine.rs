//! Source, registry and configuration bundled together.

use crate::error::Result;
use crate::pipeline::{
    IndustryAnalysis, PipelineConfig, PreloadReport, PreloadStep, analyze_industry,
    preload_with_progress,
};
use crate::query;
use crate::registry::RankingRegistry;
use formosa_data::RecordSource;
use formosa_output::BestStockReport;

/// Entry point for serving layers: one record source, one ranking registry.
#[derive(Debug)]
pub struct Engine {
    source: Box<dyn RecordSource>,
    registry: RankingRegistry,
    config: PipelineConfig,
}

impl Engine {
    /// Create an engine with an empty registry.
    pub fn new<S: RecordSource + 'static>(source: S, config: PipelineConfig) -> Self {
        Self {
            source: Box::new(source),
            registry: RankingRegistry::new(),
            config,
        }
    }

    /// Record source.
    pub fn source(&self) -> &dyn RecordSource {
        self.source.as_ref()
    }

    /// Ranking registry.
    pub const fn registry(&self) -> &RankingRegistry {
        &self.registry
    }

    /// Pipeline configuration.
    pub const fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Analyze one industry and register its rankings.
    pub fn analyze(&self, industry: &str) -> Result<IndustryAnalysis> {
        let analysis = analyze_industry(self.source(), industry, &self.config.evaluation)?;
        self.registry.register(industry, analysis.rankings());
        Ok(analysis)
    }

    /// Preload every industry of the source.
    pub fn preload(&self) -> Result<PreloadReport> {
        self.preload_with_progress(|_| {})
    }

    /// [`preload`](Self::preload) with a callback after each industry.
    pub fn preload_with_progress<F>(&self, on_step: F) -> Result<PreloadReport>
    where
        F: FnMut(PreloadStep<'_>),
    {
        preload_with_progress(self.source(), &self.registry, &self.config, on_step)
    }

    /// Best-stock report for an industry.
    pub fn best_stock(&self, industry: &str) -> Result<BestStockReport> {
        query::best_stock(self.source(), &self.registry, industry, &self.config)
    }
}
