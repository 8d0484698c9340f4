//! The analysis pipeline.
//!
//! A run is a straight sequence of stages:
//!
//! 1. [`identify`]: one call per category for candidate causes.
//! 2. [`expand`]: a why-chain per candidate cause.
//! 3. [`assemble`]: merge into an [`AnalysisResult`].
//!
//! Any inference failure aborts the run; there are no partial results.

pub mod assemble;
pub mod expand;
pub mod identify;
pub mod parse;

use tracing::info;

use crate::config::AnalysisConfig;
use crate::error::FishboneError;
use crate::models::{AnalysisResult, Category, ProblemStatement};
use crate::provider::InferenceProvider;

/// Runs fishbone analyses against one inference provider.
pub struct FishboneAnalyzer<P> {
    provider: P,
    config: AnalysisConfig,
}

impl<P: InferenceProvider> FishboneAnalyzer<P> {
    pub fn new(provider: P, config: AnalysisConfig) -> Self {
        Self { provider, config }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Validate `problem` and run the full pipeline.
    ///
    /// An empty problem is rejected before any inference call is made.
    pub async fn analyze(&self, problem: &str) -> Result<AnalysisResult, FishboneError> {
        let problem = ProblemStatement::new(problem)?;
        self.analyze_statement(problem).await
    }

    pub async fn analyze_statement(
        &self,
        problem: ProblemStatement,
    ) -> Result<AnalysisResult, FishboneError> {
        info!(problem = problem.as_str(), "starting fishbone analysis");

        let mut branches = Vec::with_capacity(Category::ALL.len());
        for category in Category::ALL {
            let labels =
                identify::identify_causes(&self.provider, &problem, category, &self.config).await?;

            let mut causes = Vec::with_capacity(labels.len());
            for label in &labels {
                let cause =
                    expand::expand_cause(&self.provider, &problem, category, label, &self.config)
                        .await?;
                causes.push(cause);
            }

            info!(
                category = category.as_str(),
                causes = causes.len(),
                "category analyzed"
            );
            branches.push((category, causes));
        }

        let result = assemble::assemble(
            problem,
            branches,
            self.provider.model(),
            self.config.max_depth,
        );
        info!(
            run_id = %result.metadata.run_id,
            total_causes = result.metadata.total_causes,
            total_steps = result.metadata.total_steps,
            "analysis complete"
        );
        Ok(result)
    }
}
