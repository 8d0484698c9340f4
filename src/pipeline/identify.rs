//! Cause identification: one inference call per category.

use tracing::debug;

use super::parse::parse_cause_list;
use crate::config::AnalysisConfig;
use crate::error::FishboneError;
use crate::models::{Category, ProblemStatement};
use crate::provider::{InferenceProvider, Prompt};

pub fn build_prompt(problem: &ProblemStatement, category: Category, config: &AnalysisConfig) -> Prompt {
    Prompt {
        system: format!(
            "You are a Root Cause Analysis expert. Return only JSON. \
             Maximum {} causes. Each cause should be 5 words or less.",
            config.max_causes
        ),
        user: format!(
            "Effect: {}\nCategory: {}\n\nList the most likely causes of this effect within the category.\n\
             Return JSON format:\n{{\"causes\": [\"cause1\", \"cause2\", \"cause3\"]}}",
            problem.as_str(),
            category.label()
        ),
        max_tokens: config.identify_max_tokens,
    }
}

/// Ask the provider for up to `max_causes` candidate causes in `category`.
pub async fn identify_causes<P>(
    provider: &P,
    problem: &ProblemStatement,
    category: Category,
    config: &AnalysisConfig,
) -> Result<Vec<String>, FishboneError>
where
    P: InferenceProvider + ?Sized,
{
    let prompt = build_prompt(problem, category, config);
    let text = provider
        .complete(&prompt)
        .await
        .map_err(|e| FishboneError::unavailable(format!("cause identification ({})", category.as_str()), e))?;

    let causes = parse_cause_list(&text, category, config.max_causes);
    debug!(category = category.as_str(), count = causes.len(), "identified causes");
    Ok(causes)
}
