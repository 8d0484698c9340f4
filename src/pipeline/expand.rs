//! Root cause expansion ("5 Whys").
//!
//! Each step asks why the previous answer happens; step 1 asks about the
//! cause itself. Expansion stops at `max_depth` or at the first degenerate
//! answer, whichever comes first.

use tracing::{debug, warn};

use super::parse::parse_why_answer;
use crate::config::AnalysisConfig;
use crate::error::FishboneError;
use crate::models::{Category, Cause, ProblemStatement};
use crate::provider::{InferenceProvider, Prompt};

pub fn build_prompt(
    problem: &ProblemStatement,
    category: Category,
    cause: &Cause,
    config: &AnalysisConfig,
) -> Prompt {
    let mut user = format!(
        "Effect: {}\nCategory: {}\n",
        problem.as_str(),
        category.label()
    );
    if !cause.whys.is_empty() {
        user.push_str(&format!("Branch: {}\n", cause.label));
    }
    user.push_str(&format!(
        "Cause: {}\n\nWhy does this happen? Answer with the single most likely reason.",
        cause.deepest()
    ));

    Prompt {
        system: "Perform root cause analysis using the 5 Whys technique. \
                 Answer with one reason of 8 words or less and nothing else. \
                 If no deeper cause can be identified, answer exactly NONE."
            .to_string(),
        user,
        max_tokens: config.why_max_tokens,
    }
}

/// True when an answer signals that no further cause is identifiable.
pub fn is_degenerate(answer: &str, stop_phrases: &[String]) -> bool {
    let normalized = answer
        .trim()
        .trim_matches(|c: char| c.is_ascii_punctuation() && c != '/')
        .trim()
        .to_lowercase();
    normalized.is_empty() || stop_phrases.iter().any(|p| p.eq_ignore_ascii_case(&normalized))
}

/// Build the why-chain for `label`, at most `config.max_depth` steps long.
pub async fn expand_cause<P>(
    provider: &P,
    problem: &ProblemStatement,
    category: Category,
    label: &str,
    config: &AnalysisConfig,
) -> Result<Cause, FishboneError>
where
    P: InferenceProvider + ?Sized,
{
    let mut cause = Cause::new(label);

    while cause.whys.len() < config.max_depth {
        let prompt = build_prompt(problem, category, &cause, config);
        let depth = cause.whys.len() + 1;
        let text = provider.complete(&prompt).await.map_err(|e| {
            FishboneError::unavailable(format!("why #{} for '{}'", depth, label), e)
        })?;

        let answer = parse_why_answer(&text);
        if is_degenerate(&answer, &config.stop_phrases) {
            debug!(cause = label, depth, "no further cause, stopping early");
            break;
        }
        if answer.eq_ignore_ascii_case(cause.deepest()) {
            warn!(cause = label, depth, "model repeated the previous cause, stopping early");
            break;
        }
        cause.push_why(answer);
    }

    Ok(cause)
}
