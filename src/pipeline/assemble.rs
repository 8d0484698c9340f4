//! Tree assembly. Pure, no inference calls.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::{AnalysisMetadata, AnalysisResult, Category, Cause, ProblemStatement};

pub const METHOD: &str = "Fishbone Diagram";

/// Merge per-category causes into an [`AnalysisResult`] stamped with the
/// current time.
pub fn assemble<I>(problem: ProblemStatement, branches: I, model: &str, max_depth: usize) -> AnalysisResult
where
    I: IntoIterator<Item = (Category, Vec<Cause>)>,
{
    assemble_at(problem, branches, model, max_depth, Utc::now())
}

/// As [`assemble`], with an explicit generation time.
///
/// Every category is present in the output. Causes keep the order they were
/// produced in; nothing is reordered or deduplicated.
pub fn assemble_at<I>(
    problem: ProblemStatement,
    branches: I,
    model: &str,
    max_depth: usize,
    generated_at: DateTime<Utc>,
) -> AnalysisResult
where
    I: IntoIterator<Item = (Category, Vec<Cause>)>,
{
    let mut categories: BTreeMap<Category, Vec<Cause>> =
        Category::ALL.iter().map(|c| (*c, Vec::new())).collect();
    for (category, causes) in branches {
        categories.entry(category).or_default().extend(causes);
    }

    let total_causes = categories.values().map(Vec::len).sum();
    let total_steps = categories
        .values()
        .flatten()
        .map(|cause| cause.whys.len())
        .sum();

    AnalysisResult {
        problem,
        generated_at,
        categories,
        metadata: AnalysisMetadata {
            run_id: Uuid::new_v4(),
            method: METHOD.to_string(),
            model: model.to_string(),
            categories_analyzed: Category::ALL.len(),
            total_causes,
            total_steps,
            max_depth,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn problem() -> ProblemStatement {
        ProblemStatement::new("Pump overheats").unwrap()
    }

    #[test]
    fn test_empty_input_yields_all_categories() {
        let result = assemble(problem(), Vec::new(), "test-model", 5);
        let keys: Vec<Category> = result.categories.keys().copied().collect();
        assert_eq!(keys, Category::ALL.to_vec());
        assert!(result.categories.values().all(Vec::is_empty));
        assert_eq!(result.metadata.total_causes, 0);
        assert!(result.validate().is_ok());
    }

    #[test]
    fn test_preserves_cause_order_and_counts() {
        let branches = vec![
            (
                Category::Machine,
                vec![
                    Cause::with_whys("Worn bearings", ["No lubrication schedule"]),
                    Cause::new("Blocked vent"),
                ],
            ),
            (Category::Method, vec![Cause::with_whys("Overrun cycles", ["a", "b"])]),
        ];

        let result = assemble(problem(), branches, "test-model", 5);

        let labels: Vec<&str> = result
            .causes(Category::Machine)
            .iter()
            .map(|c| c.label.as_str())
            .collect();
        assert_eq!(labels, vec!["Worn bearings", "Blocked vent"]);
        assert_eq!(result.metadata.total_causes, 3);
        assert_eq!(result.metadata.total_steps, 3);
        assert_eq!(result.metadata.method, "Fishbone Diagram");
        assert_eq!(result.metadata.categories_analyzed, 6);
    }

    #[test]
    fn test_uses_given_timestamp() {
        let at = DateTime::parse_from_rfc3339("2025-03-01T10:20:30Z")
            .unwrap()
            .with_timezone(&Utc);
        let result = assemble_at(problem(), Vec::new(), "m", 5, at);
        assert_eq!(result.generated_at, at);
    }
}
