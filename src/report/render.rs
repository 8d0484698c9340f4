//! ASCII tree rendering for analysis results.

use chrono::SecondsFormat;

use crate::error::FishboneError;
use crate::models::{AnalysisResult, Cause};

const RULE: &str = "================================================================";
const NO_CAUSES: &str = "    (no causes identified)";

/// Render an analysis as an indented tree.
///
/// Example output:
/// ```text
/// ================================================================
/// FISHBONE ANALYSIS: Website is loading slowly
/// ================================================================
///
/// Man (People)
///     (no causes identified)
///
/// Machine
/// └── Server overload
///     ├── Why? High traffic volume
///     └── Why? No load balancing
/// ...
/// Completed at: 2025-03-01T10:20:30Z
/// ```
///
/// Deterministic: the same result always renders to the same text. Fails
/// with [`FishboneError::MalformedResult`] if a category is missing.
pub fn render(result: &AnalysisResult) -> Result<String, FishboneError> {
    result.validate()?;

    let mut output = String::new();
    output.push_str(RULE);
    output.push('\n');
    output.push_str("FISHBONE ANALYSIS: ");
    output.push_str(result.problem.as_str());
    output.push('\n');
    output.push_str(RULE);
    output.push('\n');

    for (category, causes) in &result.categories {
        output.push('\n');
        output.push_str(category.label());
        output.push('\n');

        if causes.is_empty() {
            output.push_str(NO_CAUSES);
            output.push('\n');
            continue;
        }

        for (i, cause) in causes.iter().enumerate() {
            render_cause(&mut output, cause, i == causes.len() - 1);
        }
    }

    output.push('\n');
    output.push_str("Completed at: ");
    output.push_str(&result.generated_at.to_rfc3339_opts(SecondsFormat::Secs, true));
    output.push('\n');
    Ok(output)
}

fn render_cause(output: &mut String, cause: &Cause, is_last: bool) {
    let branch = if is_last { "└── " } else { "├── " };
    output.push_str(branch);
    output.push_str(&cause.label);
    output.push('\n');

    let child_prefix = if is_last { "    " } else { "│   " };
    for (i, step) in cause.whys.iter().enumerate() {
        let branch = if i == cause.whys.len() - 1 {
            "└── "
        } else {
            "├── "
        };
        output.push_str(child_prefix);
        output.push_str(branch);
        output.push_str("Why? ");
        output.push_str(&step.text);
        output.push('\n');
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, ProblemStatement};
    use crate::pipeline::assemble::assemble_at;
    use chrono::{DateTime, Utc};

    fn at() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2025-03-01T10:20:30Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    fn result(branches: Vec<(Category, Vec<Cause>)>) -> AnalysisResult {
        let problem = ProblemStatement::new("Website is loading slowly").unwrap();
        assemble_at(problem, branches, "test-model", 5, at())
    }

    #[test]
    fn test_empty_analysis() {
        let output = render(&result(vec![])).unwrap();
        let expected = format!(
            "{RULE}\nFISHBONE ANALYSIS: Website is loading slowly\n{RULE}\n\
             \nMan (People)\n{NO_CAUSES}\n\
             \nMachine\n{NO_CAUSES}\n\
             \nMethod\n{NO_CAUSES}\n\
             \nMaterial\n{NO_CAUSES}\n\
             \nMeasurement\n{NO_CAUSES}\n\
             \nEnvironment\n{NO_CAUSES}\n\
             \nCompleted at: 2025-03-01T10:20:30Z\n"
        );
        assert_eq!(output, expected);
    }

    #[test]
    fn test_nested_causes() {
        let output = render(&result(vec![(
            Category::Machine,
            vec![
                Cause::with_whys("Server overload", ["High traffic volume", "No load balancing"]),
                Cause::with_whys("Slow disks", ["Old hardware"]),
            ],
        )]))
        .unwrap();

        let expected = "\nMachine\n\
                        ├── Server overload\n\
                        │   ├── Why? High traffic volume\n\
                        │   └── Why? No load balancing\n\
                        └── Slow disks\n    \
                        └── Why? Old hardware\n";
        assert!(output.contains(expected), "got:\n{output}");
    }

    #[test]
    fn test_render_is_deterministic() {
        let r = result(vec![(Category::Method, vec![Cause::new("Manual deploys")])]);
        assert_eq!(render(&r).unwrap(), render(&r).unwrap());
    }

    #[test]
    fn test_missing_category_is_malformed() {
        let mut r = result(vec![]);
        r.categories.remove(&Category::Environment);
        let err = render(&r).unwrap_err();
        assert!(matches!(err, FishboneError::MalformedResult(_)));
    }
}
