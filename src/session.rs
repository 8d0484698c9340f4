//! The run boundary: analyze, render, then export.
//!
//! Rendering and export are independent. A failed export is reported through
//! [`ExportStatus::Failed`] while the rendered tree is still returned; a
//! failed analysis returns an error and nothing is written.

use std::future::Future;
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::error::FishboneError;
use crate::models::AnalysisResult;
use crate::pipeline::FishboneAnalyzer;
use crate::provider::InferenceProvider;
use crate::report;

/// Inputs that end an interactive session.
const QUIT_COMMANDS: [&str; 3] = ["quit", "exit", "q"];

#[derive(Debug)]
pub enum ExportStatus {
    Saved(PathBuf),
    Skipped,
    Failed(FishboneError),
}

/// Everything produced by one successful analysis.
#[derive(Debug)]
pub struct RunOutcome {
    pub result: AnalysisResult,
    pub rendered: String,
    pub export: ExportStatus,
}

/// Run one analysis end to end. `output_dir` of `None` skips export.
pub async fn run_analysis<P: InferenceProvider>(
    analyzer: &FishboneAnalyzer<P>,
    problem: &str,
    output_dir: Option<&Path>,
) -> Result<RunOutcome, FishboneError> {
    let result = analyzer.analyze(problem).await?;
    let rendered = report::render(&result)?;

    let export = match output_dir {
        None => ExportStatus::Skipped,
        Some(dir) => match report::export(&result, dir) {
            Ok(path) => ExportStatus::Saved(path),
            Err(e) => {
                warn!(error = %e, "failed to save analysis");
                ExportStatus::Failed(e)
            }
        },
    };

    Ok(RunOutcome {
        result,
        rendered,
        export,
    })
}

/// As [`run_analysis`], abandoned as soon as `interrupt` resolves.
///
/// Returns `Ok(None)` when interrupted; the abandoned run writes nothing.
pub async fn run_until_interrupted<P, I>(
    analyzer: &FishboneAnalyzer<P>,
    problem: &str,
    output_dir: Option<&Path>,
    interrupt: I,
) -> Result<Option<RunOutcome>, FishboneError>
where
    P: InferenceProvider,
    I: Future<Output = ()>,
{
    tokio::select! {
        biased;
        _ = interrupt => {
            warn!("analysis interrupted");
            Ok(None)
        }
        outcome = run_analysis(analyzer, problem, output_dir) => outcome.map(Some),
    }
}

pub fn is_quit_command(input: &str) -> bool {
    let input = input.trim();
    QUIT_COMMANDS
        .iter()
        .any(|cmd| cmd.eq_ignore_ascii_case(input))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quit_commands() {
        assert!(is_quit_command("quit"));
        assert!(is_quit_command("  EXIT "));
        assert!(is_quit_command("Q"));
        assert!(!is_quit_command("query latency is high"));
        assert!(!is_quit_command(""));
    }
}
