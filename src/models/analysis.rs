use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Category;
use crate::error::FishboneError;

/// The effect being analyzed.
///
/// Construction trims surrounding whitespace and rejects empty text, so any
/// `ProblemStatement` that reaches the pipeline is safe to send to a model.
/// Deserialization goes through the same check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProblemStatement(String);

impl ProblemStatement {
    pub fn new(text: impl AsRef<str>) -> Result<Self, FishboneError> {
        let trimmed = text.as_ref().trim();
        if trimmed.is_empty() {
            return Err(FishboneError::Validation(
                "problem statement cannot be empty".to_string(),
            ));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ProblemStatement {
    type Error = FishboneError;

    fn try_from(text: String) -> Result<Self, Self::Error> {
        Self::new(text)
    }
}

impl From<ProblemStatement> for String {
    fn from(problem: ProblemStatement) -> Self {
        problem.0
    }
}

/// One answer to "why does this happen?".
///
/// `depth` starts at 1 for the answer about the cause itself and increases by
/// one for each deeper answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootCauseStep {
    pub depth: u32,
    pub text: String,
}

/// A candidate cause within a category, together with its why-chain.
///
/// Serialized as `{"cause": "<label>", "causes": ["<why 1>", "<why 2>", ...]}`.
/// Step depths are implied by position and restored on deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cause {
    #[serde(rename = "cause")]
    pub label: String,
    #[serde(rename = "causes", with = "why_chain", default)]
    pub whys: Vec<RootCauseStep>,
}

impl Cause {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            whys: Vec::new(),
        }
    }

    /// Build a cause from an ordered list of why-answers.
    pub fn with_whys<I, S>(label: impl Into<String>, whys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut cause = Self::new(label);
        for why in whys {
            cause.push_why(why);
        }
        cause
    }

    /// Append the next step of the chain, assigning it the next depth.
    pub fn push_why(&mut self, text: impl Into<String>) {
        let depth = self.whys.len() as u32 + 1;
        self.whys.push(RootCauseStep {
            depth,
            text: text.into(),
        });
    }

    /// The deepest identified cause, or the label itself if the chain is empty.
    pub fn deepest(&self) -> &str {
        self.whys
            .last()
            .map(|step| step.text.as_str())
            .unwrap_or(&self.label)
    }
}

mod why_chain {
    use serde::{Deserialize, Deserializer, Serializer};

    use super::RootCauseStep;

    pub fn serialize<S: Serializer>(steps: &[RootCauseStep], s: S) -> Result<S::Ok, S::Error> {
        s.collect_seq(steps.iter().map(|step| step.text.as_str()))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<RootCauseStep>, D::Error> {
        let texts = Vec::<String>::deserialize(d)?;
        Ok(texts
            .into_iter()
            .enumerate()
            .map(|(i, text)| RootCauseStep {
                depth: i as u32 + 1,
                text,
            })
            .collect())
    }
}

/// Run-level facts recorded alongside the tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisMetadata {
    pub run_id: Uuid,
    pub method: String,
    pub model: String,
    pub categories_analyzed: usize,
    pub total_causes: usize,
    pub total_steps: usize,
    pub max_depth: usize,
}

/// The assembled fishbone tree for one analysis run.
///
/// Every [`Category`] appears in `categories` exactly once, even when no
/// causes were found for it. The `BTreeMap` keeps categories in canonical
/// order for both rendering and serialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub problem: ProblemStatement,
    pub generated_at: DateTime<Utc>,
    pub categories: BTreeMap<Category, Vec<Cause>>,
    pub metadata: AnalysisMetadata,
}

impl AnalysisResult {
    /// Check the structural invariants of the tree.
    pub fn validate(&self) -> Result<(), FishboneError> {
        if let Some(missing) = Category::ALL
            .iter()
            .find(|c| !self.categories.contains_key(*c))
        {
            return Err(FishboneError::MalformedResult(format!(
                "category {} is missing",
                missing.as_str()
            )));
        }

        for (category, causes) in &self.categories {
            for cause in causes {
                let contiguous = cause
                    .whys
                    .iter()
                    .enumerate()
                    .all(|(i, step)| step.depth == i as u32 + 1);
                if !contiguous {
                    return Err(FishboneError::MalformedResult(format!(
                        "why-chain for '{}' in {} is not numbered 1..n",
                        cause.label,
                        category.as_str()
                    )));
                }
            }
        }

        Ok(())
    }

    pub fn causes(&self, category: Category) -> &[Cause] {
        self.categories
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn total_causes(&self) -> usize {
        self.categories.values().map(Vec::len).sum()
    }
}
