//! Startup configuration.
//!
//! Values come from the process environment, optionally seeded from a `.env`
//! file:
//! - `OPENAI_API_KEY` - API key for the inference provider (required)
//! - `OPENAI_BASE_URL` - Chat-completions base URL (default: `https://api.openai.com/v1`)
//! - `FISHBONE_MODEL` - Model name (default: `gpt-4o-mini`)
//! - `FISHBONE_OUTPUT_DIR` - Directory for saved analyses (default: current directory)
//! - `FISHBONE_MAX_CAUSES` / `FISHBONE_MAX_DEPTH` - Pipeline limits

use std::path::PathBuf;
use std::time::Duration;

use crate::error::FishboneError;

const APP_NAME: &str = "fishbone";
const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Settings for the hosted inference provider.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub timeout: Duration,
}

impl ProviderConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.0,
            timeout: Duration::from_secs(30),
        }
    }
}

/// Limits and policies for one analysis run.
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    /// Maximum causes kept per category.
    pub max_causes: usize,
    /// Maximum why-chain length per cause.
    pub max_depth: usize,
    /// Answers that mean "no further cause", compared case-insensitively.
    pub stop_phrases: Vec<String>,
    pub identify_max_tokens: u32,
    pub why_max_tokens: u32,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            max_causes: 3,
            max_depth: 5,
            stop_phrases: [
                "none",
                "unknown",
                "n/a",
                "na",
                "no further cause",
                "no deeper cause",
                "not applicable",
                "nothing",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            identify_max_tokens: 800,
            why_max_tokens: 200,
        }
    }
}

/// Complete application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub provider: ProviderConfig,
    pub analysis: AnalysisConfig,
    pub output_dir: PathBuf,
}

impl Config {
    /// Load `.env` files and read configuration from the process environment.
    pub fn load() -> Result<Self, FishboneError> {
        load_dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, FishboneError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup("OPENAI_API_KEY")
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .ok_or_else(|| {
                FishboneError::Configuration(
                    "OPENAI_API_KEY is not set (add it to your environment or .env file)"
                        .to_string(),
                )
            })?;

        let mut provider = ProviderConfig::new(api_key);
        if let Some(url) = lookup("OPENAI_BASE_URL").filter(|u| !u.trim().is_empty()) {
            provider.base_url = url.trim().trim_end_matches('/').to_string();
        }
        if let Some(model) = lookup("FISHBONE_MODEL").filter(|m| !m.trim().is_empty()) {
            provider.model = model.trim().to_string();
        }

        let mut analysis = AnalysisConfig::default();
        if let Some(v) = lookup("FISHBONE_MAX_CAUSES") {
            analysis.max_causes = parse_limit("FISHBONE_MAX_CAUSES", &v)?;
        }
        if let Some(v) = lookup("FISHBONE_MAX_DEPTH") {
            analysis.max_depth = parse_limit("FISHBONE_MAX_DEPTH", &v)?;
        }

        let output_dir = lookup("FISHBONE_OUTPUT_DIR")
            .filter(|d| !d.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));

        Ok(Self {
            provider,
            analysis,
            output_dir,
        })
    }
}

fn parse_limit(key: &str, value: &str) -> Result<usize, FishboneError> {
    value.trim().parse().map_err(|_| {
        FishboneError::Configuration(format!(
            "{} must be a non-negative integer, got '{}'",
            key, value
        ))
    })
}

/// Load `./.env`, then the user-level `.env` under the config directory.
///
/// Missing files are ignored; variables already set are never overridden.
fn load_dotenv() {
    let _ = dotenvy::from_path(".env");
    if let Some(mut path) = dirs::config_dir() {
        path.push(APP_NAME);
        path.push(".env");
        let _ = dotenvy::from_path(path);
    }
}
