//! Inference providers.
//!
//! The pipeline only depends on [`InferenceProvider`]: given a prompt, return
//! completion text or fail. [`OpenAiProvider`] talks to a chat-completions
//! endpoint over HTTP; [`ScriptedProvider`] answers from canned replies.

mod openai;
mod scripted;

pub use openai::OpenAiProvider;
pub use scripted::{Reply, ScriptedProvider};

use async_trait::async_trait;
use thiserror::Error;

/// Provider errors.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unauthorized: API key missing or invalid")]
    Unauthorized,

    #[error("Rate limited or quota exceeded: {0}")]
    RateLimited(String),

    #[error("Server error: {0}")]
    Server(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Provider unavailable: {0}")]
    Unavailable(String),
}

/// A single prompt: system instructions plus the user message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub system: String,
    pub user: String,
    pub max_tokens: u32,
}

/// Capability interface for text completion.
#[async_trait]
pub trait InferenceProvider: Send + Sync {
    async fn complete(&self, prompt: &Prompt) -> Result<String, ProviderError>;

    /// Model identifier recorded in result metadata.
    fn model(&self) -> &str;
}
