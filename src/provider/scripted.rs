//! Deterministic provider that answers from canned replies.
//!
//! Replies are chosen by the first registered needle found in the user
//! message, falling back to a default. Every prompt is recorded so callers
//! can assert on how many calls were made and in what order.

use std::sync::Mutex;

use async_trait::async_trait;

use super::{InferenceProvider, Prompt, ProviderError};

/// A canned answer.
#[derive(Debug, Clone)]
pub enum Reply {
    Text(String),
    Fail(String),
}

impl Reply {
    pub fn text(s: impl Into<String>) -> Self {
        Self::Text(s.into())
    }

    pub fn fail(s: impl Into<String>) -> Self {
        Self::Fail(s.into())
    }
}

#[derive(Debug)]
pub struct ScriptedProvider {
    rules: Vec<(String, Reply)>,
    fallback: Reply,
    calls: Mutex<Vec<Prompt>>,
}

impl ScriptedProvider {
    pub fn new(fallback: Reply) -> Self {
        Self {
            rules: Vec::new(),
            fallback,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Answer with `reply` whenever the user message contains `needle`.
    /// Earlier rules take precedence.
    pub fn on(mut self, needle: impl Into<String>, reply: Reply) -> Self {
        self.rules.push((needle.into(), reply));
        self
    }

    pub fn calls(&self) -> Vec<Prompt> {
        self.calls.lock().expect("call log lock poisoned").clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().expect("call log lock poisoned").len()
    }
}

#[async_trait]
impl InferenceProvider for ScriptedProvider {
    async fn complete(&self, prompt: &Prompt) -> Result<String, ProviderError> {
        self.calls
            .lock()
            .expect("call log lock poisoned")
            .push(prompt.clone());

        let reply = self
            .rules
            .iter()
            .find(|(needle, _)| prompt.user.contains(needle.as_str()))
            .map(|(_, reply)| reply)
            .unwrap_or(&self.fallback);

        match reply {
            Reply::Text(text) => Ok(text.clone()),
            Reply::Fail(msg) => Err(ProviderError::Unavailable(msg.clone())),
        }
    }

    fn model(&self) -> &str {
        "scripted"
    }
}
