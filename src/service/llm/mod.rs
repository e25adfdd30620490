pub mod gemini;

use std::{ops::Deref, sync::Arc};

use async_trait::async_trait;
use tracing::warn;

use crate::base::{config::Config, prompts, types::Res};

// Traits.

/// Generic LLM client trait that clients must implement.
///
/// This trait defines the core functionality for interacting with large language models.
/// Implementing this trait allows different LLM providers to be used with the bot.
#[async_trait]
pub trait GenericLlmClient: Send + Sync + 'static {
    /// Generate a completion for a fully composed prompt.
    async fn generate(&self, prompt: &str) -> Res<String>;
}

// Structs.

/// LLM client for the application.
///
/// This is trivially cloneable and can be passed around without the need for `Arc` or `Mutex`.
#[derive(Clone)]
pub struct LlmClient {
    inner: Arc<dyn GenericLlmClient>,
}

impl Deref for LlmClient {
    type Target = dyn GenericLlmClient;

    fn deref(&self) -> &Self::Target {
        &*self.inner
    }
}

impl LlmClient {
    pub fn new(inner: Arc<dyn GenericLlmClient>) -> Self {
        Self { inner }
    }

    /// Generate a coaching reply for a message from a named user.
    ///
    /// Failures never propagate: a model error or an empty completion is
    /// logged and replaced with the canned apology, so the caller always
    /// gets a non-empty reply to send.
    pub async fn generate_coach_reply(&self, config: &Config, nickname: &str, text: &str) -> String {
        let prompt = prompts::coach_prompt(config, nickname, text);

        match self.generate(&prompt).await {
            Ok(reply) if !reply.trim().is_empty() => reply.trim().to_string(),
            Ok(_) => {
                warn!("LLM returned an empty completion, falling back.");
                prompts::FALLBACK_REPLY.to_string()
            }
            Err(err) => {
                warn!("LLM call failed, falling back: {err}");
                prompts::FALLBACK_REPLY.to_string()
            }
        }
    }
}
