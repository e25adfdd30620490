//! Load configuration via `config` crate with env-override support.

use std::{ops::Deref, sync::Arc};

use serde::Deserialize;

use crate::base::prompts;

use super::types::Res;

/// Default Gemini model to use
fn default_gemini_model() -> String {
    "gemini-1.5-flash".to_string()
}

/// Default Gemini API base URL
fn default_gemini_api_base() -> String {
    "https://generativelanguage.googleapis.com/v1beta/models".to_string()
}

/// Default sampling temperature for the Gemini model
fn default_gemini_temperature() -> f32 {
    0.9
}

/// Default nucleus sampling cutoff for the Gemini model
fn default_gemini_top_p() -> f32 {
    0.95
}

/// Default max output tokens for the Gemini model
fn default_gemini_max_output_tokens() -> u32 {
    150
}

/// Default persona directive for the chat prompt.
fn default_persona_directive() -> String {
    prompts::PERSONA_DIRECTIVE.to_string()
}

/// Default phrases that short-circuit to the fixed help reply.
fn default_command_triggers() -> Vec<String> {
    vec!["مساعدة".to_string(), "help".to_string(), "/help".to_string()]
}

/// Default phrases that clear a stored nickname.
fn default_reset_triggers() -> Vec<String> {
    vec!["تغيير الاسم".to_string(), "غير اسمي".to_string(), "change name".to_string(), "reset".to_string()]
}

/// Default port for the webhook server.
fn default_port() -> u16 {
    10000
}

/// Default path for the embedded database files.
fn default_db_path() -> String {
    "data/nour-bot.db".to_string()
}

/// Configuration for the nour-bot application.
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub inner: Arc<ConfigInner>,
}

impl Deref for Config {
    type Target = ConfigInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct ConfigInner {
    /// LINE channel access token used for the reply API (`LINE_CHANNEL_ACCESS_TOKEN`).
    pub line_channel_access_token: String,
    /// LINE channel secret used for webhook signature checks (`LINE_CHANNEL_SECRET`).
    pub line_channel_secret: String,
    /// Gemini API key (`GEMINI_API_KEY`).
    pub gemini_api_key: String,
    /// Gemini model to use (`GEMINI_MODEL`).
    #[serde(default = "default_gemini_model")]
    pub gemini_model: String,
    /// Gemini API base URL (`GEMINI_API_BASE`).
    #[serde(default = "default_gemini_api_base")]
    pub gemini_api_base: String,
    /// Optional custom persona directive to override the default (`PERSONA_DIRECTIVE`).
    #[serde(default = "default_persona_directive")]
    pub persona_directive: String,
    /// Sampling temperature to use for the Gemini model (`GEMINI_TEMPERATURE`).
    /// Value between 0 and 2. Higher values like 0.9 make output more random,
    /// while lower values like 0.2 make it more focused and deterministic.
    #[serde(default = "default_gemini_temperature")]
    pub gemini_temperature: f32,
    /// Nucleus sampling cutoff for the Gemini model (`GEMINI_TOP_P`).
    /// Value between 0 and 1.
    #[serde(default = "default_gemini_top_p")]
    pub gemini_top_p: f32,
    /// Max output tokens for the Gemini model (`GEMINI_MAX_OUTPUT_TOKENS`).
    /// Maximum number of tokens that can be generated in the response.
    #[serde(default = "default_gemini_max_output_tokens")]
    pub gemini_max_output_tokens: u32,
    /// Phrases that short-circuit to the fixed help reply (`COMMAND_TRIGGERS`).
    #[serde(default = "default_command_triggers")]
    pub command_triggers: Vec<String>,
    /// Phrases that clear a stored nickname (`RESET_TRIGGERS`).
    #[serde(default = "default_reset_triggers")]
    pub reset_triggers: Vec<String>,
    /// Port for the webhook server (`PORT`).
    #[serde(default = "default_port")]
    pub port: u16,
    /// Path for the embedded database files (`DB_PATH`).
    #[serde(default = "default_db_path")]
    pub db_path: String,
}

impl Config {
    pub fn load(explicit_path: Option<&std::path::Path>) -> Res<Self> {
        let mut cfg = config::Config::builder().add_source(config::Environment::default().prefix("NOUR_BOT"));

        if let Some(p) = explicit_path {
            cfg = cfg.add_source(config::File::from(p.to_path_buf()));
        } else if std::path::Path::new(".hidden/config.toml").exists() {
            cfg = cfg.add_source(config::File::with_name(".hidden/config.toml"));
        }

        let mut inner: ConfigInner = cfg.build()?.try_deserialize()?;

        // Trigger comparisons run against trimmed, lowercased text, so the configured
        // phrases are normalized the same way up front.
        for phrase in inner.command_triggers.iter_mut().chain(inner.reset_triggers.iter_mut()) {
            *phrase = normalize_trigger(phrase);
        }

        let result = Config { inner: Arc::new(inner) };

        if result.command_triggers.iter().chain(result.reset_triggers.iter()).any(|phrase| phrase.is_empty()) {
            return Err(anyhow::anyhow!("Trigger phrases must not be empty."));
        }

        if result.gemini_temperature < 0.0 || result.gemini_temperature > 2.0 {
            return Err(anyhow::anyhow!("Gemini temperature must be between 0 and 2."));
        }

        if result.gemini_top_p < 0.0 || result.gemini_top_p > 1.0 {
            return Err(anyhow::anyhow!("Gemini top_p must be between 0 and 1."));
        }

        if result.gemini_max_output_tokens < 1 || result.gemini_max_output_tokens > 8192 {
            return Err(anyhow::anyhow!("Gemini max output tokens must be between 1 and 8192."));
        }

        Ok(result)
    }
}

/// Normalize a phrase the same way inbound text is normalized for trigger comparison.
pub fn normalize_trigger(phrase: &str) -> String {
    phrase.trim().to_lowercase()
}

// Tests.
