//! Gemini REST integration for generating chat replies.
//!
//! Calls the `generateContent` endpoint with a single user turn and the
//! configured generation settings. There is deliberately no retry and no
//! timeout here; a failure surfaces to the caller, which substitutes the
//! canned fallback reply.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use serde_json::{Value, json};
use tracing::instrument;

use crate::base::{config::Config, types::Res};

use super::{GenericLlmClient, LlmClient};

// Extra methods on `LlmClient` applied by the gemini implementation.

impl LlmClient {
    pub fn gemini(config: &Config) -> Self {
        let client = GeminiLlmClient::new(config);

        Self::new(Arc::new(client))
    }
}

// Structs.

/// Gemini LLM client implementation.
#[derive(Clone)]
pub struct GeminiLlmClient {
    client: HttpClient,
    config: Config,
}

impl GeminiLlmClient {
    /// Create a new Gemini LLM client.
    #[instrument(name = "GeminiLlmClient::new", skip_all)]
    pub fn new(config: &Config) -> Self {
        Self {
            client: HttpClient::new(),
            config: config.clone(),
        }
    }

    /// Endpoint URL: `{base}/{model}:generateContent?key={api_key}`.
    fn request_url(&self) -> String {
        format!(
            "{}/{}:generateContent?key={}",
            self.config.gemini_api_base.trim_end_matches('/'),
            self.config.gemini_model,
            self.config.gemini_api_key
        )
    }

    /// Build the request body (roles: "user" | "model").
    fn request_body(&self, prompt: &str) -> Value {
        json!({
            "contents": [{
                "role": "user",
                "parts": [{"text": prompt}],
            }],
            "generationConfig": {
                "temperature": self.config.gemini_temperature,
                "topP": self.config.gemini_top_p,
                "maxOutputTokens": self.config.gemini_max_output_tokens,
            },
        })
    }
}

#[async_trait]
impl GenericLlmClient for GeminiLlmClient {
    #[instrument(name = "GeminiLlmClient::generate", skip_all)]
    async fn generate(&self, prompt: &str) -> Res<String> {
        let response = self
            .client
            .post(self.request_url())
            .header("content-type", "application/json")
            .json(&self.request_body(prompt))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!("Gemini API {status}: {body_text}"));
        }

        let body: Value = response.json().await?;

        if let Some(message) = body["error"]["message"].as_str() {
            return Err(anyhow::anyhow!("Gemini error: {message}"));
        }

        extract_candidate_text(&body).ok_or_else(|| anyhow::anyhow!("Gemini response contained no candidate text."))
    }
}

/// Extract text from all parts of the first candidate.
fn extract_candidate_text(body: &Value) -> Option<String> {
    let parts = body["candidates"][0]["content"]["parts"].as_array()?;

    let text = parts.iter().filter_map(|part| part["text"].as_str()).collect::<String>();

    if text.is_empty() { None } else { Some(text) }
}

// Tests.

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::config::ConfigInner;

    fn create_test_config(api_base: String) -> Config {
        Config {
            inner: Arc::new(ConfigInner {
                gemini_api_key: "test_key".to_string(),
                gemini_model: "gemini-1.5-flash".to_string(),
                gemini_api_base: api_base,
                gemini_temperature: 0.9,
                gemini_top_p: 0.95,
                gemini_max_output_tokens: 150,
                ..Default::default()
            }),
        }
    }

    #[tokio::test]
    async fn generate_returns_candidate_text() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/gemini-1.5-flash:generateContent?key=test_key")
            .match_body(mockito::Matcher::PartialJson(serde_json::json!({
                "contents": [{"role": "user", "parts": [{"text": "prompt"}]}],
                "generationConfig": {"maxOutputTokens": 150},
            })))
            .with_status(200)
            .with_body(r#"{"candidates":[{"content":{"role":"model","parts":[{"text":"أهلاً"},{"text":" بك"}]}}]}"#)
            .create_async()
            .await;

        let client = LlmClient::gemini(&create_test_config(server.url()));
        let reply = client.generate("prompt").await.unwrap();

        assert_eq!(reply, "أهلاً بك");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn generate_surfaces_http_errors() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/gemini-1.5-flash:generateContent?key=test_key")
            .with_status(429)
            .with_body(r#"{"error":{"code":429,"message":"quota exceeded"}}"#)
            .create_async()
            .await;

        let client = LlmClient::gemini(&create_test_config(server.url()));
        let err = client.generate("prompt").await.unwrap_err();

        assert!(err.to_string().contains("429"));
    }

    #[tokio::test]
    async fn generate_surfaces_error_payloads() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/gemini-1.5-flash:generateContent?key=test_key")
            .with_status(200)
            .with_body(r#"{"error":{"message":"model overloaded"}}"#)
            .create_async()
            .await;

        let client = LlmClient::gemini(&create_test_config(server.url()));
        let err = client.generate("prompt").await.unwrap_err();

        assert!(err.to_string().contains("model overloaded"));
    }

    #[tokio::test]
    async fn generate_rejects_empty_candidates() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/gemini-1.5-flash:generateContent?key=test_key")
            .with_status(200)
            .with_body(r#"{"candidates":[{"content":{"role":"model","parts":[]}}]}"#)
            .create_async()
            .await;

        let client = LlmClient::gemini(&create_test_config(server.url()));

        assert!(client.generate("prompt").await.is_err());
    }

    #[test]
    fn extract_candidate_text_ignores_non_text_parts() {
        let body = serde_json::json!({
            "candidates": [{"content": {"parts": [{"inline_data": {"data": "abc"}}, {"text": "مرحبا"}]}}]
        });

        assert_eq!(extract_candidate_text(&body), Some("مرحبا".to_string()));
    }
}
