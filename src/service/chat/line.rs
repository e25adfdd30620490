//! Chat service integration for the LINE Messaging API.
//!
//! This module provides functionality for interacting with LINE:
//! - Verifying webhook signatures (HMAC-SHA256 over the raw body, base64-encoded)
//! - Decoding webhook event batches
//! - Sending replies through the reply-token API

use std::sync::Arc;

use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use hmac::{Hmac, Mac};
use reqwest::Client as HttpClient;
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use tracing::{debug, instrument};

use crate::base::{
    config::Config,
    types::{FollowEvent, InboundEvent, MessageEvent, Res, Void},
};

use super::{ChatClient, GenericChatClient};

// Type aliases.

type HmacSha256 = Hmac<Sha256>;

// Statics.

const LINE_REPLY_URL: &str = "https://api.line.me/v2/bot/message/reply";

// Extra methods on `ChatClient` applied by the line implementation.

impl ChatClient {
    /// Creates a new LINE chat client.
    pub fn line(config: &Config) -> Self {
        let client = LineChatClient::new(config);

        Self::new(Arc::new(client))
    }
}

// Wire format.

/// Webhook body sent by the LINE platform.
#[derive(Debug, Deserialize)]
struct WebhookBody {
    #[serde(default)]
    events: Vec<WebhookEvent>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WebhookEvent {
    #[serde(rename = "type")]
    event_type: String,
    reply_token: Option<String>,
    source: Option<EventSource>,
    message: Option<EventMessage>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EventSource {
    user_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct EventMessage {
    #[serde(rename = "type")]
    message_type: String,
    text: Option<String>,
}

/// Reply request sent to the LINE messaging API.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ReplyRequest<'a> {
    reply_token: &'a str,
    messages: Vec<ReplyMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ReplyMessage<'a> {
    #[serde(rename = "type")]
    message_type: &'a str,
    text: &'a str,
}

// Structs.

/// LINE client implementation.
#[derive(Clone)]
pub struct LineChatClient {
    channel_secret: String,
    access_token: String,
    reply_url: String,
    client: HttpClient,
}

impl LineChatClient {
    /// Create a new LINE chat client.
    #[instrument(name = "LineChatClient::new", skip_all)]
    pub fn new(config: &Config) -> Self {
        Self {
            channel_secret: config.line_channel_secret.clone(),
            access_token: config.line_channel_access_token.clone(),
            reply_url: LINE_REPLY_URL.to_string(),
            client: HttpClient::new(),
        }
    }
}

#[async_trait]
impl GenericChatClient for LineChatClient {
    /// LINE sends `x-line-signature: <base64>`, the HMAC-SHA256 of the raw
    /// request body keyed with the channel secret. Comparison is constant-time.
    fn verify_signature(&self, body: &[u8], signature_header: &str) -> bool {
        let Ok(expected) = BASE64.decode(signature_header) else {
            return false;
        };

        let Ok(mut mac) = HmacSha256::new_from_slice(self.channel_secret.as_bytes()) else {
            return false;
        };

        mac.update(body);
        mac.verify_slice(&expected).is_ok()
    }

    fn parse_events(&self, body: &[u8]) -> Res<Vec<InboundEvent>> {
        let body: WebhookBody = serde_json::from_slice(body)?;

        Ok(body.events.into_iter().filter_map(decode_event).collect())
    }

    #[instrument(skip(self))]
    async fn reply(&self, reply_token: &str, text: &str) -> Void {
        let request = ReplyRequest {
            reply_token,
            messages: vec![ReplyMessage { message_type: "text", text }],
        };

        let response = self.client.post(&self.reply_url).bearer_auth(&self.access_token).json(&request).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!("LINE reply API {status}: {body_text}"));
        }

        Ok(())
    }
}

/// Decode a single platform event, skipping the kinds the bot does not handle.
fn decode_event(event: WebhookEvent) -> Option<InboundEvent> {
    match event.event_type.as_str() {
        "message" => {
            let message = event.message?;
            if message.message_type != "text" {
                debug!("Skipping a non-text message event.");
                return None;
            }

            Some(InboundEvent::Message(MessageEvent {
                user_id: event.source?.user_id?,
                reply_token: event.reply_token?,
                text: message.text?,
            }))
        }
        "follow" => Some(InboundEvent::Follow(FollowEvent { reply_token: event.reply_token? })),
        other => {
            debug!("Skipping an unhandled event kind: {other}.");
            None
        }
    }
}

// Tests.

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_client(reply_url: String) -> LineChatClient {
        LineChatClient {
            channel_secret: "test_secret".to_string(),
            access_token: "test_token".to_string(),
            reply_url,
            client: HttpClient::new(),
        }
    }

    fn compute_sig(secret: &str, body: &[u8]) -> String {
        let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).unwrap();
        mac.update(body);
        BASE64.encode(mac.finalize().into_bytes())
    }

    #[test]
    fn valid_signature_passes() {
        let client = create_test_client(String::new());
        let sig = compute_sig("test_secret", b"hello world");

        assert!(client.verify_signature(b"hello world", &sig));
    }

    #[test]
    fn wrong_secret_fails() {
        let client = create_test_client(String::new());
        let sig = compute_sig("other_secret", b"body");

        assert!(!client.verify_signature(b"body", &sig));
    }

    #[test]
    fn tampered_body_fails() {
        let client = create_test_client(String::new());
        let sig = compute_sig("test_secret", b"original body");

        assert!(!client.verify_signature(b"tampered body", &sig));
    }

    #[test]
    fn invalid_base64_fails() {
        let client = create_test_client(String::new());

        assert!(!client.verify_signature(b"body", "not-valid-base64!"));
    }

    #[test]
    fn empty_body_with_valid_sig_passes() {
        let client = create_test_client(String::new());
        let sig = compute_sig("test_secret", b"");

        assert!(client.verify_signature(b"", &sig));
    }

    #[test]
    fn parse_events_decodes_text_messages() {
        let client = create_test_client(String::new());
        let body = r#"{
            "destination": "U0000",
            "events": [{
                "type": "message",
                "replyToken": "token-1",
                "source": {"type": "user", "userId": "U1"},
                "message": {"id": "1", "type": "text", "text": "مرحبا"}
            }]
        }"#;

        let events = client.parse_events(body.as_bytes()).unwrap();

        assert_eq!(
            events,
            vec![InboundEvent::Message(MessageEvent {
                user_id: "U1".to_string(),
                reply_token: "token-1".to_string(),
                text: "مرحبا".to_string(),
            })]
        );
    }

    #[test]
    fn parse_events_decodes_follow_events() {
        let client = create_test_client(String::new());
        let body = r#"{"events": [{"type": "follow", "replyToken": "token-2", "source": {"type": "user", "userId": "U1"}}]}"#;

        let events = client.parse_events(body.as_bytes()).unwrap();

        assert_eq!(events, vec![InboundEvent::Follow(FollowEvent { reply_token: "token-2".to_string() })]);
    }

    #[test]
    fn parse_events_skips_unhandled_kinds() {
        let client = create_test_client(String::new());
        let body = r#"{"events": [
            {"type": "message", "replyToken": "t1", "source": {"userId": "U1"}, "message": {"id": "1", "type": "sticker"}},
            {"type": "unfollow", "source": {"userId": "U1"}},
            {"type": "message", "replyToken": "t2", "source": {"userId": "U2"}, "message": {"id": "2", "type": "text", "text": "hi"}}
        ]}"#;

        let events = client.parse_events(body.as_bytes()).unwrap();

        assert_eq!(events.len(), 1);
        assert_eq!(
            events[0],
            InboundEvent::Message(MessageEvent {
                user_id: "U2".to_string(),
                reply_token: "t2".to_string(),
                text: "hi".to_string(),
            })
        );
    }

    #[test]
    fn parse_events_rejects_malformed_bodies() {
        let client = create_test_client(String::new());

        assert!(client.parse_events(b"not json").is_err());
    }

    #[tokio::test]
    async fn reply_posts_bearer_token_and_payload() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/")
            .match_header("authorization", "Bearer test_token")
            .match_body(mockito::Matcher::Json(serde_json::json!({
                "replyToken": "token-1",
                "messages": [{"type": "text", "text": "أهلاً"}],
            })))
            .with_status(200)
            .with_body("{}")
            .create_async()
            .await;

        let client = create_test_client(server.url());
        client.reply("token-1", "أهلاً").await.unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn reply_surfaces_api_errors() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/")
            .with_status(401)
            .with_body(r#"{"message":"Invalid reply token"}"#)
            .create_async()
            .await;

        let client = create_test_client(server.url());
        let err = client.reply("token-1", "أهلاً").await.unwrap_err();

        assert!(err.to_string().contains("401"));
    }
}
