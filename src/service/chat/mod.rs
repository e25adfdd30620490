pub mod line;

use std::{ops::Deref, sync::Arc};

use async_trait::async_trait;

use crate::base::types::{InboundEvent, Res, Void};

// Traits.

/// Generic "chat" trait that clients must implement.
///
/// This trait defines the core functionality for receiving webhook deliveries
/// from and replying to a chat platform like LINE. Implementing this trait
/// allows different chat services to be used with the bot.
#[async_trait]
pub trait GenericChatClient: Send + Sync + 'static {
    /// Verify that a webhook body was signed by the chat platform.
    fn verify_signature(&self, body: &[u8], signature_header: &str) -> bool;

    /// Decode a webhook body into the events the bot knows how to handle.
    ///
    /// Event kinds outside the bot's scope are silently skipped; only a body
    /// that cannot be decoded at all is an error.
    fn parse_events(&self, body: &[u8]) -> Res<Vec<InboundEvent>>;

    /// Send a text reply for the conversation identified by the reply token.
    async fn reply(&self, reply_token: &str, text: &str) -> Void;
}

// Structs.

/// Chat client for the application.
///
/// It is designed to be trivially cloneable, allowing it to be passed around
/// without the need for `Arc` or `Mutex`.
#[derive(Clone)]
pub struct ChatClient {
    inner: Arc<dyn GenericChatClient>,
}

impl Deref for ChatClient {
    type Target = dyn GenericChatClient;

    fn deref(&self) -> &Self::Target {
        &*self.inner
    }
}

impl ChatClient {
    pub fn new(inner: Arc<dyn GenericChatClient>) -> Self {
        Self { inner }
    }
}
