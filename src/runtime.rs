//! Runtime services and shared state for the nour-bot.

use tracing::instrument;

use crate::{
    base::{
        config::Config,
        types::{Res, Void},
    },
    service::{chat::ChatClient, db::DbClient, llm::LlmClient},
};

/// Runtime service context that can be shared across the application.
///
/// This struct holds the database client, chat client, LLM client, and
/// configuration. It is designed to be trivially cloneable, allowing it to be
/// passed around without the need for `Arc` or `Mutex`.
#[derive(Clone)]
pub struct Runtime {
    /// The configuration for the application.
    pub config: Config,
    /// The database client instance.
    pub db: DbClient,
    /// The LLM client instance.
    pub llm: LlmClient,
    /// The chat client instance.
    pub chat: ChatClient,
}

impl Runtime {
    /// Create a new runtime instance.
    #[instrument(skip_all)]
    pub async fn new(config: Config) -> Res<Self> {
        // Initialize the database.
        let db = DbClient::surreal(&config).await?;

        // Initialize the LLM client.
        let llm = LlmClient::gemini(&config);

        // Initialize the chat client.
        let chat = ChatClient::line(&config);

        Ok(Self { config, db, llm, chat })
    }

    /// Serve the webhook endpoint until shutdown.
    pub async fn start(&self) -> Void {
        crate::server::serve(self.clone()).await
    }
}
