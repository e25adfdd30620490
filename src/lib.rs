//! Library root for `nour-bot`.
//!
//! Nour-bot is a Gemini-powered life coach for LINE designed to:
//! - Greet new friends and learn the name they want to be called
//! - Hold short, warm coaching conversations in the persona of Nour
//! - Let users rename themselves at any time with a reset phrase
//!
//! The bot integrates with LINE for chat, SurrealDB for storage,
//! and Gemini for intelligent responses. The architecture is built around
//! extensible traits that allow for different implementations of each service.

pub mod base;
pub mod interaction;
pub mod runtime;
pub mod server;
pub mod service;

use base::{config::Config, types::Void};
use tracing::info;

/// Public async entry for the binary crate.
///
/// Sets up necessary services and starts the nour-bot runtime:
/// - Creates the runtime context with database, LLM, and chat clients
/// - Serves the webhook endpoint until shutdown
pub async fn start(config: Config) -> Void {
    info!("Starting nour-bot (model {}, port {}) ...", config.gemini_model, config.port);

    // Initialize the runtime.
    let runtime = runtime::Runtime::new(config).await?;

    // Start the runtime.
    runtime.start().await?;

    Ok(())
}
