//! HTTP surface for the LINE webhook.
//!
//! This module provides the axum application:
//! - `GET /` responds with a plain health string
//! - `POST /callback` verifies, decodes, and dispatches webhook deliveries
//!
//! Events are handled inline and in order, so the platform sees the final
//! status of the whole batch.

use axum::{
    Router,
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::{get, post},
};
use tokio::net::TcpListener;
use tracing::{error, info, instrument, warn};

use crate::{
    base::types::{InboundEvent, Void},
    interaction::{follow_event::handle_follow_event, message_event::handle_message_event},
    runtime::Runtime,
};

// Statics.

const SIGNATURE_HEADER: &str = "x-line-signature";
const HEALTH_BODY: &str = "nour-bot is running";

// Functions.

/// Builds the application router.
pub fn router(runtime: Runtime) -> Router {
    Router::new().route("/", get(health)).route("/callback", post(callback)).with_state(runtime)
}

/// Binds the configured port and serves the webhook until shutdown.
#[instrument(skip_all)]
pub async fn serve(runtime: Runtime) -> Void {
    let addr = format!("0.0.0.0:{}", runtime.config.port);
    let app = router(runtime);

    let listener = TcpListener::bind(&addr).await?;
    info!("Listening on {addr} ...");

    axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await?;

    Ok(())
}

// Handlers.

async fn health() -> &'static str {
    HEALTH_BODY
}

/// Receives a webhook delivery from the LINE platform.
#[instrument(skip_all)]
async fn callback(State(runtime): State<Runtime>, headers: HeaderMap, body: Bytes) -> (StatusCode, &'static str) {
    // Reject deliveries that do not carry a valid signature before anything else.

    let signature = headers.get(SIGNATURE_HEADER).and_then(|value| value.to_str().ok()).unwrap_or_default();

    if !runtime.chat.verify_signature(&body, signature) {
        warn!("Rejected a webhook delivery with a bad signature.");
        return (StatusCode::BAD_REQUEST, "Invalid signature.");
    }

    // Decode the delivery into events.

    let events = match runtime.chat.parse_events(&body) {
        Ok(events) => events,
        Err(err) => {
            error!("Failed to decode the webhook body: {err}");
            return (StatusCode::INTERNAL_SERVER_ERROR, "Error");
        }
    };

    // Handle the events in order; a failure abandons the rest of the batch.

    for event in events {
        match event {
            InboundEvent::Message(event) => {
                if let Err(err) = handle_message_event(&runtime, event).await {
                    error!("Error while handling a message event: {err}");
                    return (StatusCode::INTERNAL_SERVER_ERROR, "Error");
                }
            }
            InboundEvent::Follow(event) => handle_follow_event(&runtime, event).await,
        }
    }

    (StatusCode::OK, "OK")
}

/// Resolves when the process receives a shutdown signal (SIGINT or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c().await.expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let sigterm = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };
    #[cfg(not(unix))]
    let sigterm = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c  => {}
        _ = sigterm => {}
    }
}
