//! This module handles follow events from users adding the bot as a friend.

use tracing::{instrument, warn};

use crate::{
    base::{prompts, types::FollowEvent},
    runtime::Runtime,
};

/// Handles a follow event by welcoming the new friend.
///
/// No user record is created here: onboarding starts with the first message.
/// A failed welcome is logged and dropped so the rest of the batch proceeds.
#[instrument(skip_all)]
pub async fn handle_follow_event(runtime: &Runtime, event: FollowEvent) {
    if let Err(err) = runtime.chat.reply(&event.reply_token, prompts::FOLLOW_WELCOME).await {
        warn!("Failed to send the follow welcome: {err}");
    }
}
