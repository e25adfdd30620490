use tracing::instrument;

use crate::{
    base::{
        config::normalize_trigger,
        prompts,
        types::{ChatState, MessageEvent, Void},
    },
    runtime::Runtime,
};

/// Handles a single text message event.
///
/// Dispatch order matters: command triggers are answered before the store is
/// touched, and a nickname capture wins over a reset phrase.
#[instrument(skip_all)]
pub async fn handle_message_event(runtime: &Runtime, event: MessageEvent) -> Void {
    let normalized = normalize_trigger(&event.text);

    // Answer command triggers without any store access.
    if runtime.config.command_triggers.contains(&normalized) {
        return runtime.chat.reply(&event.reply_token, prompts::COMMAND_ACK).await;
    }

    // Derive the conversation state from the user's record.

    let record = runtime.db.get_user(&event.user_id).await?;
    let state = ChatState::from_record(record);

    match state {
        ChatState::NewUser => {
            runtime.db.upsert_user(&event.user_id, None).await?;
            runtime.chat.reply(&event.reply_token, prompts::GREETING).await
        }
        ChatState::AwaitingNickname => {
            // The raw message text becomes the nickname, untouched.
            runtime.db.upsert_user(&event.user_id, Some(&event.text)).await?;
            runtime.chat.reply(&event.reply_token, &prompts::nickname_confirmation(&event.text)).await
        }
        ChatState::ActiveChat { nickname } => {
            if runtime.config.reset_triggers.contains(&normalized) {
                runtime.db.upsert_user(&event.user_id, None).await?;
                return runtime.chat.reply(&event.reply_token, prompts::RESET_PROMPT).await;
            }

            let reply = runtime.llm.generate_coach_reply(&runtime.config, &nickname, &event.text).await;
            runtime.chat.reply(&event.reply_token, &reply).await
        }
    }
}
