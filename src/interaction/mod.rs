//! Event handling and user interactions for nour-bot.
//!
//! This module provides functionality for handling LINE webhook events:
//! - Walking new users through nickname onboarding
//! - Relaying chat messages to the coach persona
//! - Coordinating responses between services (LLM, database, chat)

pub mod follow_event;
pub mod message_event;
