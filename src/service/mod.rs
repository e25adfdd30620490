//! Service integrations for external APIs and clients.
//!
//! This module contains implementations for various services used by the nour-bot:
//! - Chat services (e.g., LINE)
//! - Database services (e.g., SurrealDB)
//! - LLM services (e.g., Gemini)
//!
//! Each service module defines both generic traits and concrete implementations,
//! allowing for extensibility and easy testing.

pub mod chat;
pub mod db;
pub mod llm;
