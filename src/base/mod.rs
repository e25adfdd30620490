//! Core components, types, and utilities for nour-bot.
//!
//! This module contains fundamental building blocks used throughout the application:
//! - Configuration handling and environment variables.
//! - Persona directive and canned replies.
//! - Common types and result handling.

pub mod config;
pub mod prompts;
pub mod types;
