//! Yaruo: a persona chat bot for a Nostr relay.

pub mod agent;
pub mod config;
pub mod error;
pub mod llm;
pub mod news;
pub mod relay;
