//! Inbound and outbound event shapes exchanged with the relay.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Event kind of a plain text note.
pub const TEXT_NOTE_KIND: u16 = 1;

/// An event received from the relay.
///
/// Read-only to the bot; only `id`, `pubkey`, `kind` and `content` are
/// consulted, the rest is carried so replies can be traced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InboundEvent {
    pub id: String,
    pub pubkey: String,
    #[serde(default)]
    pub created_at: i64,
    pub kind: u16,
    #[serde(default)]
    pub tags: Vec<Vec<String>>,
    pub content: String,
    #[serde(default)]
    pub sig: String,
}

impl InboundEvent {
    /// Build a text note event (mostly useful for tests and local tooling).
    pub fn text_note(id: &str, pubkey: &str, content: &str) -> Self {
        Self {
            id: id.to_string(),
            pubkey: pubkey.to_string(),
            created_at: chrono::Utc::now().timestamp(),
            kind: TEXT_NOTE_KIND,
            tags: Vec::new(),
            content: content.to_string(),
            sig: String::new(),
        }
    }

    pub fn is_text_note(&self) -> bool {
        self.kind == TEXT_NOTE_KIND
    }
}

/// What an outbound event is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutboundKind {
    /// Unsolicited note.
    Post,
    /// Note answering a specific inbound event.
    Reply,
    /// Reaction attached to a specific inbound event.
    Reaction,
}

impl fmt::Display for OutboundKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutboundKind::Post => write!(f, "post"),
            OutboundKind::Reply => write!(f, "reply"),
            OutboundKind::Reaction => write!(f, "reaction"),
        }
    }
}

/// An event the bot wants published. Not retained once handed to the relay.
#[derive(Debug, Clone, PartialEq)]
pub struct OutboundEvent {
    pub kind: OutboundKind,
    pub content: String,
    pub in_reply_to: Option<InboundEvent>,
}

impl OutboundEvent {
    pub fn post(content: impl Into<String>) -> Self {
        Self {
            kind: OutboundKind::Post,
            content: content.into(),
            in_reply_to: None,
        }
    }

    pub fn reply(content: impl Into<String>, source: &InboundEvent) -> Self {
        Self {
            kind: OutboundKind::Reply,
            content: content.into(),
            in_reply_to: Some(source.clone()),
        }
    }

    pub fn reaction(content: impl Into<String>, source: &InboundEvent) -> Self {
        Self {
            kind: OutboundKind::Reaction,
            content: content.into(),
            in_reply_to: Some(source.clone()),
        }
    }
}
