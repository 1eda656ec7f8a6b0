//! Relay abstraction for event I/O.
//!
//! The bot only needs four things from the relay: connect, a stream of
//! inbound events, and a way to publish outbound ones. `NostrRelay` is the
//! websocket implementation; tests plug in recording stubs.

pub mod event;
pub mod websocket;
pub mod signer;

pub use event::{InboundEvent, OutboundEvent, OutboundKind, TEXT_NOTE_KIND};
pub use websocket::NostrRelay;
pub use signer::EventSigner;

use std::pin::Pin;

use async_trait::async_trait;
use futures::Stream;
use serde_json::Value;

use crate::error::RelayError;

/// Stream of inbound events from a subscription.
pub type EventStream = Pin<Box<dyn Stream<Item = InboundEvent> + Send>>;

/// A publish/subscribe relay.
#[async_trait]
pub trait Relay: Send + Sync {
    /// Relay address, for logging.
    fn address(&self) -> &str;

    /// Establish the connection. Suspends until connected or failed.
    async fn connect(&self) -> Result<(), RelayError>;

    /// Start the inbound subscription. May only be called once per connection.
    async fn subscribe(&self) -> Result<EventStream, RelayError>;

    /// Publish an outbound event. Delivery is not confirmed.
    async fn publish(&self, event: OutboundEvent) -> Result<(), RelayError>;
}

/// A frame received from the relay.
#[derive(Debug, Clone, PartialEq)]
pub enum RelayFrame {
    Event {
        subscription: String,
        event: InboundEvent,
    },
    Ok {
        event_id: String,
        accepted: bool,
        message: String,
    },
    Eose(String),
    Closed {
        subscription: String,
        message: String,
    },
    Notice(String),
    Unknown(String),
}

/// Parse a relay text frame (`["EVENT", ...]`, `["OK", ...]`, ...).
pub fn parse_frame(text: &str) -> Result<RelayFrame, RelayError> {
    let value: Value = serde_json::from_str(text)?;
    let Some(parts) = value.as_array() else {
        return Ok(RelayFrame::Unknown(text.to_string()));
    };

    let str_at = |i: usize| parts.get(i).and_then(Value::as_str).unwrap_or_default().to_string();

    let frame = match parts.first().and_then(Value::as_str) {
        Some("EVENT") => {
            let payload = parts.get(2).cloned().unwrap_or(Value::Null);
            RelayFrame::Event {
                subscription: str_at(1),
                event: serde_json::from_value(payload)?,
            }
        }
        Some("OK") => RelayFrame::Ok {
            event_id: str_at(1),
            accepted: parts.get(2).and_then(Value::as_bool).unwrap_or(false),
            message: str_at(3),
        },
        Some("EOSE") => RelayFrame::Eose(str_at(1)),
        Some("CLOSED") => RelayFrame::Closed {
            subscription: str_at(1),
            message: str_at(2),
        },
        Some("NOTICE") => RelayFrame::Notice(str_at(1)),
        _ => RelayFrame::Unknown(text.to_string()),
    };
    Ok(frame)
}
