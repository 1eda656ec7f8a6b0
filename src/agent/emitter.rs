//! Outbound event emission.
//!
//! Fire-and-forget: publish failures are logged and never reach the caller.

use std::sync::Arc;

use crate::relay::{InboundEvent, OutboundEvent, Relay};

#[derive(Clone)]
pub struct Emitter {
    relay: Arc<dyn Relay>,
}

impl Emitter {
    pub fn new(relay: Arc<dyn Relay>) -> Self {
        Self { relay }
    }

    /// Standalone post.
    pub async fn post(&self, content: impl Into<String>) {
        self.emit(OutboundEvent::post(content)).await;
    }

    /// Reply referencing `source` and its author.
    pub async fn reply(&self, content: impl Into<String>, source: &InboundEvent) {
        self.emit(OutboundEvent::reply(content, source)).await;
    }

    /// Reaction to `source`.
    pub async fn react(&self, content: impl Into<String>, source: &InboundEvent) {
        self.emit(OutboundEvent::reaction(content, source)).await;
    }

    async fn emit(&self, event: OutboundEvent) {
        let kind = event.kind;
        if let Err(e) = self.relay.publish(event).await {
            tracing::warn!(relay = %self.relay.address(), %kind, "Failed to publish event: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::error::RelayError;
    use crate::relay::{EventStream, OutboundKind};

    #[derive(Default)]
    struct FlakyRelay {
        attempts: Mutex<Vec<OutboundKind>>,
    }

    #[async_trait]
    impl Relay for FlakyRelay {
        fn address(&self) -> &str {
            "test://flaky"
        }

        async fn connect(&self) -> Result<(), RelayError> {
            Ok(())
        }

        async fn subscribe(&self) -> Result<EventStream, RelayError> {
            Err(RelayError::NotConnected)
        }

        async fn publish(&self, event: OutboundEvent) -> Result<(), RelayError> {
            self.attempts.lock().unwrap().push(event.kind);
            Err(RelayError::PublishFailed("socket gone".into()))
        }
    }

    #[tokio::test]
    async fn publish_failures_are_swallowed() {
        let relay = Arc::new(FlakyRelay::default());
        let emitter = Emitter::new(relay.clone());
        let source = InboundEvent::text_note("e1", "p1", "hi");

        emitter.post("a").await;
        emitter.reply("b", &source).await;
        emitter.react("+", &source).await;

        assert_eq!(
            *relay.attempts.lock().unwrap(),
            vec![OutboundKind::Post, OutboundKind::Reply, OutboundKind::Reaction]
        );
    }
}
