//! Turns `OutboundEvent`s into signed protocol events.

use nostr::{Event, EventBuilder, EventId, Keys, Kind, PublicKey, Tag};
use secrecy::{ExposeSecret, SecretString};

use crate::error::RelayError;
use crate::relay::event::{OutboundEvent, OutboundKind};

/// Holds the bot identity and signs everything it publishes.
pub struct EventSigner {
    keys: Keys,
}

impl EventSigner {
    /// Parse the identity credential (hex or bech32 secret key).
    pub fn new(credential: &SecretString) -> Result<Self, RelayError> {
        let keys = Keys::parse(credential.expose_secret())
            .map_err(|e| RelayError::InvalidCredential(e.to_string()))?;
        Ok(Self { keys })
    }

    pub fn public_key_hex(&self) -> String {
        self.keys.public_key().to_hex()
    }

    /// Sign an outbound event.
    ///
    /// Replies and reactions reference the source event with `e` and `p` tags.
    pub fn sign(&self, event: &OutboundEvent) -> Result<Event, RelayError> {
        let builder = match event.kind {
            OutboundKind::Post => EventBuilder::new(Kind::TextNote, event.content.clone()),
            OutboundKind::Reply => EventBuilder::new(Kind::TextNote, event.content.clone())
                .tags(source_tags(event)?),
            OutboundKind::Reaction => EventBuilder::new(Kind::Reaction, event.content.clone())
                .tags(source_tags(event)?),
        };

        builder
            .sign_with_keys(&self.keys)
            .map_err(|e| RelayError::Signing(e.to_string()))
    }
}

fn source_tags(event: &OutboundEvent) -> Result<Vec<Tag>, RelayError> {
    let source = event.in_reply_to.as_ref().ok_or_else(|| {
        RelayError::Signing(format!("{} event without a source event", event.kind))
    })?;

    let id = EventId::from_hex(&source.id)
        .map_err(|e| RelayError::Signing(format!("bad source event id: {e}")))?;
    let author = PublicKey::from_hex(&source.pubkey)
        .map_err(|e| RelayError::Signing(format!("bad source author: {e}")))?;

    Ok(vec![Tag::event(id), Tag::public_key(author)])
}
