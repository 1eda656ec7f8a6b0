//! Websocket relay transport: speaks the relay JSON framing over
//! tokio-tungstenite.
//!
//! No reconnection: when the socket closes the event stream ends and the
//! lifecycle controller decides what to do.

use async_trait::async_trait;
use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use secrecy::SecretString;
use serde_json::json;
use tokio::net::TcpStream;
use tokio::sync::{Mutex, mpsc};
use tokio_stream::wrappers::UnboundedReceiverStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

use crate::error::RelayError;
use crate::relay::event::{OutboundEvent, TEXT_NOTE_KIND};
use crate::relay::signer::EventSigner;
use crate::relay::{EventStream, Relay, RelayFrame, parse_frame};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Relay client over a single websocket connection.
pub struct NostrRelay {
    address: String,
    signer: EventSigner,
    writer: Mutex<Option<SplitSink<WsStream, Message>>>,
    reader: Mutex<Option<SplitStream<WsStream>>>,
}

impl NostrRelay {
    /// Validate the address and credential. Nothing touches the network yet.
    pub fn new(address: &str, credential: &SecretString) -> Result<Self, RelayError> {
        let url = url::Url::parse(address).map_err(|e| RelayError::InvalidAddress {
            address: address.to_string(),
            reason: e.to_string(),
        })?;
        if !matches!(url.scheme(), "ws" | "wss") {
            return Err(RelayError::InvalidAddress {
                address: address.to_string(),
                reason: format!("unsupported scheme '{}'", url.scheme()),
            });
        }

        let signer = EventSigner::new(credential)?;
        tracing::info!(pubkey = %signer.public_key_hex(), "Relay identity loaded");

        Ok(Self {
            address: address.to_string(),
            signer,
            writer: Mutex::new(None),
            reader: Mutex::new(None),
        })
    }

    pub fn public_key_hex(&self) -> String {
        self.signer.public_key_hex()
    }

    /// Text notes mentioning the bot, from `since` onward.
    pub fn subscription_filter(&self, since: i64) -> serde_json::Value {
        json!({
            "kinds": [TEXT_NOTE_KIND],
            "#p": [self.signer.public_key_hex()],
            "since": since,
        })
    }

    async fn send_text(&self, text: String) -> Result<(), RelayError> {
        let mut guard = self.writer.lock().await;
        let writer = guard.as_mut().ok_or(RelayError::NotConnected)?;
        writer
            .send(Message::text(text))
            .await
            .map_err(|e| RelayError::PublishFailed(e.to_string()))
    }
}

#[async_trait]
impl Relay for NostrRelay {
    fn address(&self) -> &str {
        &self.address
    }

    async fn connect(&self) -> Result<(), RelayError> {
        let (ws, _response) =
            connect_async(self.address.as_str())
                .await
                .map_err(|e| RelayError::ConnectFailed {
                    address: self.address.clone(),
                    reason: e.to_string(),
                })?;
        let (writer, reader) = ws.split();
        *self.writer.lock().await = Some(writer);
        *self.reader.lock().await = Some(reader);
        tracing::info!(relay = %self.address, "Relay connected");
        Ok(())
    }

    async fn subscribe(&self) -> Result<EventStream, RelayError> {
        let mut reader = match self.reader.lock().await.take() {
            Some(r) => r,
            None if self.writer.lock().await.is_none() => return Err(RelayError::NotConnected),
            None => return Err(RelayError::AlreadySubscribed),
        };

        let subscription_id = uuid::Uuid::new_v4().simple().to_string();
        let filter = self.subscription_filter(chrono::Utc::now().timestamp());
        self.send_text(json!(["REQ", subscription_id, filter]).to_string())
            .await?;
        tracing::info!(subscription = %subscription_id, "Subscribed to mentions");

        let own_pubkey = self.signer.public_key_hex();
        let (tx, rx) = mpsc::unbounded_channel();

        tokio::spawn(async move {
            while let Some(frame) = reader.next().await {
                let text = match frame {
                    Ok(Message::Text(text)) => text,
                    Ok(Message::Close(close)) => {
                        tracing::info!(?close, "Relay closed the connection");
                        break;
                    }
                    Ok(_) => continue,
                    Err(e) => {
                        tracing::error!("Relay read error: {e}");
                        break;
                    }
                };

                match parse_frame(text.as_str()) {
                    Ok(RelayFrame::Event { event, .. }) => {
                        if event.pubkey == own_pubkey {
                            continue;
                        }
                        if tx.send(event).is_err() {
                            tracing::info!("Relay listener channel closed");
                            break;
                        }
                    }
                    Ok(RelayFrame::Ok {
                        event_id,
                        accepted: false,
                        message,
                    }) => {
                        tracing::warn!(event_id = %event_id, "Relay rejected event: {message}");
                    }
                    Ok(RelayFrame::Notice(message)) => {
                        tracing::warn!("Relay notice: {message}");
                    }
                    Ok(RelayFrame::Closed {
                        subscription,
                        message,
                    }) => {
                        tracing::warn!(subscription = %subscription, "Subscription closed: {message}");
                        break;
                    }
                    Ok(other) => tracing::trace!(?other, "Relay frame"),
                    Err(e) => tracing::debug!("Unparsable relay frame: {e}"),
                }
            }
        });

        Ok(Box::pin(UnboundedReceiverStream::new(rx)))
    }

    async fn publish(&self, event: OutboundEvent) -> Result<(), RelayError> {
        let signed = self.signer.sign(&event)?;
        let id = signed.id.to_hex();
        self.send_text(json!(["EVENT", signed]).to_string()).await?;
        tracing::debug!(event_id = %id, kind = %event.kind, "Published event");
        Ok(())
    }
}
