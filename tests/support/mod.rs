//! In-process stand-ins for the relay, model, news source and extractor.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio_stream::wrappers::UnboundedReceiverStream;

use yaruo_bot::agent::{Bot, BotDeps, CommandRouter};
use yaruo_bot::error::{FetchError, LlmError, NewsError, RelayError};
use yaruo_bot::llm::{CompletionRequest, CompletionResponse, LlmProvider};
use yaruo_bot::news::{
    ContentExtractor, DedupLedger, MemoryLedger, NewsItem, NewsPipeline, NewsSelector, NewsSource,
    Summarizer,
};
use yaruo_bot::relay::{EventStream, InboundEvent, OutboundEvent, Relay};

pub const SYSTEM_PROMPT: &str = "[system]";
pub const NEWS_PROMPT: &str = "[summarize]";

// ── Relay ───────────────────────────────────────────────────────────────

/// Records every publish and exposes a sender for inbound events.
pub struct RecordingRelay {
    published: Mutex<Vec<OutboundEvent>>,
    published_tx: mpsc::UnboundedSender<OutboundEvent>,
    inbound_rx: Mutex<Option<mpsc::UnboundedReceiver<InboundEvent>>>,
    pub fail_connect: bool,
}

pub struct RelayHandle {
    pub relay: Arc<RecordingRelay>,
    pub inbound: mpsc::UnboundedSender<InboundEvent>,
    pub published: mpsc::UnboundedReceiver<OutboundEvent>,
}

impl RecordingRelay {
    pub fn new() -> RelayHandle {
        Self::build(false)
    }

    pub fn failing_connect() -> RelayHandle {
        Self::build(true)
    }

    fn build(fail_connect: bool) -> RelayHandle {
        let (inbound_tx, inbound_rx) = mpsc::unbounded_channel();
        let (published_tx, published_rx) = mpsc::unbounded_channel();
        let relay = Arc::new(Self {
            published: Mutex::new(Vec::new()),
            published_tx,
            inbound_rx: Mutex::new(Some(inbound_rx)),
            fail_connect,
        });
        RelayHandle {
            relay,
            inbound: inbound_tx,
            published: published_rx,
        }
    }

    pub fn published(&self) -> Vec<OutboundEvent> {
        self.published.lock().unwrap().clone()
    }
}

#[async_trait]
impl Relay for RecordingRelay {
    fn address(&self) -> &str {
        "test://relay"
    }

    async fn connect(&self) -> Result<(), RelayError> {
        if self.fail_connect {
            return Err(RelayError::ConnectFailed {
                address: "test://relay".into(),
                reason: "refused".into(),
            });
        }
        Ok(())
    }

    async fn subscribe(&self) -> Result<EventStream, RelayError> {
        let rx = self
            .inbound_rx
            .lock()
            .unwrap()
            .take()
            .ok_or(RelayError::AlreadySubscribed)?;
        Ok(Box::pin(UnboundedReceiverStream::new(rx)))
    }

    async fn publish(&self, event: OutboundEvent) -> Result<(), RelayError> {
        self.published.lock().unwrap().push(event.clone());
        let _ = self.published_tx.send(event);
        Ok(())
    }
}

/// Wait for the next published event, failing the test after a second.
pub async fn next_published(rx: &mut mpsc::UnboundedReceiver<OutboundEvent>) -> OutboundEvent {
    next_published_within(rx, Duration::from_secs(1)).await
}

pub async fn next_published_within(
    rx: &mut mpsc::UnboundedReceiver<OutboundEvent>,
    limit: Duration,
) -> OutboundEvent {
    tokio::time::timeout(limit, rx.recv())
        .await
        .expect("timed out waiting for a publish")
        .expect("publish channel closed")
}

// ── LLM ─────────────────────────────────────────────────────────────────

pub struct StubLlm {
    reply: Option<String>,
    hang: bool,
    pub prompts: Mutex<Vec<String>>,
}

impl StubLlm {
    pub fn replying(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Some(reply.to_string()),
            hang: false,
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            reply: None,
            hang: false,
            prompts: Mutex::new(Vec::new()),
        })
    }

    /// Never answers.
    pub fn hanging() -> Arc<Self> {
        Arc::new(Self {
            reply: None,
            hang: true,
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmProvider for StubLlm {
    fn model_name(&self) -> &str {
        "stub"
    }

    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        self.prompts.lock().unwrap().push(request.prompt);
        if self.hang {
            std::future::pending::<()>().await;
        }
        match &self.reply {
            Some(content) => Ok(CompletionResponse {
                content: content.clone(),
            }),
            None => Err(LlmError::RequestFailed {
                provider: "stub".into(),
                reason: "quota exceeded".into(),
            }),
        }
    }
}

// ── News ────────────────────────────────────────────────────────────────

pub struct StubNews {
    items: Option<Vec<NewsItem>>,
}

impl StubNews {
    pub fn with_items(items: Vec<NewsItem>) -> Arc<Self> {
        Arc::new(Self { items: Some(items) })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self { items: None })
    }
}

#[async_trait]
impl NewsSource for StubNews {
    async fn fetch_items(&self) -> Result<Vec<NewsItem>, NewsError> {
        self.items
            .clone()
            .ok_or_else(|| NewsError::Status {
                status: 401,
                message: "apiKeyInvalid".into(),
            })
    }
}

pub struct StubExtractor {
    text: Option<String>,
}

impl StubExtractor {
    pub fn returning(text: &str) -> Arc<Self> {
        Arc::new(Self {
            text: Some(text.to_string()),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self { text: None })
    }
}

#[async_trait]
impl ContentExtractor for StubExtractor {
    async fn extract(&self, _url: &str) -> Result<String, FetchError> {
        self.text.clone().ok_or_else(|| FetchError::Response {
            status: 403,
            body: "forbidden".into(),
        })
    }
}

pub fn item(n: usize) -> NewsItem {
    NewsItem {
        url: format!("https://news.example/{n}"),
        title: format!("Title {n}"),
        description: format!("Description {n}"),
    }
}

// ── Assembly ────────────────────────────────────────────────────────────

pub struct Fixture {
    pub bot: Arc<Bot>,
    pub ledger: Arc<MemoryLedger>,
}

pub fn build_bot(
    relay: Arc<RecordingRelay>,
    llm: Arc<StubLlm>,
    source: Arc<StubNews>,
    extractor: Arc<StubExtractor>,
) -> Fixture {
    let ledger = Arc::new(MemoryLedger::new());
    let ledger_dyn: Arc<dyn DedupLedger> = ledger.clone();
    let pipeline = NewsPipeline::new(
        source,
        NewsSelector::new(ledger_dyn, 10),
        extractor,
        Summarizer::new(llm.clone(), SYSTEM_PROMPT, NEWS_PROMPT),
    );
    let bot = Bot::new(
        CommandRouter::default_routes(),
        BotDeps {
            relay,
            llm,
            news: Arc::new(pipeline),
        },
        SYSTEM_PROMPT,
    );
    Fixture {
        bot: Arc::new(bot),
        ledger,
    }
}
