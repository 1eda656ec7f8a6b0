//! Inbound event handling.
//!
//! Each event is routed to exactly one handler. Handlers never surface
//! errors: a failed completion or news cycle is logged and produces no
//! outbound event.

use std::sync::Arc;

use tracing::{debug, error, info, trace};

use crate::agent::emitter::Emitter;
use crate::agent::messages::{FAV_REACTION, FAV_REPLY, HELP_TEXT};
use crate::agent::router::{Command, CommandRouter};
use crate::llm::{CompletionRequest, LlmProvider};
use crate::news::NewsPipeline;
use crate::relay::{InboundEvent, Relay};

/// Collaborators the bot talks to.
pub struct BotDeps {
    pub relay: Arc<dyn Relay>,
    pub llm: Arc<dyn LlmProvider>,
    pub news: Arc<NewsPipeline>,
}

pub struct Bot {
    router: CommandRouter,
    emitter: Emitter,
    llm: Arc<dyn LlmProvider>,
    news: Arc<NewsPipeline>,
    system_prompt: String,
}

impl Bot {
    pub fn new(router: CommandRouter, deps: BotDeps, system_prompt: impl Into<String>) -> Self {
        Self {
            router,
            emitter: Emitter::new(deps.relay),
            llm: deps.llm,
            news: deps.news,
            system_prompt: system_prompt.into(),
        }
    }

    pub fn emitter(&self) -> &Emitter {
        &self.emitter
    }

    /// Handle one inbound event. Returns the command it was routed to, or
    /// `None` when the event was ignored.
    pub async fn handle_event(&self, event: &InboundEvent) -> Option<Command> {
        if !event.is_text_note() {
            trace!(event_id = %event.id, kind = event.kind, "Ignoring non-text event");
            return None;
        }
        if let Ok(raw) = serde_json::to_string(event) {
            debug!("Inbound event: {}", raw);
        }

        let route = self.router.route(&event.content);
        info!(
            event_id = %event.id,
            command = route.command.name(),
            matched = route.matched.unwrap_or(""),
            "Routing event"
        );

        match route.command {
            Command::Help => self.help(event).await,
            Command::Fav => self.fav(event).await,
            Command::News => self.news_reply(event).await,
            Command::Ask => self.ask(event).await,
        }
        Some(route.command)
    }

    async fn help(&self, event: &InboundEvent) {
        self.emitter.reply(HELP_TEXT, event).await;
    }

    async fn fav(&self, event: &InboundEvent) {
        self.emitter.reply(FAV_REPLY, event).await;
        self.emitter.react(FAV_REACTION, event).await;
    }

    async fn news_reply(&self, event: &InboundEvent) {
        if let Some(content) = self.news.compose().await {
            self.emitter.reply(content, event).await;
        }
    }

    async fn ask(&self, event: &InboundEvent) {
        let prompt = format!("{}{}", self.system_prompt, event.content);
        match self.llm.complete(CompletionRequest::new(prompt)).await {
            Ok(response) => {
                let content = response.content.trim();
                if content.is_empty() {
                    debug!(event_id = %event.id, "Empty completion, not replying");
                    return;
                }
                self.emitter.reply(content, event).await;
            }
            Err(e) => {
                error!(
                    event_id = %event.id,
                    model = %self.llm.model_name(),
                    "Completion failed: {}",
                    e
                );
            }
        }
    }

    /// Unsolicited news post, used at startup and by the schedule.
    pub async fn post_news(&self) {
        if let Some(content) = self.news.compose().await {
            self.emitter.post(content).await;
        }
    }
}
