//! Completion backend shared by the reply handler and the news summarizer.
//!
//! One rig-core client per process, picked by `BOT_LLM_BACKEND`. Both
//! callers hold it as `Arc<dyn LlmProvider>` and send single prompts.

pub mod provider;
mod rig_adapter;

pub use provider::{CompletionRequest, CompletionResponse, LlmProvider};
pub use rig_adapter::RigAdapter;

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use rig::client::CompletionClient;
use rig::completion::CompletionModel;
use secrecy::{ExposeSecret, SecretString};

use crate::config::BotConfig;
use crate::error::LlmError;

/// Model used when `BOT_MODEL` is unset.
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

/// Which hosted API answers the bot's prompts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LlmBackend {
    #[default]
    OpenAi,
    Anthropic,
}

impl LlmBackend {
    pub fn name(&self) -> &'static str {
        match self {
            LlmBackend::OpenAi => "openai",
            LlmBackend::Anthropic => "anthropic",
        }
    }
}

impl fmt::Display for LlmBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for LlmBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "openai" => Ok(LlmBackend::OpenAi),
            "anthropic" => Ok(LlmBackend::Anthropic),
            other => Err(format!("unknown backend '{other}'")),
        }
    }
}

/// Backend, key and model for the completion client.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub backend: LlmBackend,
    pub api_key: SecretString,
    pub model: String,
}

impl LlmConfig {
    /// Fill unset backend and model with the bot's defaults.
    pub fn new(api_key: SecretString, backend: Option<LlmBackend>, model: Option<String>) -> Self {
        Self {
            backend: backend.unwrap_or_default(),
            api_key,
            model: model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
        }
    }
}

/// Build the completion provider described by the bot configuration.
///
/// No request is made here; a bad key only shows up on the first prompt.
pub fn create_provider(config: &BotConfig) -> Result<Arc<dyn LlmProvider>, LlmError> {
    let llm = &config.llm;
    let key = llm.api_key.expose_secret();

    let provider = match llm.backend {
        LlmBackend::OpenAi => {
            use rig::providers::openai;

            let client: rig::client::Client<openai::client::OpenAIResponsesExt> =
                openai::Client::new(key).map_err(|e| client_error(llm, e))?;
            adapt(client.completion_model(&llm.model), llm)
        }
        LlmBackend::Anthropic => {
            use rig::providers::anthropic;

            let client: rig::client::Client<anthropic::client::AnthropicExt> =
                anthropic::Client::new(key).map_err(|e| client_error(llm, e))?;
            adapt(client.completion_model(&llm.model), llm)
        }
    };

    tracing::info!(backend = %llm.backend, model = %llm.model, "Completion backend ready");
    Ok(provider)
}

fn adapt<M>(model: M, llm: &LlmConfig) -> Arc<dyn LlmProvider>
where
    M: CompletionModel + Send + Sync + 'static,
{
    Arc::new(RigAdapter::new(model, &llm.model))
}

fn client_error(llm: &LlmConfig, e: impl fmt::Display) -> LlmError {
    LlmError::ClientInit {
        backend: llm.backend.to_string(),
        model: llm.model.clone(),
        reason: e.to_string(),
    }
}
