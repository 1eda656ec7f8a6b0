//! Provider-neutral completion types and the `LlmProvider` seam.

use async_trait::async_trait;

use crate::error::LlmError;

/// A single-prompt completion request.
///
/// The bot never keeps conversation history: every call is one prompt made of
/// the fixed preambles followed by the user (or article) text.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub prompt: String,
}

impl CompletionRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
        }
    }
}

/// Completion result.
#[derive(Debug, Clone)]
pub struct CompletionResponse {
    pub content: String,
}

/// A completion service.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    fn model_name(&self) -> &str;

    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError>;
}
