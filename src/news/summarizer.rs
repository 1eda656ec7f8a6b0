//! Content summarizer: turns an article body into a post via the LLM.

use std::sync::Arc;

use crate::error::LlmError;
use crate::llm::{CompletionRequest, LlmProvider};
use crate::news::NewsItem;

/// Article text beyond this many characters is cut before prompting.
const MAX_ARTICLE_CHARS: usize = 4000;

pub struct Summarizer {
    llm: Arc<dyn LlmProvider>,
    system_prompt: String,
    task_prompt: String,
}

impl Summarizer {
    pub fn new(
        llm: Arc<dyn LlmProvider>,
        system_prompt: impl Into<String>,
        task_prompt: impl Into<String>,
    ) -> Self {
        Self {
            llm,
            system_prompt: system_prompt.into(),
            task_prompt: task_prompt.into(),
        }
    }

    /// System preamble, then task preamble, then the article.
    pub fn build_prompt(&self, article_text: &str) -> String {
        let article: String = article_text.chars().take(MAX_ARTICLE_CHARS).collect();
        format!("{}{}{}", self.system_prompt, self.task_prompt, article)
    }

    /// Ask the model for a summary of `article_text`.
    pub async fn summarize(&self, article_text: &str) -> Result<String, LlmError> {
        let request = CompletionRequest::new(self.build_prompt(article_text));
        let response = self.llm.complete(request).await?;
        Ok(response.content.trim().to_string())
    }

    /// Summarize and format the result together with the item's metadata.
    pub async fn summarize_item(
        &self,
        item: &NewsItem,
        article_text: &str,
    ) -> Result<String, LlmError> {
        let summary = self.summarize(article_text).await?;
        Ok(format_news(&summary, item))
    }
}

/// Human-readable news block: summary, then title, description and URL.
pub fn format_news(summary: &str, item: &NewsItem) -> String {
    format!(
        "{summary}\n\nタイトル：[{}]\n概要：\n{}\nURL：\n{}",
        item.title, item.description, item.url
    )
}
