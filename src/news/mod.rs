//! News sourcing, deduplication, extraction and summarisation.
//!
//! The pipeline that ties these together lives in `pipeline`:
//! source → selector (ledger) → extractor → summarizer.

pub mod extract;
pub mod ledger;
pub mod pipeline;
pub mod selector;
pub mod summarizer;

pub use extract::{ContentExtractor, ReadabilityExtractor};
pub use ledger::{DedupLedger, MemoryLedger};
pub use pipeline::NewsPipeline;
pub use selector::NewsSelector;
pub use summarizer::Summarizer;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};

use crate::config::NewsConfig;
use crate::error::NewsError;

/// A candidate article. `url` is its identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsItem {
    pub url: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
}

/// Supplies the current pool of candidate articles.
#[async_trait]
pub trait NewsSource: Send + Sync {
    async fn fetch_items(&self) -> Result<Vec<NewsItem>, NewsError>;
}

/// NewsAPI-style `everything` endpoint.
pub struct NewsApiSource {
    config: NewsConfig,
    client: reqwest::Client,
}

impl NewsApiSource {
    pub fn new(config: NewsConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl NewsSource for NewsApiSource {
    async fn fetch_items(&self) -> Result<Vec<NewsItem>, NewsError> {
        let page_size = self.config.page_size.to_string();
        let resp = self
            .client
            .get(&self.config.endpoint)
            .header("X-Api-Key", self.config.api_key.expose_secret())
            .query(&[
                ("q", self.config.query.as_str()),
                ("sortBy", "publishedAt"),
                ("pageSize", page_size.as_str()),
            ])
            .send()
            .await
            .map_err(|e| NewsError::Request(e.to_string()))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| NewsError::Request(e.to_string()))?;
        if !status.is_success() {
            return Err(NewsError::Status {
                status: status.as_u16(),
                message: body.chars().take(200).collect(),
            });
        }

        let items = parse_articles(&body)?;
        tracing::debug!(count = items.len(), query = %self.config.query, "Fetched news pool");
        Ok(items)
    }
}

#[derive(Deserialize)]
struct ArticlesResponse {
    #[serde(default)]
    articles: Vec<RawArticle>,
}

#[derive(Deserialize)]
struct RawArticle {
    url: Option<String>,
    title: Option<String>,
    description: Option<String>,
}

/// Parse an `articles` payload, dropping entries without a URL.
pub fn parse_articles(body: &str) -> Result<Vec<NewsItem>, NewsError> {
    let parsed: ArticlesResponse =
        serde_json::from_str(body).map_err(|e| NewsError::Payload(e.to_string()))?;

    Ok(parsed
        .articles
        .into_iter()
        .filter_map(|a| {
            let url = a.url.filter(|u| !u.trim().is_empty())?;
            Some(NewsItem {
                url,
                title: a.title.unwrap_or_default(),
                description: a.description.unwrap_or_default(),
            })
        })
        .collect())
}
