//! Article body extraction.

use std::io::Cursor;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::error::FetchError;

/// Longest error body kept for diagnostics.
const MAX_ERROR_BODY: usize = 512;

/// Fetches a URL and returns the readable plain text of the article.
#[async_trait]
pub trait ContentExtractor: Send + Sync {
    async fn extract(&self, url: &str) -> Result<String, FetchError>;
}

/// `reqwest` + `readability` implementation.
pub struct ReadabilityExtractor {
    client: Client,
}

impl ReadabilityExtractor {
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("yaruo-bot/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| FetchError::Other {
                message: format!("failed to build HTTP client: {e}"),
            })?;
        Ok(Self { client })
    }
}

#[async_trait]
impl ContentExtractor for ReadabilityExtractor {
    async fn extract(&self, url: &str) -> Result<String, FetchError> {
        let parsed = url::Url::parse(url).map_err(|e| FetchError::Other {
            message: format!("invalid article URL {url}: {e}"),
        })?;

        let response = self
            .client
            .get(parsed.clone())
            .send()
            .await
            .map_err(classify)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::Response {
                status: status.as_u16(),
                body: truncate(&body, MAX_ERROR_BODY),
            });
        }

        let bytes = response.bytes().await.map_err(classify)?;
        let mut reader = Cursor::new(bytes);
        let product =
            readability::extractor::extract(&mut reader, &parsed).map_err(|e| FetchError::Other {
                message: format!("readability failed: {e}"),
            })?;

        let text = product.text.trim().to_string();
        if text.is_empty() {
            return Err(FetchError::Other {
                message: "no readable content".to_string(),
            });
        }

        tracing::debug!(url = %url, chars = text.len(), "Extracted article text");
        Ok(text)
    }
}

fn classify(e: reqwest::Error) -> FetchError {
    if let Some(status) = e.status() {
        FetchError::Response {
            status: status.as_u16(),
            body: String::new(),
        }
    } else if e.is_timeout() || e.is_connect() || e.is_request() {
        FetchError::NoResponse {
            reason: e.to_string(),
        }
    } else {
        FetchError::Other {
            message: e.to_string(),
        }
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.len() <= max {
        s.to_string()
    } else {
        let mut end = max;
        while end > 0 && !s.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &s[..end])
    }
}
