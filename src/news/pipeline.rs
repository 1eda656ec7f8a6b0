//! News posting pipeline: source → selector → extractor → summarizer.
//!
//! Every stage failure ends the cycle silently (logged, no outbound event).
//! The next scheduled or requested cycle starts from scratch.

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::error::FetchError;
use crate::news::{ContentExtractor, NewsSelector, NewsSource, Summarizer};

pub struct NewsPipeline {
    source: Arc<dyn NewsSource>,
    selector: NewsSelector,
    extractor: Arc<dyn ContentExtractor>,
    summarizer: Summarizer,
}

impl NewsPipeline {
    pub fn new(
        source: Arc<dyn NewsSource>,
        selector: NewsSelector,
        extractor: Arc<dyn ContentExtractor>,
        summarizer: Summarizer,
    ) -> Self {
        Self {
            source,
            selector,
            extractor,
            summarizer,
        }
    }

    /// Run one cycle. `None` means nothing should be published.
    pub async fn compose(&self) -> Option<String> {
        let pool = match self.source.fetch_items().await {
            Ok(pool) => pool,
            Err(e) => {
                warn!("News source failed: {}", e);
                return None;
            }
        };

        let Some(item) = self.selector.select(&pool) else {
            debug!("News pool empty, nothing to post");
            return None;
        };

        // The ledger already holds item.url from here on, even if later stages fail.
        let article = match self.extractor.extract(&item.url).await {
            Ok(text) => text,
            Err(e) => {
                log_fetch_error(&item.url, &e);
                return None;
            }
        };

        match self.summarizer.summarize_item(&item, &article).await {
            Ok(text) => {
                info!(url = %item.url, "News summary ready");
                Some(text)
            }
            Err(e) => {
                error!(url = %item.url, "News summary failed: {}", e);
                None
            }
        }
    }
}

fn log_fetch_error(url: &str, e: &FetchError) {
    match e {
        FetchError::Response { status, body } => error!(
            url = %url,
            category = e.category(),
            status = *status,
            body = %body,
            "Failed news summary: error response"
        ),
        FetchError::NoResponse { reason } => error!(
            url = %url,
            category = e.category(),
            reason = %reason,
            "Failed news summary: no response"
        ),
        FetchError::Other { message } => error!(
            url = %url,
            category = e.category(),
            message = %message,
            "Failed news summary: other error"
        ),
    }
}
