//! Picks the next article to post, avoiding repeats.

use std::sync::Arc;

use rand::Rng;

use crate::news::NewsItem;
use crate::news::ledger::DedupLedger;

/// Random selection over a news pool, deduplicated against a ledger.
///
/// Draws uniformly at random up to `max_draws` times looking for an unseen
/// item. If every draw hits a seen item, the pool is scanned for any unseen
/// item; only when the whole pool has been seen is a repeat returned.
pub struct NewsSelector {
    ledger: Arc<dyn DedupLedger>,
    max_draws: usize,
}

impl NewsSelector {
    pub fn new(ledger: Arc<dyn DedupLedger>, max_draws: usize) -> Self {
        Self {
            ledger,
            max_draws: max_draws.max(1),
        }
    }

    pub fn ledger(&self) -> &Arc<dyn DedupLedger> {
        &self.ledger
    }

    /// Select with the thread-local RNG. `None` only for an empty pool.
    pub fn select(&self, pool: &[NewsItem]) -> Option<NewsItem> {
        self.select_with(pool, &mut rand::thread_rng())
    }

    /// Select with a caller-supplied RNG.
    pub fn select_with<R: Rng + ?Sized>(&self, pool: &[NewsItem], rng: &mut R) -> Option<NewsItem> {
        if pool.is_empty() {
            return None;
        }

        let mut last_drawn = None;
        for _ in 0..self.max_draws {
            let item = &pool[rng.gen_range(0..pool.len())];
            if !self.ledger.contains(&item.url) {
                return Some(self.accept(item, false));
            }
            last_drawn = Some(item);
        }

        if let Some(unseen) = pool.iter().find(|item| !self.ledger.contains(&item.url)) {
            return Some(self.accept(unseen, false));
        }

        last_drawn.map(|item| self.accept(item, true))
    }

    fn accept(&self, item: &NewsItem, repeat: bool) -> NewsItem {
        self.ledger.record(&item.url);
        if repeat {
            tracing::info!(url = %item.url, "News pool exhausted, reposting a seen item");
        } else {
            tracing::debug!(url = %item.url, seen = self.ledger.len(), "Selected news item");
        }
        item.clone()
    }
}
