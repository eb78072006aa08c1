//! Cache-first page fetching on top of the HTML client.

use goodreads_api::Client;

use crate::cache::{FlushPolicy, PageCache};
use crate::error::ShelfStatError;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FetchStats {
    pub hits: usize,
    pub misses: usize,
}

/// HTML client wrapper that serves pages from a [`PageCache`].
///
/// Cache hits bypass the network entirely. Misses are fetched, stored under
/// the exact request URL, and written to disk according to the flush policy.
/// Transport failures are returned unchanged; nothing is retried.
pub struct CachedFetcher {
    inner: Client,
    cache: PageCache,
    policy: FlushPolicy,
    stats: FetchStats,
}

impl CachedFetcher {
    pub fn new(inner: Client, cache: PageCache, policy: FlushPolicy) -> Self {
        Self {
            inner,
            cache,
            policy,
            stats: FetchStats::default(),
        }
    }

    pub fn client(&self) -> &Client {
        &self.inner
    }

    pub fn cache(&self) -> &PageCache {
        &self.cache
    }

    pub fn stats(&self) -> FetchStats {
        self.stats
    }

    /// Returns the page for `url`, fetching and caching it on a miss.
    pub async fn get_or_fetch(&mut self, url: &str) -> Result<String, ShelfStatError> {
        if let Some(cached) = self.cache.get(url) {
            tracing::debug!("Using cache for {}", url);
            self.stats.hits += 1;
            return Ok(cached.to_string());
        }

        tracing::debug!("Fetching {}", url);
        let html = self.inner.get_html(url).await?;
        self.stats.misses += 1;
        self.cache.put(url.to_string(), html.clone());
        if self.policy == FlushPolicy::EveryMiss {
            self.cache.flush()?;
        }
        Ok(html)
    }

    /// Writes pending cache entries to disk.
    pub fn finish(&mut self) -> Result<FetchStats, ShelfStatError> {
        self.cache.flush()?;
        Ok(self.stats)
    }
}
