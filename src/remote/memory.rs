//! In-process remote store
//!
//! Backs offline mode and tests. Reads and writes can be made to fail on
//! demand, and every write attempt is recorded.

use super::gateway::{normalize_articles, RemoteGateway};
use crate::articles::{Article, FetchFilter};
use crate::error::{Error, Result};
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Remote gateway over an in-memory record list
pub struct MemoryGateway {
    records: Arc<RwLock<Vec<Article>>>,
    writes: Arc<RwLock<Vec<(String, bool)>>>,
    fail_fetch: AtomicBool,
    fail_writes: AtomicBool,
}

impl MemoryGateway {
    /// Create an empty remote store
    pub fn new() -> Self {
        Self {
            records: Arc::new(RwLock::new(Vec::new())),
            writes: Arc::new(RwLock::new(Vec::new())),
            fail_fetch: AtomicBool::new(false),
            fail_writes: AtomicBool::new(false),
        }
    }

    /// Create a remote store holding `articles`
    pub fn with_articles(articles: Vec<Article>) -> Self {
        Self {
            records: Arc::new(RwLock::new(articles)),
            ..Self::new()
        }
    }

    /// Replace the remote records
    pub async fn seed(&self, articles: Vec<Article>) {
        *self.records.write().await = articles;
    }

    /// Delete a record, as another client might
    pub async fn remove(&self, id: &str) {
        self.records.write().await.retain(|a| a.id != id);
    }

    /// Remote value of the saved flag
    pub async fn saved_flag(&self, id: &str) -> Option<bool> {
        self.records
            .read()
            .await
            .iter()
            .find(|a| a.id == id)
            .map(|a| a.is_saved)
    }

    /// Make subsequent fetches fail
    pub fn set_fail_fetch(&self, fail: bool) {
        self.fail_fetch.store(fail, Ordering::SeqCst);
    }

    /// Make subsequent writes fail
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Every write attempt so far, in call order
    pub async fn writes(&self) -> Vec<(String, bool)> {
        self.writes.read().await.clone()
    }
}

impl Default for MemoryGateway {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RemoteGateway for MemoryGateway {
    async fn fetch_articles(&self, filter: FetchFilter) -> Result<Vec<Article>> {
        if self.fail_fetch.load(Ordering::SeqCst) {
            return Err(Error::Network("memory store unavailable".to_string()));
        }

        let records = self.records.read().await;
        let selected: Vec<Article> = records
            .iter()
            .filter(|a| filter == FetchFilter::All || a.is_saved)
            .cloned()
            .collect();
        Ok(normalize_articles(selected))
    }

    async fn set_saved(&self, id: &str, value: bool) -> Result<()> {
        self.writes.write().await.push((id.to_string(), value));

        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(Error::Mutation(format!("write rejected for article {}", id)));
        }

        let mut records = self.records.write().await;
        match records.iter_mut().find(|a| a.id == id) {
            Some(article) => {
                article.is_saved = value;
                Ok(())
            }
            None => Err(Error::Mutation(format!("article {} no longer exists", id))),
        }
    }

    fn name(&self) -> &str {
        "memory"
    }
}
