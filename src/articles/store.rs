//! In-memory article store
//!
//! Holds the current ordered article sequence behind a
//! `tokio::sync::RwLock`. A fetch replaces the whole sequence; a toggle
//! patches one entity in place. Readers subscribe to a revision counter
//! that is bumped after every visible change.

use super::types::{Article, ArticlePatch};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::{watch, RwLock};

/// In-memory store for the fetched article collection
pub struct ArticleStore {
    articles: Arc<RwLock<Vec<Article>>>,
    revision: watch::Sender<u64>,
}

impl ArticleStore {
    /// Create a new empty article store
    pub fn new() -> Self {
        let (revision, _) = watch::channel(0);
        Self {
            articles: Arc::new(RwLock::new(Vec::new())),
            revision,
        }
    }

    /// Replace the entire collection
    ///
    /// Later duplicates of an id are dropped so the store never holds two
    /// entities with the same id.
    pub async fn replace_all(&self, articles: Vec<Article>) {
        let mut seen = HashSet::with_capacity(articles.len());
        let mut unique = Vec::with_capacity(articles.len());
        for article in articles {
            if seen.insert(article.id.clone()) {
                unique.push(article);
            } else {
                tracing::warn!(article_id = %article.id, "Dropping duplicate article");
            }
        }

        let count = unique.len();
        {
            let mut guard = self.articles.write().await;
            *guard = unique;
        }
        self.bump();
        tracing::debug!(count, "Article store replaced");
    }

    /// Patch the article with `id`
    ///
    /// Absent ids are ignored: a concurrent refresh may have removed the
    /// entity. Returns true if a field changed.
    pub async fn patch(&self, id: &str, patch: &ArticlePatch) -> bool {
        let changed = {
            let mut guard = self.articles.write().await;
            match guard.iter_mut().find(|a| a.id == id) {
                Some(article) => patch.apply(article),
                None => {
                    tracing::debug!(article_id = %id, "Patch skipped, article not in store");
                    false
                }
            }
        };
        if changed {
            self.bump();
        }
        changed
    }

    /// Current ordered sequence
    pub async fn snapshot(&self) -> Vec<Article> {
        self.articles.read().await.clone()
    }

    /// Get a single article by id
    pub async fn get(&self, id: &str) -> Option<Article> {
        self.articles.read().await.iter().find(|a| a.id == id).cloned()
    }

    /// Number of articles currently held
    pub async fn len(&self) -> usize {
        self.articles.read().await.len()
    }

    /// Whether the store is empty
    pub async fn is_empty(&self) -> bool {
        self.articles.read().await.is_empty()
    }

    /// Subscribe to store revisions
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    /// Current revision number
    pub fn revision(&self) -> u64 {
        *self.revision.borrow()
    }

    fn bump(&self) {
        self.revision.send_modify(|rev| *rev += 1);
    }
}

impl Default for ArticleStore {
    fn default() -> Self {
        Self::new()
    }
}
