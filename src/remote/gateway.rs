//! Remote gateway interface
//!
//! A stateless facade over the remote store's reads and writes. No
//! retries happen here; retry policy belongs to the caller.

use crate::articles::{Article, FetchFilter};
use crate::error::Result;
use async_trait::async_trait;
use std::collections::HashSet;

/// Reads and writes against the remote article store.
#[async_trait]
pub trait RemoteGateway: Send + Sync {
    /// Fetch articles newest first.
    ///
    /// Fails with `Error::Network` on any transport or query failure; the
    /// caller receives either the whole result or nothing.
    async fn fetch_articles(&self, filter: FetchFilter) -> Result<Vec<Article>>;

    /// Commit the saved flag for one article.
    ///
    /// Fails with `Error::Mutation` if the write does not succeed or the
    /// id no longer exists remotely.
    async fn set_saved(&self, id: &str, value: bool) -> Result<()>;

    /// Name used in logs
    fn name(&self) -> &str;
}

/// Sort newest first (stable) and keep the first occurrence of each id
pub fn normalize_articles(mut articles: Vec<Article>) -> Vec<Article> {
    articles.sort_by(|a, b| b.published_at.cmp(&a.published_at));
    let mut seen = HashSet::with_capacity(articles.len());
    articles.retain(|a| seen.insert(a.id.clone()));
    articles
}
