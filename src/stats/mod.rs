//! Aggregate counts over the article collection

use crate::articles::Article;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Feed counters shown above the list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedStats {
    pub total: usize,
    pub saved: usize,
    /// Distinct source keys
    pub sources: usize,
}

/// Compute counts for `articles`
pub fn aggregate(articles: &[Article]) -> FeedStats {
    let sources: HashSet<&str> = articles.iter().map(|a| a.source.as_str()).collect();
    FeedStats {
        total: articles.len(),
        saved: articles.iter().filter(|a| a.is_saved).count(),
        sources: sources.len(),
    }
}
