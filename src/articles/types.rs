//! Article types
//!
//! Field names follow the remote store's snake_case record shape so the
//! same type decodes wire rows and backs the in-memory store.

use super::source::Source;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// A single content item from the remote feed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    pub id: String,
    pub title: String,
    /// Short category key (e.g. `hacker_news`)
    pub source: String,
    pub url: String,
    #[serde(default)]
    pub summary: Option<String>,
    pub published_at: DateTime<Utc>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub is_saved: bool,
}

impl Article {
    /// Resolve the raw source key into a known source
    pub fn source_kind(&self) -> Source {
        Source::from_key(&self.source)
    }

    /// Whether the article was published less than `hours` before `now`
    pub fn is_new(&self, now: DateTime<Utc>, hours: i64) -> bool {
        now.signed_duration_since(self.published_at) < Duration::hours(hours)
    }

    /// Estimated reading time of the summary
    pub fn read_time(&self, words_per_minute: usize) -> String {
        let words = self
            .summary
            .as_deref()
            .map(|s| s.split_whitespace().count())
            .unwrap_or(0);
        let minutes = words.div_ceil(words_per_minute.max(1));
        if minutes < 1 {
            "< 1 min".to_string()
        } else {
            format!("{} min", minutes)
        }
    }
}

/// Partial update applied to one article
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticlePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_saved: Option<bool>,
}

impl ArticlePatch {
    /// Patch that sets only the saved flag
    pub fn saved(value: bool) -> Self {
        Self {
            is_saved: Some(value),
        }
    }

    /// Apply the patch, returning true if any field changed
    pub fn apply(&self, article: &mut Article) -> bool {
        let mut changed = false;
        if let Some(saved) = self.is_saved {
            if article.is_saved != saved {
                article.is_saved = saved;
                changed = true;
            }
        }
        changed
    }
}

/// Which articles a fetch asks for
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FetchFilter {
    #[default]
    #[serde(rename = "all")]
    All,
    #[serde(rename = "saved")]
    SavedOnly,
}

impl std::fmt::Display for FetchFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::All => write!(f, "all"),
            Self::SavedOnly => write!(f, "saved"),
        }
    }
}

impl std::str::FromStr for FetchFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(Self::All),
            "saved" | "saved_only" => Ok(Self::SavedOnly),
            other => Err(format!("unknown fetch filter: {}", other)),
        }
    }
}
