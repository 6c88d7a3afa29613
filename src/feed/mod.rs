//! Feed session — the boundary the UI talks to
//!
//! Owns the article store, notification center and toggle driver for one
//! session, plus the view state of the dashboard (filter mode, search
//! query, loading flag). The UI sends intents (`request_fetch`,
//! `request_toggle`, `set_query`) and renders [`FeedView`].
//!
//! ```text
//! request_fetch ─▶ RemoteGateway ─▶ ArticleStore::replace_all ─▶ view()
//! request_toggle ─▶ OptimisticToggle ─▶ store patch + remote write
//!                                     └▶ NotificationCenter
//! ```

use crate::articles::{Article, ArticleStore, FetchFilter};
use crate::config::{AgenteConfig, FeedConfig};
use crate::error::Result;
use crate::notifications::NotificationCenter;
use crate::remote::RemoteGateway;
use crate::search;
use crate::stats::{self, FeedStats};
use crate::toggle::{OptimisticToggle, ToggleOutcome};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

pub const FETCH_FAILED_MESSAGE: &str = "Error loading articles";

/// What happened to a fetch result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The store now holds this many articles
    Applied(usize),
    /// A newer fetch was requested before this one finished
    Superseded,
}

/// Why the rendered list is empty
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyState {
    /// The search query matched nothing
    NoResults,
    /// Saved mode and nothing is saved
    NoSaved,
    /// The feed itself is empty
    NoArticles,
}

/// Everything the UI needs to render the feed
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedView {
    /// Articles matching the current query, newest first
    pub articles: Vec<Article>,
    /// Counts over the whole fetched collection
    pub stats: FeedStats,
    pub query: String,
    pub filter: FetchFilter,
    pub loading: bool,
    pub result_count: usize,
}

#[derive(Debug, Default)]
struct ViewState {
    filter: FetchFilter,
    query: String,
    loading: bool,
    fetch_generation: u64,
}

/// One client session over the remote feed
pub struct FeedSession {
    store: Arc<ArticleStore>,
    gateway: Arc<dyn RemoteGateway>,
    notifications: NotificationCenter,
    toggle: Arc<OptimisticToggle>,
    config: FeedConfig,
    state: RwLock<ViewState>,
}

impl FeedSession {
    /// Create a session with a fresh store and notification center
    pub fn new(gateway: Arc<dyn RemoteGateway>, config: &AgenteConfig) -> Self {
        Self::from_parts(
            Arc::new(ArticleStore::new()),
            gateway,
            NotificationCenter::new(Duration::from_millis(config.notifications.ttl_ms)),
            config.feed.clone(),
        )
    }

    /// Create a session from existing components
    pub fn from_parts(
        store: Arc<ArticleStore>,
        gateway: Arc<dyn RemoteGateway>,
        notifications: NotificationCenter,
        config: FeedConfig,
    ) -> Self {
        let toggle = Arc::new(OptimisticToggle::new(
            store.clone(),
            gateway.clone(),
            notifications.clone(),
        ));
        let state = ViewState {
            filter: config.default_filter,
            ..ViewState::default()
        };

        Self {
            store,
            gateway,
            notifications,
            toggle,
            config,
            state: RwLock::new(state),
        }
    }

    pub fn store(&self) -> &Arc<ArticleStore> {
        &self.store
    }

    pub fn notifications(&self) -> &NotificationCenter {
        &self.notifications
    }

    pub fn toggle(&self) -> &Arc<OptimisticToggle> {
        &self.toggle
    }

    pub fn config(&self) -> &FeedConfig {
        &self.config
    }

    // =========================================================================
    // Fetch
    // =========================================================================

    /// Switch the filter mode and fetch
    pub async fn request_fetch(&self, filter: FetchFilter) -> Result<FetchOutcome> {
        self.state.write().await.filter = filter;
        self.refresh().await
    }

    /// Fetch again with the current filter mode
    ///
    /// On failure the store keeps its previous contents. Only the most
    /// recently requested fetch may replace the store.
    pub async fn refresh(&self) -> Result<FetchOutcome> {
        let (filter, generation) = {
            let mut state = self.state.write().await;
            state.fetch_generation += 1;
            state.loading = true;
            (state.filter, state.fetch_generation)
        };

        tracing::debug!(%filter, generation, gateway = self.gateway.name(), "Fetching articles");
        let result = self.gateway.fetch_articles(filter).await;

        let mut state = self.state.write().await;
        if state.fetch_generation != generation {
            match &result {
                Ok(_) => tracing::debug!(generation, "Discarding superseded fetch"),
                Err(e) => tracing::warn!(
                    error = %e,
                    %filter,
                    generation,
                    "Superseded fetch failed"
                ),
            }
            return result.map(|_| FetchOutcome::Superseded);
        }

        // Replace under the view lock so no reader sees the new filter
        // alongside old articles.
        let outcome = match result {
            Ok(articles) => {
                let count = articles.len();
                self.store.replace_all(articles).await;
                tracing::info!(count, %filter, "Feed refreshed");
                Ok(FetchOutcome::Applied(count))
            }
            Err(e) => {
                tracing::error!(error = %e, %filter, "Error fetching articles");
                Err(e)
            }
        };
        state.loading = false;
        drop(state);

        if outcome.is_err() && self.config.notify_on_fetch_error {
            self.notifications.error(FETCH_FAILED_MESSAGE).await;
        }
        outcome
    }

    // =========================================================================
    // Toggle
    // =========================================================================

    /// Flip the saved flag of an article and wait for the remote result
    pub async fn request_toggle(&self, id: &str) -> Result<ToggleOutcome> {
        self.toggle.toggle(id).await
    }

    /// Flip the saved flag now and resolve the remote write in the background
    pub async fn spawn_toggle(&self, id: &str) -> Result<JoinHandle<ToggleOutcome>> {
        let pending = self.toggle.begin(id).await?;
        let toggle = self.toggle.clone();
        Ok(tokio::spawn(async move { toggle.resolve(pending).await }))
    }

    // =========================================================================
    // View state
    // =========================================================================

    /// Set the search query
    pub async fn set_query(&self, query: impl Into<String>) {
        self.state.write().await.query = query.into();
    }

    pub async fn query(&self) -> String {
        self.state.read().await.query.clone()
    }

    pub async fn filter(&self) -> FetchFilter {
        self.state.read().await.filter
    }

    pub async fn is_loading(&self) -> bool {
        self.state.read().await.loading
    }

    /// Current fetched collection
    pub async fn snapshot(&self) -> Vec<Article> {
        self.store.snapshot().await
    }

    /// Counts over the current collection
    pub async fn stats(&self) -> FeedStats {
        stats::aggregate(&self.store.snapshot().await)
    }

    /// Filtered articles plus counts, computed from one snapshot
    pub async fn view(&self) -> FeedView {
        let state = self.state.read().await;
        let all = self.store.snapshot().await;
        let articles = search::filter(&all, &state.query);

        FeedView {
            stats: stats::aggregate(&all),
            result_count: articles.len(),
            articles,
            query: state.query.clone(),
            filter: state.filter,
            loading: state.loading,
        }
    }

    /// Reason the rendered list is empty, if it is
    pub async fn empty_state(&self) -> Option<EmptyState> {
        let view = self.view().await;
        if !view.articles.is_empty() || view.loading {
            return None;
        }
        if !view.query.trim().is_empty() {
            Some(EmptyState::NoResults)
        } else if view.filter == FetchFilter::SavedOnly {
            Some(EmptyState::NoSaved)
        } else {
            Some(EmptyState::NoArticles)
        }
    }
}
