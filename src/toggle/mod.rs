//! Optimistic save/unsave toggle
//!
//! Each request is a small state machine:
//!
//! ```text
//! Idle ──begin──▶ Pending ──remote ok───▶ Committed
//!                    │
//!                    ├────remote error──▶ RolledBack
//!                    │
//!                    └──later request───▶ Superseded
//! ```
//!
//! `begin` patches the store before the remote call, so readers see the
//! new value immediately. Requests on the same article are ordered by a
//! sequence number assigned in `begin`, and the latest one owns the
//! displayed value.
//!
//! Remote writes for one article go through a per-article lane, one at a
//! time. A request that has been overtaken before its write starts never
//! sends it: the later request carries the final intent. When the latest
//! request fails, the store falls back to the last value the remote
//! confirmed for that article, not to the optimistic value the request
//! happened to observe.

use crate::articles::{ArticlePatch, ArticleStore};
use crate::error::{Error, Result};
use crate::notifications::NotificationCenter;
use crate::remote::RemoteGateway;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;

pub const SAVED_MESSAGE: &str = "Article saved!";
pub const REMOVED_MESSAGE: &str = "Removed from saved";
pub const SAVE_FAILED_MESSAGE: &str = "Error saving article";

/// Lifecycle state of a toggle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToggleState {
    /// No request in flight for the article
    #[default]
    Idle,
    Pending,
    Committed,
    RolledBack,
    /// Overtaken by a later request before its remote write was sent
    Superseded,
}

impl ToggleState {
    /// Whether the request has resolved
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Committed | Self::RolledBack | Self::Superseded)
    }
}

/// A toggle whose optimistic write is applied but not yet confirmed
#[derive(Debug)]
#[must_use = "a pending toggle must be resolved"]
pub struct PendingToggle {
    id: String,
    seq: u64,
    previous: bool,
    target: bool,
}

impl PendingToggle {
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Value observed before the optimistic write
    pub fn previous(&self) -> bool {
        self.previous
    }

    /// Value requested by this toggle
    pub fn target(&self) -> bool {
        self.target
    }
}

/// How a toggle request resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToggleOutcome {
    pub id: String,
    pub state: ToggleState,
    pub previous: bool,
    pub target: bool,
    /// A later request on the same article was made before this one resolved
    pub superseded: bool,
}

/// Per-article bookkeeping while toggles are outstanding
#[derive(Debug)]
struct ArticleIntent {
    /// Sequence number of the most recent `begin`
    latest: u64,
    /// Last value the remote is known to hold
    confirmed: bool,
    outstanding: usize,
    /// Serializes remote writes for the article
    lane: Arc<Mutex<()>>,
}

/// Optimistic toggle driver shared by all toggle requests of a session
pub struct OptimisticToggle {
    store: Arc<ArticleStore>,
    gateway: Arc<dyn RemoteGateway>,
    notifications: NotificationCenter,
    intents: Mutex<HashMap<String, ArticleIntent>>,
    next_seq: AtomicU64,
}

impl OptimisticToggle {
    pub fn new(
        store: Arc<ArticleStore>,
        gateway: Arc<dyn RemoteGateway>,
        notifications: NotificationCenter,
    ) -> Self {
        Self {
            store,
            gateway,
            notifications,
            intents: Mutex::new(HashMap::new()),
            next_seq: AtomicU64::new(1),
        }
    }

    /// Idle → Pending: flip the saved flag in the store right away.
    pub async fn begin(&self, id: &str) -> Result<PendingToggle> {
        // Held across read + patch so overlapping begins on one article
        // observe each other's writes.
        let mut intents = self.intents.lock().await;

        let previous = self
            .store
            .get(id)
            .await
            .map(|a| a.is_saved)
            .ok_or_else(|| Error::ArticleNotFound(id.to_string()))?;
        let target = !previous;

        let seq = self.next_seq.fetch_add(1, Ordering::SeqCst);
        let intent = intents
            .entry(id.to_string())
            .or_insert_with(|| ArticleIntent {
                latest: seq,
                confirmed: previous,
                outstanding: 0,
                lane: Arc::default(),
            });
        intent.latest = seq;
        intent.outstanding += 1;
        self.store.patch(id, &ArticlePatch::saved(target)).await;
        drop(intents);

        tracing::debug!(article_id = %id, seq, previous, target, "Toggle pending");
        Ok(PendingToggle {
            id: id.to_string(),
            seq,
            previous,
            target,
        })
    }

    /// Pending → Committed | RolledBack | Superseded: confirm remotely or
    /// compensate.
    pub async fn resolve(&self, pending: PendingToggle) -> ToggleOutcome {
        let PendingToggle {
            id,
            seq,
            previous,
            target,
        } = pending;

        let lane = self
            .intents
            .lock()
            .await
            .get(&id)
            .map(|intent| intent.lane.clone())
            .unwrap_or_default();
        let turn = lane.lock().await;

        if self.is_superseded(&id, seq).await {
            drop(turn);
            self.release(&id).await;
            tracing::debug!(article_id = %id, seq, "Toggle superseded before write");
            return ToggleOutcome {
                id,
                state: ToggleState::Superseded,
                previous,
                target,
                superseded: true,
            };
        }

        let result = self.gateway.set_saved(&id, target).await;

        let (superseded, restored) = {
            let mut intents = self.intents.lock().await;
            let mut superseded = false;
            let mut restored = None;
            if let Some(intent) = intents.get_mut(&id) {
                superseded = intent.latest != seq;
                match &result {
                    Ok(()) => intent.confirmed = target,
                    Err(_) if !superseded => restored = Some(intent.confirmed),
                    Err(_) => {}
                }
            }
            if let Some(value) = restored {
                self.store.patch(&id, &ArticlePatch::saved(value)).await;
            }
            Self::release_locked(&mut intents, &id);
            (superseded, restored)
        };
        drop(turn);

        let state = match result {
            Ok(()) => {
                let message = if target { SAVED_MESSAGE } else { REMOVED_MESSAGE };
                self.notifications.success(message).await;
                tracing::info!(article_id = %id, saved = target, superseded, "Toggle committed");
                ToggleState::Committed
            }
            Err(e) => {
                self.notifications.error(SAVE_FAILED_MESSAGE).await;
                tracing::warn!(
                    article_id = %id,
                    restored = ?restored,
                    superseded,
                    error = %e,
                    "Toggle rolled back"
                );
                ToggleState::RolledBack
            }
        };

        ToggleOutcome {
            id,
            state,
            previous,
            target,
            superseded,
        }
    }

    /// Run a toggle to completion
    pub async fn toggle(&self, id: &str) -> Result<ToggleOutcome> {
        let pending = self.begin(id).await?;
        Ok(self.resolve(pending).await)
    }

    /// `Pending` while any toggle on the article is outstanding, else `Idle`
    pub async fn state(&self, id: &str) -> ToggleState {
        if self.intents.lock().await.contains_key(id) {
            ToggleState::Pending
        } else {
            ToggleState::Idle
        }
    }

    /// Number of articles with toggles in flight
    pub async fn in_flight(&self) -> usize {
        self.intents.lock().await.len()
    }

    async fn is_superseded(&self, id: &str, seq: u64) -> bool {
        self.intents
            .lock()
            .await
            .get(id)
            .is_some_and(|intent| intent.latest != seq)
    }

    async fn release(&self, id: &str) {
        Self::release_locked(&mut *self.intents.lock().await, id);
    }

    fn release_locked(intents: &mut HashMap<String, ArticleIntent>, id: &str) {
        let done = match intents.get_mut(id) {
            Some(intent) => {
                intent.outstanding = intent.outstanding.saturating_sub(1);
                intent.outstanding == 0
            }
            None => false,
        };
        if done {
            intents.remove(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::articles::Article;
    use crate::notifications::NotificationKind;
    use crate::remote::MemoryGateway;
    use chrono::{TimeZone, Utc};

    fn build_article(id: &str, saved: bool) -> Article {
        Article {
            id: id.to_string(),
            title: format!("Article {}", id),
            source: "bens_bites".to_string(),
            url: format!("https://example.com/{}", id),
            summary: None,
            published_at: Utc.with_ymd_and_hms(2026, 6, 1, 10, 0, 0).unwrap(),
            image_url: None,
            is_saved: saved,
        }
    }

    async fn setup(
        articles: Vec<Article>,
    ) -> (
        OptimisticToggle,
        Arc<ArticleStore>,
        Arc<MemoryGateway>,
        NotificationCenter,
    ) {
        let store = Arc::new(ArticleStore::new());
        store.replace_all(articles.clone()).await;
        let gateway = Arc::new(MemoryGateway::with_articles(articles));
        let notifications = NotificationCenter::default();
        let toggle = OptimisticToggle::new(store.clone(), gateway.clone(), notifications.clone());
        (toggle, store, gateway, notifications)
    }

    async fn saved(store: &ArticleStore, id: &str) -> bool {
        store.get(id).await.unwrap().is_saved
    }

    #[tokio::test(start_paused = true)]
    async fn test_commit_on_success() {
        let (toggle, store, gateway, notifications) = setup(vec![build_article("1", false)]).await;

        let outcome = toggle.toggle("1").await.unwrap();
        assert_eq!(outcome.state, ToggleState::Committed);
        assert!(!outcome.superseded);
        assert!(saved(&store, "1").await);
        assert_eq!(gateway.saved_flag("1").await, Some(true));

        let list = notifications.list().await;
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].kind, NotificationKind::Success);
        assert_eq!(list[0].message, SAVED_MESSAGE);
        assert_eq!(toggle.in_flight().await, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unsave_message() {
        let (toggle, store, _gateway, notifications) = setup(vec![build_article("1", true)]).await;

        toggle.toggle("1").await.unwrap();
        assert!(!saved(&store, "1").await);
        assert_eq!(notifications.list().await[0].message, REMOVED_MESSAGE);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rollback_on_failure() {
        let (toggle, store, gateway, notifications) = setup(vec![build_article("1", false)]).await;
        gateway.set_fail_writes(true);

        let outcome = toggle.toggle("1").await.unwrap();
        assert_eq!(outcome.state, ToggleState::RolledBack);
        assert!(!saved(&store, "1").await);

        let list = notifications.list().await;
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].kind, NotificationKind::Error);
        assert_eq!(list[0].message, SAVE_FAILED_MESSAGE);
    }

    #[tokio::test(start_paused = true)]
    async fn test_optimistic_write_is_visible_while_pending() {
        let (toggle, store, gateway, _notifications) = setup(vec![build_article("1", false)]).await;

        assert_eq!(toggle.state("1").await, ToggleState::Idle);
        let pending = toggle.begin("1").await.unwrap();
        assert_eq!(toggle.state("1").await, ToggleState::Pending);
        assert!(!pending.previous());
        assert!(pending.target());
        assert!(saved(&store, "1").await);
        assert!(gateway.writes().await.is_empty());

        let outcome = toggle.resolve(pending).await;
        assert!(outcome.state.is_terminal());
        assert_eq!(toggle.state("1").await, ToggleState::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unknown_article() {
        let (toggle, _store, gateway, notifications) = setup(vec![build_article("1", false)]).await;

        let err = toggle.toggle("nope").await.unwrap_err();
        assert!(matches!(err, Error::ArticleNotFound(_)));
        assert!(gateway.writes().await.is_empty());
        assert!(notifications.is_empty().await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_overtaken_request_skips_its_write() {
        let (toggle, store, gateway, notifications) = setup(vec![build_article("1", false)]).await;

        let first = toggle.begin("1").await.unwrap(); // false -> true
        let second = toggle.begin("1").await.unwrap(); // true -> false
        assert!(second.previous());
        assert!(!saved(&store, "1").await);

        let second = toggle.resolve(second).await;
        assert_eq!(second.state, ToggleState::Committed);
        assert!(!second.superseded);

        let first = toggle.resolve(first).await;
        assert_eq!(first.state, ToggleState::Superseded);
        assert!(first.superseded);

        assert_eq!(gateway.writes().await, vec![("1".to_string(), false)]);
        assert!(!saved(&store, "1").await);
        assert_eq!(gateway.saved_flag("1").await, Some(false));
        assert_eq!(notifications.len().await, 1);
        assert_eq!(toggle.in_flight().await, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_commits_in_request_order_agree_with_remote() {
        let (toggle, store, gateway, notifications) = setup(vec![build_article("1", false)]).await;

        let first = toggle.begin("1").await.unwrap();
        let second = toggle.begin("1").await.unwrap();

        assert_eq!(toggle.resolve(first).await.state, ToggleState::Superseded);
        assert_eq!(toggle.resolve(second).await.state, ToggleState::Committed);

        assert!(!saved(&store, "1").await);
        assert_eq!(gateway.saved_flag("1").await, Some(false));
        let messages: Vec<_> = notifications
            .list()
            .await
            .into_iter()
            .map(|n| n.message)
            .collect();
        assert_eq!(messages, vec![REMOVED_MESSAGE.to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_double_failure_restores_confirmed_value() {
        let (toggle, store, gateway, notifications) = setup(vec![build_article("1", false)]).await;
        gateway.set_fail_writes(true);

        let first = toggle.begin("1").await.unwrap(); // false -> true
        let second = toggle.begin("1").await.unwrap(); // true -> false

        let second = toggle.resolve(second).await;
        assert_eq!(second.state, ToggleState::RolledBack);
        let first = toggle.resolve(first).await;
        assert_eq!(first.state, ToggleState::Superseded);

        // Neither write reached the remote, so the store shows its value
        assert!(!saved(&store, "1").await);
        assert_eq!(gateway.saved_flag("1").await, Some(false));

        let kinds: Vec<_> = notifications.list().await.iter().map(|n| n.kind).collect();
        assert_eq!(kinds, vec![NotificationKind::Error]);
        assert_eq!(toggle.in_flight().await, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_latest_failure_after_earlier_commit() {
        let (toggle, store, gateway, notifications) = setup(vec![build_article("1", false)]).await;

        // First toggle commits before the second begins
        toggle.toggle("1").await.unwrap();
        let second = toggle.begin("1").await.unwrap();
        let third = toggle.begin("1").await.unwrap();
        assert!(saved(&store, "1").await);

        gateway.set_fail_writes(true);
        assert_eq!(toggle.resolve(third).await.state, ToggleState::RolledBack);
        assert_eq!(toggle.resolve(second).await.state, ToggleState::Superseded);

        assert!(saved(&store, "1").await);
        assert_eq!(gateway.saved_flag("1").await, Some(true));
        assert_eq!(notifications.len().await, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_write_in_flight_orders_later_write() {
        let (toggle, store, gateway, _notifications) = setup(vec![build_article("1", false)]).await;
        let toggle = Arc::new(toggle);

        let first = toggle.begin("1").await.unwrap();
        let running = {
            let toggle = toggle.clone();
            tokio::spawn(async move { toggle.resolve(first).await })
        };
        // Let the first resolve take the write lane before the second begins
        tokio::task::yield_now().await;

        let second = toggle.toggle("1").await.unwrap();
        let first = running.await.unwrap();

        assert_eq!(second.state, ToggleState::Committed);
        assert_ne!(first.state, ToggleState::RolledBack);
        assert!(!saved(&store, "1").await);
        assert_eq!(gateway.saved_flag("1").await, Some(false));
        assert_eq!(toggle.in_flight().await, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_different_articles_are_independent() {
        let (toggle, store, gateway, _notifications) =
            setup(vec![build_article("1", false), build_article("2", true)]).await;

        let a = toggle.begin("1").await.unwrap();
        let b = toggle.begin("2").await.unwrap();
        assert_eq!(toggle.in_flight().await, 2);

        gateway.set_fail_writes(true);
        let b = toggle.resolve(b).await;
        gateway.set_fail_writes(false);
        let a = toggle.resolve(a).await;

        assert_eq!(a.state, ToggleState::Committed);
        assert_eq!(b.state, ToggleState::RolledBack);
        assert!(saved(&store, "1").await);
        assert!(saved(&store, "2").await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_refresh_removed_article_while_pending() {
        let (toggle, store, gateway, _notifications) = setup(vec![build_article("1", false)]).await;

        let pending = toggle.begin("1").await.unwrap();
        store.replace_all(vec![build_article("2", false)]).await;
        gateway.remove("1").await;

        let outcome = toggle.resolve(pending).await;
        assert_eq!(outcome.state, ToggleState::RolledBack);
        let snapshot = store.snapshot().await;
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].id, "2");
    }
}
