//! Notification center
//!
//! Holds the visible notification queue in insertion order. Every push
//! arms its own expiry task; dismissing a notification aborts that task,
//! so a notification is removed exactly once whichever happens first.

use super::types::{Notification, NotificationKind};
use chrono::Utc;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::sync::{watch, RwLock};
use tokio::task::JoinHandle;

/// Default time a notification stays visible
pub const DEFAULT_TTL: Duration = Duration::from_millis(3000);

/// Handle to the session's notification queue (cheap to clone)
#[derive(Clone)]
pub struct NotificationCenter {
    inner: Arc<Inner>,
}

struct Inner {
    ttl: Duration,
    next_id: AtomicU64,
    state: RwLock<QueueState>,
    updates: watch::Sender<Vec<Notification>>,
}

#[derive(Default)]
struct QueueState {
    queue: Vec<Notification>,
    timers: HashMap<u64, JoinHandle<()>>,
}

impl NotificationCenter {
    /// Create a center whose notifications expire after `ttl`
    pub fn new(ttl: Duration) -> Self {
        let (updates, _) = watch::channel(Vec::new());
        Self {
            inner: Arc::new(Inner {
                ttl,
                next_id: AtomicU64::new(1),
                state: RwLock::new(QueueState::default()),
                updates,
            }),
        }
    }

    /// Time-to-live applied to new notifications
    pub fn ttl(&self) -> Duration {
        self.inner.ttl
    }

    /// Append a notification and schedule its removal
    pub async fn push(&self, message: impl Into<String>, kind: NotificationKind) -> Notification {
        let notification = Notification {
            id: self.inner.next_id.fetch_add(1, Ordering::SeqCst),
            message: message.into(),
            kind,
            created_at: Utc::now(),
        };
        let id = notification.id;

        let mut state = self.inner.state.write().await;
        state.queue.push(notification.clone());
        let timer = spawn_expiry(Arc::downgrade(&self.inner), id, self.inner.ttl);
        state.timers.insert(id, timer);
        self.inner.publish(&state);
        drop(state);

        tracing::debug!(notification_id = id, %kind, "Notification pushed");
        notification
    }

    /// Push a success notification
    pub async fn success(&self, message: impl Into<String>) -> Notification {
        self.push(message, NotificationKind::Success).await
    }

    /// Push an error notification
    pub async fn error(&self, message: impl Into<String>) -> Notification {
        self.push(message, NotificationKind::Error).await
    }

    /// Push an info notification
    pub async fn info(&self, message: impl Into<String>) -> Notification {
        self.push(message, NotificationKind::Info).await
    }

    /// Remove a notification now and cancel its expiry.
    ///
    /// Returns false if it was already gone.
    pub async fn dismiss(&self, id: u64) -> bool {
        let mut state = self.inner.state.write().await;
        if let Some(timer) = state.timers.remove(&id) {
            timer.abort();
        }
        let removed = state.remove(id);
        if removed {
            self.inner.publish(&state);
            tracing::debug!(notification_id = id, "Notification dismissed");
        }
        removed
    }

    /// Visible notifications in insertion order
    pub async fn list(&self) -> Vec<Notification> {
        self.inner.state.read().await.queue.clone()
    }

    /// Number of visible notifications
    pub async fn len(&self) -> usize {
        self.inner.state.read().await.queue.len()
    }

    /// Whether no notification is visible
    pub async fn is_empty(&self) -> bool {
        self.inner.state.read().await.queue.is_empty()
    }

    /// Number of expiry tasks still armed
    pub async fn pending_timers(&self) -> usize {
        self.inner.state.read().await.timers.len()
    }

    /// Subscribe to queue changes; each value is the full visible queue
    pub fn subscribe(&self) -> watch::Receiver<Vec<Notification>> {
        self.inner.updates.subscribe()
    }
}

impl Default for NotificationCenter {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}

impl Inner {
    async fn expire(&self, id: u64) {
        let mut state = self.state.write().await;
        state.timers.remove(&id);
        if state.remove(id) {
            self.publish(&state);
            tracing::trace!(notification_id = id, "Notification expired");
        }
    }

    fn publish(&self, state: &QueueState) {
        self.updates.send_replace(state.queue.clone());
    }
}

impl QueueState {
    fn remove(&mut self, id: u64) -> bool {
        let before = self.queue.len();
        self.queue.retain(|n| n.id != id);
        self.queue.len() != before
    }
}

fn spawn_expiry(inner: Weak<Inner>, id: u64, ttl: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        tokio::time::sleep(ttl).await;
        if let Some(inner) = inner.upgrade() {
            inner.expire(id).await;
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn settle() {
        for _ in 0..8 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_push_appends_in_order() {
        let center = NotificationCenter::default();
        let a = center.success("first").await;
        let b = center.error("second").await;
        let c = center.info("first").await;

        let list = center.list().await;
        assert_eq!(list.len(), 3);
        assert_eq!(list[0].id, a.id);
        assert_eq!(list[1].id, b.id);
        assert_eq!(list[2].id, c.id);
        assert!(a.id < b.id && b.id < c.id);
        // No deduplication of identical messages
        assert_eq!(list[0].message, list[2].message);
    }

    #[tokio::test(start_paused = true)]
    async fn test_expires_after_ttl() {
        let center = NotificationCenter::default();
        center.success("saved").await;

        tokio::time::advance(Duration::from_millis(2999)).await;
        settle().await;
        assert_eq!(center.len().await, 1);

        tokio::time::advance(Duration::from_millis(1)).await;
        settle().await;
        assert!(center.is_empty().await);
        assert_eq!(center.pending_timers().await, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_independent_timers() {
        let center = NotificationCenter::default();
        center.info("early").await;
        tokio::time::advance(Duration::from_millis(1000)).await;
        let late = center.info("late").await;

        tokio::time::advance(Duration::from_millis(2000)).await;
        settle().await;
        let list = center.list().await;
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].id, late.id);

        tokio::time::advance(Duration::from_millis(1000)).await;
        settle().await;
        assert!(center.is_empty().await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dismiss_cancels_expiry() {
        let center = NotificationCenter::default();
        let n = center.error("failed").await;
        let keep = center.info("other").await;

        assert!(center.dismiss(n.id).await);
        assert_eq!(center.pending_timers().await, 1);
        assert_eq!(center.list().await[0].id, keep.id);

        // Second dismissal is a no-op
        assert!(!center.dismiss(n.id).await);

        tokio::time::advance(Duration::from_millis(3000)).await;
        settle().await;
        assert!(center.is_empty().await);
        assert_eq!(center.pending_timers().await, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dismiss_after_expiry_is_noop() {
        let center = NotificationCenter::new(Duration::from_millis(500));
        let n = center.success("done").await;

        tokio::time::advance(Duration::from_millis(500)).await;
        settle().await;
        assert!(!center.dismiss(n.id).await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_subscribe_receives_queue() {
        let center = NotificationCenter::default();
        let mut rx = center.subscribe();

        let n = center.success("saved").await;
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update().as_slice(), &[n.clone()]);

        center.dismiss(n.id).await;
        rx.changed().await.unwrap();
        assert!(rx.borrow().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_clones_share_queue() {
        let center = NotificationCenter::default();
        let handle = center.clone();
        handle.info("shared").await;
        assert_eq!(center.len().await, 1);
    }
}
