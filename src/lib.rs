//! Agente - article feed client core
//!
//! Agente keeps a client-side copy of a remote article feed in sync. It
//! fetches articles, lets the user bookmark them with optimistic updates
//! that roll back on failure, derives search results and counts, and
//! manages short-lived status notifications.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                         FeedSession                          │
//! │   intents: request_fetch · request_toggle · set_query        │
//! │                                                              │
//! │  ┌──────────────────┐     ┌───────────────────────────────┐  │
//! │  │ OptimisticToggle │────▶│ ArticleStore                  │  │
//! │  │ Idle → Pending → │     │ replace_all · patch · snapshot│  │
//! │  │ Committed /      │     └──────────────┬────────────────┘  │
//! │  │ RolledBack /     │                    │                   │
//! │  │ Superseded       │                    │                   │
//! │  └───┬──────────┬───┘        search::filter · stats::aggregate│
//! │      │          │                        │                   │
//! │      │          ▼                        ▼                   │
//! │      │   NotificationCenter          FeedView                │
//! │      │   (TTL · dismiss)                                     │
//! └──────┼───────────────────────────────────────────────────────┘
//!        ▼
//!  RemoteGateway ── RestGateway (PostgREST) / MemoryGateway
//! ```
//!
//! ## Modules
//!
//! - [`articles`]: article entities, source themes and the in-memory store
//! - [`remote`]: remote store gateway trait and implementations
//! - [`toggle`]: optimistic save/unsave with rollback
//! - [`search`]: query filter over the collection
//! - [`stats`]: aggregate counts
//! - [`notifications`]: notification queue with timed expiry
//! - [`feed`]: session facade consumed by the UI
//! - [`config`]: configuration management

pub mod articles;
pub mod config;
pub mod error;
pub mod feed;
pub mod notifications;
pub mod remote;
pub mod search;
pub mod stats;
pub mod toggle;

pub use config::AgenteConfig;
pub use error::{Error, Result};
pub use feed::FeedSession;
