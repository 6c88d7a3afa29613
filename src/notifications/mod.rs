//! Notifications module — transient user-facing status messages
//!
//! Producers push messages; each one disappears after a fixed TTL or when
//! the user dismisses it.

pub mod center;
pub mod types;

pub use center::{NotificationCenter, DEFAULT_TTL};
pub use types::{Notification, NotificationKind};
