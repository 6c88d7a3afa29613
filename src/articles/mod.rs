//! Articles module — article entities and the in-memory store
//!
//! The store is the single owner of fetched articles. It is replaced
//! wholesale after a fetch and patched one field at a time by toggles.

pub mod source;
pub mod store;
pub mod types;

pub use source::{Gradient, Source, SourceIcon, SourceTheme};
pub use store::ArticleStore;
pub use types::{Article, ArticlePatch, FetchFilter};
