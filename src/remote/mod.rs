//! Remote module — access to the remote article store
//!
//! [`RemoteGateway`] is the seam between the client core and the store.
//! [`RestGateway`] speaks PostgREST over HTTP; [`MemoryGateway`] keeps
//! records in process for offline mode and tests.

pub mod gateway;
pub mod memory;
pub mod rest;

pub use gateway::{normalize_articles, RemoteGateway};
pub use memory::MemoryGateway;
pub use rest::RestGateway;
