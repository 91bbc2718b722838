//! Sharing module for dbmodeler
//!
//! A schema can be published to a share service under a short random id
//! and fetched back by anyone holding the link until it expires:
//! - `store`: capacity-bounded, TTL-expiring in-memory store (server)
//! - `api`: REST endpoints over the store (server)
//! - `client`: HTTP client for the endpoints (client)

pub mod protocol;

#[cfg(feature = "server")]
pub mod api;
#[cfg(feature = "client")]
pub mod client;
#[cfg(feature = "server")]
pub mod store;

#[cfg(feature = "server")]
pub use api::{ShareApiError, ShareApiState, share_router};
#[cfg(feature = "client")]
pub use client::ShareClient;
pub use protocol::{ApiError, CreateShareResponse, ShareStats};
#[cfg(feature = "server")]
pub use store::{ShareStore, ShareStoreError};
