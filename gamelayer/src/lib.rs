//! Games catalog: a CRUD resource service over a pluggable document store.
//!
//! This crate is the primary entry point of the gamelayer workspace. It re-exports the
//! storage layer from the sub-crates and adds the games domain on top of it:
//!
//! - [`game`] - The `Game` record and its create/replace/patch request shapes
//! - [`filter`] - Query-parameter filtering turned into store predicates
//! - [`service`] - `GameService`, the CRUD operations
//! - [`response`] - Mapping of outcomes to status codes and JSON envelopes
//!
//! # Quick Start
//!
//! ```ignore
//! use gamelayer::{prelude::*, memory::InMemoryStore};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let service = GameService::new(DocumentStore::new(InMemoryStore::new())).await?;
//!
//!     let created = service
//!         .create_game(GameInput {
//!             slug: Some("dw1".into()),
//!             genre: Some("Adventure".into()),
//!             series: Some("Discworld".into()),
//!             release: Some(1),
//!             title: Some("Discworld".into()),
//!         })
//!         .await?;
//!
//!     let response = respond(OperationKind::Read, service.get_game_by_slug("dw1").await);
//!     assert_eq!(response.status, 200);
//!
//!     service.shutdown().await?;
//!     Ok(())
//! }
//! ```
//!
//! # Dynamic Dispatch
//!
//! When the backend is picked at runtime, erase it with
//! [`DocumentStore::into_dyn`](store::DocumentStore::into_dyn) and build a
//! `GameService<Box<dyn DynStoreBackend>>`.
//!
//! # Backends
//!
//! - [`memory`] - In-memory storage for development and testing
//! - [`mongodb`] - Persistent MongoDB backend (requires `mongodb` feature)

#[allow(unused_extern_crates)]
extern crate self as gamelayer;

pub mod prelude;
pub mod error;
pub mod filter;
pub mod game;
pub mod response;
pub mod service;

pub use gamelayer_core::{collection, document, store, backend, query};
pub use gamelayer_macros::Document;

// Re-export BSON types for convenience
pub use bson;

/// In-memory storage backend implementations.
pub mod memory {
    pub use gamelayer_memory::{InMemoryStore, InMemoryStoreBuilder};
}

/// MongoDB storage backend implementations.
///
/// This module is only available when the `mongodb` feature is enabled.
#[cfg(feature = "mongodb")]
pub mod mongodb {
    pub use gamelayer_mongodb::{MongoDbStore, MongoDbStoreBuilder};
}
