//! In-memory document storage backend for gamelayer.
//!
//! This crate provides a thread-safe, in-memory implementation of the `StoreBackend` trait.
//! It is ideal for development, testing, and small catalogs that do not need to survive
//! a restart.
//!
//! # Features
//!
//! - **Serialized writes** - One async-aware RwLock per store; writers never interleave
//! - **Insertion order** - Documents come back in the order they were inserted
//! - **Unique indexes** - Enforced on insert, replace and merge, like a database index
//! - **Predicate filtering** - Evaluates query expressions in process
//!
//! # Quick Start
//!
//! ```ignore
//! use gamelayer::{prelude::*, memory::InMemoryStore};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let backend = InMemoryStore::builder().build().await?;
//!     let service = GameService::new(DocumentStore::new(backend)).await?;
//!
//!     let games = service.list_games(&GameFilter::default()).await?;
//!     assert!(games.is_empty());
//!
//!     Ok(())
//! }
//! ```

#[allow(unused_extern_crates)]
extern crate self as gamelayer_memory;

pub mod store;
mod evaluator;

pub use store::{InMemoryStore, InMemoryStoreBuilder};
