//! MongoDB backend implementation for gamelayer.
//!
//! This crate provides a MongoDB-based implementation of the `StoreBackend` trait,
//! so the catalog survives restarts and can be shared between service instances.
//!
//! To use this backend, include the `mongodb` feature in your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! gamelayer = { version = "x.y.z", features = ["mongodb"] }
//! ```
//!
//! # Features
//!
//! - **Persistent storage** - Data is persisted to MongoDB Atlas or self-hosted MongoDB
//! - **Server-side filtering** - Equality filters are translated to MongoDB queries
//! - **Unique indexes** - Unique document fields become MongoDB unique indexes
//! - **Atomic single-document writes** - Replace, merge and delete use `findAndModify`
//!
//! # Example
//!
//! ```ignore
//! use gamelayer::{backend::StoreBackendBuilder, mongodb::MongoDbStore};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = MongoDbStore::builder("mongodb://localhost:27017", "games")
//!         .build()
//!         .await?;
//!
//!     Ok(())
//! }
//! ```

#[allow(unused_extern_crates)]
extern crate self as gamelayer_mongodb;

pub mod store;
mod query;

pub use store::{MongoDbStore, MongoDbStoreBuilder};
