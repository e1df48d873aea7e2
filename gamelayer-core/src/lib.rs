//! A thin document store abstraction with typed collections over pluggable backends.
//!
//! This crate is the core of the gamelayer project and provides:
//!
//! - **Document traits** ([`document`]) - The `Document` trait and store-generated `DocumentId`
//! - **Store backend abstraction** ([`backend`]) - The contract every storage backend honors
//! - **Query and filtering API** ([`query`]) - Predicate expressions and the visitor backends use
//! - **Collections interface** ([`collection`]) - Typed record store for one document type
//! - **Document store** ([`store`]) - Entry point owning a backend
//! - **Error handling** ([`error`]) - Storage error taxonomy and result type
//!
//! # Example
//!
//! ```ignore
//! use gamelayer::{Document, document::DocumentId};
//! use serde::{Serialize, Deserialize};
//!
//! #[derive(Debug, Clone, Serialize, Deserialize, Document)]
//! #[document(collection = "users")]
//! pub struct User {
//!     pub id: DocumentId,
//!     pub name: String,
//! }
//! ```

#[allow(unused_extern_crates)]
extern crate self as gamelayer_core;

pub mod backend;
pub mod collection;
pub mod document;
pub mod error;
pub mod query;
pub mod store;
