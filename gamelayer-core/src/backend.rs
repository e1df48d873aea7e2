//! Storage backend abstraction for the document store.
//!
//! This module defines the traits that abstract over storage implementations so the
//! layers above stay backend-agnostic.
//!
//! # Traits
//!
//! - [`StoreBackend`]: The core trait for storage backends
//! - [`DynStoreBackend`]: An object-safe mirror for runtime backend selection
//! - [`StoreBackendBuilder`]: Factory trait for creating backend instances
//!
//! # Examples
//!
//! ```ignore
//! use gamelayer::backend::StoreBackend;
//! use bson::{Bson, doc};
//!
//! let backend = MyBackendImpl::new();
//!
//! let stored = backend
//!     .insert_documents(vec![Bson::Document(doc! { "title": "Discworld" })], "games")
//!     .await?;
//! assert!(stored[0].as_document().unwrap().contains_key("id"));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use async_trait::async_trait;
use bson::Bson;
use std::fmt::Debug;

use crate::{document::DocumentId, error::DocumentStoreResult, query::Query};

/// Abstract interface for document storage backends.
///
/// Documents cross this boundary as BSON documents that carry their identifier under
/// [`ID_FIELD`](crate::document::ID_FIELD). Every implementation must honor the same
/// semantics:
///
/// - Identifiers are generated by the backend on insert and never change.
/// - Fields registered through [`add_index`](StoreBackend::add_index) with
///   `unique = true` are enforced on every write, failing with
///   [`DuplicateKey`](crate::error::DocumentStoreError::DuplicateKey).
/// - Query results come back in insertion order.
/// - Writes targeting a missing id fail with
///   [`DocumentNotFound`](crate::error::DocumentStoreError::DocumentNotFound).
///
/// # Thread Safety
///
/// All implementations must be thread-safe and support concurrent access from multiple
/// async tasks. Each single-document write must be atomic.
#[async_trait]
pub trait StoreBackend: Send + Sync + Debug {
    /// Ensures a collection exists. Creating an existing collection is a no-op.
    async fn create_collection(&self, name: &str) -> DocumentStoreResult<()>;

    /// Creates an index on a field in a collection.
    ///
    /// With `unique` set, later writes that would duplicate a value of `field` are rejected.
    async fn add_index(
        &self,
        collection: &str,
        field: &str,
        unique: bool,
    ) -> DocumentStoreResult<()>;

    /// Inserts new documents, assigning each a fresh identifier.
    ///
    /// Any identifier already present in the input is overwritten. Returns the stored
    /// documents, identifiers included, in input order.
    async fn insert_documents(
        &self,
        documents: Vec<Bson>,
        collection: &str,
    ) -> DocumentStoreResult<Vec<Bson>>;

    /// Retrieves documents by their IDs.
    ///
    /// Missing IDs are simply omitted from the results.
    async fn get_documents(
        &self,
        ids: Vec<DocumentId>,
        collection: &str,
    ) -> DocumentStoreResult<Vec<Bson>>;

    /// Returns the documents matching `query`, in insertion order.
    async fn query_documents(
        &self,
        query: Query,
        collection: &str,
    ) -> DocumentStoreResult<Vec<Bson>>;

    /// Overwrites every field of a document except its identifier.
    ///
    /// Returns the stored document after the write.
    async fn replace_document(
        &self,
        id: DocumentId,
        document: Bson,
        collection: &str,
    ) -> DocumentStoreResult<Bson>;

    /// Overwrites only the fields present (and non-null) in `fields`.
    ///
    /// Returns the stored document after the write.
    async fn merge_document(
        &self,
        id: DocumentId,
        fields: Bson,
        collection: &str,
    ) -> DocumentStoreResult<Bson>;

    /// Removes a document and returns its last stored value.
    async fn delete_document(&self, id: DocumentId, collection: &str) -> DocumentStoreResult<Bson>;

    /// Cleanly shuts down the backend, releasing all resources.
    ///
    /// The default implementation is a no-op.
    async fn shutdown(self) -> DocumentStoreResult<()>
    where
        Self: Sized,
    {
        Ok(())
    }
}

/// Object-safe counterpart of [`StoreBackend`].
///
/// Every `StoreBackend` implements it automatically, and `Box<dyn DynStoreBackend>`
/// implements `StoreBackend` again, so a backend chosen at runtime plugs into the same
/// generic APIs as a concrete one.
#[async_trait]
pub trait DynStoreBackend: Send + Sync + Debug {
    async fn create_collection(&self, name: &str) -> DocumentStoreResult<()>;
    async fn add_index(
        &self,
        collection: &str,
        field: &str,
        unique: bool,
    ) -> DocumentStoreResult<()>;
    async fn insert_documents(
        &self,
        documents: Vec<Bson>,
        collection: &str,
    ) -> DocumentStoreResult<Vec<Bson>>;
    async fn get_documents(
        &self,
        ids: Vec<DocumentId>,
        collection: &str,
    ) -> DocumentStoreResult<Vec<Bson>>;
    async fn query_documents(
        &self,
        query: Query,
        collection: &str,
    ) -> DocumentStoreResult<Vec<Bson>>;
    async fn replace_document(
        &self,
        id: DocumentId,
        document: Bson,
        collection: &str,
    ) -> DocumentStoreResult<Bson>;
    async fn merge_document(
        &self,
        id: DocumentId,
        fields: Bson,
        collection: &str,
    ) -> DocumentStoreResult<Bson>;
    async fn delete_document(&self, id: DocumentId, collection: &str) -> DocumentStoreResult<Bson>;
    async fn shutdown_boxed(self: Box<Self>) -> DocumentStoreResult<()>;
}

#[async_trait]
impl<B: StoreBackend + 'static> DynStoreBackend for B {
    async fn create_collection(&self, name: &str) -> DocumentStoreResult<()> {
        StoreBackend::create_collection(self, name).await
    }

    async fn add_index(
        &self,
        collection: &str,
        field: &str,
        unique: bool,
    ) -> DocumentStoreResult<()> {
        StoreBackend::add_index(self, collection, field, unique).await
    }

    async fn insert_documents(
        &self,
        documents: Vec<Bson>,
        collection: &str,
    ) -> DocumentStoreResult<Vec<Bson>> {
        StoreBackend::insert_documents(self, documents, collection).await
    }

    async fn get_documents(
        &self,
        ids: Vec<DocumentId>,
        collection: &str,
    ) -> DocumentStoreResult<Vec<Bson>> {
        StoreBackend::get_documents(self, ids, collection).await
    }

    async fn query_documents(
        &self,
        query: Query,
        collection: &str,
    ) -> DocumentStoreResult<Vec<Bson>> {
        StoreBackend::query_documents(self, query, collection).await
    }

    async fn replace_document(
        &self,
        id: DocumentId,
        document: Bson,
        collection: &str,
    ) -> DocumentStoreResult<Bson> {
        StoreBackend::replace_document(self, id, document, collection).await
    }

    async fn merge_document(
        &self,
        id: DocumentId,
        fields: Bson,
        collection: &str,
    ) -> DocumentStoreResult<Bson> {
        StoreBackend::merge_document(self, id, fields, collection).await
    }

    async fn delete_document(&self, id: DocumentId, collection: &str) -> DocumentStoreResult<Bson> {
        StoreBackend::delete_document(self, id, collection).await
    }

    async fn shutdown_boxed(self: Box<Self>) -> DocumentStoreResult<()> {
        StoreBackend::shutdown(*self).await
    }
}

#[async_trait]
impl StoreBackend for Box<dyn DynStoreBackend> {
    async fn create_collection(&self, name: &str) -> DocumentStoreResult<()> {
        DynStoreBackend::create_collection(&**self, name).await
    }

    async fn add_index(
        &self,
        collection: &str,
        field: &str,
        unique: bool,
    ) -> DocumentStoreResult<()> {
        DynStoreBackend::add_index(&**self, collection, field, unique).await
    }

    async fn insert_documents(
        &self,
        documents: Vec<Bson>,
        collection: &str,
    ) -> DocumentStoreResult<Vec<Bson>> {
        DynStoreBackend::insert_documents(&**self, documents, collection).await
    }

    async fn get_documents(
        &self,
        ids: Vec<DocumentId>,
        collection: &str,
    ) -> DocumentStoreResult<Vec<Bson>> {
        DynStoreBackend::get_documents(&**self, ids, collection).await
    }

    async fn query_documents(
        &self,
        query: Query,
        collection: &str,
    ) -> DocumentStoreResult<Vec<Bson>> {
        DynStoreBackend::query_documents(&**self, query, collection).await
    }

    async fn replace_document(
        &self,
        id: DocumentId,
        document: Bson,
        collection: &str,
    ) -> DocumentStoreResult<Bson> {
        DynStoreBackend::replace_document(&**self, id, document, collection).await
    }

    async fn merge_document(
        &self,
        id: DocumentId,
        fields: Bson,
        collection: &str,
    ) -> DocumentStoreResult<Bson> {
        DynStoreBackend::merge_document(&**self, id, fields, collection).await
    }

    async fn delete_document(&self, id: DocumentId, collection: &str) -> DocumentStoreResult<Bson> {
        DynStoreBackend::delete_document(&**self, id, collection).await
    }

    async fn shutdown(self) -> DocumentStoreResult<()> {
        <dyn DynStoreBackend as DynStoreBackend>::shutdown_boxed(self).await
    }
}

#[async_trait]
pub trait StoreBackendBuilder {
    type Backend: StoreBackend;

    async fn build(self) -> DocumentStoreResult<Self::Backend>;
}
