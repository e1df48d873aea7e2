//! Main document store interface for interacting with document backends.
//!
//! - [`DocumentStore`] - Store bound to a concrete backend type
//! - [`DynDocumentStore`] - Store over a backend selected at runtime
//!
//! # Example
//!
//! ```ignore
//! use gamelayer::store::DocumentStore;
//!
//! let store = DocumentStore::new(backend);
//! store.register::<Game>().await?;
//! let games = store.typed_collection::<Game>();
//! ```

use crate::{
    backend::{DynStoreBackend, StoreBackend},
    collection::TypedCollection,
    document::Document,
    error::DocumentStoreResult,
};

/// A document store bound to a specific backend implementation.
///
/// # Type Parameters
///
/// * `B` - The backend implementation type
#[derive(Debug)]
pub struct DocumentStore<B: StoreBackend> {
    backend: B,
}

/// A document store whose backend was chosen at runtime.
pub type DynDocumentStore = DocumentStore<Box<dyn DynStoreBackend>>;

impl<B: StoreBackend> DocumentStore<B> {
    /// Creates a new document store with the given backend.
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    /// Gets a typed collection for the specified document type.
    ///
    /// The collection name is determined by the document type's `collection_name()` method.
    pub fn typed_collection<D: Document>(&self) -> TypedCollection<'_, B, D> {
        TypedCollection::new(D::collection_name().to_string(), &self.backend)
    }

    /// Prepares storage for a document type: creates its collection and unique indexes.
    ///
    /// Safe to call on every startup.
    pub async fn register<D: Document>(&self) -> DocumentStoreResult<()> {
        self.typed_collection::<D>()
            .ensure_indexes()
            .await
    }

    /// Shuts down the store and releases backend resources.
    ///
    /// # Errors
    ///
    /// Returns an error if the shutdown operation fails.
    pub async fn shutdown(self) -> DocumentStoreResult<()> {
        self.backend.shutdown().await
    }
}

impl<B: StoreBackend + 'static> DocumentStore<B> {
    /// Erases the backend type so stores over different backends share one type.
    pub fn into_dyn(self) -> DynDocumentStore {
        let backend: Box<dyn DynStoreBackend> = Box::new(self.backend);

        DocumentStore::new(backend)
    }
}
