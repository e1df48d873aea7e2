//! Typed collections over a storage backend.
//!
//! A [`TypedCollection`] is the record store for one document type: it serializes
//! inputs to BSON, hands them to the backend and deserializes whatever the backend
//! returns back into the document type.
//!
//! # Example
//!
//! ```ignore
//! let games = store.typed_collection::<Game>();
//! let created = games.insert(vec![fields]).await?;
//! let same = games.get(*created[0].id()).await?;
//! ```

use bson::{Bson, de::deserialize_from_bson, ser::serialize_to_bson};
use serde::Serialize;
use std::marker::PhantomData;

use crate::{
    backend::StoreBackend,
    document::{Document, DocumentId},
    error::{DocumentStoreError, DocumentStoreResult},
    query::{Expr, Query},
};

#[derive(Debug)]
pub struct TypedCollection<'a, B: StoreBackend, D: Document> {
    name: String,
    backend: &'a B,
    _marker: PhantomData<D>,
}

impl<'a, B: StoreBackend, D: Document> TypedCollection<'a, B, D> {
    pub(crate) fn new(name: String, backend: &'a B) -> Self {
        Self { name, backend, _marker: PhantomData }
    }

    /// Returns the name of this collection.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Inserts new records built from `fields`, letting the backend assign their ids.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentStoreError::DuplicateKey`] if a unique field collides.
    pub async fn insert<F: Serialize>(&self, fields: Vec<F>) -> DocumentStoreResult<Vec<D>> {
        self.backend
            .insert_documents(
                fields
                    .iter()
                    .map(to_document)
                    .collect::<DocumentStoreResult<Vec<_>>>()?,
                self.name(),
            )
            .await?
            .into_iter()
            .map(from_document)
            .collect()
    }

    /// Retrieves a record by id, or `None` if it does not exist.
    pub async fn get(&self, id: DocumentId) -> DocumentStoreResult<Option<D>> {
        self.backend
            .get_documents(vec![id], self.name())
            .await?
            .into_iter()
            .next()
            .map(from_document)
            .transpose()
    }

    /// Returns every record matching `filter` in insertion order.
    ///
    /// A `None` filter returns the whole collection.
    pub async fn find_all(&self, filter: Option<Expr>) -> DocumentStoreResult<Vec<D>> {
        self.query(Query::builder().filter_opt(filter).build())
            .await
    }

    /// Returns the first record matching `filter` in insertion order.
    pub async fn find_one(&self, filter: Option<Expr>) -> DocumentStoreResult<Option<D>> {
        Ok(self
            .query(Query::builder().filter_opt(filter).limit(1).build())
            .await?
            .into_iter()
            .next())
    }

    /// Runs an arbitrary query against the collection.
    pub async fn query(&self, query: Query) -> DocumentStoreResult<Vec<D>> {
        self.backend
            .query_documents(query, self.name())
            .await?
            .into_iter()
            .map(from_document)
            .collect()
    }

    /// Overwrites every field of the record except its id.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentStoreError::DocumentNotFound`] if no record has this id.
    pub async fn replace<F: Serialize>(&self, id: DocumentId, fields: &F) -> DocumentStoreResult<D> {
        from_document(
            self.backend
                .replace_document(id, to_document(fields)?, self.name())
                .await?,
        )
    }

    /// Overwrites only the fields `fields` serializes; skipped or null fields keep their
    /// stored values.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentStoreError::DocumentNotFound`] if no record has this id.
    pub async fn merge<F: Serialize>(&self, id: DocumentId, fields: &F) -> DocumentStoreResult<D> {
        from_document(
            self.backend
                .merge_document(id, to_document(fields)?, self.name())
                .await?,
        )
    }

    /// Deletes the record and returns its last value.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentStoreError::DocumentNotFound`] if no record has this id.
    pub async fn delete(&self, id: DocumentId) -> DocumentStoreResult<D> {
        from_document(
            self.backend
                .delete_document(id, self.name())
                .await?,
        )
    }

    /// Creates the collection and the unique indexes declared by the document type.
    pub async fn ensure_indexes(&self) -> DocumentStoreResult<()> {
        self.backend.create_collection(self.name()).await?;

        for field in D::unique_fields() {
            self.backend
                .add_index(self.name(), field, true)
                .await?;
        }

        Ok(())
    }
}

fn to_document<F: Serialize>(fields: &F) -> DocumentStoreResult<Bson> {
    match serialize_to_bson(fields)? {
        document @ Bson::Document(_) => Ok(document),
        other => Err(DocumentStoreError::InvalidDocument(format!(
            "expected a document, got {:?}",
            other.element_type()
        ))),
    }
}

fn from_document<D: Document>(bson: Bson) -> DocumentStoreResult<D> {
    Ok(deserialize_from_bson(bson)?)
}
