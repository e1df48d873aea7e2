use async_trait::async_trait;
use futures::TryStreamExt;
use bson::{Document, Bson, doc};
use mongodb::{
    Client, Collection as MongoCollection, IndexModel,
    error::{Error as MongoError, ErrorKind, WriteFailure},
    options::{ClientOptions, FindOptions, IndexOptions, ReturnDocument},
};
use gamelayer_core::{
    backend::{StoreBackend, StoreBackendBuilder},
    document::{DocumentId, ID_FIELD},
    error::{DocumentStoreError, DocumentStoreResult},
    query::{Query, QueryVisitor},
};

use crate::query::{MongoQueryTranslator, MONGO_ID_FIELD};

const DUPLICATE_KEY: i32 = 11000;
const NAMESPACE_EXISTS: i32 = 48;


fn error_code(err: &MongoError) -> Option<i32> {
    match err.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(write_error)) => Some(write_error.code),
        ErrorKind::Command(command_error) => Some(command_error.code),
        _ => None,
    }
}

fn backend_error(err: MongoError, collection: &str) -> DocumentStoreError {
    match error_code(&err) {
        Some(DUPLICATE_KEY) => DocumentStoreError::DuplicateKey(err.to_string(), collection.to_string()),
        _ => DocumentStoreError::Backend(err.to_string()),
    }
}

fn not_found(id: &DocumentId, collection: &str) -> DocumentStoreError {
    DocumentStoreError::DocumentNotFound(id.to_string(), collection.to_string())
}

fn by_id(id: &DocumentId) -> Document {
    doc! { MONGO_ID_FIELD: *id }
}

fn ids_filter(ids: &[DocumentId]) -> Document {
    doc! { MONGO_ID_FIELD: { "$in": ids.iter().copied().map(Bson::from).collect::<Vec<_>>() } }
}


/// MongoDB storage backend.
///
/// Each document is stored with its [`DocumentId`] as `_id`. Results are sorted by
/// `_id`, which follows insertion order because ids are time-ordered. Replace, merge
/// and delete each run as a single `findAndModify`, relying on MongoDB's
/// per-document atomicity.
#[derive(Debug)]
pub struct MongoDbStore {
    client: Client,
    database: String,
}

impl MongoDbStore {
    pub fn new(client: Client, database: String) -> Self {
        Self { client, database }
    }

    pub fn builder(dsn: &str, database: &str) -> MongoDbStoreBuilder {
        MongoDbStoreBuilder::new(dsn, database)
    }

    fn get_collection(&self, collection_name: &str) -> MongoCollection<Document> {
        self.client
            .database(&self.database)
            .collection(collection_name)
    }

    /// Moves the document id into `_id`, dropping any caller-supplied `id`.
    fn prepare_document(&self, id: &DocumentId, document: Bson) -> DocumentStoreResult<Document> {
        let Bson::Document(fields) = document else {
            return Err(DocumentStoreError::InvalidDocument("Expected document".into()));
        };

        Ok(Document::from_iter(
            std::iter::once((MONGO_ID_FIELD.to_string(), Bson::from(*id)))
                .chain(
                    fields
                        .into_iter()
                        .filter(|(k, _)| k != ID_FIELD && k != MONGO_ID_FIELD),
                ),
        ))
    }

    /// Inverse of [`prepare_document`](Self::prepare_document): exposes `_id` as `id`.
    fn restore_document(&self, mut document: Document) -> Bson {
        if let Some(id) = document.remove(MONGO_ID_FIELD) {
            document.insert(ID_FIELD, id);
        }

        Bson::Document(document)
    }

    async fn find(&self, filter: Document, limit: Option<usize>, collection: &str) -> DocumentStoreResult<Vec<Bson>> {
        let mut options = FindOptions::default();
        options.sort = Some(doc! { MONGO_ID_FIELD: 1 });

        if let Some(limit) = limit {
            options.limit = Some(limit as i64);
        }

        Ok(
            self.get_collection(collection)
                .find(filter)
                .with_options(options)
                .await
                .map_err(|e| backend_error(e, collection))?
                .try_collect::<Vec<Document>>()
                .await
                .map_err(|e| backend_error(e, collection))?
                .into_iter()
                .map(|doc| self.restore_document(doc))
                .collect()
        )
    }

    /// Undoes the earlier inserts of a batch that failed partway.
    async fn remove_inserted(&self, target: &MongoCollection<Document>, ids: &[DocumentId], collection: &str) {
        if ids.is_empty() {
            return;
        }

        match target.delete_many(ids_filter(ids)).await {
            Ok(result) => log::debug!("rolled back {} document(s) in {collection}", result.deleted_count),
            Err(e) => log::error!("failed to roll back partial insert into {collection}: {e}"),
        }
    }

    async fn shutdown(self) -> DocumentStoreResult<()> {
        self.client.shutdown().await;

        Ok(())
    }
}

#[async_trait]
impl StoreBackend for MongoDbStore {
    async fn create_collection(&self, name: &str) -> DocumentStoreResult<()> {
        let database = self.client.database(&self.database);
        let existing = database
            .list_collection_names()
            .await
            .map_err(|e| backend_error(e, name))?;

        if existing.iter().any(|collection| collection == name) {
            return Ok(());
        }

        match database.create_collection(name).await {
            Ok(()) => Ok(()),
            // Another instance created it between the listing and now.
            Err(e) if error_code(&e) == Some(NAMESPACE_EXISTS) => Ok(()),
            Err(e) => Err(backend_error(e, name)),
        }
    }

    async fn add_index(&self, collection: &str, field: &str, unique: bool) -> DocumentStoreResult<()> {
        self.get_collection(collection)
            .create_index(
                IndexModel::builder()
                .keys(doc! { field: 1 })
                .options(
                    IndexOptions::builder()
                    .unique(unique)
                    .build()
                )
                .build()
            )
            .await
            .map_err(|e| backend_error(e, collection))?;

        log::debug!("index on {collection}.{field} ensured (unique: {unique})");

        Ok(())
    }

    async fn insert_documents(&self, documents: Vec<Bson>, collection: &str) -> DocumentStoreResult<Vec<Bson>> {
        let target = self.get_collection(collection);
        let prepared = documents
            .into_iter()
            .map(|document| {
                let id = DocumentId::generate();
                self.prepare_document(&id, document).map(|prepared| (id, prepared))
            })
            .collect::<DocumentStoreResult<Vec<_>>>()?;

        let mut inserted = Vec::with_capacity(prepared.len());
        let mut stored = Vec::with_capacity(prepared.len());

        // One insert per document so a duplicate key reports a single write error.
        // A failure removes what this batch already wrote, so the batch is all-or-nothing.
        for (id, prepared) in prepared {
            if let Err(e) = target.insert_one(&prepared).await {
                self.remove_inserted(&target, &inserted, collection).await;
                return Err(backend_error(e, collection));
            }

            inserted.push(id);
            stored.push(self.restore_document(prepared));
        }

        log::debug!("inserted {} document(s) into {collection}", stored.len());

        Ok(stored)
    }

    async fn get_documents(&self, ids: Vec<DocumentId>, collection: &str) -> DocumentStoreResult<Vec<Bson>> {
        self.find(ids_filter(&ids), None, collection).await
    }

    async fn query_documents(&self, query: Query, collection: &str) -> DocumentStoreResult<Vec<Bson>> {
        let filter = match &query.filter {
            Some(expr) => MongoQueryTranslator.visit_expr(expr)?,
            None => doc! {},
        };

        self.find(filter, query.limit, collection).await
    }

    async fn replace_document(&self, id: DocumentId, document: Bson, collection: &str) -> DocumentStoreResult<Bson> {
        let replaced = self.get_collection(collection)
            .find_one_and_replace(by_id(&id), self.prepare_document(&id, document)?)
            .return_document(ReturnDocument::After)
            .await
            .map_err(|e| backend_error(e, collection))?
            .ok_or_else(|| not_found(&id, collection))?;

        log::debug!("replaced {id} in {collection}");

        Ok(self.restore_document(replaced))
    }

    async fn merge_document(&self, id: DocumentId, fields: Bson, collection: &str) -> DocumentStoreResult<Bson> {
        let Bson::Document(fields) = fields else {
            return Err(DocumentStoreError::InvalidDocument("Expected document".into()));
        };

        let changes = Document::from_iter(
            fields
                .into_iter()
                .filter(|(k, v)| k != ID_FIELD && k != MONGO_ID_FIELD && *v != Bson::Null),
        );

        // MongoDB rejects an empty `$set`; nothing to change means a plain read.
        if changes.is_empty() {
            return self
                .find(by_id(&id), Some(1), collection)
                .await?
                .into_iter()
                .next()
                .ok_or_else(|| not_found(&id, collection));
        }

        let merged = self.get_collection(collection)
            .find_one_and_update(by_id(&id), doc! { "$set": changes })
            .return_document(ReturnDocument::After)
            .await
            .map_err(|e| backend_error(e, collection))?
            .ok_or_else(|| not_found(&id, collection))?;

        log::debug!("merged fields into {id} in {collection}");

        Ok(self.restore_document(merged))
    }

    async fn delete_document(&self, id: DocumentId, collection: &str) -> DocumentStoreResult<Bson> {
        let removed = self.get_collection(collection)
            .find_one_and_delete(by_id(&id))
            .await
            .map_err(|e| backend_error(e, collection))?
            .ok_or_else(|| not_found(&id, collection))?;

        log::debug!("deleted {id} from {collection}");

        Ok(self.restore_document(removed))
    }

    async fn shutdown(self) -> DocumentStoreResult<()> {
        self.shutdown().await
    }
}

pub struct MongoDbStoreBuilder {
    dsn: String,
    database: String,
    app_name: Option<String>,
}

impl MongoDbStoreBuilder {
    pub fn new(dsn: &str, database: &str) -> Self {
        Self {
            dsn: dsn.to_string(),
            database: database.to_string(),
            app_name: None,
        }
    }

    /// Sets the application name reported to the server in connection handshakes.
    pub fn app_name(mut self, app_name: &str) -> Self {
        self.app_name = Some(app_name.to_string());
        self
    }
}

#[async_trait]
impl StoreBackendBuilder for MongoDbStoreBuilder {
    type Backend = MongoDbStore;

    async fn build(self) -> DocumentStoreResult<Self::Backend> {
        let mut options = ClientOptions::parse(&self.dsn)
            .await
            .map_err(|e| DocumentStoreError::Initialization(e.to_string()))?;

        if self.app_name.is_some() {
            options.app_name = self.app_name;
        }

        Ok(MongoDbStore::new(
            Client::with_options(options)
                .map_err(|e| DocumentStoreError::Initialization(e.to_string()))?,
            self.database,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_filter_targets_every_primary_key() {
        let first = DocumentId::generate();
        let second = DocumentId::generate();

        assert_eq!(
            ids_filter(&[first, second]),
            doc! { "_id": { "$in": [first.to_string(), second.to_string()] } }
        );
    }
}
