//! Convenient re-exports of commonly used types from gamelayer.
//!
//! ```ignore
//! use gamelayer::prelude::*;
//! ```

pub use gamelayer_core::{
    collection::TypedCollection,
    store::{DocumentStore, DynDocumentStore},
    document::{Document, DocumentId},
    backend::{StoreBackend, DynStoreBackend, StoreBackendBuilder},
    query::{Query, QueryVisitor, Expr, QueryBuilder, Filter},
    error::{DocumentStoreError, DocumentStoreResult},
};

pub use crate::{
    error::{GameError, GameResult},
    filter::GameFilter,
    game::{Game, GameFields, GameInput, GamePatch},
    response::{ApiResponse, OperationKind, respond},
    service::GameService,
};

pub use gamelayer_macros::Document;
