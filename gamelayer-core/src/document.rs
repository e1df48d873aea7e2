//! Core traits and types for document representation.
//!
//! Every stored document carries a [`DocumentId`] assigned by the backend on insert
//! and declares the collection it belongs to along with any fields that must stay
//! unique across that collection.

use serde::{Deserialize, Deserializer, Serialize, Serializer, de::Error as _};
use std::{fmt, str::FromStr};
use bson::Bson;
use uuid::Uuid;

/// Name of the field every stored document uses for its identifier.
pub const ID_FIELD: &str = "id";

/// Opaque, store-generated identifier of a document.
///
/// Identifiers are time-ordered (UUIDv7), so sorting by id yields insertion order.
/// They serialize as hyphenated strings in both JSON and BSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocumentId(Uuid);

impl DocumentId {
    /// Generates a fresh identifier.
    pub fn generate() -> Self {
        Self(Uuid::now_v7())
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

impl FromStr for DocumentId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

impl From<DocumentId> for Bson {
    fn from(id: DocumentId) -> Self {
        Bson::String(id.to_string())
    }
}

impl Serialize for DocumentId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DocumentId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;

        raw.parse().map_err(D::Error::custom)
    }
}

/// Core trait that all documents stored in a document store must implement.
///
/// Usually derived:
///
/// ```ignore
/// use gamelayer::{Document, document::DocumentId};
/// use serde::{Serialize, Deserialize};
///
/// #[derive(Debug, Clone, Serialize, Deserialize, Document)]
/// #[document(collection = "users")]
/// pub struct User {
///     pub id: DocumentId,
///     #[document(unique)]
///     pub email: String,
/// }
/// ```
pub trait Document: Serialize + for<'de> Deserialize<'de> + Send + Sync + Clone + 'static {
    /// Returns a reference to this document's unique identifier.
    fn id(&self) -> &DocumentId;

    /// Returns the name of the collection this document belongs to.
    fn collection_name() -> &'static str;

    /// Returns the fields whose values must be unique across the collection.
    fn unique_fields() -> &'static [&'static str] {
        &[]
    }
}
