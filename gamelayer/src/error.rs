//! Error taxonomy of the games service.
//!
//! Storage failures are translated into [`GameError`] at the service boundary so
//! callers never see backend-specific error shapes.

use thiserror::Error;

pub use gamelayer_core::error::{DocumentStoreError, DocumentStoreResult};

#[derive(Error, Debug)]
pub enum GameError {
    /// The request body is missing a required field or carries a malformed one.
    #[error("{0}")]
    Validation(String),
    /// A write would break a uniqueness constraint, such as a duplicate title.
    #[error("{0}")]
    ConstraintViolation(String),
    /// No game matches the given id or slug.
    #[error("game not found: {0}")]
    NotFound(String),
    /// A random pick was requested from an empty catalog.
    #[error("the catalog is empty")]
    EmptyCollection,
    /// The storage backend failed.
    #[error("storage failure: {0}")]
    Storage(String),
}

impl GameError {
    /// HTTP status code this error maps to.
    pub fn status_code(&self) -> u16 {
        match self {
            GameError::Validation(_) | GameError::ConstraintViolation(_) => 400,
            GameError::NotFound(_) | GameError::EmptyCollection => 404,
            GameError::Storage(_) => 500,
        }
    }
}

impl From<DocumentStoreError> for GameError {
    fn from(err: DocumentStoreError) -> Self {
        match err {
            DocumentStoreError::DuplicateKey(key, _) => {
                GameError::ConstraintViolation(format!("duplicate value for unique field ({key})"))
            }
            DocumentStoreError::DocumentNotFound(id, _) => GameError::NotFound(id),
            other => GameError::Storage(other.to_string()),
        }
    }
}

pub type GameResult<T> = Result<T, GameError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_key_becomes_constraint_violation() {
        let err = GameError::from(DocumentStoreError::DuplicateKey("title: Discworld".into(), "games".into()));

        assert!(matches!(err, GameError::ConstraintViolation(_)));
        assert_eq!(err.status_code(), 400);
    }

    #[test]
    fn missing_document_becomes_not_found() {
        let err = GameError::from(DocumentStoreError::DocumentNotFound("abc".into(), "games".into()));

        assert!(matches!(err, GameError::NotFound(ref id) if id == "abc"));
        assert_eq!(err.status_code(), 404);
    }

    #[test]
    fn everything_else_is_a_storage_failure() {
        let err = GameError::from(DocumentStoreError::Backend("connection reset".into()));

        assert!(matches!(err, GameError::Storage(_)));
        assert_eq!(err.status_code(), 500);
    }
}
