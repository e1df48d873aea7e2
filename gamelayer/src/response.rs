//! Maps service outcomes to HTTP status codes and JSON envelopes.
//!
//! Successful outcomes become `{"status": "OK", "data": ...}`; validation and
//! constraint failures become `{"status": "ERROR", "message": ...}`; lookups that
//! find nothing carry no body at all.

use serde::Serialize;
use serde_json::{Value, json};

use crate::error::{GameError, GameResult};

/// What kind of operation produced an outcome. Decides the success status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    Create,
    Read,
    Update,
    Delete,
}

impl OperationKind {
    fn success_status(self) -> u16 {
        match self {
            OperationKind::Create => 201,
            OperationKind::Read | OperationKind::Update => 200,
            OperationKind::Delete => 204,
        }
    }
}

/// A transport-neutral response: status code plus optional JSON body.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Option<Value>,
}

impl ApiResponse {
    fn empty(status: u16) -> Self {
        Self { status, body: None }
    }

    fn ok(status: u16, data: Value) -> Self {
        Self { status, body: Some(json!({ "status": "OK", "data": data })) }
    }

    fn error(status: u16, message: String) -> Self {
        Self { status, body: Some(json!({ "status": "ERROR", "message": message })) }
    }
}

/// Builds the response for `outcome`.
pub fn respond<T: Serialize>(kind: OperationKind, outcome: GameResult<T>) -> ApiResponse {
    match outcome {
        Ok(_) if kind == OperationKind::Delete => ApiResponse::empty(kind.success_status()),
        Ok(data) => match serde_json::to_value(data) {
            Ok(data) => ApiResponse::ok(kind.success_status(), data),
            Err(err) => failure(GameError::Storage(err.to_string())),
        },
        Err(err) => failure(err),
    }
}

/// Response for a failure raised before the service is reached, such as an
/// undecodable request body.
pub fn reject(err: GameError) -> ApiResponse {
    failure(err)
}

fn failure(err: GameError) -> ApiResponse {
    let status = err.status_code();

    match err {
        GameError::NotFound(_) | GameError::EmptyCollection => {
            log::debug!("{err}");
            ApiResponse::empty(status)
        }
        GameError::Storage(_) => {
            log::error!("{err}");
            ApiResponse::error(status, err.to_string())
        }
        GameError::Validation(_) | GameError::ConstraintViolation(_) => {
            log::debug!("rejected request: {err}");
            ApiResponse::error(status, err.to_string())
        }
    }
}
