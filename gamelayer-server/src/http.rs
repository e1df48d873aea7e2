//! HTTP transport: maps the games routes onto [`GameService`] operations.
//!
//! ## Routes
//!
//! - `GET /game?id=` - look a game up by id
//! - `GET /game/random` - pick a random game
//! - `GET /game/:slug` - look a game up by slug
//! - `PUT /game/:id` - replace every field of a game
//! - `PATCH /game/:id` - change some fields of a game
//! - `DELETE /game/:id` - delete a game
//! - `POST /games` - create one game, or several from a JSON array
//! - `GET /games?series=&release=&genre=` - list games, optionally filtered

use std::sync::Arc;

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use gamelayer::{
    backend::StoreBackend,
    error::{GameError, GameResult},
    filter::GameFilter,
    game::{GameInput, GamePatch},
    response::{ApiResponse, OperationKind, reject, respond},
    service::GameService,
};

type SharedService<B> = State<Arc<GameService<B>>>;

/// Build the axum `Router` serving the games routes.
pub fn router<B: StoreBackend + 'static>(service: Arc<GameService<B>>) -> Router {
    Router::new()
        .route("/game", get(game_by_id::<B>))
        .route("/game/random", get(random_game::<B>))
        .route(
            "/game/:key",
            get(game_by_slug::<B>)
                .put(replace_game::<B>)
                .patch(merge_game::<B>)
                .delete(delete_game::<B>),
        )
        .route("/games", get(list_games::<B>).post(create_games::<B>))
        .with_state(service)
}

#[derive(Debug, Deserialize)]
struct IdQuery {
    id: Option<String>,
}

async fn game_by_id<B: StoreBackend + 'static>(
    State(service): SharedService<B>,
    Query(query): Query<IdQuery>,
) -> Response {
    let outcome = match query.id {
        Some(id) => service.get_game_by_id(&id).await,
        None => Err(GameError::NotFound("no id given".into())),
    };

    into_http(respond(OperationKind::Read, outcome))
}

async fn random_game<B: StoreBackend + 'static>(State(service): SharedService<B>) -> Response {
    into_http(respond(OperationKind::Read, service.get_random_game().await))
}

async fn game_by_slug<B: StoreBackend + 'static>(
    State(service): SharedService<B>,
    Path(slug): Path<String>,
) -> Response {
    into_http(respond(OperationKind::Read, service.get_game_by_slug(&slug).await))
}

async fn replace_game<B: StoreBackend + 'static>(
    State(service): SharedService<B>,
    Path(id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Response {
    let outcome = match decode::<GameInput>(body) {
        Ok(input) => service.replace_game(&id, input).await,
        Err(err) => Err(err),
    };

    into_http(respond(OperationKind::Update, outcome))
}

async fn merge_game<B: StoreBackend + 'static>(
    State(service): SharedService<B>,
    Path(id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Response {
    let outcome = match decode::<GamePatch>(body) {
        Ok(patch) => service.merge_game(&id, patch).await,
        Err(err) => Err(err),
    };

    into_http(respond(OperationKind::Update, outcome))
}

async fn delete_game<B: StoreBackend + 'static>(
    State(service): SharedService<B>,
    Path(id): Path<String>,
) -> Response {
    into_http(respond(OperationKind::Delete, service.delete_game(&id).await))
}

/// A JSON array creates every element; anything else creates one game.
async fn create_games<B: StoreBackend + 'static>(
    State(service): SharedService<B>,
    body: Result<Json<Value>, JsonRejection>,
) -> Response {
    let response = match body {
        Ok(Json(Value::Array(items))) => match decode_value::<Vec<GameInput>>(Value::Array(items)) {
            Ok(inputs) => respond(OperationKind::Create, service.create_games(inputs).await),
            Err(err) => reject(err),
        },
        body => match decode::<GameInput>(body) {
            Ok(input) => respond(OperationKind::Create, service.create_game(input).await),
            Err(err) => reject(err),
        },
    };

    into_http(response)
}

async fn list_games<B: StoreBackend + 'static>(
    State(service): SharedService<B>,
    filter: Result<Query<GameFilter>, QueryRejection>,
) -> Response {
    let response = match filter {
        Ok(Query(filter)) => respond(OperationKind::Read, service.list_games(&filter).await),
        Err(rejection) => reject(GameError::Validation(rejection.body_text())),
    };

    into_http(response)
}

fn decode<T: DeserializeOwned>(body: Result<Json<Value>, JsonRejection>) -> GameResult<T> {
    match body {
        Ok(Json(value)) => decode_value(value),
        Err(rejection) => Err(GameError::Validation(rejection.body_text())),
    }
}

fn decode_value<T: DeserializeOwned>(value: Value) -> GameResult<T> {
    serde_json::from_value(value).map_err(|err| GameError::Validation(format!("malformed game: {err}")))
}

fn into_http(response: ApiResponse) -> Response {
    let status = StatusCode::from_u16(response.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    match response.body {
        Some(body) => (status, Json(body)).into_response(),
        None => status.into_response(),
    }
}
