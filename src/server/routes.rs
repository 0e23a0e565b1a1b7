//! HTTP routes
//!
//! `/config` serves JSON resources and `/text` serves text resources. Both
//! take the identifier as the `id` query parameter:
//!
//! | Method | Operation | Success                     |
//! |--------|-----------|-----------------------------|
//! | GET    | fetch     | 200 with the stored bytes   |
//! | POST   | create    | 201                         |
//! | PUT    | upsert    | 201 if new, 200 if replaced |
//! | DELETE | remove    | 204                         |
//!
//! The query is taken as raw pairs so that a missing or repeated `id` reaches
//! the store's identifier check and is answered and audited like any other
//! bad identifier.

use axum::body::Bytes;
use axum::extract::{DefaultBodyLimit, Query, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{MethodRouter, get};
use axum::{Json, Router};
use serde::Serialize;
use std::sync::Arc;

use crate::error::StoreError;
use crate::service::ResourceService;
use crate::storage::ResourceKind;

pub type AppState = Arc<ResourceService>;

pub type QueryPairs = Vec<(String, String)>;

/// The `id` value of a query; repeated values are joined with `,`
fn requested_id(pairs: &[(String, String)]) -> String {
    pairs
        .iter()
        .filter(|(key, _)| key == "id")
        .map(|(_, value)| value.as_str())
        .collect::<Vec<_>>()
        .join(",")
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Build the router for all resource kinds
pub fn router(service: AppState, max_body_bytes: usize) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/config", kind_routes(ResourceKind::Json))
        .route("/text", kind_routes(ResourceKind::Text))
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .with_state(service)
}

fn kind_routes(kind: ResourceKind) -> MethodRouter<AppState> {
    get(move |state: State<AppState>, query: Query<QueryPairs>| {
        fetch_handler(kind, state, query)
    })
    .post(
        move |state: State<AppState>, query: Query<QueryPairs>, body: Bytes| {
            create_handler(kind, state, query, body)
        },
    )
    .put(
        move |state: State<AppState>, query: Query<QueryPairs>, body: Bytes| {
            upsert_handler(kind, state, query, body)
        },
    )
    .delete(move |state: State<AppState>, query: Query<QueryPairs>| {
        remove_handler(kind, state, query)
    })
}

async fn health_handler() -> impl IntoResponse {
    let response = HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };

    (StatusCode::OK, Json(response))
}

async fn fetch_handler(
    kind: ResourceKind,
    State(service): State<AppState>,
    Query(query): Query<QueryPairs>,
) -> Result<Response, StoreError> {
    let fetched = service.fetch(kind, &requested_id(&query)).await?;
    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, fetched.media_type())],
        fetched.content,
    )
        .into_response())
}

async fn create_handler(
    kind: ResourceKind,
    State(service): State<AppState>,
    Query(query): Query<QueryPairs>,
    body: Bytes,
) -> Result<StatusCode, StoreError> {
    service.create(kind, &requested_id(&query), &body).await?;
    Ok(StatusCode::CREATED)
}

async fn upsert_handler(
    kind: ResourceKind,
    State(service): State<AppState>,
    Query(query): Query<QueryPairs>,
    body: Bytes,
) -> Result<StatusCode, StoreError> {
    let written = service.upsert(kind, &requested_id(&query), &body).await?;
    Ok(if written.created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    })
}

async fn remove_handler(
    kind: ResourceKind,
    State(service): State<AppState>,
    Query(query): Query<QueryPairs>,
) -> Result<StatusCode, StoreError> {
    service.remove(kind, &requested_id(&query)).await?;
    Ok(StatusCode::NO_CONTENT)
}
