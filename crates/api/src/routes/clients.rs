//! Client endpoints. Plain CRUD.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use storage::clients::{self, ClientRow};
use uuid::Uuid;

use crate::error::ApiError;
use crate::routes::orders::{AppState, MessageResponse};

#[derive(Deserialize)]
pub struct ClientRequest {
    pub name: String,
    pub phone: Option<String>,
    pub address: Option<String>,
}

#[derive(Serialize)]
pub struct ClientResponse {
    pub id: Uuid,
    pub name: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Serialize)]
pub struct ClientCreatedResponse {
    pub message: &'static str,
    pub id: Uuid,
}

impl From<ClientRow> for ClientResponse {
    fn from(row: ClientRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            phone: row.phone,
            address: row.address,
            created_at: row.created_at,
        }
    }
}

/// POST /clients
#[tracing::instrument(skip(state, req))]
pub async fn create(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ClientRequest>,
) -> Result<(StatusCode, Json<ClientCreatedResponse>), ApiError> {
    if req.name.trim().is_empty() {
        return Err(ApiError::BadRequest("name is required".into()));
    }

    let id = Uuid::new_v4();
    clients::insert(
        state.store.pool(),
        id,
        &req.name,
        req.phone.as_deref(),
        req.address.as_deref(),
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(ClientCreatedResponse {
            message: "Client created",
            id,
        }),
    ))
}

/// GET /clients
#[tracing::instrument(skip(state))]
pub async fn list(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<ClientResponse>>, ApiError> {
    let rows = clients::list(state.store.pool()).await?;
    Ok(Json(rows.into_iter().map(ClientResponse::from).collect()))
}

/// GET /clients/{id}
#[tracing::instrument(skip(state))]
pub async fn get(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ClientResponse>, ApiError> {
    let row = clients::fetch(state.store.pool(), id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Client {id} not found")))?;

    Ok(Json(row.into()))
}

/// PUT /clients/{id}
#[tracing::instrument(skip(state, req))]
pub async fn update(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(req): Json<ClientRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    if req.name.trim().is_empty() {
        return Err(ApiError::BadRequest("name is required".into()));
    }

    let updated = clients::update(
        state.store.pool(),
        id,
        &req.name,
        req.phone.as_deref(),
        req.address.as_deref(),
    )
    .await?;
    if updated == 0 {
        return Err(ApiError::NotFound(format!("Client {id} not found")));
    }

    Ok(Json(MessageResponse {
        message: "Client updated",
    }))
}

/// DELETE /clients/{id}
#[tracing::instrument(skip(state))]
pub async fn delete(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, ApiError> {
    let deleted = clients::delete(state.store.pool(), id).await?;
    if deleted == 0 {
        return Err(ApiError::NotFound(format!("Client {id} not found")));
    }

    Ok(Json(MessageResponse {
        message: "Client removed",
    }))
}
