//! Product catalog endpoints.
//!
//! The only place an absolute `stock` value is ever written; the order path
//! adjusts stock exclusively through signed deltas.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use storage::products::{self, ProductRow};
use uuid::Uuid;

use crate::error::ApiError;
use crate::routes::orders::{AppState, MessageResponse};

#[derive(Deserialize)]
pub struct ProductRequest {
    pub name: String,
    pub sell_price: Decimal,
    #[serde(default)]
    pub stock: Decimal,
}

#[derive(Serialize)]
pub struct ProductResponse {
    pub id: Uuid,
    pub name: String,
    pub sell_price: Decimal,
    pub stock: Decimal,
    pub created_at: DateTime<Utc>,
}

#[derive(Serialize)]
pub struct ProductCreatedResponse {
    pub message: &'static str,
    pub id: Uuid,
}

impl From<ProductRow> for ProductResponse {
    fn from(row: ProductRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            sell_price: row.sell_price,
            stock: row.stock,
            created_at: row.created_at,
        }
    }
}

/// POST /products
#[tracing::instrument(skip(state, req))]
pub async fn create(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ProductRequest>,
) -> Result<(StatusCode, Json<ProductCreatedResponse>), ApiError> {
    if req.sell_price < Decimal::ZERO {
        return Err(ApiError::BadRequest("sell_price must not be negative".into()));
    }

    let id = Uuid::new_v4();
    products::insert(state.store.pool(), id, &req.name, req.sell_price, req.stock).await?;

    Ok((
        StatusCode::CREATED,
        Json(ProductCreatedResponse {
            message: "Product created",
            id,
        }),
    ))
}

/// GET /products
#[tracing::instrument(skip(state))]
pub async fn list(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<ProductResponse>>, ApiError> {
    let rows = products::list(state.store.pool()).await?;
    Ok(Json(rows.into_iter().map(ProductResponse::from).collect()))
}

/// GET /products/{id}
#[tracing::instrument(skip(state))]
pub async fn get(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ProductResponse>, ApiError> {
    let row = products::fetch(state.store.pool(), id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Product {id} not found")))?;

    Ok(Json(row.into()))
}

/// PUT /products/{id}
#[tracing::instrument(skip(state, req))]
pub async fn update(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(req): Json<ProductRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    if req.sell_price < Decimal::ZERO {
        return Err(ApiError::BadRequest("sell_price must not be negative".into()));
    }

    let updated =
        products::update(state.store.pool(), id, &req.name, req.sell_price, req.stock).await?;
    if updated == 0 {
        return Err(ApiError::NotFound(format!("Product {id} not found")));
    }

    Ok(Json(MessageResponse {
        message: "Product updated",
    }))
}

/// DELETE /products/{id}
#[tracing::instrument(skip(state))]
pub async fn delete(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, ApiError> {
    let deleted = products::delete(state.store.pool(), id).await?;
    if deleted == 0 {
        return Err(ApiError::NotFound(format!("Product {id} not found")));
    }

    Ok(Json(MessageResponse {
        message: "Product removed",
    }))
}
