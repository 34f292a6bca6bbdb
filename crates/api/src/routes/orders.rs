//! Order lifecycle endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use common::{ClientId, OrderId, ProductId};
use domain::{Order, OrderDraft, OrderLine, OrderService, OrderStatus};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use storage::PgStore;
use uuid::Uuid;

use crate::error::ApiError;

/// Shared application state accessible from all handlers.
pub struct AppState {
    pub order_service: OrderService,
    pub store: PgStore,
}

// -- Request types --

#[derive(Deserialize)]
pub struct OrderRequest {
    pub client_id: Option<Uuid>,
    pub order_date: Option<DateTime<Utc>>,
    pub payment_method: Option<String>,
    pub notes: Option<String>,
    pub shipping_fee: Option<Decimal>,
    pub status: Option<String>,
    #[serde(default)]
    pub items: Vec<OrderItemRequest>,
}

#[derive(Deserialize)]
pub struct OrderItemRequest {
    pub product_id: Uuid,
    pub quantity: Decimal,
    pub unit_price: Decimal,
}

impl OrderRequest {
    fn into_draft(self) -> Result<OrderDraft, ApiError> {
        let status = match self.status.as_deref() {
            Some(s) => s
                .parse::<OrderStatus>()
                .map_err(|e| ApiError::BadRequest(e.to_string()))?,
            None => OrderStatus::New,
        };

        Ok(OrderDraft {
            client_id: self.client_id.map(ClientId::from_uuid),
            order_date: self.order_date.unwrap_or_else(Utc::now),
            payment_method: self.payment_method,
            notes: self.notes,
            shipping_fee: self.shipping_fee.unwrap_or(Decimal::ZERO),
            status,
            items: self
                .items
                .into_iter()
                .map(|i| OrderLine::new(ProductId::from_uuid(i.product_id), i.quantity, i.unit_price))
                .collect(),
        })
    }
}

#[derive(Deserialize)]
pub struct StatusRequest {
    pub status: String,
}

// -- Response types --

#[derive(Serialize)]
pub struct OrderCreatedResponse {
    pub message: &'static str,
    pub id: Uuid,
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

#[derive(Serialize)]
pub struct OrderResponse {
    pub id: Uuid,
    pub client_id: Option<Uuid>,
    pub order_date: DateTime<Utc>,
    pub payment_method: Option<String>,
    pub notes: Option<String>,
    pub shipping_fee: Decimal,
    pub total_value: Decimal,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub items: Vec<OrderItemResponse>,
}

#[derive(Serialize)]
pub struct OrderItemResponse {
    pub product_id: Uuid,
    pub quantity: Decimal,
    pub unit_price: Decimal,
    pub line_total: Decimal,
}

impl From<Order> for OrderResponse {
    fn from(order: Order) -> Self {
        Self {
            id: order.id.as_uuid(),
            client_id: order.client_id.map(|c| c.as_uuid()),
            order_date: order.order_date,
            payment_method: order.payment_method,
            notes: order.notes,
            shipping_fee: order.shipping_fee,
            total_value: order.total_value,
            status: order.status.to_string(),
            created_at: order.created_at,
            items: order
                .items
                .into_iter()
                .map(|i| OrderItemResponse {
                    product_id: i.product_id.as_uuid(),
                    quantity: i.quantity,
                    unit_price: i.unit_price,
                    line_total: i.line_total,
                })
                .collect(),
        }
    }
}

// -- Handlers --

/// POST /orders — create an order, committing stock for each line item.
#[tracing::instrument(skip(state, req))]
pub async fn create(
    State(state): State<Arc<AppState>>,
    Json(req): Json<OrderRequest>,
) -> Result<(StatusCode, Json<OrderCreatedResponse>), ApiError> {
    let draft = req.into_draft()?;
    let id = state.order_service.create(draft).await?;

    Ok((
        StatusCode::CREATED,
        Json(OrderCreatedResponse {
            message: "Order created",
            id: id.as_uuid(),
        }),
    ))
}

/// GET /orders — list all orders, newest first.
#[tracing::instrument(skip(state))]
pub async fn list(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<OrderResponse>>, ApiError> {
    let orders = state.order_service.list().await?;
    Ok(Json(orders.into_iter().map(OrderResponse::from).collect()))
}

/// GET /orders/{id} — load one order with its line items.
#[tracing::instrument(skip(state))]
pub async fn get(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<OrderResponse>, ApiError> {
    let order = state.order_service.get(OrderId::from_uuid(id)).await?;
    Ok(Json(order.into()))
}

/// PUT /orders/{id} — full replacement of header and item set.
#[tracing::instrument(skip(state, req))]
pub async fn update(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(req): Json<OrderRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let draft = req.into_draft()?;
    state
        .order_service
        .update(OrderId::from_uuid(id), draft)
        .await?;

    Ok(Json(MessageResponse {
        message: "Order updated",
    }))
}

/// PATCH /orders/{id}/status — transition the order's status.
#[tracing::instrument(skip(state, req))]
pub async fn change_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(req): Json<StatusRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let status = req
        .status
        .parse::<OrderStatus>()
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;

    state
        .order_service
        .change_status(OrderId::from_uuid(id), status)
        .await?;

    Ok(Json(MessageResponse {
        message: "Status updated",
    }))
}

/// DELETE /orders/{id} — remove the order, releasing stock if still active.
#[tracing::instrument(skip(state))]
pub async fn delete(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.order_service.delete(OrderId::from_uuid(id)).await?;

    Ok(Json(MessageResponse {
        message: "Order removed",
    }))
}
