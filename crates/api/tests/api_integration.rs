//! Integration tests for the API server against real PostgreSQL.

use std::sync::{Arc, OnceLock};

use axum::body::Body;
use axum::http::{Request, StatusCode};
use metrics_exporter_prometheus::PrometheusHandle;
use rust_decimal_macros::dec;
use serial_test::serial;
use sqlx::PgPool;
use storage::PgStore;
use testcontainers::{ContainerAsync, runners::AsyncRunner};
use testcontainers_modules::postgres::Postgres;
use tokio::sync::OnceCell;
use tower::ServiceExt;

static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

fn get_metrics_handle() -> PrometheusHandle {
    METRICS_HANDLE
        .get_or_init(|| {
            let builder = metrics_exporter_prometheus::PrometheusBuilder::new();
            builder
                .install_recorder()
                .expect("failed to install Prometheus recorder")
        })
        .clone()
}

/// Shared container info - container stays alive for all tests
struct ContainerInfo {
    #[allow(dead_code)] // Container must stay alive for tests
    container: ContainerAsync<Postgres>,
    connection_string: String,
}

static CONTAINER: OnceCell<Arc<ContainerInfo>> = OnceCell::const_new();

async fn get_container_info() -> Arc<ContainerInfo> {
    CONTAINER
        .get_or_init(|| async {
            let container = Postgres::default().start().await.unwrap();

            let host = container.get_host().await.unwrap();
            let port = container.get_host_port_ipv4(5432).await.unwrap();

            let connection_string =
                format!("postgres://postgres:postgres@{}:{}/postgres", host, port);

            let temp_pool = PgPool::connect(&connection_string).await.unwrap();
            sqlx::raw_sql(include_str!("../../../migrations/001_create_tables.sql"))
                .execute(&temp_pool)
                .await
                .unwrap();
            temp_pool.close().await;

            Arc::new(ContainerInfo {
                container,
                connection_string,
            })
        })
        .await
        .clone()
}

async fn setup() -> axum::Router {
    let info = get_container_info().await;

    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .connect(&info.connection_string)
        .await
        .unwrap();

    sqlx::query("TRUNCATE TABLE order_items, orders, products, clients")
        .execute(&pool)
        .await
        .unwrap();

    let state = api::create_state(PgStore::new(pool));
    api::create_app(state, get_metrics_handle())
}

async fn request_json(
    app: &axum::Router,
    method: &str,
    uri: &str,
    body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(&json).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

async fn create_product(app: &axum::Router, stock: rust_decimal::Decimal) -> String {
    let (status, body) = request_json(
        app,
        "POST",
        "/products",
        Some(serde_json::json!({
            "name": "Chocolate cookie",
            "sell_price": dec!(5.00),
            "stock": stock,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_str().unwrap().to_string()
}

async fn product_stock(app: &axum::Router, product_id: &str) -> rust_decimal::Decimal {
    let (status, body) = request_json(app, "GET", &format!("/products/{product_id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    body["stock"].as_str().unwrap().parse().unwrap()
}

#[tokio::test]
#[serial]
async fn test_health_check() {
    let app = setup().await;

    let (status, body) = request_json(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
#[serial]
async fn test_create_order_decrements_stock() {
    let app = setup().await;
    let product_id = create_product(&app, dec!(10)).await;

    let (status, body) = request_json(
        &app,
        "POST",
        "/orders",
        Some(serde_json::json!({
            "payment_method": "cash",
            "shipping_fee": "1.00",
            "items": [{ "product_id": product_id, "quantity": "2", "unit_price": "5.00" }],
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Order created");
    let order_id = body["id"].as_str().unwrap().to_string();

    let (status, body) = request_json(&app, "GET", &format!("/orders/{order_id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_value"].as_str().unwrap().parse::<rust_decimal::Decimal>().unwrap(), dec!(11.00));
    assert_eq!(body["status"], "New");

    assert_eq!(product_stock(&app, &product_id).await, dec!(8));
}

#[tokio::test]
#[serial]
async fn test_cancel_then_recancel_is_precondition_failed() {
    let app = setup().await;
    let product_id = create_product(&app, dec!(10)).await;

    let (_, body) = request_json(
        &app,
        "POST",
        "/orders",
        Some(serde_json::json!({
            "items": [{ "product_id": product_id, "quantity": "5", "unit_price": "5.00" }],
        })),
    )
    .await;
    let order_id = body["id"].as_str().unwrap().to_string();
    assert_eq!(product_stock(&app, &product_id).await, dec!(5));

    let (status, _) = request_json(
        &app,
        "PATCH",
        &format!("/orders/{order_id}/status"),
        Some(serde_json::json!({ "status": "Cancelled" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(product_stock(&app, &product_id).await, dec!(10));

    let (status, body) = request_json(
        &app,
        "PATCH",
        &format!("/orders/{order_id}/status"),
        Some(serde_json::json!({ "status": "Cancelled" })),
    )
    .await;
    assert_eq!(status, StatusCode::PRECONDITION_FAILED);
    assert_eq!(body["error"], "precondition failed");
    assert_eq!(product_stock(&app, &product_id).await, dec!(10));
}

#[tokio::test]
#[serial]
async fn test_update_replaces_items() {
    let app = setup().await;
    let product_id = create_product(&app, dec!(10)).await;

    let (_, body) = request_json(
        &app,
        "POST",
        "/orders",
        Some(serde_json::json!({
            "shipping_fee": "1.00",
            "items": [{ "product_id": product_id, "quantity": "2", "unit_price": "5.00" }],
        })),
    )
    .await;
    let order_id = body["id"].as_str().unwrap().to_string();

    let (status, body) = request_json(
        &app,
        "PUT",
        &format!("/orders/{order_id}"),
        Some(serde_json::json!({
            "shipping_fee": "1.00",
            "items": [{ "product_id": product_id, "quantity": "5", "unit_price": "5.00" }],
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Order updated");

    assert_eq!(product_stock(&app, &product_id).await, dec!(5));

    let (_, body) = request_json(&app, "GET", &format!("/orders/{order_id}"), None).await;
    assert_eq!(body["total_value"].as_str().unwrap().parse::<rust_decimal::Decimal>().unwrap(), dec!(26.00));
    assert_eq!(body["items"].as_array().unwrap().len(), 1);
}

#[tokio::test]
#[serial]
async fn test_delete_releases_stock() {
    let app = setup().await;
    let product_id = create_product(&app, dec!(10)).await;

    let (_, body) = request_json(
        &app,
        "POST",
        "/orders",
        Some(serde_json::json!({
            "items": [{ "product_id": product_id, "quantity": "4", "unit_price": "5.00" }],
        })),
    )
    .await;
    let order_id = body["id"].as_str().unwrap().to_string();

    let (status, _) = request_json(&app, "DELETE", &format!("/orders/{order_id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(product_stock(&app, &product_id).await, dec!(10));

    let (status, _) = request_json(&app, "GET", &format!("/orders/{order_id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
#[serial]
async fn test_invalid_quantity_is_bad_request() {
    let app = setup().await;
    let product_id = create_product(&app, dec!(10)).await;

    let (status, body) = request_json(
        &app,
        "POST",
        "/orders",
        Some(serde_json::json!({
            "items": [{ "product_id": product_id, "quantity": "0", "unit_price": "5.00" }],
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation failed");

    assert_eq!(product_stock(&app, &product_id).await, dec!(10));
}

#[tokio::test]
#[serial]
async fn test_unknown_status_is_bad_request() {
    let app = setup().await;
    let product_id = create_product(&app, dec!(10)).await;

    let (_, body) = request_json(
        &app,
        "POST",
        "/orders",
        Some(serde_json::json!({
            "items": [{ "product_id": product_id, "quantity": "1", "unit_price": "5.00" }],
        })),
    )
    .await;
    let order_id = body["id"].as_str().unwrap().to_string();

    let (status, _) = request_json(
        &app,
        "PATCH",
        &format!("/orders/{order_id}/status"),
        Some(serde_json::json!({ "status": "Reopened" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[serial]
async fn test_order_with_unknown_product_is_not_found() {
    let app = setup().await;

    let (status, body) = request_json(
        &app,
        "POST",
        "/orders",
        Some(serde_json::json!({
            "items": [{
                "product_id": uuid::Uuid::new_v4(),
                "quantity": "1",
                "unit_price": "5.00"
            }],
        })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not found");
}

#[tokio::test]
#[serial]
async fn test_client_crud_roundtrip() {
    let app = setup().await;

    let (status, body) = request_json(
        &app,
        "POST",
        "/clients",
        Some(serde_json::json!({ "name": "Maria", "phone": "555-0101" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let client_id = body["id"].as_str().unwrap().to_string();

    let (status, body) = request_json(&app, "GET", &format!("/clients/{client_id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Maria");

    let (status, _) = request_json(
        &app,
        "PUT",
        &format!("/clients/{client_id}"),
        Some(serde_json::json!({ "name": "Maria Silva" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = request_json(&app, "DELETE", &format!("/clients/{client_id}"), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = request_json(&app, "GET", &format!("/clients/{client_id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
