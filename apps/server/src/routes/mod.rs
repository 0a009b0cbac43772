//! # HTTP Routes
//!
//! ```text
//! GET  /health                      liveness probe
//! GET  /api/products                list products
//! POST /api/products                add product
//! PUT  /api/products/:id            update product
//! DEL  /api/products/:id            delete product ({success})
//! GET  /api/customers               (same shape as products)
//! POST /api/customers
//! PUT  /api/customers/:id
//! DEL  /api/customers/:id
//! GET  /api/invoices                list invoices with details
//! POST /api/invoices                create invoice (the core operation)
//! GET  /api/analytics               revenue dashboard payload
//! ```
//!
//! Handlers parse their own JSON bodies from `Value` rather than relying
//! on the extractor's rejection, so a missing field is a clean 400 with
//! an `{"error"}` body instead of a framework-shaped 422.

pub mod analytics;
pub mod customers;
pub mod invoices;
pub mod products;

use std::sync::Arc;

use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use crate::error::HttpError;
use billing_db::Database;

/// Shared application state.
#[derive(Debug, Clone)]
pub struct AppState {
    pub db: Database,
}

/// Builds the full application router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .nest("/api/products", products::routes())
        .nest("/api/customers", customers::routes())
        .nest("/api/invoices", invoices::routes())
        .nest("/api/analytics", analytics::routes())
        .with_state(state)
}

/// Liveness probe; also pings the database.
async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let db_ok = state.db.health_check().await;
    Json(json!({ "status": if db_ok { "ok" } else { "degraded" } }))
}

/// Parses a JSON body into a typed input, mapping malformed or missing
/// fields to a 400.
pub(crate) fn parse_body<T: DeserializeOwned>(body: Value) -> Result<T, HttpError> {
    serde_json::from_value(body)
        .map_err(|e| HttpError::bad_request(format!("Invalid request body: {e}")))
}

// =============================================================================
// Router Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use billing_db::DbConfig;
    use tower::util::ServiceExt;

    async fn test_app() -> Router {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        router(Arc::new(AppState { db }))
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn post(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get_req(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let app = test_app().await;
        let response = app.oneshot(get_req("/health")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["status"], "ok");
    }

    #[tokio::test]
    async fn test_create_invoice_end_to_end() {
        let app = test_app().await;

        let response = app
            .clone()
            .oneshot(post(
                "/api/customers",
                serde_json::json!({
                    "name": "Ali Traders",
                    "mobile": "9876543210",
                    "address": "12 Workshop Road"
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let customer = body_json(response).await;

        let response = app
            .clone()
            .oneshot(post(
                "/api/products",
                serde_json::json!({"name": "Engine Oil 1L", "rate": 5000}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let product = body_json(response).await;

        let response = app
            .clone()
            .oneshot(post(
                "/api/invoices",
                serde_json::json!({
                    "customerId": customer["id"],
                    "total": 10000,
                    "items": [{
                        "id": product["id"],
                        "quantity": 2,
                        "rate": 5000,
                        "total": 10000
                    }]
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let created = body_json(response).await;
        assert!(created["invoice"]["invoiceNumber"]
            .as_str()
            .unwrap()
            .starts_with("001/"));

        let response = app.clone().oneshot(get_req("/api/invoices")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let listed = body_json(response).await;
        assert_eq!(listed[0]["customerDetails"]["name"], "Ali Traders");

        let response = app.oneshot(get_req("/api/analytics")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let analytics = body_json(response).await;
        assert_eq!(analytics["currentMonthRevenue"], 10000);
    }

    #[tokio::test]
    async fn test_create_invoice_missing_fields_is_400() {
        let app = test_app().await;

        let response = app
            .oneshot(post("/api/invoices", serde_json::json!({"total": 100})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert!(body["error"].as_str().unwrap().contains("Invalid request body"));
    }

    #[tokio::test]
    async fn test_create_invoice_unknown_customer_is_400() {
        let app = test_app().await;

        let response = app
            .clone()
            .oneshot(post(
                "/api/products",
                serde_json::json!({"name": "Engine Oil 1L", "rate": 5000}),
            ))
            .await
            .unwrap();
        let product = body_json(response).await;

        let response = app
            .oneshot(post(
                "/api/invoices",
                serde_json::json!({
                    "customerId": "ghost",
                    "total": 5000,
                    "items": [{"id": product["id"], "quantity": 1, "rate": 5000, "total": 5000}]
                }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert!(body["error"].as_str().unwrap().contains("Customer not found"));
    }

    #[tokio::test]
    async fn test_duplicate_product_name_is_409() {
        let app = test_app().await;
        let body = serde_json::json!({"name": "Engine Oil 1L", "rate": 5000});

        let response = app
            .clone()
            .oneshot(post("/api/products", body.clone()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app.oneshot(post("/api/products", body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_delete_referenced_product_is_409() {
        let app = test_app().await;

        let customer = body_json(
            app.clone()
                .oneshot(post(
                    "/api/customers",
                    serde_json::json!({
                        "name": "Ali Traders",
                        "mobile": "9876543210",
                        "address": "12 Workshop Road"
                    }),
                ))
                .await
                .unwrap(),
        )
        .await;
        let product = body_json(
            app.clone()
                .oneshot(post(
                    "/api/products",
                    serde_json::json!({"name": "Engine Oil 1L", "rate": 5000}),
                ))
                .await
                .unwrap(),
        )
        .await;

        app.clone()
            .oneshot(post(
                "/api/invoices",
                serde_json::json!({
                    "customerId": customer["id"],
                    "total": 5000,
                    "items": [{"id": product["id"], "quantity": 1, "rate": 5000, "total": 5000}]
                }),
            ))
            .await
            .unwrap();

        let delete = Request::builder()
            .method("DELETE")
            .uri(format!("/api/products/{}", product["id"].as_str().unwrap()))
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(delete).await.unwrap();

        assert_eq!(response.status(), StatusCode::CONFLICT);
    }
}
