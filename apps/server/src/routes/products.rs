//! # Product Routes

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::Value;

use crate::error::HttpError;
use crate::routes::{parse_body, AppState};
use billing_bridge::commands::product::{
    self, DeleteResponse, NewProductInput, ProductDto, UpdateProductInput,
};

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list).post(add))
        .route("/:id", axum::routing::put(update).delete(delete))
}

async fn list(State(state): State<Arc<AppState>>) -> Result<Json<Vec<ProductDto>>, HttpError> {
    let products = product::get_all_products(&state.db).await?;
    Ok(Json(products))
}

async fn add(
    State(state): State<Arc<AppState>>,
    Json(body): Json<Value>,
) -> Result<Json<ProductDto>, HttpError> {
    let input: NewProductInput = parse_body(body)?;
    let created = product::add_product(&state.db, input).await?;
    Ok(Json(created))
}

async fn update(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Result<Json<ProductDto>, HttpError> {
    let input: UpdateProductInput = parse_body(body)?;
    let updated = product::update_product(&state.db, &id, input).await?;
    Ok(Json(updated))
}

async fn delete(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>, HttpError> {
    let deleted = product::delete_product(&state.db, &id).await?;
    Ok(Json(deleted))
}
