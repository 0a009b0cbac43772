//! # Customer Routes

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::Value;

use crate::error::HttpError;
use crate::routes::{parse_body, AppState};
use billing_bridge::commands::customer::{
    self, CustomerDto, NewCustomerInput, UpdateCustomerInput,
};
use billing_bridge::commands::product::DeleteResponse;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list).post(add))
        .route("/:id", axum::routing::put(update).delete(delete))
}

async fn list(State(state): State<Arc<AppState>>) -> Result<Json<Vec<CustomerDto>>, HttpError> {
    let customers = customer::get_all_customers(&state.db).await?;
    Ok(Json(customers))
}

async fn add(
    State(state): State<Arc<AppState>>,
    Json(body): Json<Value>,
) -> Result<Json<CustomerDto>, HttpError> {
    let input: NewCustomerInput = parse_body(body)?;
    let created = customer::add_customer(&state.db, input).await?;
    Ok(Json(created))
}

async fn update(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Result<Json<CustomerDto>, HttpError> {
    let input: UpdateCustomerInput = parse_body(body)?;
    let updated = customer::update_customer(&state.db, &id, input).await?;
    Ok(Json(updated))
}

async fn delete(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>, HttpError> {
    let deleted = customer::delete_customer(&state.db, &id).await?;
    Ok(Json(deleted))
}
