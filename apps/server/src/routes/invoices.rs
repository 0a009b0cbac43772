//! # Invoice Routes
//!
//! `POST /api/invoices` is the web binding of the core creation
//! operation; the body and result shapes match the desktop bridge
//! exactly.

use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::Value;

use crate::error::HttpError;
use crate::routes::{parse_body, AppState};
use billing_bridge::commands::invoice::{
    self, CreateInvoiceInput, CreateInvoiceResponse, InvoiceSummaryDto,
};

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/", get(list).post(create))
}

async fn list(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<InvoiceSummaryDto>>, HttpError> {
    let invoices = invoice::list_invoices(&state.db).await?;
    Ok(Json(invoices))
}

async fn create(
    State(state): State<Arc<AppState>>,
    Json(body): Json<Value>,
) -> Result<Json<CreateInvoiceResponse>, HttpError> {
    let input: CreateInvoiceInput = parse_body(body)?;
    let created = invoice::create_invoice(&state.db, input).await?;
    Ok(Json(created))
}
