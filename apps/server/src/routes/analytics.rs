//! # Analytics Routes

use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};

use crate::error::HttpError;
use crate::routes::AppState;
use billing_bridge::commands::analytics::{self, AnalyticsDto};

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/", get(summary))
}

async fn summary(State(state): State<Arc<AppState>>) -> Result<Json<AnalyticsDto>, HttpError> {
    let payload = analytics::get_analytics(&state.db).await?;
    Ok(Json(payload))
}
