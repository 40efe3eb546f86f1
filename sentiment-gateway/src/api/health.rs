//! Health check endpoint.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
    endpoint: String,
}

/// GET /health - Health check endpoint.
///
/// Reports the process as up; the inference endpoint itself is not probed.
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        endpoint: state.config.gateway.endpoint_name.clone(),
    })
}
