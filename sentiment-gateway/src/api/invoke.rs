//! Raw event invocation endpoint.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::routing::post;
use axum::{Json, Router};
use sentiment_common::{GatewayResponse, InboundRequest};

use super::{body_rejection_error, invocation_context};
use crate::error::Error;
use crate::gateway::response;
use crate::state::AppState;

/// Build the invoke router.
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/invoke", post(invoke))
}

/// POST /invoke - Handle a raw invocation event.
///
/// The request body is the event itself (proxy or non-proxy shape) and the
/// gateway response is returned as the JSON result.
async fn invoke(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Json<GatewayResponse> {
    let context = invocation_context(&headers);
    let body = match body {
        Ok(body) => body,
        Err(rejection) => {
            let err = body_rejection_error(&rejection, &context);
            return Json(response::error(&err, &context));
        }
    };

    let event: serde_json::Value = match serde_json::from_slice(&body) {
        Ok(event) => event,
        Err(e) => {
            tracing::warn!(request_id = context.request_id(), "Undecodable event: {}", e);
            let err = Error::Validation("Invalid JSON in request body".to_string());
            return Json(response::error(&err, &context));
        }
    };

    let response = state
        .gateway
        .handle(InboundRequest::from_event(event), &context)
        .await;
    Json(response)
}
