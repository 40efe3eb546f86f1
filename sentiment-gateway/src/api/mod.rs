//! HTTP surface of the gateway.

pub mod health;
pub mod invoke;
pub mod sentiment;

use std::sync::Arc;

use axum::extract::rejection::BytesRejection;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::get;
use axum::Router;
use sentiment_common::InvocationContext;

use crate::error::Error;
use crate::state::AppState;

/// Headers that may carry the invocation's request id, in order of preference.
const REQUEST_ID_HEADERS: [&str; 2] = ["x-request-id", "lambda-runtime-aws-request-id"];

/// Build the API router.
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .merge(invoke::router())
        .merge(sentiment::router())
        .route("/health", get(health::health))
}

/// Invocation context derived from the request headers.
pub fn invocation_context(headers: &HeaderMap) -> InvocationContext {
    let request_id = REQUEST_ID_HEADERS
        .iter()
        .find_map(|name| headers.get(*name))
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string);
    InvocationContext::new(request_id)
}

/// Error for a request body the transport refused to buffer.
pub fn body_rejection_error(rejection: &BytesRejection, context: &InvocationContext) -> Error {
    tracing::warn!(
        request_id = context.request_id(),
        status = rejection.status().as_u16(),
        "Request body rejected: {}",
        rejection.body_text()
    );
    if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
        Error::Validation("Request body is too large".to_string())
    } else {
        Error::Validation("Request body could not be read".to_string())
    }
}
