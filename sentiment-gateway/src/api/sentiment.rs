//! API-gateway style sentiment endpoint.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::State;
use axum::http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::Router;
use sentiment_common::{GatewayResponse, InboundRequest};

use super::{body_rejection_error, invocation_context};
use crate::gateway::response;
use crate::state::AppState;

/// Build the sentiment router.
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/sentiment", post(analyze).options(analyze))
}

/// POST|OPTIONS /sentiment - Classify the `text` of a JSON body.
async fn analyze(
    State(state): State<Arc<AppState>>,
    method: Method,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    let context = invocation_context(&headers);
    let body = match body {
        Ok(body) => body,
        Err(rejection) => {
            let err = body_rejection_error(&rejection, &context);
            return into_http_response(response::error(&err, &context));
        }
    };
    let request = InboundRequest::proxy(method.as_str(), String::from_utf8_lossy(&body));

    let response = state.gateway.handle(request, &context).await;
    into_http_response(response)
}

/// Turn a gateway response into a real HTTP response.
pub fn into_http_response(response: GatewayResponse) -> Response {
    let status =
        StatusCode::from_u16(response.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let mut http_response = (status, response.body).into_response();

    let headers = http_response.headers_mut();
    for (name, value) in &response.headers {
        match (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            (Ok(name), Ok(value)) => {
                headers.insert(name, value);
            }
            _ => tracing::warn!("Dropping invalid response header: {}", name),
        }
    }

    http_response
}

#[cfg(test)]
mod tests {
    use super::*;
    use sentiment_common::PreflightBody;

    #[test]
    fn test_into_http_response_copies_headers() {
        let response = into_http_response(GatewayResponse::json(503, &PreflightBody::default()));
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(
            response.headers()["content-type"],
            HeaderValue::from_static("application/json")
        );
        assert_eq!(response.headers()["access-control-allow-methods"], "OPTIONS,POST");
    }
}
