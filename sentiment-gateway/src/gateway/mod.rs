//! The inference gateway: parse, validate, invoke, respond.

mod parser;
pub mod response;
mod validator;

pub use parser::{parse, ParsedRequest};
pub use validator::{validate, ValidatedText, MAX_TEXT_CHARS};

use std::sync::Arc;
use std::time::Instant;

use sentiment_common::{GatewayResponse, InboundRequest, InferenceResult, InvocationContext};

use crate::config::GatewayConfig;
use crate::endpoint::{EndpointInvoker, InferenceEndpoint};
use crate::error::{Error, Result};

enum Outcome {
    Preflight,
    Classified(InferenceResult),
}

/// Stateless request handler in front of an inference endpoint.
///
/// Holds only read-only configuration and the endpoint client, so one instance
/// can serve any number of concurrent invocations.
pub struct Gateway {
    invoker: EndpointInvoker,
}

impl Gateway {
    pub fn new(config: &GatewayConfig, endpoint: Arc<dyn InferenceEndpoint>) -> Self {
        Self {
            invoker: EndpointInvoker::new(endpoint, config),
        }
    }

    /// Handle one invocation. Always produces a well-formed response.
    pub async fn handle(
        &self,
        request: InboundRequest,
        context: &InvocationContext,
    ) -> GatewayResponse {
        let start = Instant::now();

        let response = match self.process(&request).await {
            Ok(Outcome::Preflight) => response::preflight(),
            Ok(Outcome::Classified(result)) => response::success(result, start.elapsed(), context),
            Err(e) => {
                match &e {
                    Error::Internal(detail) => tracing::error!(
                        request_id = context.request_id(),
                        "Unexpected error: {}",
                        detail
                    ),
                    other => tracing::warn!(
                        request_id = context.request_id(),
                        error_type = %other.kind(),
                        "Request failed: {}",
                        other
                    ),
                }
                response::error(&e, context)
            }
        };

        tracing::info!(
            request_id = context.request_id(),
            status = response.status_code,
            duration_ms = start.elapsed().as_millis() as u64,
            "Request completed"
        );
        response
    }

    async fn process(&self, request: &InboundRequest) -> Result<Outcome> {
        let body = match parse(request)? {
            ParsedRequest::Preflight => return Ok(Outcome::Preflight),
            ParsedRequest::Body(body) => body,
        };
        let text = validate(&body)?;
        let result = self.invoker.invoke(&text).await?;
        Ok(Outcome::Classified(result))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::endpoint::EndpointError;
    use crate::test_util::{test_gateway_config, MockEndpoint, MockReply};
    use serde_json::{json, Value};

    fn gateway(endpoint: &Arc<MockEndpoint>) -> Gateway {
        Gateway::new(&test_gateway_config(), endpoint.clone())
    }

    fn ctx() -> InvocationContext {
        InvocationContext::new(Some("req-1".to_string()))
    }

    fn service_failure(code: &str) -> Arc<MockEndpoint> {
        Arc::new(MockEndpoint::always(MockReply::Fail(EndpointError::Service {
            code: code.to_string(),
            message: "upstream said no".to_string(),
        })))
    }

    async fn body_of(gateway: &Gateway, event: Value) -> (u16, Value) {
        let response = gateway
            .handle(InboundRequest::from_event(event), &ctx())
            .await;
        (response.status_code, response.body_json().unwrap())
    }

    #[tokio::test]
    async fn test_success_through_proxy_event() {
        let endpoint = Arc::new(MockEndpoint::prediction("POSITIVE", 0.9));
        let (status, body) = body_of(
            &gateway(&endpoint),
            json!({"httpMethod": "POST", "body": "{\"text\": \"This is a test.\"}"}),
        )
        .await;

        assert_eq!(status, 200);
        assert_eq!(body["sentiment"], "POSITIVE");
        assert_eq!(body["confidence"], 0.9);
        assert_eq!(body["request_id"], "req-1");
        assert!(body.get("timestamp").is_some());
        assert!(body.get("processing_time_ms").is_some());
    }

    #[tokio::test]
    async fn test_success_through_non_proxy_event() {
        let endpoint = Arc::new(MockEndpoint::prediction("NEGATIVE", 0.8));
        let (status, body) = body_of(&gateway(&endpoint), json!({"text": "awful"})).await;

        assert_eq!(status, 200);
        assert_eq!(body["sentiment"], "NEGATIVE");
    }

    #[tokio::test]
    async fn test_options_ignores_everything_else() {
        let endpoint = Arc::new(MockEndpoint::prediction("POSITIVE", 0.9));
        let (status, body) = body_of(
            &gateway(&endpoint),
            json!({"httpMethod": "OPTIONS", "body": "{broken"}),
        )
        .await;

        assert_eq!(status, 200);
        assert_eq!(body, json!({"message": "CORS preflight"}));
        assert_eq!(endpoint.call_count(), 0);
    }

    #[tokio::test]
    async fn test_validation_error_skips_endpoint() {
        let endpoint = Arc::new(MockEndpoint::prediction("POSITIVE", 0.9));
        let (status, body) = body_of(&gateway(&endpoint), json!({"body": "{}"})).await;

        assert_eq!(status, 400);
        assert_eq!(body["errorType"], "ValidationError");
        assert_eq!(body["error"], "Missing 'text' field in request body");
        assert_eq!(endpoint.call_count(), 0);
    }

    #[tokio::test]
    async fn test_malformed_json_body() {
        let endpoint = Arc::new(MockEndpoint::prediction("POSITIVE", 0.9));
        let (status, body) = body_of(&gateway(&endpoint), json!({"body": "{oops"})).await;

        assert_eq!(status, 400);
        assert_eq!(body["error"], "Invalid JSON in request body");
    }

    #[tokio::test(start_paused = true)]
    async fn test_throttling_maps_to_503() {
        let endpoint = service_failure("ThrottlingException");
        let (status, body) = body_of(&gateway(&endpoint), json!({"text": "hi"})).await;

        assert_eq!(status, 503);
        assert_eq!(body["errorType"], "ServiceError");
        assert_eq!(body["errorCode"], "ThrottlingException");
        assert_eq!(endpoint.call_count(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_validation_exception_maps_to_400() {
        let endpoint = service_failure("ValidationException");
        let (status, body) = body_of(&gateway(&endpoint), json!({"text": "hi"})).await;

        assert_eq!(status, 400);
        assert_eq!(body["errorType"], "ServiceError");
        assert_eq!(body["errorCode"], "ValidationException");
    }

    #[tokio::test(start_paused = true)]
    async fn test_unknown_service_code_maps_to_500() {
        let endpoint = service_failure("InternalFailure");
        let (status, body) = body_of(&gateway(&endpoint), json!({"text": "hi"})).await;

        assert_eq!(status, 500);
        assert_eq!(body["errorType"], "ServiceError");
    }

    #[tokio::test]
    async fn test_unclassified_failure_maps_to_internal() {
        let endpoint = Arc::new(MockEndpoint::always(MockReply::Fail(
            EndpointError::Unexpected("signer exploded".to_string()),
        )));
        let (status, body) = body_of(&gateway(&endpoint), json!({"text": "hi"})).await;

        assert_eq!(status, 500);
        assert_eq!(body["errorType"], "InternalError");
        assert_eq!(body["request_id"], "req-1");
        assert!(!body["error"].as_str().unwrap().contains("signer"));
    }

    #[tokio::test]
    async fn test_identical_input_is_idempotent() {
        let endpoint = Arc::new(MockEndpoint::prediction("POSITIVE", 0.75));
        let gateway = gateway(&endpoint);
        let event = json!({"body": {"text": "same text"}});

        let (_, first) = body_of(&gateway, event.clone()).await;
        let (_, second) = body_of(&gateway, event).await;

        assert_eq!(first["sentiment"], second["sentiment"]);
        assert_eq!(first["confidence"], second["confidence"]);
    }

    #[tokio::test]
    async fn test_missing_request_id_is_unknown() {
        let endpoint = Arc::new(MockEndpoint::prediction("POSITIVE", 0.9));
        let response = gateway(&endpoint)
            .handle(
                InboundRequest::from_event(json!({"text": "hi"})),
                &InvocationContext::default(),
            )
            .await;

        assert_eq!(response.body_json().unwrap()["request_id"], "unknown");
    }

    #[tokio::test]
    async fn test_every_response_has_cors_headers() {
        let endpoint = Arc::new(MockEndpoint::prediction("POSITIVE", 0.9));
        let gateway = gateway(&endpoint);

        for event in [json!({"text": "ok"}), json!({"text": 5}), json!({"httpMethod": "OPTIONS"})] {
            let response = gateway
                .handle(InboundRequest::from_event(event), &ctx())
                .await;
            assert_eq!(response.headers["Access-Control-Allow-Origin"], "*");
            assert_eq!(response.headers["Content-Type"], "application/json");
        }
    }
}
