//! Inbound invocation events.

use serde_json::{json, Value};

/// Request id reported when the invocation carries none.
pub const UNKNOWN_REQUEST_ID: &str = "unknown";

/// Body of an inbound event as delivered by the transport.
///
/// Proxy integrations hand over the body as JSON-encoded text, other
/// integrations may deliver it already decoded.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Text(String),
    Structured(Value),
}

/// An HTTP-shaped invocation event.
#[derive(Debug, Clone, PartialEq)]
pub struct InboundRequest {
    pub http_method: Option<String>,
    /// `None` when the event has no `body` field (non-proxy integration).
    pub body: Option<RequestBody>,
    /// The event exactly as received.
    pub raw: Value,
}

impl InboundRequest {
    /// Build a request from a raw invocation event.
    ///
    /// Fields other than `httpMethod` and `body` are kept only in `raw`.
    pub fn from_event(event: Value) -> Self {
        let http_method = event
            .get("httpMethod")
            .and_then(Value::as_str)
            .map(str::to_string);

        let body = event.get("body").map(|body| match body {
            Value::String(text) => RequestBody::Text(text.clone()),
            other => RequestBody::Structured(other.clone()),
        });

        Self {
            http_method,
            body,
            raw: event,
        }
    }

    /// Build a proxy-style request from an HTTP method and a textual body.
    pub fn proxy(method: impl Into<String>, body: impl Into<String>) -> Self {
        let method = method.into();
        let body = body.into();
        Self {
            raw: json!({ "httpMethod": method, "body": body }),
            http_method: Some(method),
            body: Some(RequestBody::Text(body)),
        }
    }

    /// Whether this is a CORS preflight request. The method must be exactly `OPTIONS`.
    pub fn is_preflight(&self) -> bool {
        self.http_method.as_deref() == Some("OPTIONS")
    }
}

/// Per-invocation metadata supplied by the hosting runtime.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InvocationContext {
    request_id: Option<String>,
}

impl InvocationContext {
    pub fn new(request_id: Option<String>) -> Self {
        Self { request_id }
    }

    pub fn request_id(&self) -> &str {
        self.request_id.as_deref().unwrap_or(UNKNOWN_REQUEST_ID)
    }
}
