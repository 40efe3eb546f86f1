//! Request parsing: resolves the inbound body into one canonical JSON value.

use sentiment_common::{InboundRequest, RequestBody};
use serde_json::Value;

use crate::error::{Error, Result};

/// Outcome of parsing an inbound request.
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedRequest {
    /// CORS preflight; no further processing.
    Preflight,
    /// The request body as structured JSON.
    Body(Value),
}

pub fn parse(request: &InboundRequest) -> Result<ParsedRequest> {
    tracing::info!(event = %request.raw, "Received event");

    if request.is_preflight() {
        return Ok(ParsedRequest::Preflight);
    }

    let body = match &request.body {
        Some(RequestBody::Text(text)) => serde_json::from_str(text)
            .map_err(|_| Error::Validation("Invalid JSON in request body".to_string()))?,
        Some(RequestBody::Structured(value)) => value.clone(),
        // Non-proxy integration: the event itself is the body
        None => request.raw.clone(),
    };

    tracing::debug!(body = %body, "Parsed body");
    Ok(ParsedRequest::Body(body))
}
