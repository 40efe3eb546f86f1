//! HTTP-shaped gateway responses.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::inference::InferenceResult;

pub const HEADER_ALLOW_ORIGIN: &str = "Access-Control-Allow-Origin";
pub const HEADER_ALLOW_HEADERS: &str = "Access-Control-Allow-Headers";
pub const HEADER_ALLOW_METHODS: &str = "Access-Control-Allow-Methods";
pub const HEADER_CONTENT_TYPE: &str = "Content-Type";

const ALLOWED_HEADERS: &str = "Content-Type,X-Amz-Date,Authorization,X-Api-Key,X-Amz-Security-Token";
const ALLOWED_METHODS: &str = "OPTIONS,POST";

/// Headers attached to every gateway response.
pub fn default_headers() -> BTreeMap<String, String> {
    [
        (HEADER_ALLOW_ORIGIN, "*"),
        (HEADER_ALLOW_HEADERS, ALLOWED_HEADERS),
        (HEADER_ALLOW_METHODS, ALLOWED_METHODS),
        (HEADER_CONTENT_TYPE, "application/json"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

/// The single output type of the gateway.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayResponse {
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    /// JSON-encoded body.
    pub body: String,
}

impl GatewayResponse {
    /// Build a response with the default headers and a JSON-encoded body.
    pub fn json<T: Serialize>(status_code: u16, body: &T) -> Self {
        Self {
            status_code,
            headers: default_headers(),
            body: serde_json::to_string(body).unwrap_or_else(|_| "{}".to_string()),
        }
    }

    /// Decode the body back into JSON.
    pub fn body_json(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::from_str(&self.body)
    }
}

/// Body of a successful inference response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentResponse {
    pub sentiment: String,
    pub confidence: f64,
    /// Epoch seconds at the time the response was built.
    pub timestamp: f64,
    pub processing_time_ms: u64,
    pub request_id: String,
}

impl SentimentResponse {
    pub fn new(result: InferenceResult, processing_time_ms: u64, request_id: String) -> Self {
        let timestamp = chrono::Utc::now().timestamp_millis() as f64 / 1000.0;
        Self {
            sentiment: result.sentiment,
            confidence: result.confidence,
            timestamp,
            processing_time_ms,
            request_id,
        }
    }
}

/// Body of an error response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(rename = "errorType")]
    pub error_type: String,
    #[serde(rename = "errorCode", default, skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
    pub request_id: String,
}

/// Body of a CORS preflight response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreflightBody {
    pub message: String,
}

impl Default for PreflightBody {
    fn default() -> Self {
        Self {
            message: "CORS preflight".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_headers() {
        let headers = default_headers();
        assert_eq!(headers.len(), 4);
        assert_eq!(headers[HEADER_ALLOW_ORIGIN], "*");
        assert_eq!(headers[HEADER_ALLOW_METHODS], "OPTIONS,POST");
        assert_eq!(headers[HEADER_CONTENT_TYPE], "application/json");
    }

    #[test]
    fn test_gateway_response_field_names() {
        let response = GatewayResponse::json(200, &PreflightBody::default());
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["statusCode"], 200);
        assert_eq!(json["body"], r#"{"message":"CORS preflight"}"#);
        assert!(json["headers"].is_object());
    }

    #[test]
    fn test_error_body_omits_missing_code() {
        let body = ErrorBody {
            error: "Text cannot be empty".to_string(),
            error_type: "ValidationError".to_string(),
            error_code: None,
            request_id: "unknown".to_string(),
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["errorType"], "ValidationError");
        assert!(json.get("errorCode").is_none());
    }

    #[test]
    fn test_sentiment_response_new() {
        let result = InferenceResult {
            sentiment: "POSITIVE".to_string(),
            confidence: 0.9,
        };
        let response = SentimentResponse::new(result, 12, "req-1".to_string());
        assert_eq!(response.sentiment, "POSITIVE");
        assert_eq!(response.confidence, 0.9);
        assert_eq!(response.processing_time_ms, 12);
        assert_eq!(response.request_id, "req-1");
        assert!(response.timestamp > 0.0);
    }
}
