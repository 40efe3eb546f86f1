//! HTTP inference endpoint implementation.

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::{Client, StatusCode};
use sentiment_common::EndpointRequest;
use serde_json::Value;

use super::{EndpointError, InferenceEndpoint};
use crate::config::GatewayConfig;

/// Header carrying the machine-readable error code of a failed invocation.
const ERROR_TYPE_HEADER: &str = "x-amzn-ErrorType";

/// Transport failures reach callers, so they never carry the client's error
/// text (which names the endpoint URL). The detail is logged instead.
pub const UNREACHABLE_MESSAGE: &str = "inference endpoint unreachable";
pub const READ_FAILED_MESSAGE: &str = "failed to read inference endpoint response";

/// Inference endpoint reached over HTTP.
///
/// Requests go to `{base_url}/endpoints/{name}/invocations`.
pub struct HttpEndpoint {
    http_client: Client,
    name: String,
    url: String,
}

impl HttpEndpoint {
    pub fn new(base_url: &str, endpoint_name: &str) -> Self {
        let base_url = base_url.trim_end_matches('/');
        Self {
            http_client: Client::new(),
            name: endpoint_name.to_string(),
            url: format!("{}/endpoints/{}/invocations", base_url, endpoint_name),
        }
    }

    pub fn from_config(config: &GatewayConfig) -> Self {
        Self::new(&config.endpoint_url, &config.endpoint_name)
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl InferenceEndpoint for HttpEndpoint {
    fn name(&self) -> &str {
        &self.name
    }

    async fn invoke(&self, request: &EndpointRequest) -> Result<Vec<u8>, EndpointError> {
        tracing::debug!("Invoking inference endpoint: {}", self.url);

        let response = self
            .http_client
            .post(&self.url)
            .header(ACCEPT, "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(endpoint = %self.name, "Inference request failed: {}", e);
                if e.is_builder() {
                    EndpointError::Unexpected(e.to_string())
                } else {
                    EndpointError::Transport(UNREACHABLE_MESSAGE.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let header_code = response
                .headers()
                .get(ERROR_TYPE_HEADER)
                .and_then(|v| v.to_str().ok())
                .and_then(parse_error_type_header);
            let body = response.text().await.unwrap_or_default();
            let body_json: Option<Value> = serde_json::from_str(&body).ok();

            let code = header_code
                .or_else(|| body_json.as_ref().and_then(error_code_from_body))
                .unwrap_or_else(|| error_code_from_status(status).to_string());
            let message = body_json
                .as_ref()
                .and_then(error_message_from_body)
                .unwrap_or_else(|| format!("endpoint returned {}", status));

            return Err(EndpointError::Service { code, message });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| {
                tracing::warn!(endpoint = %self.name, "Reading inference response failed: {}", e);
                EndpointError::Transport(READ_FAILED_MESSAGE.to_string())
            })?;

        Ok(bytes.to_vec())
    }
}

/// `ThrottlingException:http://internal.amazon.com/...` -> `ThrottlingException`
fn parse_error_type_header(value: &str) -> Option<String> {
    let code = value.split(':').next().unwrap_or_default().trim();
    (!code.is_empty()).then(|| code.to_string())
}

fn error_code_from_body(body: &Value) -> Option<String> {
    ["__type", "code", "errorCode"]
        .iter()
        .find_map(|key| body.get(*key).and_then(Value::as_str))
        .and_then(|raw| raw.rsplit('#').next())
        .map(str::trim)
        .filter(|code| !code.is_empty())
        .map(str::to_string)
}

fn error_message_from_body(body: &Value) -> Option<String> {
    ["message", "Message", "error"]
        .iter()
        .find_map(|key| body.get(*key).and_then(Value::as_str))
        .map(str::to_string)
}

fn error_code_from_status(status: StatusCode) -> &'static str {
    match status.as_u16() {
        400 => "ValidationException",
        424 => "ModelError",
        429 => "ThrottlingException",
        503 => "ServiceUnavailable",
        _ => "InternalFailure",
    }
}
