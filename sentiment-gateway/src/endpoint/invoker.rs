//! Retrying endpoint invoker.

use std::sync::Arc;
use std::time::Duration;

use sentiment_common::{EndpointRequest, InferenceResult};
use serde_json::Value;

use super::{EndpointError, InferenceEndpoint};
use crate::config::GatewayConfig;
use crate::error::{Error, Result};
use crate::gateway::ValidatedText;

/// Delay before the attempt following `attempt` (0-indexed): 1s, 2s, 4s, ...
pub fn backoff_delay(attempt: u32) -> Duration {
    Duration::from_secs(2u64.saturating_pow(attempt))
}

/// Calls an [`InferenceEndpoint`] with a per-attempt timeout and exponential
/// backoff between failed attempts.
pub struct EndpointInvoker {
    endpoint: Arc<dyn InferenceEndpoint>,
    max_retries: u32,
    timeout: Duration,
}

impl EndpointInvoker {
    pub fn new(endpoint: Arc<dyn InferenceEndpoint>, config: &GatewayConfig) -> Self {
        Self {
            endpoint,
            max_retries: config.max_retries.max(1),
            timeout: config.timeout(),
        }
    }

    /// Classify `text`, retrying transport and service failures.
    ///
    /// Malformed endpoint payloads are never retried.
    pub async fn invoke(&self, text: &ValidatedText) -> Result<InferenceResult> {
        let request = EndpointRequest::new(text.as_str());
        let mut attempt = 0;

        let payload = loop {
            match self.attempt(&request).await {
                Ok(payload) => break payload,
                Err(e) if e.is_retryable() && attempt + 1 < self.max_retries => {
                    let delay = backoff_delay(attempt);
                    tracing::warn!(
                        endpoint = self.endpoint.name(),
                        attempt = attempt + 1,
                        max_retries = self.max_retries,
                        delay_secs = delay.as_secs(),
                        "Inference attempt failed, retrying: {}",
                        e
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => {
                    tracing::error!(
                        endpoint = self.endpoint.name(),
                        attempts = attempt + 1,
                        "Inference failed: {}",
                        e
                    );
                    return Err(classify(e));
                }
            }
        };

        let result = parse_prediction(&payload)?;
        tracing::info!(
            endpoint = self.endpoint.name(),
            sentiment = %result.sentiment,
            confidence = result.confidence,
            "Inference succeeded"
        );
        Ok(result)
    }

    async fn attempt(&self, request: &EndpointRequest) -> std::result::Result<Vec<u8>, EndpointError> {
        match tokio::time::timeout(self.timeout, self.endpoint.invoke(request)).await {
            Ok(result) => result,
            Err(_) => Err(EndpointError::Transport(format!(
                "no response within {}s",
                self.timeout.as_secs()
            ))),
        }
    }
}

fn classify(error: EndpointError) -> Error {
    match error {
        EndpointError::Transport(message) => Error::Service {
            code: None,
            message,
        },
        EndpointError::Service { code, message } => Error::Service {
            code: Some(code),
            message,
        },
        EndpointError::Unexpected(message) => Error::Internal(message),
    }
}

/// Extract the first `{label, score}` prediction from an endpoint payload.
fn parse_prediction(payload: &[u8]) -> Result<InferenceResult> {
    let value: Value = serde_json::from_slice(payload)
        .map_err(|e| Error::Internal(format!("Failed to decode inference response: {}", e)))?;

    let first = value
        .as_array()
        .and_then(|items| items.first())
        .ok_or_else(|| {
            Error::Validation(
                "Invalid response format from inference endpoint: expected a non-empty list"
                    .to_string(),
            )
        })?;

    let (label, score) = match (first.get("label"), first.get("score")) {
        (Some(label), Some(score)) => (label, score),
        _ => {
            return Err(Error::Validation(
                "Missing required fields 'label' and 'score' in inference response".to_string(),
            ));
        }
    };

    let sentiment = match label {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };

    let confidence = match score {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .ok_or_else(|| Error::Internal(format!("Invalid confidence score: {}", score)))?;

    Ok(InferenceResult {
        sentiment,
        confidence,
    })
}
