//! Inference endpoint payloads.

use serde::{Deserialize, Serialize};

/// Payload sent to the inference endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EndpointRequest {
    pub inputs: String,
}

impl EndpointRequest {
    pub fn new(inputs: impl Into<String>) -> Self {
        Self {
            inputs: inputs.into(),
        }
    }
}

/// Sentiment classification returned by the endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InferenceResult {
    /// Label as reported by the model (e.g. "POSITIVE").
    pub sentiment: String,
    pub confidence: f64,
}
