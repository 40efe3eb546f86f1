//! Inference endpoint abstraction layer.
//!
//! This module defines the `InferenceEndpoint` trait that hides how the hosted
//! sentiment model is reached, and the invoker that adds timeouts and retries
//! on top of it.

mod http;
mod invoker;

pub use http::{HttpEndpoint, READ_FAILED_MESSAGE, UNREACHABLE_MESSAGE};
pub use invoker::{backoff_delay, EndpointInvoker};

use async_trait::async_trait;
use sentiment_common::EndpointRequest;

/// Failure reported by an inference endpoint.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EndpointError {
    /// The endpoint could not be reached or did not answer in time.
    #[error("Transport failure: {0}")]
    Transport(String),

    /// The endpoint answered with a classified service error.
    #[error("{code}: {message}")]
    Service { code: String, message: String },

    /// Anything that is neither a transport nor a service failure.
    #[error("Unexpected endpoint failure: {0}")]
    Unexpected(String),
}

impl EndpointError {
    /// Transport and service failures are worth another attempt.
    pub fn is_retryable(&self) -> bool {
        matches!(self, EndpointError::Transport(_) | EndpointError::Service { .. })
    }
}

/// A hosted model that classifies text.
#[async_trait]
pub trait InferenceEndpoint: Send + Sync {
    /// Identity of the endpoint, used in logs.
    fn name(&self) -> &str;

    /// Send one request and return the raw response body.
    async fn invoke(&self, request: &EndpointRequest) -> Result<Vec<u8>, EndpointError>;
}
