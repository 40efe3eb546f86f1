//! Sentiment Gateway Common Types
//!
//! Shared types used by the gateway service and its tests.

pub mod event;
pub mod inference;
pub mod response;

pub use event::{InboundRequest, InvocationContext, RequestBody};
pub use inference::{EndpointRequest, InferenceResult};
pub use response::{ErrorBody, GatewayResponse, PreflightBody, SentimentResponse};
