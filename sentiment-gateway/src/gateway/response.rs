//! Response building for every gateway outcome.

use std::time::Duration;

use sentiment_common::{
    ErrorBody, GatewayResponse, InferenceResult, InvocationContext, PreflightBody,
    SentimentResponse,
};

use crate::error::Error;

pub fn preflight() -> GatewayResponse {
    GatewayResponse::json(200, &PreflightBody::default())
}

pub fn success(
    result: InferenceResult,
    elapsed: Duration,
    context: &InvocationContext,
) -> GatewayResponse {
    let body = SentimentResponse::new(
        result,
        elapsed.as_millis() as u64,
        context.request_id().to_string(),
    );
    GatewayResponse::json(200, &body)
}

pub fn error(error: &Error, context: &InvocationContext) -> GatewayResponse {
    let body = ErrorBody {
        error: error.caller_message(),
        error_type: error.kind().as_str().to_string(),
        error_code: error.code().map(str::to_string),
        request_id: context.request_id().to_string(),
    };
    GatewayResponse::json(error.status_code().as_u16(), &body)
}
