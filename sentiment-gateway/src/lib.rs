//! Sentiment Gateway - validates text requests and proxies them to a hosted
//! sentiment inference endpoint.

pub mod api;
pub mod config;
pub mod endpoint;
pub mod error;
pub mod gateway;
pub mod logging;
pub mod state;
pub mod test_util;

pub use config::{Config, GatewayConfig};
pub use endpoint::{EndpointError, EndpointInvoker, HttpEndpoint, InferenceEndpoint};
pub use error::{Error, ErrorKind};
pub use gateway::Gateway;
pub use state::AppState;

use std::sync::Arc;

use axum::{middleware, Router};
use tower_http::trace::TraceLayer;

/// Build the full application router.
pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(api::router())
        .layer(middleware::from_fn(logging::request_logger))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
