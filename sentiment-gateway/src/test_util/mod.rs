//! Test helpers: a scripted in-process inference endpoint and ready-made config.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use sentiment_common::EndpointRequest;
use tokio::time::Instant;

use crate::config::{ApiConfig, Config, GatewayConfig, LoggingConfig};
use crate::endpoint::{EndpointError, InferenceEndpoint};
use crate::gateway::Gateway;
use crate::state::AppState;

pub const TEST_ENDPOINT_NAME: &str = "test-endpoint";

/// Gateway config pointing at [`TEST_ENDPOINT_NAME`] with default retries.
pub fn test_gateway_config() -> GatewayConfig {
    GatewayConfig::new(TEST_ENDPOINT_NAME)
}

pub fn test_config() -> Config {
    Config {
        api: ApiConfig::default(),
        gateway: test_gateway_config(),
        logging: LoggingConfig {
            level: "debug".to_string(),
        },
    }
}

/// Application state whose gateway talks to `endpoint`.
pub fn test_state(config: Config, endpoint: Arc<dyn InferenceEndpoint>) -> Arc<AppState> {
    let gateway = Gateway::new(&config.gateway, endpoint);
    Arc::new(AppState::new(config, gateway))
}

/// What a [`MockEndpoint`] does on one call.
#[derive(Debug, Clone)]
pub enum MockReply {
    /// Return these bytes as the response body.
    Payload(Vec<u8>),
    Fail(EndpointError),
    /// Never answer.
    Hang,
}

impl MockReply {
    /// A well-formed `[{label, score}]` payload.
    pub fn prediction(label: &str, score: f64) -> Self {
        let body = serde_json::json!([{ "label": label, "score": score }]);
        MockReply::Payload(body.to_string().into_bytes())
    }
}

/// Endpoint that plays back scripted replies and records every call.
///
/// Replies are consumed in order; the last one repeats once the script runs out.
pub struct MockEndpoint {
    replies: Mutex<VecDeque<MockReply>>,
    last: Mutex<Option<MockReply>>,
    calls: Mutex<Vec<(Instant, EndpointRequest)>>,
}

impl MockEndpoint {
    pub fn sequence(replies: Vec<MockReply>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            last: Mutex::new(None),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn always(reply: MockReply) -> Self {
        Self::sequence(vec![reply])
    }

    pub fn prediction(label: &str, score: f64) -> Self {
        Self::always(MockReply::prediction(label, score))
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Instants at which each call started, on the tokio clock.
    pub fn call_times(&self) -> Vec<Instant> {
        self.calls.lock().unwrap().iter().map(|(at, _)| *at).collect()
    }

    pub fn requests(&self) -> Vec<EndpointRequest> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(_, request)| request.clone())
            .collect()
    }

    fn next_reply(&self) -> MockReply {
        let mut last = self.last.lock().unwrap();
        if let Some(reply) = self.replies.lock().unwrap().pop_front() {
            *last = Some(reply);
        }
        last.clone()
            .unwrap_or_else(|| MockReply::Fail(EndpointError::Unexpected("no reply scripted".into())))
    }
}

#[async_trait]
impl InferenceEndpoint for MockEndpoint {
    fn name(&self) -> &str {
        TEST_ENDPOINT_NAME
    }

    async fn invoke(&self, request: &EndpointRequest) -> Result<Vec<u8>, EndpointError> {
        self.calls
            .lock()
            .unwrap()
            .push((Instant::now(), request.clone()));

        match self.next_reply() {
            MockReply::Payload(body) => Ok(body),
            MockReply::Fail(error) => Err(error),
            MockReply::Hang => std::future::pending().await,
        }
    }
}
