//! Sentiment Gateway - validates text requests and proxies them to a hosted
//! sentiment inference endpoint.

use std::env;
use std::sync::Arc;

use tokio::net::TcpListener;

use sentiment_gateway::{logging, AppState, Config, Gateway, HttpEndpoint};

const VERSION: &str = env!("CARGO_PKG_VERSION");

fn print_version() {
    println!("sentiment-gateway {}", VERSION);
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Handle --version / -V
    let args: Vec<String> = env::args().collect();
    if args.iter().any(|a| a == "--version" || a == "-V") {
        print_version();
        return Ok(());
    }

    // Load configuration
    let config = Config::load().map_err(|e| {
        format!(
            "Failed to load configuration: {}. \
             Make sure config.toml exists or set SENTIMENT__GATEWAY__ENDPOINT_NAME \
             (or SAGEMAKER_ENDPOINT_NAME) environment variable.",
            e
        )
    })?;

    logging::init(&config.logging.level);

    let endpoint = Arc::new(HttpEndpoint::from_config(&config.gateway));
    tracing::info!(
        "Inference endpoint: {} at {} (max_retries={}, timeout={}s)",
        config.gateway.endpoint_name,
        endpoint.url(),
        config.gateway.max_retries,
        config.gateway.timeout_secs
    );

    let gateway = Gateway::new(&config.gateway, endpoint);
    let state = Arc::new(AppState::new(config.clone(), gateway));
    let app = sentiment_gateway::app(state);

    // Start server
    let addr = format!("{}:{}", config.api.host, config.api.port);
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
