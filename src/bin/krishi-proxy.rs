//! Thin proxy for the weather and advisory upstreams
//!
//! Binds `PROXY_BIND` (default `127.0.0.1:8787`) and forwards
//! `POST /functions/v1/weather-data` and `POST /functions/v1/ai-advisor`
//! to their providers. The advisory endpoint reports a configuration
//! error until `GEMINI_API_KEY` is set.

use std::env;
use std::net::SocketAddr;
use std::sync::Arc;

use tracing::warn;
use tracing_subscriber::EnvFilter;

use krishi::advisory::AdvisoryClient;
use krishi::config::{proxy_bind, ADVISORY_KEY_VAR};
use krishi::proxy::{serve, ProxyState};
use krishi::weather::WeatherClient;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let http_client = reqwest::Client::new();

    let advisory = match env::var(ADVISORY_KEY_VAR) {
        Ok(key) if !key.is_empty() => Some(AdvisoryClient::new(&key, http_client.clone())),
        _ => {
            warn!(
                "{} is not set; the advisory endpoint will report a configuration error",
                ADVISORY_KEY_VAR
            );
            None
        }
    };

    let state = Arc::new(ProxyState {
        weather: WeatherClient::new(http_client),
        advisory,
    });

    let addr: SocketAddr = proxy_bind().parse()?;
    serve(addr, state).await?;
    Ok(())
}
