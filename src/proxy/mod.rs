//! Proxy surface for the two external adapters
//!
//! A small hyper HTTP/1 server exposing the weather and advisory upstreams
//! to browser clients. CORS is open to any origin and every `OPTIONS`
//! request is answered with a permissive preflight. Handlers are plain
//! functions over the request body so they can be exercised without a
//! socket.

use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Method, Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info, warn};

use crate::advisory::{AdvisoryClient, AdvisoryContext};
use crate::error::Error;
use crate::weather::WeatherClient;

/// Path of the weather proxy endpoint
pub const WEATHER_PATH: &str = "/functions/v1/weather-data";

/// Path of the advisory proxy endpoint
pub const ADVISORY_PATH: &str = "/functions/v1/ai-advisor";

/// Shared proxy state
pub struct ProxyState {
    pub weather: WeatherClient,
    /// Present only when the provider credential is configured
    pub advisory: Option<AdvisoryClient>,
}

#[derive(Debug, Deserialize)]
struct WeatherRequest {
    latitude: Option<f64>,
    longitude: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct AdvisoryRequest {
    query: String,
    context: Option<AdvisoryContext>,
}

#[derive(Debug, Serialize)]
struct AdvisoryResponse<'a> {
    response: &'a str,
    query: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    context: Option<&'a AdvisoryContext>,
}

/// Accept connections and serve proxy requests until the task is dropped
pub async fn serve(addr: SocketAddr, state: Arc<ProxyState>) -> Result<(), Error> {
    let listener = TcpListener::bind(addr).await?;
    info!("proxy listening on {}", addr);

    loop {
        match listener.accept().await {
            Ok((stream, peer)) => {
                let io = TokioIo::new(stream);
                let state = Arc::clone(&state);
                tokio::spawn(async move {
                    let service = service_fn(move |req| {
                        let state = Arc::clone(&state);
                        async move { handle_request(state, req).await }
                    });

                    if let Err(err) = http1::Builder::new().serve_connection(io, service).await {
                        error!("error serving connection from {}: {:?}", peer, err);
                    }
                });
            }
            Err(e) => {
                error!("error accepting connection: {:?}", e);
            }
        }
    }
}

/// Route one incoming request
async fn handle_request(
    state: Arc<ProxyState>,
    req: Request<Incoming>,
) -> Result<Response<Full<Bytes>>, hyper::Error> {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    info!("{} {}", method, path);

    if method == Method::OPTIONS {
        return Ok(preflight_response());
    }

    let response = match (method, path.as_str()) {
        (Method::POST, WEATHER_PATH) => {
            let body = req.collect().await?.to_bytes();
            handle_weather_data(&state, &body).await
        }
        (Method::POST, ADVISORY_PATH) => {
            let body = req.collect().await?.to_bytes();
            handle_ai_advisor(&state, &body).await
        }
        _ => error_response(StatusCode::NOT_FOUND, "not found"),
    };

    Ok(response)
}

/// `POST /functions/v1/weather-data`: forward a coordinate pair to the
/// weather provider and return the normalized snapshot.
pub async fn handle_weather_data(state: &ProxyState, body: &[u8]) -> Response<Full<Bytes>> {
    let request: WeatherRequest = match serde_json::from_slice(body) {
        Ok(r) => r,
        Err(_) => {
            return error_response(
                StatusCode::BAD_REQUEST,
                "latitude and longitude are required",
            )
        }
    };

    match state
        .weather
        .fetch_weather(request.latitude, request.longitude)
        .await
    {
        Ok(snapshot) => json_response(StatusCode::OK, &snapshot),
        Err(Error::Validation(msg)) => error_response(StatusCode::BAD_REQUEST, &msg),
        Err(err) => {
            warn!("weather proxy failure: {}", err);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, &err.to_string())
        }
    }
}

/// `POST /functions/v1/ai-advisor`: forward a query plus optional context
/// to the advisory provider and echo both back with the response.
pub async fn handle_ai_advisor(state: &ProxyState, body: &[u8]) -> Response<Full<Bytes>> {
    let advisory = match &state.advisory {
        Some(client) => client,
        None => {
            return error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "advisory credential not configured",
            )
        }
    };

    let request: AdvisoryRequest = match serde_json::from_slice(body) {
        Ok(r) => r,
        Err(_) => return error_response(StatusCode::BAD_REQUEST, "query is required"),
    };

    match advisory
        .get_advisory(&request.query, request.context.as_ref())
        .await
    {
        Ok(response) => json_response(
            StatusCode::OK,
            &AdvisoryResponse {
                response: &response,
                query: &request.query,
                context: request.context.as_ref(),
            },
        ),
        Err(err) => {
            warn!("advisory proxy failure: {}", err);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, &err.to_string())
        }
    }
}

/// CORS preflight response
pub fn preflight_response() -> Response<Full<Bytes>> {
    cors(Response::builder().status(StatusCode::OK))
        .body(Full::new(Bytes::new()))
        .unwrap()
}

fn cors(builder: hyper::http::response::Builder) -> hyper::http::response::Builder {
    builder
        .header("Access-Control-Allow-Origin", "*")
        .header("Access-Control-Allow-Methods", "GET, POST, OPTIONS")
        .header(
            "Access-Control-Allow-Headers",
            "Content-Type, Authorization, X-Client-Info, Apikey",
        )
}

fn json_response<T: Serialize>(status: StatusCode, body: &T) -> Response<Full<Bytes>> {
    match serde_json::to_vec(body) {
        Ok(bytes) => cors(Response::builder().status(status))
            .header("Content-Type", "application/json")
            .body(Full::new(Bytes::from(bytes)))
            .unwrap(),
        Err(err) => {
            error!("response serialization failed: {}", err);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "serialization error")
        }
    }
}

fn error_response(status: StatusCode, message: &str) -> Response<Full<Bytes>> {
    let body = serde_json::json!({ "error": message });
    cors(Response::builder().status(status))
        .header("Content-Type", "application/json")
        .body(Full::new(Bytes::from(body.to_string())))
        .unwrap()
}
