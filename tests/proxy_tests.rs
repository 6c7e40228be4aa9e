use http_body_util::BodyExt;
use hyper::StatusCode;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use krishi::advisory::AdvisoryClient;
use krishi::proxy::{handle_ai_advisor, handle_weather_data, preflight_response, ProxyState};
use krishi::weather::{WeatherClient, WeatherSnapshot};

fn state_without_upstreams() -> ProxyState {
    ProxyState {
        weather: WeatherClient::new(reqwest::Client::new()),
        advisory: None,
    }
}

async fn body_json(response: hyper::Response<http_body_util::Full<bytes::Bytes>>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[test]
fn preflight_is_permissive() {
    let response = preflight_response();
    assert_eq!(response.status(), StatusCode::OK);

    let headers = response.headers();
    assert_eq!(headers["Access-Control-Allow-Origin"], "*");
    assert_eq!(
        headers["Access-Control-Allow-Methods"],
        "GET, POST, OPTIONS"
    );
    assert_eq!(
        headers["Access-Control-Allow-Headers"],
        "Content-Type, Authorization, X-Client-Info, Apikey"
    );
}

#[tokio::test]
async fn weather_endpoint_rejects_missing_coordinates() {
    let state = state_without_upstreams();

    let response = handle_weather_data(&state, br#"{"latitude": 10.0}"#).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(response.headers()["Access-Control-Allow-Origin"], "*");

    let body = body_json(response).await;
    assert!(body["error"].as_str().unwrap().contains("required"));
}

#[tokio::test]
async fn weather_endpoint_rejects_malformed_bodies() {
    let state = state_without_upstreams();
    let response = handle_weather_data(&state, b"not json").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn weather_endpoint_returns_the_normalized_snapshot() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .and(query_param("timezone", "auto"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "latitude": 10.0,
            "longitude": 76.25,
            "timezone": "Asia/Kolkata",
            "current": {
                "time": "2024-01-10T06:00",
                "temperature_2m": 28.5,
                "relative_humidity_2m": 74.0,
                "precipitation": 0.2,
                "wind_speed_10m": 11.0,
                "weather_code": 2
            },
            "daily": {
                "time": ["2024-01-10"],
                "temperature_2m_max": [31.0],
                "temperature_2m_min": [22.0],
                "precipitation_sum": [0.0],
                "wind_speed_10m_max": [14.0],
                "weather_code": [1]
            }
        })))
        .mount(&upstream)
        .await;

    let state = ProxyState {
        weather: WeatherClient::new(reqwest::Client::new()).with_base_url(&upstream.uri()),
        advisory: None,
    };

    let response =
        handle_weather_data(&state, br#"{"latitude": 10.0, "longitude": 76.25}"#).await;
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let snapshot: WeatherSnapshot = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(snapshot.current.temperature, 28.5);
    assert_eq!(snapshot.forecast.len(), 1);
    assert_eq!(snapshot.location.timezone, "Asia/Kolkata");
}

#[tokio::test]
async fn weather_endpoint_maps_upstream_failure_to_500() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
        .mount(&upstream)
        .await;

    let state = ProxyState {
        weather: WeatherClient::new(reqwest::Client::new()).with_base_url(&upstream.uri()),
        advisory: None,
    };

    let response =
        handle_weather_data(&state, br#"{"latitude": 10.0, "longitude": 76.25}"#).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn advisory_endpoint_requires_the_credential() {
    let state = state_without_upstreams();

    let response = handle_ai_advisor(&state, br#"{"query": "When should I irrigate?"}"#).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body = body_json(response).await;
    assert!(body["error"].as_str().unwrap().contains("credential"));
}

#[tokio::test]
async fn advisory_endpoint_echoes_query_and_context() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-pro:generateContent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [
                { "content": { "parts": [ { "text": "Irrigate tomorrow." } ] } }
            ]
        })))
        .mount(&upstream)
        .await;

    let state = ProxyState {
        weather: WeatherClient::new(reqwest::Client::new()),
        advisory: Some(
            AdvisoryClient::new("test-credential", reqwest::Client::new())
                .with_base_url(&upstream.uri()),
        ),
    };

    let request = json!({
        "query": "When should I irrigate?",
        "context": { "cropType": "Rice", "farmSize": 2.5 }
    });
    let response = handle_ai_advisor(&state, request.to_string().as_bytes()).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["response"], "Irrigate tomorrow.");
    assert_eq!(body["query"], "When should I irrigate?");
    assert_eq!(body["context"]["cropType"], "Rice");
    assert_eq!(body["context"]["farmSize"], 2.5);
}
