use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use krishi::error::Error;
use krishi::weather::WeatherClient;

const CURRENT_FIELDS: &str =
    "temperature_2m,relative_humidity_2m,precipitation,wind_speed_10m,weather_code";
const DAILY_FIELDS: &str =
    "temperature_2m_max,temperature_2m_min,precipitation_sum,weather_code,wind_speed_10m_max";

fn provider_current() -> serde_json::Value {
    json!({
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
        }
    })
}

fn provider_forecast() -> serde_json::Value {
    json!({
        "daily": {
            "time": [
                "2024-01-10", "2024-01-11", "2024-01-12", "2024-01-13",
                "2024-01-14", "2024-01-15", "2024-01-16"
            ],
            "temperature_2m_max": [31.0, 30.5, 30.0, 29.5, 31.5, 32.0, 30.0],
            "temperature_2m_min": [22.0, 21.5, 21.0, 22.5, 23.0, 22.0, 21.0],
            "precipitation_sum": [0.0, 4.2, 12.0, 0.0, 0.0, 1.1, 0.0],
            "wind_speed_10m_max": [14.0, 18.0, 22.0, 12.0, 11.0, 13.0, 15.0],
            "weather_code": [1, 61, 63, 2, 0, 51, 3]
        }
    })
}

fn client(server: &MockServer) -> WeatherClient {
    WeatherClient::new(reqwest::Client::new()).with_base_url(&server.uri())
}

#[tokio::test]
async fn missing_coordinates_fail_without_an_upstream_call() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let weather = client(&server);

    let result = weather.fetch_weather(None, Some(76.25)).await;
    assert!(matches!(result.unwrap_err(), Error::Validation(_)));

    let result = weather.fetch_weather(Some(10.0), None).await;
    assert!(matches!(result.unwrap_err(), Error::Validation(_)));

    let result = weather.fetch_weather(None, None).await;
    assert!(matches!(result.unwrap_err(), Error::Validation(_)));
}

#[tokio::test]
async fn fetch_normalizes_current_and_seven_day_forecast() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .and(query_param("latitude", "10"))
        .and(query_param("longitude", "76.25"))
        .and(query_param("current", CURRENT_FIELDS))
        .and(query_param("timezone", "auto"))
        .respond_with(ResponseTemplate::new(200).set_body_json(provider_current()))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .and(query_param("daily", DAILY_FIELDS))
        .and(query_param("forecast_days", "7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(provider_forecast()))
        .expect(1)
        .mount(&server)
        .await;

    let snapshot = client(&server)
        .fetch_weather(Some(10.0), Some(76.25))
        .await
        .unwrap();

    assert_eq!(snapshot.current.temperature, 28.5);
    assert_eq!(snapshot.current.humidity, 74.0);
    assert_eq!(snapshot.current.rainfall, 0.2);
    assert_eq!(snapshot.current.wind_speed, 11.0);
    assert_eq!(snapshot.current.weather_code, 2);
    assert_eq!(snapshot.current.time, "2024-01-10T06:00");

    assert_eq!(snapshot.forecast.len(), 7);
    assert_eq!(snapshot.forecast[1].date, "2024-01-11");
    assert_eq!(snapshot.forecast[1].temp_max, 30.5);
    assert_eq!(snapshot.forecast[1].precipitation, 4.2);
    assert_eq!(snapshot.forecast[1].weather_code, 61);

    assert_eq!(snapshot.location.latitude, 10.0);
    assert_eq!(snapshot.location.timezone, "Asia/Kolkata");
}

#[tokio::test]
async fn any_upstream_failure_fails_the_whole_fetch() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .and(query_param("current", CURRENT_FIELDS))
        .respond_with(ResponseTemplate::new(200).set_body_json(provider_current()))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .and(query_param("daily", DAILY_FIELDS))
        .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
        .mount(&server)
        .await;

    let result = client(&server).fetch_weather(Some(10.0), Some(76.25)).await;
    assert!(matches!(result.unwrap_err(), Error::Weather(_)));
}
