//! Weather adapter
//!
//! Normalizes an Open-Meteo-compatible provider into the shape the rest of
//! the platform consumes: one current-conditions block plus a seven-day
//! daily forecast. Both upstream requests run concurrently and the whole
//! fetch fails if either does; partial weather is never returned.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

use crate::error::Error;
use crate::fetch::Fetch;

/// Default base URL of the weather provider
pub const DEFAULT_BASE_URL: &str = "https://api.open-meteo.com";

const CURRENT_FIELDS: &str =
    "temperature_2m,relative_humidity_2m,precipitation,wind_speed_10m,weather_code";
const DAILY_FIELDS: &str =
    "temperature_2m_max,temperature_2m_min,precipitation_sum,weather_code,wind_speed_10m_max";
const FORECAST_DAYS: u32 = 7;

/// Normalized current conditions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentWeather {
    pub temperature: f64,
    pub humidity: f64,
    pub rainfall: f64,
    pub wind_speed: f64,
    pub weather_code: i32,
    /// Provider observation timestamp, passed through verbatim
    pub time: String,
}

/// One normalized forecast day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyForecast {
    pub date: String,
    pub temp_max: f64,
    pub temp_min: f64,
    pub precipitation: f64,
    pub wind_speed: f64,
    pub weather_code: i32,
}

/// The coordinates and timezone the provider resolved the request to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherLocation {
    pub latitude: f64,
    pub longitude: f64,
    pub timezone: String,
}

/// Normalized weather bundle: current conditions plus daily forecast
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub current: CurrentWeather,
    pub forecast: Vec<DailyForecast>,
    pub location: WeatherLocation,
}

// Provider wire shapes. Only the fields we map are declared.

#[derive(Debug, Deserialize)]
struct ProviderCurrentResponse {
    latitude: f64,
    longitude: f64,
    timezone: String,
    current: ProviderCurrent,
}

#[derive(Debug, Deserialize)]
struct ProviderCurrent {
    time: String,
    temperature_2m: f64,
    relative_humidity_2m: f64,
    precipitation: f64,
    wind_speed_10m: f64,
    weather_code: i32,
}

#[derive(Debug, Deserialize)]
struct ProviderForecastResponse {
    daily: ProviderDaily,
}

#[derive(Debug, Deserialize)]
struct ProviderDaily {
    time: Vec<String>,
    temperature_2m_max: Vec<f64>,
    temperature_2m_min: Vec<f64>,
    precipitation_sum: Vec<f64>,
    wind_speed_10m_max: Vec<f64>,
    weather_code: Vec<i32>,
}

/// Client for the weather provider
#[derive(Clone)]
pub struct WeatherClient {
    base_url: String,
    client: Client,
}

impl WeatherClient {
    /// Create a new WeatherClient against the default provider
    pub fn new(client: Client) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            client,
        }
    }

    /// Point the client at a different provider base URL
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Fetch current conditions and the seven-day forecast for a coordinate
    /// pair.
    ///
    /// Both coordinates must be present; a missing one fails the call
    /// before any upstream request is made. Either upstream failure fails
    /// the whole call.
    pub async fn fetch_weather(
        &self,
        latitude: Option<f64>,
        longitude: Option<f64>,
    ) -> Result<WeatherSnapshot, Error> {
        let (lat, lon) = match (latitude, longitude) {
            (Some(lat), Some(lon)) => (lat, lon),
            _ => {
                return Err(Error::validation(
                    "latitude and longitude are required",
                ))
            }
        };

        debug!(lat, lon, "fetching weather");

        let url = format!("{}/v1/forecast", self.base_url);

        let mut current_params = HashMap::new();
        current_params.insert("latitude".to_string(), lat.to_string());
        current_params.insert("longitude".to_string(), lon.to_string());
        current_params.insert("current".to_string(), CURRENT_FIELDS.to_string());
        current_params.insert("timezone".to_string(), "auto".to_string());

        let mut forecast_params = HashMap::new();
        forecast_params.insert("latitude".to_string(), lat.to_string());
        forecast_params.insert("longitude".to_string(), lon.to_string());
        forecast_params.insert("daily".to_string(), DAILY_FIELDS.to_string());
        forecast_params.insert("timezone".to_string(), "auto".to_string());
        forecast_params.insert("forecast_days".to_string(), FORECAST_DAYS.to_string());

        let current_fut = async {
            let response = Fetch::get(&self.client, &url)
                .query(current_params)
                .execute_raw()
                .await?;
            if !response.status().is_success() {
                return Err(Error::weather(format!(
                    "current conditions request failed with status {}",
                    response.status()
                )));
            }
            response
                .json::<ProviderCurrentResponse>()
                .await
                .map_err(Error::from)
        };

        let forecast_fut = async {
            let response = Fetch::get(&self.client, &url)
                .query(forecast_params)
                .execute_raw()
                .await?;
            if !response.status().is_success() {
                return Err(Error::weather(format!(
                    "forecast request failed with status {}",
                    response.status()
                )));
            }
            response
                .json::<ProviderForecastResponse>()
                .await
                .map_err(Error::from)
        };

        let (current, forecast) = tokio::try_join!(current_fut, forecast_fut)?;

        normalize(current, forecast)
    }
}

/// Fold the two provider responses into one normalized snapshot
fn normalize(
    current: ProviderCurrentResponse,
    forecast: ProviderForecastResponse,
) -> Result<WeatherSnapshot, Error> {
    let daily = forecast.daily;
    let mut days = Vec::with_capacity(daily.time.len());
    for (i, date) in daily.time.iter().enumerate() {
        let out_of_step = || Error::weather("forecast arrays are out of step");
        days.push(DailyForecast {
            date: date.clone(),
            temp_max: *daily.temperature_2m_max.get(i).ok_or_else(out_of_step)?,
            temp_min: *daily.temperature_2m_min.get(i).ok_or_else(out_of_step)?,
            precipitation: *daily.precipitation_sum.get(i).ok_or_else(out_of_step)?,
            wind_speed: *daily.wind_speed_10m_max.get(i).ok_or_else(out_of_step)?,
            weather_code: *daily.weather_code.get(i).ok_or_else(out_of_step)?,
        });
    }

    Ok(WeatherSnapshot {
        current: CurrentWeather {
            temperature: current.current.temperature_2m,
            humidity: current.current.relative_humidity_2m,
            rainfall: current.current.precipitation,
            wind_speed: current.current.wind_speed_10m,
            weather_code: current.current.weather_code,
            time: current.current.time,
        },
        forecast: days,
        location: WeatherLocation {
            latitude: current.latitude,
            longitude: current.longitude,
            timezone: current.timezone,
        },
    })
}

/// Human-readable description for a WMO-style weather code.
///
/// Total over all integers: unmapped codes read "Unknown".
pub fn weather_description(code: i32) -> &'static str {
    match code {
        0 => "Clear sky",
        1 => "Mainly clear",
        2 => "Partly cloudy",
        3 => "Overcast",
        45 => "Foggy",
        48 => "Depositing rime fog",
        51 => "Light drizzle",
        53 => "Moderate drizzle",
        55 => "Dense drizzle",
        61 => "Slight rain",
        63 => "Moderate rain",
        65 => "Heavy rain",
        71 => "Slight snow",
        73 => "Moderate snow",
        75 => "Heavy snow",
        77 => "Snow grains",
        80 => "Slight rain showers",
        81 => "Moderate rain showers",
        82 => "Violent rain showers",
        85 => "Slight snow showers",
        86 => "Heavy snow showers",
        95 => "Thunderstorm",
        96 => "Thunderstorm with slight hail",
        99 => "Thunderstorm with heavy hail",
        _ => "Unknown",
    }
}
