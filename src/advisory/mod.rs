//! Advisory adapter
//!
//! Forwards a farmer's question, together with whatever farm context is on
//! hand, to a generative-AI backend. The system prompt fixes the advisor
//! persona; the user prompt carries the question plus present-only labeled
//! context lines. One request, fixed generation parameters, no retry and
//! no streaming.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

use crate::error::Error;
use crate::fetch::Fetch;
use crate::store::GeoPoint;
use crate::weather::CurrentWeather;

/// Default base URL of the generative-AI provider
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

const MODEL: &str = "gemini-pro";
const GENERATION_TEMPERATURE: f64 = 0.7;
const MAX_OUTPUT_TOKENS: u32 = 1024;

/// Returned when the provider answers successfully but with no candidate text
const EMPTY_RESPONSE: &str = "No response generated";

const SYSTEM_PROMPT: &str = "You are Krishi, an AI agricultural advisor helping farmers in India with personalized farming guidance. Provide practical, actionable advice based on:
- Local weather conditions
- Soil type and crop requirements
- Pest and disease management
- Irrigation scheduling
- Market trends and pricing
- Sustainable farming practices

Provide concise, farmer-friendly responses in simple language.";

/// Farm context attached to an advisory request.
///
/// Serialized camelCase: the same shape is stored in chat history and
/// echoed by the proxy endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvisoryContext {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crop_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub soil_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<GeoPoint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weather: Option<CurrentWeather>,
    /// Farm size in acres
    #[serde(skip_serializing_if = "Option::is_none")]
    pub farm_size: Option<f64>,
}

#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f64,
    #[serde(rename = "maxOutputTokens")]
    max_output_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

/// Client for the generative-AI advisory backend
#[derive(Clone)]
pub struct AdvisoryClient {
    base_url: String,
    api_key: String,
    client: Client,
}

impl AdvisoryClient {
    /// Create a new AdvisoryClient with the given provider credential
    pub fn new(api_key: &str, client: Client) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.to_string(),
            client,
        }
    }

    /// Point the client at a different provider base URL
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Ask the advisory backend a question.
    ///
    /// Any non-success upstream status surfaces as one opaque
    /// [`Error::Advisory`].
    pub async fn get_advisory(
        &self,
        query: &str,
        context: Option<&AdvisoryContext>,
    ) -> Result<String, Error> {
        let user_prompt = build_user_prompt(query, context);
        debug!(query_len = query.len(), "requesting advisory");

        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![
                    Part {
                        text: SYSTEM_PROMPT.to_string(),
                    },
                    Part { text: user_prompt },
                ],
            }],
            generation_config: GenerationConfig {
                temperature: GENERATION_TEMPERATURE,
                max_output_tokens: MAX_OUTPUT_TOKENS,
            },
        };

        let url = format!("{}/v1beta/models/{}:generateContent", self.base_url, MODEL);
        let mut params = HashMap::new();
        params.insert("key".to_string(), self.api_key.clone());

        let response = Fetch::post(&self.client, &url)
            .query(params)
            .json(&body)?
            .execute_raw()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await?;
            return Err(Error::advisory(format!(
                "provider returned status {}: {}",
                status, text
            )));
        }

        let parsed = response.json::<GenerateResponse>().await?;
        let text = parsed
            .candidates
            .and_then(|mut c| if c.is_empty() { None } else { Some(c.remove(0)) })
            .and_then(|c| c.content)
            .and_then(|mut c| if c.parts.is_empty() { None } else { Some(c.parts.remove(0)) })
            .map(|p| p.text)
            .unwrap_or_else(|| EMPTY_RESPONSE.to_string());

        Ok(text)
    }
}

/// Compose the user prompt: the question plus labeled lines for every
/// context field that is present. Absent fields are omitted, not rendered
/// empty.
fn build_user_prompt(query: &str, context: Option<&AdvisoryContext>) -> String {
    let mut prompt = query.to_string();

    let mut lines = Vec::new();
    if let Some(ctx) = context {
        if let Some(crop) = &ctx.crop_type {
            lines.push(format!("- Crop: {}", crop));
        }
        if let Some(soil) = &ctx.soil_type {
            lines.push(format!("- Soil Type: {}", soil));
        }
        if let Some(size) = ctx.farm_size {
            lines.push(format!("- Farm Size: {} acres", size));
        }
        if let Some(weather) = &ctx.weather {
            lines.push(format!(
                "- Weather: Temp {}°C, Humidity {}%",
                weather.temperature, weather.humidity
            ));
        }
    }

    if !lines.is_empty() {
        prompt.push_str("\n\nContext:\n");
        prompt.push_str(&lines.join("\n"));
        prompt.push('\n');
    }

    prompt
}
