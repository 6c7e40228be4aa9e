//! Krishi core library
//!
//! Farm-data aggregation and advisory context assembly for a smart-farming
//! platform: typed access to the hosted relational store, a weather
//! adapter, a generative-AI advisory adapter, and the aggregator that
//! merges per-farmer state into one consistent snapshot.

pub mod advisory;
pub mod config;
pub mod error;
pub mod farm;
pub mod fetch;
pub mod proxy;
pub mod store;
pub mod weather;

use reqwest::Client;

use crate::advisory::AdvisoryClient;
use crate::config::{ClientOptions, KrishiConfig, ADVISORY_KEY_VAR};
use crate::error::Error;
use crate::farm::FarmClient;
use crate::store::FarmStore;
use crate::weather::WeatherClient;

/// The main entry point for the Krishi core
pub struct Krishi {
    /// The base URL for the backing store
    pub url: String,
    /// The public API key for the backing store
    pub key: String,
    /// HTTP client used for requests
    pub http_client: Client,
    /// Client options
    pub options: ClientOptions,
    advisory_key: Option<String>,
    farm: FarmClient,
}

impl Krishi {
    /// Create a new Krishi client
    ///
    /// # Arguments
    ///
    /// * `store_url` - The base URL of the backing store
    /// * `store_key` - The public API key for the backing store
    ///
    /// # Example
    ///
    /// ```
    /// use krishi::Krishi;
    ///
    /// let krishi = Krishi::new("https://store.example.com", "anon-key");
    /// ```
    pub fn new(store_url: &str, store_key: &str) -> Self {
        Self::new_with_options(store_url, store_key, ClientOptions::default())
    }

    /// Create a new Krishi client with custom options
    pub fn new_with_options(store_url: &str, store_key: &str, options: ClientOptions) -> Self {
        let http_client = Client::new();
        let farm = FarmClient::new(FarmStore::new(
            store_url,
            store_key,
            &options,
            http_client.clone(),
        ));

        Self {
            url: store_url.to_string(),
            key: store_key.to_string(),
            http_client,
            options,
            advisory_key: None,
            farm,
        }
    }

    /// Create a client from environment-supplied configuration
    pub fn from_config(config: &KrishiConfig) -> Self {
        let mut client = Self::new(&config.store_url, &config.store_key);
        client.advisory_key = config.advisory_key.clone();
        client
    }

    /// Set the generative-AI provider credential
    pub fn with_advisory_key(mut self, key: &str) -> Self {
        self.advisory_key = Some(key.to_string());
        self
    }

    /// The typed store gateway
    pub fn store(&self) -> FarmStore {
        FarmStore::new(&self.url, &self.key, &self.options, self.http_client.clone())
    }

    /// The farm client: snapshots, mutations and advisory chat
    pub fn farm(&self) -> &FarmClient {
        &self.farm
    }

    /// A weather adapter sharing this client's connection pool
    pub fn weather(&self) -> WeatherClient {
        WeatherClient::new(self.http_client.clone())
    }

    /// An advisory adapter, if the provider credential is configured
    pub fn advisory(&self) -> Result<AdvisoryClient, Error> {
        let key = self
            .advisory_key
            .as_deref()
            .ok_or_else(|| Error::config(format!("{} is not set", ADVISORY_KEY_VAR)))?;
        Ok(AdvisoryClient::new(key, self.http_client.clone()))
    }
}

/// A convenience module for common imports
pub mod prelude {
    pub use crate::config::ClientOptions;
    pub use crate::error::Error;
    pub use crate::Krishi;
}
