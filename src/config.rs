//! Configuration for the Krishi client and its deployment environment

use std::env;

use crate::error::Error;

/// Environment variable locating the backing store
pub const STORE_URL_VAR: &str = "KRISHI_STORE_URL";

/// Environment variable carrying the store's public API key
pub const STORE_KEY_VAR: &str = "KRISHI_STORE_ANON_KEY";

/// Environment variable carrying the generative-AI provider credential
pub const ADVISORY_KEY_VAR: &str = "GEMINI_API_KEY";

/// Environment variable overriding the proxy bind address
pub const PROXY_BIND_VAR: &str = "PROXY_BIND";

const DEFAULT_PROXY_BIND: &str = "127.0.0.1:8787";

/// Configuration options for the Krishi client
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// The database schema queries run against
    pub db_schema: String,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            db_schema: "public".to_string(),
        }
    }
}

impl ClientOptions {
    /// Set the database schema
    pub fn with_db_schema(mut self, value: &str) -> Self {
        self.db_schema = value.to_string();
        self
    }
}

/// Environment-supplied deployment configuration
///
/// The store URL and key are required: without them no row can be read or
/// written. The advisory credential is optional here because only the
/// advisory adapter needs it; constructing that adapter without it is a
/// [`Error::Config`], never a silent fallback.
#[derive(Debug, Clone)]
pub struct KrishiConfig {
    /// Base URL of the backing store
    pub store_url: String,
    /// Public API key for the backing store
    pub store_key: String,
    /// Credential for the generative-AI provider, if configured
    pub advisory_key: Option<String>,
}

impl KrishiConfig {
    /// Read the deployment configuration from the environment
    pub fn from_env() -> Result<Self, Error> {
        let store_url = env::var(STORE_URL_VAR)
            .map_err(|_| Error::config(format!("{} must be set", STORE_URL_VAR)))?;
        let store_key = env::var(STORE_KEY_VAR)
            .map_err(|_| Error::config(format!("{} must be set", STORE_KEY_VAR)))?;
        let advisory_key = env::var(ADVISORY_KEY_VAR).ok().filter(|k| !k.is_empty());

        Ok(Self {
            store_url,
            store_key,
            advisory_key,
        })
    }
}

/// Bind address for the proxy binary, `127.0.0.1:8787` unless overridden
pub fn proxy_bind() -> String {
    env::var(PROXY_BIND_VAR).unwrap_or_else(|_| DEFAULT_PROXY_BIND.to_string())
}
