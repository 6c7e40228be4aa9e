//! Error handling for the Krishi core

use std::fmt;
use thiserror::Error;

/// Unified error type for the Krishi core
#[derive(Error, Debug)]
pub enum Error {
    /// Network or HTTP related errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization or deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parsing errors
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    /// Socket and listener errors from the proxy surface
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Backing store errors
    #[error("Store error: {0}")]
    Store(String),

    /// Weather provider errors
    #[error("Weather error: {0}")]
    Weather(String),

    /// Advisory provider errors
    #[error("Advisory error: {0}")]
    Advisory(String),

    /// Rejected input, raised before any write is attempted
    #[error("Validation error: {0}")]
    Validation(String),

    /// A conditional write matched no rows; another session got there first
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Missing or malformed deployment configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Create a new store error
    pub fn store<T: fmt::Display>(msg: T) -> Self {
        Error::Store(msg.to_string())
    }

    /// Create a new weather error
    pub fn weather<T: fmt::Display>(msg: T) -> Self {
        Error::Weather(msg.to_string())
    }

    /// Create a new advisory error
    pub fn advisory<T: fmt::Display>(msg: T) -> Self {
        Error::Advisory(msg.to_string())
    }

    /// Create a new validation error
    pub fn validation<T: fmt::Display>(msg: T) -> Self {
        Error::Validation(msg.to_string())
    }

    /// Create a new conflict error
    pub fn conflict<T: fmt::Display>(msg: T) -> Self {
        Error::Conflict(msg.to_string())
    }

    /// Create a new configuration error
    pub fn config<T: fmt::Display>(msg: T) -> Self {
        Error::Config(msg.to_string())
    }
}
