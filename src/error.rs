//! Unified error types for the estimation engine.
//!
//! Provider failures never escape the source-client boundary — they are
//! converted to estimate/default readings there. These variants exist for
//! the plumbing underneath (HTTP, JSON, config) and for the web shim.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("provider error: {0}")]
    Provider(String),

    #[error("geocoding error: {0}")]
    Geocode(String),

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("web server error: {0}")]
    Web(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, EngineError>;
