//! Error types for the Sous assistant

use thiserror::Error;

/// Result type alias for Sous operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the Sous assistant
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Camera device unavailable
    #[error("camera error: {0}")]
    Camera(String),

    /// Frame capture failed
    #[error("capture error: {0}")]
    Capture(String),

    /// Detection inference error
    #[error("detection error: {0}")]
    Detection(String),

    /// Speech synthesis error
    #[error("speech error: {0}")]
    Speech(String),

    /// Audio output error
    #[error("audio error: {0}")]
    Audio(String),

    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP error
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("toml error: {0}")]
    Toml(#[from] toml::de::Error),
}
