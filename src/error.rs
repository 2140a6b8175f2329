//! Error types for the Starlight kiosk

use thiserror::Error;

/// Result type alias for kiosk operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the kiosk
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Knowledge base error (missing directory, unreadable subtopic)
    #[error("knowledge error: {0}")]
    Knowledge(String),

    /// Input source error
    #[error("input error: {0}")]
    Input(String),

    /// Audio device error
    #[cfg(feature = "audio")]
    #[error("audio error: {0}")]
    Audio(String),

    /// Speech-to-text error
    #[cfg(feature = "audio")]
    #[error("STT error: {0}")]
    Stt(String),

    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP error
    #[cfg(feature = "audio")]
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("toml error: {0}")]
    Toml(#[from] toml::de::Error),
}
