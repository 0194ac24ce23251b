use miette::{Diagnostic, Result};
use thiserror::Error;

/// Main error type for the application
#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("Environment error: {0}")]
    #[diagnostic(
        code(eventsite::environment),
        help("set the variable in the environment or in a .env file")
    )]
    Environment(String),

    #[error("Configuration error: {0}")]
    #[diagnostic(code(eventsite::config))]
    Config(String),

    #[error("Network error fetching events: {0}")]
    #[diagnostic(code(eventsite::transport))]
    Transport(String),

    #[error("Google API error: {status} {reason}")]
    #[diagnostic(code(eventsite::google_api))]
    Api { status: u16, reason: String },

    #[error("Invalid event time: {0}")]
    #[diagnostic(code(eventsite::invalid_time))]
    InvalidTime(String),

    #[error(transparent)]
    #[diagnostic(code(eventsite::io))]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    #[diagnostic(code(eventsite::serialization))]
    Serialization(String),

    #[error("Other error: {0}")]
    #[diagnostic(code(eventsite::other))]
    Other(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => Error::Api {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
            },
            None if err.is_decode() => Error::Serialization(err.to_string()),
            None => Error::Transport(err.to_string()),
        }
    }
}

/// Type alias for Result with our Error type
pub type SiteResult<T> = Result<T, Error>;

/// Helper to create environment errors
pub fn env_error(var: &str) -> Error {
    Error::Environment(format!("Missing environment variable: {}", var))
}

/// Helper to create configuration errors
pub fn config_error(message: &str) -> Error {
    Error::Config(message.to_string())
}

/// Helper to create per-record time errors
pub fn time_error(message: &str) -> Error {
    Error::InvalidTime(message.to_string())
}

/// Helper to create other errors
pub fn other_error(message: &str) -> Error {
    Error::Other(message.to_string())
}
