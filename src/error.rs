use thiserror::Error;

/// Main error type for the pill engine
#[derive(Error, Debug)]
pub enum PillEngineError {
    /// Database errors
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// HTTP request errors
    #[error("HTTP request failed: {0}")]
    HttpRequest(#[from] reqwest::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// File I/O errors (imports, config files)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Provider errors
    #[error("Provider '{provider}' error: {message}")]
    Provider { provider: String, message: String },

    /// Local store errors
    #[error("Store error: {0}")]
    Store(String),

    /// Query imprint was empty after normalization
    #[error("Please enter the pill imprint (letters/numbers on the pill).")]
    NoImprint,

    /// No candidate survived ranking
    #[error("No matching pills found for imprint: {0}")]
    NoMatches(String),

    /// Rejected tuning parameters
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Generic errors
    #[error("{0}")]
    Other(String),
}

impl From<String> for PillEngineError {
    fn from(s: String) -> Self {
        PillEngineError::Other(s)
    }
}

impl From<&str> for PillEngineError {
    fn from(s: &str) -> Self {
        PillEngineError::Other(s.to_string())
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, PillEngineError>;
