//! Error types for the bot.

/// Top-level error type for the bot.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Relay error: {0}")]
    Relay(#[from] RelayError),

    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    #[error("News error: {0}")]
    News(#[from] NewsError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Relay transport and event signing errors.
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    #[error("Invalid relay address {address}: {reason}")]
    InvalidAddress { address: String, reason: String },

    #[error("Invalid identity credential: {0}")]
    InvalidCredential(String),

    #[error("Failed to connect to {address}: {reason}")]
    ConnectFailed { address: String, reason: String },

    #[error("Relay is not connected")]
    NotConnected,

    #[error("Relay subscription already taken")]
    AlreadySubscribed,

    #[error("Failed to sign event: {0}")]
    Signing(String),

    #[error("Failed to publish event: {0}")]
    PublishFailed(String),

    #[error("Relay connection closed")]
    Closed,

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// LLM provider errors.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("Cannot set up {backend} client for model {model}: {reason}")]
    ClientInit {
        backend: String,
        model: String,
        reason: String,
    },

    #[error("Provider {provider} request failed: {reason}")]
    RequestFailed { provider: String, reason: String },

    #[error("Provider {provider} returned empty content")]
    EmptyResponse { provider: String },
}

/// News source errors.
#[derive(Debug, thiserror::Error)]
pub enum NewsError {
    #[error("News request failed: {0}")]
    Request(String),

    #[error("News source returned status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Invalid news payload: {0}")]
    Payload(String),
}

/// Article content extraction errors, categorised by where the fetch broke.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// The server answered with an error status.
    #[error("Error response: status {status}")]
    Response { status: u16, body: String },

    /// The request went out but nothing came back.
    #[error("No response: {reason}")]
    NoResponse { reason: String },

    #[error("Other error: {message}")]
    Other { message: String },
}

impl FetchError {
    /// Short category label used in diagnostics.
    pub fn category(&self) -> &'static str {
        match self {
            FetchError::Response { .. } => "response",
            FetchError::NoResponse { .. } => "no_response",
            FetchError::Other { .. } => "other",
        }
    }
}

/// Result type alias for the bot.
pub type Result<T> = std::result::Result<T, Error>;
