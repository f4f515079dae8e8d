use thiserror::Error;

/// Errors returned by the generation service client.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// Network, TLS, or timeout failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-2xx status.
    #[error("generation service returned {status}: {message}")]
    Service { status: u16, message: String },

    /// The service envelope could not be deserialized.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// The reply text held no usable `{"email": ...}` structure.
    #[error("unusable generation output: {0}")]
    Format(String),

    #[error("invalid base URL '{base_url}': {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },
}

impl GenerationError {
    /// `true` when the service answered but its content had the wrong shape.
    #[must_use]
    pub fn is_format(&self) -> bool {
        matches!(self, GenerationError::Format(_))
    }
}
