use thiserror::Error;

/// Errors returned while retrieving a profile from Apify.
#[derive(Debug, Error)]
pub enum ApifyError {
    /// Network, TLS, or timeout failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The actor ran but produced nothing for this identifier.
    #[error("no profile found for {identifier}")]
    NotFound { identifier: String },

    /// The actor run exceeded the provider's synchronous wait window.
    #[error("provider timed out while fetching {identifier}")]
    Timeout { identifier: String },

    /// The provider answered with an explicit error.
    #[error("profile provider error: {0}")]
    Provider(String),

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// The record lacks a mandatory shape marker (name, headline).
    #[error("incomplete profile for {identifier}: {reason}")]
    Normalization { identifier: String, reason: String },

    /// Retrieval was asked for a reference that did not classify.
    #[error("cannot retrieve an invalid reference: {0}")]
    InvalidReference(String),

    #[error("invalid base URL '{base_url}': {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },
}

impl ApifyError {
    /// `true` when the failure was a timeout, either on our side or the provider's.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        match self {
            ApifyError::Http(e) => e.is_timeout(),
            ApifyError::Timeout { .. } => true,
            _ => false,
        }
    }
}
