use thiserror::Error;

/// Errors returned by the Instagram OAuth client.
#[derive(Debug, Error)]
pub enum OAuthError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Instagram answered with a non-2xx status.
    #[error("Instagram API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// The `state` parameter is malformed, forged or expired.
    #[error("invalid OAuth state: {0}")]
    InvalidState(String),

    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(String),
}
