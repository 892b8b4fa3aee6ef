use thiserror::Error;

/// Errors returned by the Serper API client.
#[derive(Debug, Error)]
pub enum SerperError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API returned a non-2xx status.
    #[error("unexpected HTTP status {status} from Serper {endpoint}")]
    UnexpectedStatus { status: u16, endpoint: String },

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// The client itself was misconfigured (bad base URL).
    #[error("Serper client configuration error: {0}")]
    Config(String),
}
