use thiserror::Error;

/// Errors returned by the Apify actor client.
#[derive(Debug, Error)]
pub enum ApifyError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The platform returned a non-2xx status (actor failed, bad token,
    /// run aborted).
    #[error("unexpected HTTP status {status} from Apify actor run")]
    UnexpectedStatus { status: u16 },

    /// The dataset body could not be deserialized as a JSON array.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// The client itself was misconfigured (bad base URL).
    #[error("Apify client configuration error: {0}")]
    Config(String),
}
