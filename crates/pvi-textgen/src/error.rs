use thiserror::Error;

/// Errors returned by the text-generation client.
#[derive(Debug, Error)]
pub enum TextGenError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service returned a non-2xx status.
    #[error("unexpected HTTP status {status} from text-generation service")]
    UnexpectedStatus { status: u16 },

    /// The service returned an error envelope with a message.
    #[error("text-generation API error: {0}")]
    ApiError(String),

    /// The response body could not be deserialized into the expected shape.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// Generated text contained no decodable JSON object, even after the
    /// brace-extraction retry.
    #[error("no decodable JSON object in generated text: {snippet}")]
    Unstructured { snippet: String },
}
