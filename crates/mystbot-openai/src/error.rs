use thiserror::Error;

#[derive(Debug, Error)]
pub enum OpenAiError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from {endpoint}")]
    UnexpectedStatus { status: u16, endpoint: String },

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid base URL \"{url}\": {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("model returned an empty completion")]
    EmptyCompletion,

    #[error("model returned an empty script")]
    EmptyScript,

    #[error("model returned {count} keywords, expected at least 3")]
    TooFewKeywords { count: usize },

    #[error("failed to write audio file {path}: {source}")]
    AudioWrite {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
