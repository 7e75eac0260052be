use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("provider returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Stream error: {0}")]
    Stream(String),

    #[error("model refused the request: {0}")]
    Refused(String),

    #[error("no API key configured (set OPENAI_API_KEY)")]
    MissingApiKey,
}

pub type Result<T> = std::result::Result<T, ClientError>;
