use serde::{Deserialize, Serialize};
use slide_chatgpt::ClientError;
use thiserror::Error;

use crate::schema::SchemaError;

/// Anything that can stop an outline from being generated.
#[derive(Error, Debug)]
pub enum OutlineError {
    #[error("model selection failed: {0}")]
    Model(String),

    #[error("schema error: {0}")]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Client(#[from] ClientError),
}

/// Terminal item of a failed outline stream.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("{detail} (status {status})")]
pub struct GenerationError {
    pub status: u16,
    pub detail: String,
}

/// Map any generation failure onto a status code and a readable detail.
pub fn normalize_error(err: OutlineError) -> GenerationError {
    let status = match &err {
        OutlineError::Model(_) | OutlineError::Schema(_) => 400,
        OutlineError::Client(client) => match client {
            ClientError::Api { status, .. } if *status >= 400 => *status,
            ClientError::MissingApiKey => 401,
            ClientError::Refused(_) => 422,
            ClientError::Http(e) if e.is_timeout() => 504,
            ClientError::Http(e) if e.is_connect() => 503,
            ClientError::Http(e) => e.status().map(|s| s.as_u16()).unwrap_or(500),
            _ => 500,
        },
    };
    GenerationError {
        status,
        detail: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_status_is_kept() {
        let err = normalize_error(OutlineError::Client(ClientError::Api {
            status: 429,
            message: "rate limited".into(),
        }));
        assert_eq!(err.status, 429);
        assert!(err.detail.contains("rate limited"));
    }

    #[test]
    fn non_error_api_status_becomes_500() {
        let err = normalize_error(OutlineError::Client(ClientError::Api {
            status: 200,
            message: "odd".into(),
        }));
        assert_eq!(err.status, 500);
    }

    #[test]
    fn caller_errors_are_400() {
        assert_eq!(normalize_error(SchemaError::ZeroSlides.into()).status, 400);
        assert_eq!(normalize_error(OutlineError::Model("empty".into())).status, 400);
    }

    #[test]
    fn client_side_mappings() {
        assert_eq!(normalize_error(ClientError::MissingApiKey.into()).status, 401);
        assert_eq!(normalize_error(ClientError::Refused("no".into()).into()).status, 422);
        assert_eq!(normalize_error(ClientError::Stream("cut".into()).into()).status, 500);
    }
}
