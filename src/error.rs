use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("authentication failed with status code {status}: {body}")]
    Authentication { status: u16, body: String },

    #[error("Salesforce API error ({status}): {body}")]
    Api { status: u16, body: String },

    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid response from Salesforce: {0}")]
    InvalidResponse(String),

    #[error("failed to sign JWT assertion: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ExtractError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ExtractError::Io {
            path: path.into(),
            source,
        }
    }
}
