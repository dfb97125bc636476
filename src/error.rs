//! Error kinds surfaced to the user
//! Internal functions return [`anyhow::Result`] and wrap one of these, [`#main`] decides the exit code
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum XError {
    /// One or more credentials could not be found
    #[error("Missing required environment variables: {}", .missing.join(", "))]
    Configuration { missing: Vec<&'static str> },

    /// User input was rejected before any request was made
    #[error("{0}")]
    Validation(String),

    /// The API answered with a non-2xx status, `body` is kept as received
    #[error("X API Error ({status}): {}", pretty_body(.body))]
    Api { status: u16, body: String },

    /// The request never got an HTTP response
    #[error("Transport failure: {0}")]
    Transport(String),

    #[error("Failed to read {}: {source}", .path.display())]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// 2xx response without the field we need
    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),
}

impl XError {
    /// Upstream error payload as JSON, if the body was JSON at all
    pub fn payload(&self) -> Option<serde_json::Value> {
        match self {
            XError::Api { body, .. } => serde_json::from_str(body).ok(),
            _ => None,
        }
    }
}

fn pretty_body(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| serde_json::to_string_pretty(&value).ok())
        .unwrap_or_else(|| body.to_string())
}
