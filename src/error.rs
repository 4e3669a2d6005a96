// Typed errors with thiserror. Only the configuration boundary can fail;
// navigation itself degrades to no-ops.

use thiserror::Error;

/// Engine error types.
#[derive(Error, Debug)]
pub enum NavError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Unknown key profile: {0}")]
    UnknownProfile(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for NavError {
    fn from(err: serde_json::Error) -> Self {
        NavError::Serialization(err.to_string())
    }
}
