//! Error types for the Directus request helpers

use dx_client_api::{ClientApiError, TransportError};
use reqwest::header::InvalidHeaderValue;
use thiserror::Error;

/// Errors that can occur while talking to a Directus instance
#[derive(Debug, Error)]
pub enum DirectusError {
    #[error("No credentials got returned for {name}")]
    CredentialsMissing { name: String },

    #[error("Credential store error: {0}")]
    CredentialStore(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Invalid header value: {0}")]
    InvalidHeader(#[from] InvalidHeaderValue),

    #[error("Binary data error: {0}")]
    BinaryData(String),
}

impl DirectusError {
    pub fn credentials_missing(name: impl Into<String>) -> Self {
        Self::CredentialsMissing { name: name.into() }
    }

    pub fn malformed(message: impl std::fmt::Display) -> Self {
        Self::MalformedResponse(message.to_string())
    }
}

impl From<TransportError> for DirectusError {
    fn from(err: TransportError) -> Self {
        Self::RequestFailed(err.to_string())
    }
}

impl From<DirectusError> for ClientApiError {
    fn from(err: DirectusError) -> Self {
        match err {
            DirectusError::CredentialsMissing { name } => ClientApiError::CredentialsMissing(name),
            DirectusError::RequestFailed(message) => ClientApiError::RequestFailed(message),
            DirectusError::MalformedResponse(message) => {
                ClientApiError::MalformedResponse(message)
            }
            other => ClientApiError::Unexpected(other.to_string()),
        }
    }
}

/// Result type alias for Directus helper operations
pub type DirectusResult<T> = Result<T, DirectusError>;
