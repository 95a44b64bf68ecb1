//! Error types for contract validation

use thiserror::Error;

/// Errors raised while validating or parsing contract values
#[derive(Debug, Error)]
pub enum ContractError {
    #[error("validation failed: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("unsupported HTTP method: {0}")]
    UnknownMethod(String),
}

/// Result type alias for contract operations
pub type ContractResult<T> = Result<T, ContractError>;
