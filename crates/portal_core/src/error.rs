use std::time::Duration;

use shared::error::{ApiError, InvalidRoleError};
use thiserror::Error;

use crate::validation::ValidationResult;

#[derive(Debug, Clone, Error)]
pub enum AuthError {
    #[error("auth server unreachable: {0}")]
    Network(String),
    #[error("credentials rejected: {0}")]
    Rejected(String),
    #[error("auth request timed out after {0:?}")]
    Timeout(Duration),
    #[error("invalid auth response: {0}")]
    InvalidResponse(String),
    #[error("{0} is not supported by this auth service")]
    Unsupported(&'static str),
}

impl AuthError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, AuthError::Network(_) | AuthError::Timeout(_))
    }
}

impl From<ApiError> for AuthError {
    fn from(value: ApiError) -> Self {
        AuthError::Rejected(value.message)
    }
}

#[derive(Debug, Clone, Error)]
pub enum SessionError {
    #[error(transparent)]
    InvalidRole(#[from] InvalidRoleError),
    #[error("credential validation failed: {0}")]
    ValidationFailed(ValidationResult),
    /// The attempt was superseded by a newer one; callers drop it silently.
    #[error("attempt superseded by a newer session flow")]
    Cancelled,
    #[error(transparent)]
    Auth(#[from] AuthError),
}

impl SessionError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, SessionError::Cancelled)
    }
}
