use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    Unauthorized,
    Forbidden,
    Validation,
    RateLimited,
    Internal,
}

/// Error body returned by an auth server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    pub code: ErrorCode,
    pub message: String,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown role key '{key}'")]
pub struct InvalidRoleError {
    key: String,
}

impl InvalidRoleError {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown federated provider '{0}'")]
pub struct UnknownProviderError(pub String);

/// Per-field credential failures. `Display` is the message shown next to the field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Error)]
#[serde(rename_all = "snake_case")]
pub enum ValidationErrorKind {
    #[error("Email is required")]
    EmailRequired,
    #[error("Please enter a valid email address")]
    EmailMalformed,
    #[error("Password is required")]
    PasswordRequired,
    #[error("Password must be at least 6 characters")]
    PasswordTooShort,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_kinds_render_field_messages() {
        assert_eq!(
            ValidationErrorKind::PasswordTooShort.to_string(),
            "Password must be at least 6 characters"
        );
        assert_eq!(
            ValidationErrorKind::EmailMalformed.to_string(),
            "Please enter a valid email address"
        );
    }

    #[test]
    fn api_error_round_trips_through_json() {
        let raw = r#"{"code":"unauthorized","message":"bad password"}"#;
        let err: ApiError = serde_json::from_str(raw).expect("decode");
        assert_eq!(err.code, ErrorCode::Unauthorized);
        assert_eq!(err.message, "bad password");
    }
}
