//! Error modeling for the terminal adapter.

use portal_core::{AuthError, SessionError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorCategory {
    Validation,
    Auth,
    Transport,
    Usage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    RoleSelection,
    Login,
    Demo,
    FederatedSignIn,
}

#[derive(Debug, Clone)]
pub struct UiError {
    category: UiErrorCategory,
    context: UiErrorContext,
    message: String,
}

impl UiError {
    /// `None` for superseded attempts, which are never shown to the user.
    pub fn from_session(context: UiErrorContext, err: &SessionError) -> Option<Self> {
        let category = match err {
            SessionError::Cancelled => return None,
            SessionError::InvalidRole(_) => UiErrorCategory::Usage,
            SessionError::ValidationFailed(_) => UiErrorCategory::Validation,
            SessionError::Auth(AuthError::Network(_) | AuthError::Timeout(_)) => {
                UiErrorCategory::Transport
            }
            SessionError::Auth(
                AuthError::Rejected(_) | AuthError::InvalidResponse(_) | AuthError::Unsupported(_),
            ) => UiErrorCategory::Auth,
        };
        Some(Self {
            category,
            context,
            message: err.to_string(),
        })
    }

    pub fn category(&self) -> UiErrorCategory {
        self.category
    }

    pub fn context(&self) -> UiErrorContext {
        self.context
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn hint(&self) -> &'static str {
        match self.category {
            UiErrorCategory::Validation => "fix the highlighted fields and retry",
            UiErrorCategory::Auth => "check your credentials or pick another sign-in method",
            UiErrorCategory::Transport => "auth server unreachable; check the URL/network and retry",
            UiErrorCategory::Usage => "valid roles are student, teacher and parent",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use portal_core::validate_credentials;
    use shared::error::InvalidRoleError;
    use std::time::Duration;

    #[test]
    fn superseded_attempts_are_silent() {
        assert!(UiError::from_session(UiErrorContext::Login, &SessionError::Cancelled).is_none());
    }

    #[test]
    fn classifies_session_errors() {
        let validation = SessionError::ValidationFailed(validate_credentials("", ""));
        let err = UiError::from_session(UiErrorContext::Login, &validation).expect("shown");
        assert_eq!(err.category(), UiErrorCategory::Validation);
        assert!(err.message().contains("Email is required"));

        let timeout = SessionError::Auth(AuthError::Timeout(Duration::from_secs(1)));
        let err = UiError::from_session(UiErrorContext::Login, &timeout).expect("shown");
        assert_eq!(err.category(), UiErrorCategory::Transport);

        let role = SessionError::InvalidRole(InvalidRoleError::new("admin"));
        let err = UiError::from_session(UiErrorContext::RoleSelection, &role).expect("shown");
        assert_eq!(err.category(), UiErrorCategory::Usage);
        assert_eq!(err.context(), UiErrorContext::RoleSelection);
    }
}
