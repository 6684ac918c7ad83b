//! Collaborators the controller drives but does not own.

use serde::Serialize;
use shared::domain::{FederatedProvider, NavigationTarget, RoleProfile};

use crate::validation::CredentialField;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldState {
    Idle,
    Error,
    Success,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ButtonState {
    Idle,
    Loading,
    Success,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FormButton {
    Login,
    Demo,
    Federated(FederatedProvider),
}

pub const LOGIN_SUCCESS_LABEL: &str = "Login Successful!";
pub const SIGNING_IN_LABEL: &str = "Signing in...";
pub const LOADING_DEMO_LABEL: &str = "Loading Demo...";
pub const DEMO_IDLE_LABEL: &str = "Try Demo";

pub fn federated_label(provider: FederatedProvider) -> &'static str {
    match provider {
        FederatedProvider::Google => "Continue with Google",
        FederatedProvider::Microsoft => "Continue with Microsoft",
    }
}

/// Rendering side of the login form.
pub trait FormSurface: Send + Sync {
    fn set_field_state(&self, field: CredentialField, state: FieldState, message: Option<&str>);
    fn set_button_state(&self, button: FormButton, state: ButtonState, label: &str);
    /// Re-skin the page for the newly active role.
    fn apply_theme(&self, profile: &RoleProfile);
}

/// Surface that renders nothing, for headless use.
pub struct NullSurface;

impl FormSurface for NullSurface {
    fn set_field_state(&self, _field: CredentialField, _state: FieldState, _message: Option<&str>) {}

    fn set_button_state(&self, _button: FormButton, _state: ButtonState, _label: &str) {}

    fn apply_theme(&self, _profile: &RoleProfile) {}
}

pub trait Navigator: Send + Sync {
    fn navigate(&self, target: &NavigationTarget);
}
