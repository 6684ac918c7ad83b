//! Terminal renderings of the form surface and navigator.

use portal_core::{
    surface::{ButtonState, FieldState, FormButton, FormSurface, Navigator},
    CredentialField,
};
use shared::domain::{NavigationTarget, RoleProfile};

pub struct TerminalSurface;

impl FormSurface for TerminalSurface {
    fn set_field_state(&self, field: CredentialField, state: FieldState, message: Option<&str>) {
        let field = match field {
            CredentialField::Email => "email",
            CredentialField::Password => "password",
        };
        match (state, message) {
            (FieldState::Error, Some(message)) => println!("  [{field}] error: {message}"),
            (FieldState::Error, None) => println!("  [{field}] error"),
            (FieldState::Success, _) => println!("  [{field}] ok"),
            (FieldState::Idle, _) => {}
        }
    }

    fn set_button_state(&self, button: FormButton, state: ButtonState, label: &str) {
        if state == ButtonState::Idle {
            return;
        }
        let button = match button {
            FormButton::Login => "login".to_string(),
            FormButton::Demo => "demo".to_string(),
            FormButton::Federated(provider) => provider.as_str().to_string(),
        };
        println!("  ({button}) {label}");
    }

    fn apply_theme(&self, profile: &RoleProfile) {
        println!(
            "role: {} [{}] -- {} / {}",
            profile.display_name,
            profile.theme_identifier,
            profile.login_button_label,
            profile.signup_label
        );
    }
}

pub struct TerminalNavigator;

impl Navigator for TerminalNavigator {
    fn navigate(&self, target: &NavigationTarget) {
        println!("-> {target}");
    }
}
