//! Turns adapter commands into controller calls and renders their outcomes.

use std::sync::Arc;

use portal_core::{
    notifications::{NotificationCenter, NotificationKind, TEACHER_TOAST_TTL},
    search::{search, DirectoryRecord},
    surface::Navigator,
    CredentialField, SessionController, SessionError,
};
use shared::domain::{FederatedProvider, NavigationTarget, Role};

use crate::controller::events::{UiError, UiErrorContext};

pub enum PortalCommand {
    Roles,
    Validate { email: String, password: String },
    Login {
        email: String,
        password: String,
        remember: bool,
    },
    Demo,
    Federated { provider: FederatedProvider },
    Search { query: String },
}

impl PortalCommand {
    fn name(&self) -> &'static str {
        match self {
            PortalCommand::Roles => "roles",
            PortalCommand::Validate { .. } => "validate",
            PortalCommand::Login { .. } => "login",
            PortalCommand::Demo => "demo",
            PortalCommand::Federated { .. } => "federated",
            PortalCommand::Search { .. } => "search",
        }
    }
}

pub struct Orchestrator {
    controller: Arc<SessionController>,
    navigator: Arc<dyn Navigator>,
    notifications: NotificationCenter,
    directory: Vec<DirectoryRecord>,
}

impl Orchestrator {
    pub fn new(
        controller: Arc<SessionController>,
        navigator: Arc<dyn Navigator>,
        directory: Vec<DirectoryRecord>,
    ) -> Self {
        Self {
            controller,
            navigator,
            notifications: NotificationCenter::new(TEACHER_TOAST_TTL),
            directory,
        }
    }

    /// Unknown role keys are a caller error and abort the command.
    pub fn select_role(&self, key: &str) -> anyhow::Result<Role> {
        match self.controller.select_role_key(key) {
            Ok(profile) => Ok(profile.role),
            Err(err) => {
                let hint = UiError::from_session(UiErrorContext::RoleSelection, &err)
                    .map(|ui_error| ui_error.hint())
                    .unwrap_or_default();
                Err(anyhow::Error::new(err).context(format!("cannot select role '{key}': {hint}")))
            }
        }
    }

    pub async fn dispatch(&mut self, cmd: PortalCommand) -> anyhow::Result<()> {
        tracing::debug!(command = cmd.name(), "dispatching portal command");
        match cmd {
            PortalCommand::Roles => {
                let profiles: Vec<_> = Role::ALL.iter().map(|role| role.profile()).collect();
                println!("{}", serde_json::to_string_pretty(&profiles)?);
            }
            PortalCommand::Validate { email, password } => {
                let email_ok = self
                    .controller
                    .validate_field(CredentialField::Email, &email)
                    .is_ok();
                let password_ok = self
                    .controller
                    .validate_field(CredentialField::Password, &password)
                    .is_ok();
                println!("valid: {}", email_ok && password_ok);
            }
            PortalCommand::Login {
                email,
                password,
                remember,
            } => {
                let result = self
                    .controller
                    .submit_login(&email, &password, remember)
                    .await
                    .map(|outcome| outcome.target);
                self.finish(UiErrorContext::Login, result);
            }
            PortalCommand::Demo => {
                let role = self.controller.selected_role();
                let result = self.controller.start_demo(role).await;
                self.finish(UiErrorContext::Demo, result);
            }
            PortalCommand::Federated { provider } => {
                let result = self.controller.start_federated_sign_in(provider).await;
                self.finish(UiErrorContext::FederatedSignIn, result);
            }
            PortalCommand::Search { query } => match search(&self.directory, &query) {
                None => println!("(type at least three characters)"),
                Some(hits) if hits.is_empty() => println!("no matches"),
                Some(hits) => {
                    for record in hits {
                        println!("{:<24} {}", record.name, record.detail);
                    }
                }
            },
        }
        Ok(())
    }

    fn finish(&mut self, context: UiErrorContext, result: Result<NavigationTarget, SessionError>) {
        match result {
            Ok(target) => {
                self.notifications
                    .show(NotificationKind::Success, format!("Signed in; opening {target}"));
                self.render_toasts();
                self.navigator.navigate(&target);
            }
            Err(err) => {
                let Some(ui_error) = UiError::from_session(context, &err) else {
                    return;
                };
                tracing::warn!(context = ?ui_error.context(), category = ?ui_error.category(), "{}", ui_error.message());
                self.notifications
                    .show(NotificationKind::Error, ui_error.message().to_string());
                self.render_toasts();
                println!("  hint: {}", ui_error.hint());
            }
        }
    }

    fn render_toasts(&mut self) {
        for toast in self.notifications.visible_toasts() {
            println!("[{:?}] {}", toast.kind, toast.message);
        }
    }
}
