//! Session-intent controller: role selection, credential checks and the
//! login/demo/federated flows that end in a navigation target.
//!
//! Every flow stamps the intent with a fresh [`AttemptId`]. Continuations
//! re-check that id after each await and drop themselves with
//! [`SessionError::Cancelled`] once a newer flow or a role change has replaced
//! it, so at most one attempt is ever honored.

use std::{sync::Arc, time::Duration};

use parking_lot::{Mutex, MutexGuard};
use serde::Serialize;
use shared::{
    domain::{AttemptId, FederatedProvider, NavigationTarget, Phase, Role, RoleProfile},
    error::ValidationErrorKind,
    protocol::LoginRequest,
};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::{
    auth::AuthService,
    error::SessionError,
    events::SessionEvent,
    surface::{
        federated_label, ButtonState, FieldState, FormButton, FormSurface, DEMO_IDLE_LABEL,
        LOADING_DEMO_LABEL, LOGIN_SUCCESS_LABEL, SIGNING_IN_LABEL,
    },
    validation::{self, CredentialField, ValidationResult},
};

pub const REDIRECT_DELAY: Duration = Duration::from_millis(1500);
const EVENT_CHANNEL_CAPACITY: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionIntent {
    pub selected_role: Role,
    pub email_valid: bool,
    pub password_valid: bool,
    pub remember_me: bool,
    pub phase: Phase,
    pub attempt: AttemptId,
    /// Button showing the in-flight attempt's loading state.
    pub busy_button: Option<FormButton>,
}

impl SessionIntent {
    fn new(role: Role) -> Self {
        Self {
            selected_role: role,
            email_valid: false,
            password_valid: false,
            remember_me: false,
            phase: Phase::Idle,
            attempt: AttemptId(0),
            busy_button: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionOutcome {
    pub attempt: AttemptId,
    pub role: Role,
    pub target: NavigationTarget,
    pub session_token: Option<String>,
    pub remember: bool,
}

pub struct SessionController {
    intent: Mutex<SessionIntent>,
    auth: Arc<dyn AuthService>,
    surface: Arc<dyn FormSurface>,
    events: broadcast::Sender<SessionEvent>,
    redirect_delay: Duration,
}

impl SessionController {
    pub fn new(auth: Arc<dyn AuthService>, surface: Arc<dyn FormSurface>) -> Self {
        Self::with_default_role(auth, surface, Role::default())
    }

    pub fn with_default_role(
        auth: Arc<dyn AuthService>,
        surface: Arc<dyn FormSurface>,
        role: Role,
    ) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        let profile = role.profile();
        surface.apply_theme(profile);
        surface.set_button_state(FormButton::Login, ButtonState::Idle, profile.login_button_label);

        Self {
            intent: Mutex::new(SessionIntent::new(role)),
            auth,
            surface,
            events,
            redirect_delay: REDIRECT_DELAY,
        }
    }

    pub fn with_redirect_delay(mut self, delay: Duration) -> Self {
        self.redirect_delay = delay;
        self
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    pub fn snapshot(&self) -> SessionIntent {
        self.intent.lock().clone()
    }

    pub fn selected_role(&self) -> Role {
        self.intent.lock().selected_role
    }

    pub fn phase(&self) -> Phase {
        self.intent.lock().phase
    }

    pub fn active_profile(&self) -> &'static RoleProfile {
        self.selected_role().profile()
    }

    /// Switches the active role and abandons any attempt still in flight.
    pub fn select_role(&self, role: Role) -> &'static RoleProfile {
        let profile = role.profile();
        let mut intent = self.intent.lock();
        self.begin_attempt(&mut intent);
        intent.selected_role = role;

        info!(role = %role, theme = profile.theme_identifier, "role selected");
        self.surface.apply_theme(profile);
        self.surface
            .set_button_state(FormButton::Login, ButtonState::Idle, profile.login_button_label);
        drop(intent);
        self.emit(SessionEvent::RoleSelected {
            role,
            theme: profile.theme_identifier,
        });
        profile
    }

    /// String-keyed entry point for adapters; unknown keys leave state untouched.
    pub fn select_role_key(&self, key: &str) -> Result<&'static RoleProfile, SessionError> {
        let role = key.parse::<Role>()?;
        Ok(self.select_role(role))
    }

    /// Blur-time check of one field, reflected to the surface.
    pub fn validate_field(
        &self,
        field: CredentialField,
        value: &str,
    ) -> Result<(), ValidationErrorKind> {
        let result = validation::validate_field(field, value);
        {
            let mut intent = self.intent.lock();
            match field {
                CredentialField::Email => intent.email_valid = result.is_ok(),
                CredentialField::Password => intent.password_valid = result.is_ok(),
            }
        }
        self.reflect_field(field, result.err());
        result
    }

    pub fn clear_field(&self, field: CredentialField) {
        self.surface.set_field_state(field, FieldState::Idle, None);
    }

    pub async fn submit_login(
        &self,
        email: &str,
        password: &str,
        remember: bool,
    ) -> Result<SessionOutcome, SessionError> {
        let validation = validation::validate_credentials(email, password);
        let (attempt, role) = {
            let mut intent = self.intent.lock();
            let attempt = self.begin_attempt(&mut intent);
            self.advance(&mut intent, Phase::Validating);
            intent.email_valid = validation.email_error.is_none();
            intent.password_valid = validation.password_error.is_none();
            if validation.is_ok() {
                intent.remember_me = remember;
                self.advance(&mut intent, Phase::Submitting);
                self.claim_button(&mut intent, FormButton::Login, SIGNING_IN_LABEL);
            } else {
                self.advance(&mut intent, Phase::Rejected);
                self.advance(&mut intent, Phase::Idle);
            }
            (attempt, intent.selected_role)
        };

        self.reflect_validation(&validation);
        if !validation.is_ok() {
            debug!(%attempt, %validation, "login rejected by validation");
            return Err(SessionError::ValidationFailed(validation));
        }

        let profile = role.profile();
        debug!(%attempt, role = %role, email = email.trim(), remember, "submitting login");

        let request = LoginRequest {
            email: email.trim().to_string(),
            password: password.to_string(),
            role,
            remember,
        };
        let grant = match self.auth.authenticate(&request).await {
            Ok(grant) => grant,
            Err(err) => {
                self.abort(attempt)?;
                warn!(%attempt, role = %role, error = %err, "login failed");
                return Err(err.into());
            }
        };

        let intent = self.resume_and_advance(attempt, Phase::Succeeded)?;
        self.surface
            .set_button_state(FormButton::Login, ButtonState::Success, LOGIN_SUCCESS_LABEL);
        drop(intent);

        tokio::time::sleep(self.redirect_delay).await;

        let target = grant
            .redirect
            .unwrap_or_else(|| profile.redirect_target());
        let target = self.finish(attempt, role, target)?;
        Ok(SessionOutcome {
            attempt,
            role,
            target,
            session_token: grant.session_token,
            remember,
        })
    }

    pub async fn start_demo(&self, role: Role) -> Result<NavigationTarget, SessionError> {
        let attempt = {
            let mut intent = self.intent.lock();
            let attempt = self.begin_attempt(&mut intent);
            self.advance(&mut intent, Phase::Submitting);
            self.claim_button(&mut intent, FormButton::Demo, LOADING_DEMO_LABEL);
            attempt
        };

        if let Err(err) = self.auth.prepare_demo(role).await {
            self.abort(attempt)?;
            warn!(%attempt, role = %role, error = %err, "demo failed to load");
            return Err(err.into());
        }

        drop(self.resume_and_advance(attempt, Phase::Succeeded)?);
        self.finish(attempt, role, role.profile().demo_target())
    }

    /// Google and Microsoft are handled identically; the provider only picks the button.
    pub async fn start_federated_sign_in(
        &self,
        provider: FederatedProvider,
    ) -> Result<NavigationTarget, SessionError> {
        let button = FormButton::Federated(provider);
        let (attempt, role) = {
            let mut intent = self.intent.lock();
            let attempt = self.begin_attempt(&mut intent);
            self.advance(&mut intent, Phase::Submitting);
            self.claim_button(&mut intent, button, SIGNING_IN_LABEL);
            (attempt, intent.selected_role)
        };

        let grant = match self.auth.federated_sign_in(provider, role).await {
            Ok(grant) => grant,
            Err(err) => {
                self.abort(attempt)?;
                warn!(%attempt, provider = provider.as_str(), error = %err, "federated sign-in failed");
                return Err(err.into());
            }
        };

        drop(self.resume_and_advance(attempt, Phase::Succeeded)?);
        let target = grant
            .redirect
            .unwrap_or_else(|| role.profile().redirect_target());
        self.finish(attempt, role, target)
    }

    fn emit(&self, event: SessionEvent) {
        // No subscribers is fine.
        let _ = self.events.send(event);
    }

    fn begin_attempt(&self, intent: &mut SessionIntent) -> AttemptId {
        if intent.phase.is_in_flight() {
            warn!(attempt = %intent.attempt, phase = %intent.phase, "superseding in-flight attempt");
            self.emit(SessionEvent::Superseded {
                attempt: intent.attempt,
            });
            self.release_button(intent);
        }
        intent.busy_button = None;
        self.reset(intent);
        intent.attempt = AttemptId(intent.attempt.0 + 1);
        intent.attempt
    }

    fn reset(&self, intent: &mut SessionIntent) {
        if intent.phase == Phase::Idle {
            return;
        }
        let from = intent.phase;
        intent.phase = Phase::Idle;
        self.emit(SessionEvent::PhaseChanged {
            attempt: intent.attempt,
            from,
            to: Phase::Idle,
        });
    }

    fn advance(&self, intent: &mut SessionIntent, next: Phase) {
        let from = intent.phase;
        debug_assert!(
            from.can_advance_to(next),
            "illegal phase transition {from} -> {next}"
        );
        intent.phase = next;
        self.emit(SessionEvent::PhaseChanged {
            attempt: intent.attempt,
            from,
            to: next,
        });
    }

    fn resume(&self, attempt: AttemptId) -> Result<MutexGuard<'_, SessionIntent>, SessionError> {
        let intent = self.intent.lock();
        if intent.attempt != attempt {
            debug!(%attempt, current = %intent.attempt, "dropping superseded continuation");
            return Err(SessionError::Cancelled);
        }
        Ok(intent)
    }

    /// Hands back the guard so surface writes stay ordered with role changes.
    fn resume_and_advance(
        &self,
        attempt: AttemptId,
        next: Phase,
    ) -> Result<MutexGuard<'_, SessionIntent>, SessionError> {
        let mut intent = self.resume(attempt)?;
        self.advance(&mut intent, next);
        Ok(intent)
    }

    fn abort(&self, attempt: AttemptId) -> Result<(), SessionError> {
        let mut intent = self.resume(attempt)?;
        self.release_button(&mut intent);
        self.reset(&mut intent);
        Ok(())
    }

    fn claim_button(&self, intent: &mut SessionIntent, button: FormButton, label: &str) {
        intent.busy_button = Some(button);
        self.surface
            .set_button_state(button, ButtonState::Loading, label);
    }

    fn release_button(&self, intent: &mut SessionIntent) {
        let Some(button) = intent.busy_button.take() else {
            return;
        };
        let label = match button {
            FormButton::Login => intent.selected_role.profile().login_button_label,
            FormButton::Demo => DEMO_IDLE_LABEL,
            FormButton::Federated(provider) => federated_label(provider),
        };
        self.surface.set_button_state(button, ButtonState::Idle, label);
    }

    fn finish(
        &self,
        attempt: AttemptId,
        role: Role,
        target: NavigationTarget,
    ) -> Result<NavigationTarget, SessionError> {
        drop(self.resume_and_advance(attempt, Phase::Redirecting)?);
        info!(%attempt, role = %role, target = %target, "redirecting");
        self.emit(SessionEvent::Redirect {
            attempt,
            role,
            target: target.clone(),
        });
        Ok(target)
    }

    fn reflect_validation(&self, result: &ValidationResult) {
        for field in [CredentialField::Email, CredentialField::Password] {
            self.reflect_field(field, result.error_for(field));
        }
    }

    fn reflect_field(&self, field: CredentialField, error: Option<ValidationErrorKind>) {
        match error {
            Some(kind) => {
                let message = kind.to_string();
                self.surface
                    .set_field_state(field, FieldState::Error, Some(message.as_str()));
            }
            None => self.surface.set_field_state(field, FieldState::Success, None),
        }
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
