use std::{collections::HashMap, fs, path::Path, sync::Arc, time::Duration};

use anyhow::{bail, Context};
use shared::domain::Role;
use tracing::warn;

use crate::{
    auth::{AuthService, HttpAuthService, RetryPolicy, SimulatedAuthService, SimulatedTiming},
    controller::REDIRECT_DELAY,
};

pub const SETTINGS_FILE: &str = "portal.toml";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    Simulated,
    Http,
}

impl AuthMode {
    fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "simulated" | "sim" => Some(AuthMode::Simulated),
            "http" => Some(AuthMode::Http),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PortalSettings {
    pub auth_mode: AuthMode,
    pub auth_server_url: Option<String>,
    pub default_role: Role,
    pub login_delay_ms: u64,
    pub redirect_delay_ms: u64,
    pub demo_delay_ms: u64,
    pub federated_delay_ms: u64,
    pub request_timeout_ms: u64,
    pub max_attempts: u32,
    pub retry_backoff_ms: u64,
}

impl Default for PortalSettings {
    fn default() -> Self {
        let timing = SimulatedTiming::default();
        let retry = RetryPolicy::default();
        Self {
            auth_mode: AuthMode::Simulated,
            auth_server_url: None,
            default_role: Role::Student,
            login_delay_ms: timing.login.as_millis() as u64,
            redirect_delay_ms: REDIRECT_DELAY.as_millis() as u64,
            demo_delay_ms: timing.demo.as_millis() as u64,
            federated_delay_ms: timing.federated.as_millis() as u64,
            request_timeout_ms: 10_000,
            max_attempts: retry.max_attempts,
            retry_backoff_ms: retry.backoff.as_millis() as u64,
        }
    }
}

impl PortalSettings {
    pub fn simulated_timing(&self) -> SimulatedTiming {
        SimulatedTiming {
            login: Duration::from_millis(self.login_delay_ms),
            demo: Duration::from_millis(self.demo_delay_ms),
            federated: Duration::from_millis(self.federated_delay_ms),
        }
    }

    pub fn redirect_delay(&self) -> Duration {
        Duration::from_millis(self.redirect_delay_ms)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_attempts,
            backoff: Duration::from_millis(self.retry_backoff_ms),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

pub fn load_settings() -> PortalSettings {
    load_settings_with(Path::new(SETTINGS_FILE), |key| std::env::var(key).ok())
}

/// Defaults, then the flat `key = "value"` file, then environment overrides.
pub fn load_settings_with(
    path: &Path,
    env: impl Fn(&str) -> Option<String>,
) -> PortalSettings {
    let mut settings = PortalSettings::default();

    if let Ok(raw) = fs::read_to_string(path) {
        match toml::from_str::<HashMap<String, toml::Value>>(&raw) {
            Ok(file_cfg) => {
                let file_cfg: HashMap<String, String> = file_cfg
                    .into_iter()
                    .map(|(key, value)| match value {
                        toml::Value::String(s) => (key, s),
                        other => (key, other.to_string()),
                    })
                    .collect();
                apply_overrides(&mut settings, |key| file_cfg.get(key).cloned());
            }
            Err(err) => warn!(path = %path.display(), error = %err, "ignoring malformed settings file"),
        }
    }

    apply_overrides(&mut settings, |key| {
        env(&format!("APP__{}", key.to_ascii_uppercase()))
            .or_else(|| env(&key.to_ascii_uppercase()))
    });

    settings
}

fn apply_overrides(settings: &mut PortalSettings, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(v) = lookup("auth_mode") {
        match AuthMode::parse(&v) {
            Some(mode) => settings.auth_mode = mode,
            None => warn!(value = %v, "unknown auth_mode; keeping {:?}", settings.auth_mode),
        }
    }
    if let Some(v) = lookup("auth_server_url") {
        settings.auth_server_url = Some(v);
    }
    if let Some(v) = lookup("default_role") {
        match v.parse::<Role>() {
            Ok(role) => settings.default_role = role,
            Err(err) => warn!(error = %err, "ignoring default_role"),
        }
    }

    set_number(&lookup, "login_delay_ms", &mut settings.login_delay_ms);
    set_number(&lookup, "redirect_delay_ms", &mut settings.redirect_delay_ms);
    set_number(&lookup, "demo_delay_ms", &mut settings.demo_delay_ms);
    set_number(&lookup, "federated_delay_ms", &mut settings.federated_delay_ms);
    set_number(&lookup, "request_timeout_ms", &mut settings.request_timeout_ms);
    set_number(&lookup, "max_attempts", &mut settings.max_attempts);
    set_number(&lookup, "retry_backoff_ms", &mut settings.retry_backoff_ms);
}

fn set_number<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    slot: &mut T,
) {
    if let Some(v) = lookup(key) {
        if let Ok(parsed) = v.trim().parse::<T>() {
            *slot = parsed;
        }
    }
}

pub fn build_auth_service(settings: &PortalSettings) -> anyhow::Result<Arc<dyn AuthService>> {
    match settings.auth_mode {
        AuthMode::Simulated => Ok(Arc::new(SimulatedAuthService::new(
            settings.simulated_timing(),
        ))),
        AuthMode::Http => {
            let Some(url) = settings.auth_server_url.as_deref() else {
                bail!("auth_mode = http requires auth_server_url");
            };
            let service =
                HttpAuthService::new(url, settings.request_timeout(), settings.retry_policy())
                    .context("failed to configure http auth service")?;
            Ok(Arc::new(service))
        }
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
