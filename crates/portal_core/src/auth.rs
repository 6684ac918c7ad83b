use std::{future::Future, time::Duration};

use anyhow::Context;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use shared::{
    domain::{FederatedProvider, NavigationTarget, Role},
    error::ApiError,
    protocol::{LoginRequest, LoginResponse},
};
use tracing::{debug, warn};
use url::Url;

use crate::error::AuthError;

pub const SIMULATED_LOGIN_DELAY: Duration = Duration::from_millis(2000);
pub const SIMULATED_DEMO_DELAY: Duration = Duration::from_millis(1500);
pub const SIMULATED_FEDERATED_DELAY: Duration = Duration::from_millis(2000);

/// What a successful sign-in hands back to the controller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthGrant {
    pub session_token: Option<String>,
    /// Overrides the role profile's landing page when set.
    pub redirect: Option<NavigationTarget>,
}

#[async_trait]
pub trait AuthService: Send + Sync {
    async fn authenticate(&self, request: &LoginRequest) -> Result<AuthGrant, AuthError>;
    async fn prepare_demo(&self, role: Role) -> Result<(), AuthError>;
    async fn federated_sign_in(
        &self,
        provider: FederatedProvider,
        role: Role,
    ) -> Result<AuthGrant, AuthError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimulatedTiming {
    pub login: Duration,
    pub demo: Duration,
    pub federated: Duration,
}

impl Default for SimulatedTiming {
    fn default() -> Self {
        Self {
            login: SIMULATED_LOGIN_DELAY,
            demo: SIMULATED_DEMO_DELAY,
            federated: SIMULATED_FEDERATED_DELAY,
        }
    }
}

/// Accepts every well-formed request after a fixed delay.
#[derive(Debug, Clone, Default)]
pub struct SimulatedAuthService {
    timing: SimulatedTiming,
}

impl SimulatedAuthService {
    pub fn new(timing: SimulatedTiming) -> Self {
        Self { timing }
    }
}

#[async_trait]
impl AuthService for SimulatedAuthService {
    async fn authenticate(&self, request: &LoginRequest) -> Result<AuthGrant, AuthError> {
        debug!(role = %request.role, remember = request.remember, "simulating login");
        tokio::time::sleep(self.timing.login).await;
        Ok(AuthGrant::default())
    }

    async fn prepare_demo(&self, role: Role) -> Result<(), AuthError> {
        debug!(role = %role, "simulating demo load");
        tokio::time::sleep(self.timing.demo).await;
        Ok(())
    }

    async fn federated_sign_in(
        &self,
        provider: FederatedProvider,
        role: Role,
    ) -> Result<AuthGrant, AuthError> {
        // Providers are indistinguishable here.
        debug!(provider = provider.as_str(), role = %role, "simulating federated sign-in");
        tokio::time::sleep(self.timing.federated).await;
        Ok(AuthGrant::default())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    /// Linear backoff step: the n-th retry waits `backoff * n`.
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff: Duration::from_millis(250),
        }
    }
}

impl RetryPolicy {
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            backoff: Duration::ZERO,
        }
    }

    /// Wait before retrying once `attempt` calls have failed.
    pub fn delay_after(&self, attempt: u32) -> Duration {
        self.backoff.saturating_mul(attempt)
    }

    pub async fn run<T, F, Fut>(&self, operation: &str, mut call: F) -> Result<T, AuthError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, AuthError>>,
    {
        let max_attempts = self.max_attempts.max(1);
        let mut attempt = 1;
        loop {
            match call().await {
                Ok(value) => return Ok(value),
                Err(err) if err.is_retryable() && attempt < max_attempts => {
                    let delay = self.delay_after(attempt);
                    warn!(operation, attempt, ?delay, error = %err, "retrying auth request");
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }
}

/// Posts credentials to `<base>/login` and expects a [`LoginResponse`] body.
pub struct HttpAuthService {
    http: Client,
    login_url: Url,
    timeout: Duration,
    retry: RetryPolicy,
}

impl HttpAuthService {
    pub fn new(base_url: &str, timeout: Duration, retry: RetryPolicy) -> anyhow::Result<Self> {
        let mut base = Url::parse(base_url)
            .with_context(|| format!("invalid auth server url '{base_url}'"))?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let login_url = base
            .join("login")
            .with_context(|| format!("failed to derive login url from '{base_url}'"))?;
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build auth http client")?;

        Ok(Self {
            http,
            login_url,
            timeout,
            retry,
        })
    }

    pub fn login_url(&self) -> &Url {
        &self.login_url
    }

    async fn post_login_once(&self, request: &LoginRequest) -> Result<AuthGrant, AuthError> {
        let res = self
            .http
            .post(self.login_url.clone())
            .json(request)
            .send()
            .await
            .map_err(|err| self.classify(err))?;

        let status = res.status();
        if status.is_server_error() {
            return Err(AuthError::Network(format!("auth server returned {status}")));
        }
        if !status.is_success() {
            return Err(match res.json::<ApiError>().await {
                Ok(body) => body.into(),
                Err(_) if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN => {
                    AuthError::Rejected("invalid credentials".into())
                }
                Err(_) => AuthError::Rejected(format!("auth server returned {status}")),
            });
        }

        let body: LoginResponse = res
            .json()
            .await
            .map_err(|err| AuthError::InvalidResponse(err.to_string()))?;
        if body.session_token.trim().is_empty() {
            return Err(AuthError::InvalidResponse("empty session token".into()));
        }

        Ok(AuthGrant {
            session_token: Some(body.session_token),
            redirect: body.redirect_path.map(NavigationTarget::new),
        })
    }

    fn classify(&self, err: reqwest::Error) -> AuthError {
        if err.is_timeout() {
            AuthError::Timeout(self.timeout)
        } else {
            AuthError::Network(err.to_string())
        }
    }
}

#[async_trait]
impl AuthService for HttpAuthService {
    async fn authenticate(&self, request: &LoginRequest) -> Result<AuthGrant, AuthError> {
        self.retry
            .run("login", || self.post_login_once(request))
            .await
    }

    async fn prepare_demo(&self, _role: Role) -> Result<(), AuthError> {
        // Demo pages are static; nothing to ask the server for.
        Ok(())
    }

    async fn federated_sign_in(
        &self,
        _provider: FederatedProvider,
        _role: Role,
    ) -> Result<AuthGrant, AuthError> {
        Err(AuthError::Unsupported("federated sign-in"))
    }
}

#[cfg(test)]
#[path = "tests/auth_tests.rs"]
mod tests;
