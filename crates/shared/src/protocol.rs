use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::Role;

#[derive(Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    pub role: Role,
    #[serde(default)]
    pub remember: bool,
}

impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("role", &self.role)
            .field("remember", &self.remember)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub session_token: String,
    /// Server-chosen landing page; the role profile's path applies when absent.
    #[serde(default)]
    pub redirect_path: Option<String>,
}
