use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{InvalidRoleError, UnknownProviderError};

macro_rules! id_newtype {
    ($name:ident, $inner:ty) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(pub $inner);
    };
}

id_newtype!(AttemptId, u64);
id_newtype!(NotificationId, Uuid);

impl NotificationId {
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for AttemptId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    #[default]
    Student,
    Teacher,
    Parent,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Student, Role::Teacher, Role::Parent];

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::Teacher => "teacher",
            Role::Parent => "parent",
        }
    }

    pub fn profile(self) -> &'static RoleProfile {
        match self {
            Role::Student => &STUDENT_PROFILE,
            Role::Teacher => &TEACHER_PROFILE,
            Role::Parent => &PARENT_PROFILE,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = InvalidRoleError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "student" => Ok(Role::Student),
            "teacher" => Ok(Role::Teacher),
            "parent" => Ok(Role::Parent),
            _ => Err(InvalidRoleError::new(raw)),
        }
    }
}

/// Static per-role theming and routing bundle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoleProfile {
    pub role: Role,
    pub display_name: &'static str,
    pub login_button_label: &'static str,
    pub signup_label: &'static str,
    pub theme_identifier: &'static str,
    pub redirect_path: &'static str,
    pub demo_path: &'static str,
}

impl RoleProfile {
    pub fn redirect_target(&self) -> NavigationTarget {
        NavigationTarget::new(self.redirect_path)
    }

    pub fn demo_target(&self) -> NavigationTarget {
        NavigationTarget::new(self.demo_path)
    }
}

static STUDENT_PROFILE: RoleProfile = RoleProfile {
    role: Role::Student,
    display_name: "Student",
    login_button_label: "Login as Student",
    signup_label: "Sign up as Student",
    theme_identifier: "student-theme",
    redirect_path: "student-dashboard.html",
    demo_path: "student-dashboard.html",
};

static TEACHER_PROFILE: RoleProfile = RoleProfile {
    role: Role::Teacher,
    display_name: "Teacher",
    login_button_label: "Login as Teacher",
    signup_label: "Sign up as Teacher",
    theme_identifier: "teacher-theme",
    redirect_path: "teacher-dashboard.html",
    demo_path: "teacher-dashboard.html",
};

static PARENT_PROFILE: RoleProfile = RoleProfile {
    role: Role::Parent,
    display_name: "Parent",
    login_button_label: "Login as Parent",
    signup_label: "Sign up as Parent",
    theme_identifier: "parent-theme",
    redirect_path: "parent-dashboard.html",
    demo_path: "parent-dashboard.html",
};

/// Opaque destination handed to whatever router sits outside the core.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NavigationTarget(String);

impl NavigationTarget {
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NavigationTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    #[default]
    Idle,
    Validating,
    Submitting,
    Succeeded,
    Redirecting,
    Rejected,
}

impl Phase {
    /// Forward edges of a single attempt. Resets to `Idle` are handled by the
    /// owner and are not part of this graph, except `Rejected -> Idle`.
    /// `Idle -> Submitting` is the entry for demo and federated sign-in, which
    /// carry no credentials to validate.
    pub fn can_advance_to(self, next: Phase) -> bool {
        matches!(
            (self, next),
            (Phase::Idle, Phase::Validating)
                | (Phase::Idle, Phase::Submitting)
                | (Phase::Validating, Phase::Submitting)
                | (Phase::Validating, Phase::Rejected)
                | (Phase::Submitting, Phase::Succeeded)
                | (Phase::Succeeded, Phase::Redirecting)
                | (Phase::Rejected, Phase::Idle)
        )
    }

    pub fn is_in_flight(self) -> bool {
        matches!(self, Phase::Submitting | Phase::Succeeded)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Idle => "idle",
            Phase::Validating => "validating",
            Phase::Submitting => "submitting",
            Phase::Succeeded => "succeeded",
            Phase::Redirecting => "redirecting",
            Phase::Rejected => "rejected",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FederatedProvider {
    Google,
    Microsoft,
}

impl FederatedProvider {
    pub fn as_str(self) -> &'static str {
        match self {
            FederatedProvider::Google => "google",
            FederatedProvider::Microsoft => "microsoft",
        }
    }
}

impl FromStr for FederatedProvider {
    type Err = UnknownProviderError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "google" => Ok(FederatedProvider::Google),
            "microsoft" => Ok(FederatedProvider::Microsoft),
            _ => Err(UnknownProviderError(raw.to_string())),
        }
    }
}
