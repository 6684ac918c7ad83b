//! Client-side session core for the EduVerse portal login screen and dashboards.

pub mod auth;
pub mod config;
pub mod controller;
pub mod error;
pub mod events;
pub mod notifications;
pub mod search;
pub mod surface;
pub mod validation;

pub use auth::{AuthGrant, AuthService, HttpAuthService, RetryPolicy, SimulatedAuthService};
pub use config::{build_auth_service, load_settings, PortalSettings};
pub use controller::{SessionController, SessionIntent, SessionOutcome};
pub use error::{AuthError, SessionError};
pub use events::SessionEvent;
pub use surface::{ButtonState, FieldState, FormButton, FormSurface, Navigator, NullSurface};
pub use validation::{validate_credentials, CredentialField, ValidationResult};
