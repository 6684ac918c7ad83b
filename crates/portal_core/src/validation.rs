//! Credential checks for the login form.

use std::fmt;

use serde::Serialize;
use shared::error::ValidationErrorKind;

pub const MIN_PASSWORD_CHARS: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CredentialField {
    Email,
    Password,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    pub email_error: Option<ValidationErrorKind>,
    pub password_error: Option<ValidationErrorKind>,
}

impl ValidationResult {
    pub fn is_ok(&self) -> bool {
        self.email_error.is_none() && self.password_error.is_none()
    }

    pub fn error_for(&self, field: CredentialField) -> Option<ValidationErrorKind> {
        match field {
            CredentialField::Email => self.email_error,
            CredentialField::Password => self.password_error,
        }
    }
}

impl fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<String> = [self.email_error, self.password_error]
            .into_iter()
            .flatten()
            .map(|kind| kind.to_string())
            .collect();
        if messages.is_empty() {
            f.write_str("ok")
        } else {
            f.write_str(&messages.join("; "))
        }
    }
}

/// Both fields are always evaluated so the form can flag every problem at once.
pub fn validate_credentials(email: &str, password: &str) -> ValidationResult {
    ValidationResult {
        email_error: validate_email(email).err(),
        password_error: validate_password(password).err(),
    }
}

pub fn validate_field(field: CredentialField, value: &str) -> Result<(), ValidationErrorKind> {
    match field {
        CredentialField::Email => validate_email(value),
        CredentialField::Password => validate_password(value),
    }
}

pub fn validate_email(raw: &str) -> Result<(), ValidationErrorKind> {
    let email = raw.trim();
    if email.is_empty() {
        return Err(ValidationErrorKind::EmailRequired);
    }
    if !is_well_formed_email(email) {
        return Err(ValidationErrorKind::EmailMalformed);
    }
    Ok(())
}

pub fn validate_password(password: &str) -> Result<(), ValidationErrorKind> {
    if password.is_empty() {
        return Err(ValidationErrorKind::PasswordRequired);
    }
    if password.chars().count() < MIN_PASSWORD_CHARS {
        return Err(ValidationErrorKind::PasswordTooShort);
    }
    Ok(())
}

// local@domain.tld: one '@', no whitespace, and a '.' with text on both sides after the '@'.
fn is_well_formed_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    domain
        .char_indices()
        .any(|(idx, ch)| ch == '.' && idx > 0 && idx + 1 < domain.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_form_reports_both_required_errors() {
        let result = validate_credentials("", "");
        assert!(!result.is_ok());
        assert_eq!(result.email_error, Some(ValidationErrorKind::EmailRequired));
        assert_eq!(
            result.password_error,
            Some(ValidationErrorKind::PasswordRequired)
        );
    }

    #[test]
    fn malformed_email_leaves_password_untouched() {
        let result = validate_credentials("not-an-email", "secret1");
        assert!(!result.is_ok());
        assert_eq!(result.email_error, Some(ValidationErrorKind::EmailMalformed));
        assert_eq!(result.password_error, None);
    }

    #[test]
    fn five_character_password_is_too_short() {
        let result = validate_credentials("a@b.com", "12345");
        assert_eq!(result.email_error, None);
        assert_eq!(
            result.password_error,
            Some(ValidationErrorKind::PasswordTooShort)
        );
    }

    #[test]
    fn six_character_password_passes() {
        assert!(validate_credentials("a@b.com", "123456").is_ok());
    }

    #[test]
    fn whitespace_only_email_counts_as_empty() {
        assert_eq!(
            validate_email("   "),
            Err(ValidationErrorKind::EmailRequired)
        );
        assert_eq!(validate_email("  a@b.com  "), Ok(()));
    }

    #[test]
    fn rejects_email_shapes_outside_local_at_domain_dot_tld() {
        for bad in ["a@b", "@b.com", "a@.com", "a@b.", "a@@b.com", "a b@c.com", "a@b@c.com"] {
            assert_eq!(
                validate_email(bad),
                Err(ValidationErrorKind::EmailMalformed),
                "{bad} should be malformed"
            );
        }
        for good in ["a@b.c", "first.last@school.edu", "x@sub.domain.org", "a@b..c"] {
            assert_eq!(validate_email(good), Ok(()), "{good} should pass");
        }
    }

    #[test]
    fn password_length_counts_code_points() {
        assert_eq!(validate_password("ñññññ"), Err(ValidationErrorKind::PasswordTooShort));
        assert_eq!(validate_password("ññññññ"), Ok(()));
    }

    #[test]
    fn password_is_not_trimmed() {
        assert_eq!(validate_password("      "), Ok(()));
    }

    #[test]
    fn display_joins_field_messages() {
        let result = validate_credentials("", "");
        assert_eq!(
            result.to_string(),
            "Email is required; Password is required"
        );
    }
}
