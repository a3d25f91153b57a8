// Login form validation
use visadesk_common::validation::{EmailValidator, StringValidator, Validator};
use visadesk_domain::constants::MIN_PASSWORD_LENGTH;
use visadesk_domain::{LoginRequest, Result};

use crate::validation::IntoDomainError;

/// Raw login form input
#[derive(Clone, Default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    pub remember_me: bool,
}

impl LoginForm {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self { email: email.into(), password: password.into(), remember_me: false }
    }

    #[must_use]
    pub fn remember_me(mut self, remember_me: bool) -> Self {
        self.remember_me = remember_me;
        self
    }
}

impl std::fmt::Debug for LoginForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginForm")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("remember_me", &self.remember_me)
            .finish()
    }
}

fn password_rule() -> StringValidator {
    StringValidator::new()
        .not_empty()
        .trim(false)
        .min_length(MIN_PASSWORD_LENGTH)
        .message("required", "Password is required")
        .message("too_short", "Password too short")
}

/// Validate the login form and build the request body
///
/// # Errors
/// Returns `Validation` listing every offending field
pub fn validate_login(form: &LoginForm) -> Result<LoginRequest> {
    let mut validator = Validator::new();
    validator
        .check("email", &form.email, &EmailValidator::new())
        .check("password", &form.password, &password_rule());
    validator.finish().into_domain()?;

    Ok(LoginRequest { email: form.email.trim().to_string(), password: form.password.clone() })
}

/// Validate a standalone email field (password reset)
///
/// # Errors
/// Returns `Validation` for a missing or malformed address
pub fn validate_email(email: &str) -> Result<String> {
    let mut validator = Validator::new();
    validator.check("email", email, &EmailValidator::new());
    validator.finish().into_domain()?;
    Ok(email.trim().to_string())
}

#[cfg(test)]
mod tests {
    use visadesk_domain::VisadeskError;

    use super::*;

    #[test]
    fn accepts_well_formed_credentials() {
        let request = validate_login(&LoginForm::new(" a@b.com ", "secret1")).unwrap();
        assert_eq!(request.email, "a@b.com");
        assert_eq!(request.password, "secret1");
    }

    #[test]
    fn short_password_is_rejected() {
        let err = validate_login(&LoginForm::new("a@b.com", "123")).unwrap_err();
        let VisadeskError::Validation(errors) = err else { panic!("expected validation error") };
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "password");
        assert_eq!(errors[0].message, "Password too short");
        assert_eq!(errors[0].code.as_deref(), Some("too_short"));
    }

    #[test]
    fn reports_every_field() {
        let err = validate_login(&LoginForm::new("not-an-email", "")).unwrap_err();
        let fields: Vec<_> = err.field_errors().iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, ["email", "password"]);
    }

    #[test]
    fn password_is_not_trimmed() {
        // Six characters only counting the padding
        assert!(validate_login(&LoginForm::new("a@b.com", "  abcd")).is_ok());
        assert!(validate_email("nobody").is_err());
    }
}
