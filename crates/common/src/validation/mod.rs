// Validation Module - field-level validation for client-side form checks
//
// Everything here runs before a request is built; a failed validation never
// reaches the network.
use std::fmt;

use serde::{Deserialize, Serialize};

mod validators;

pub use validators::{
    DateRule, DateValidator, EmailValidator, FieldValidator, StringValidator, Violation,
};

/// Type alias for validation results
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Validation error with detailed field-level errors
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationError {
    pub errors: Vec<FieldError>,
}

impl ValidationError {
    /// Create a new validation error
    pub fn new() -> Self {
        Self { errors: Vec::new() }
    }

    /// Create with a single field error
    pub fn field(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut err = Self::new();
        err.add_field_error(field, message);
        err
    }

    /// Add a field-level error
    pub fn add_field_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(FieldError::new(field, message));
    }

    /// Check if there are any errors
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Get error count
    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    /// Get errors for a specific field
    pub fn field_errors(&self, field: &str) -> Vec<&FieldError> {
        self.errors.iter().filter(|e| e.field == field).collect()
    }

    /// Merge another validation error into this one
    pub fn merge(&mut self, other: Self) {
        self.errors.extend(other.errors);
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.errors.as_slice() {
            [] => write!(f, "Validation error with no specific field errors"),
            [only] => write!(f, "Validation failed: {}", only.message),
            errors => {
                write!(f, "Validation failed with {} errors: ", errors.len())?;
                for (i, error) in errors.iter().enumerate() {
                    if i > 0 {
                        write!(f, "; ")?;
                    }
                    write!(f, "{}: {}", error.field, error.message)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Individual field error
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
    pub code: Option<String>,
}

impl FieldError {
    /// Create a new field error
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self { field: field.into(), message: message.into(), code: None }
    }

    /// Set error code
    #[must_use]
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }
}

/// Collects field errors across a whole form
///
/// Every check runs; `finish` reports all failures at once so each offending
/// field can be marked inline.
#[derive(Debug, Default)]
pub struct Validator {
    errors: ValidationError,
    prefix: Option<String>,
}

impl Validator {
    /// Create a new validator
    pub fn new() -> Self {
        Self::default()
    }

    /// Validator whose field names are reported as `prefix.field`
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self { errors: ValidationError::new(), prefix: Some(prefix.into()) }
    }

    fn qualified(&self, field: &str) -> String {
        match &self.prefix {
            Some(prefix) => format!("{prefix}.{field}"),
            None => field.to_string(),
        }
    }

    /// Add an error
    pub fn add_error(&mut self, field: &str, message: impl Into<String>) {
        let field = self.qualified(field);
        self.errors.add_field_error(field, message);
    }

    /// Run `validator` against `value`, recording a violation under `field`
    pub fn check<V>(&mut self, field: &str, value: &str, validator: &V) -> &mut Self
    where
        V: FieldValidator + ?Sized,
    {
        if let Err(violation) = validator.validate(value) {
            let field = self.qualified(field);
            self.errors
                .errors
                .push(FieldError::new(field, violation.message).with_code(violation.code));
        }
        self
    }

    /// Like [`check`](Self::check) but skips absent or blank values
    pub fn check_optional<V>(&mut self, field: &str, value: Option<&str>, validator: &V) -> &mut Self
    where
        V: FieldValidator + ?Sized,
    {
        match value {
            Some(v) if !v.trim().is_empty() => self.check(field, v, validator),
            _ => self,
        }
    }

    /// Whether any check failed so far
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Finish validation
    pub fn finish(self) -> ValidationResult<()> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self.errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collects_every_failing_field() {
        let mut validator = Validator::new();
        validator
            .check("email", "not-an-email", &EmailValidator::new())
            .check("password", "123", &StringValidator::new().not_empty().min_length(6));

        let err = validator.finish().unwrap_err();
        assert_eq!(err.error_count(), 2);
        assert_eq!(err.field_errors("email")[0].code.as_deref(), Some("email"));
        assert_eq!(err.field_errors("password")[0].code.as_deref(), Some("too_short"));
    }

    #[test]
    fn prefix_qualifies_field_names() {
        let mut validator = Validator::with_prefix("personal");
        validator.check("surname", "", &StringValidator::new().not_empty());
        let err = validator.finish().unwrap_err();
        assert_eq!(err.errors[0].field, "personal.surname");
    }

    #[test]
    fn optional_checks_skip_blank_values() {
        let mut validator = Validator::new();
        validator.check_optional("phone", Some("  "), &StringValidator::new().min_length(5));
        validator.check_optional("phone", None, &StringValidator::new().min_length(5));
        assert!(validator.finish().is_ok());
    }

    #[test]
    fn display_single_and_multiple() {
        let single = ValidationError::field("email", "Email is required");
        assert_eq!(single.to_string(), "Validation failed: Email is required");

        let mut multiple = ValidationError::field("a", "x");
        multiple.merge(ValidationError::field("b", "y"));
        assert_eq!(multiple.to_string(), "Validation failed with 2 errors: a: x; b: y");
    }
}
