//! Bridge from the common validation framework to the domain error taxonomy

use visadesk_common::validation::{ValidationError, ValidationResult};
use visadesk_domain::{FieldError, Result, VisadeskError};

/// Convert a form validation failure into [`VisadeskError::Validation`]
pub fn to_domain_error(err: ValidationError) -> VisadeskError {
    VisadeskError::Validation(
        err.errors
            .into_iter()
            .map(|e| {
                let field = FieldError::new(e.field, e.message);
                match e.code {
                    Some(code) => field.with_code(code),
                    None => field,
                }
            })
            .collect(),
    )
}

/// `?`-friendly conversion for validation results
pub trait IntoDomainError<T> {
    fn into_domain(self) -> Result<T>;
}

impl<T> IntoDomainError<T> for ValidationResult<T> {
    fn into_domain(self) -> Result<T> {
        self.map_err(to_domain_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_codes_and_order() {
        let mut err = ValidationError::field("email", "Invalid email format");
        err.errors[0].code = Some("email".into());
        err.add_field_error("password", "Password is required");

        let domain = to_domain_error(err);
        let fields = domain.field_errors();
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[0].code.as_deref(), Some("email"));
        assert_eq!(fields[1].field, "password");
        assert!(fields[1].code.is_none());
    }
}
