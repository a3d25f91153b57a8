//! Integration tests for form-level validation
//!
//! Exercises several validators composed into one `Validator`, the way the
//! login and DS-160 forms use them.

use chrono::NaiveDate;
use visadesk_common::validation::{
    DateRule, DateValidator, EmailValidator, StringValidator, Validator,
};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 6, 1).unwrap()
}

/// Every failing field is reported, not only the first one
#[test]
fn collects_every_failing_field() {
    let mut validator = Validator::new();
    validator
        .check("email", "not-an-email", &EmailValidator::new())
        .check("password", "123", &StringValidator::new().min_length(6))
        .check("name", "Ana", &StringValidator::new().not_empty());

    let err = validator.finish().unwrap_err();
    assert_eq!(err.error_count(), 2);
    assert_eq!(err.field_errors("email")[0].code.as_deref(), Some("email"));
    assert_eq!(err.field_errors("password")[0].code.as_deref(), Some("too_short"));
    assert!(err.field_errors("name").is_empty());
}

#[test]
fn prefixed_fields_carry_section_name() {
    let mut validator = Validator::with_prefix("passport");
    validator
        .check(
            "expiry_date",
            "2026-05-01",
            &DateValidator::new(DateRule::Future).relative_to(today()),
        )
        .check_optional(
            "issue_date",
            None,
            &DateValidator::new(DateRule::Past).relative_to(today()),
        );

    let err = validator.finish().unwrap_err();
    assert_eq!(err.errors.len(), 1);
    assert_eq!(err.errors[0].field, "passport.expiry_date");
    assert_eq!(err.errors[0].code.as_deref(), Some("date_not_future"));
}

#[test]
fn blank_optional_values_are_skipped() {
    let mut validator = Validator::new();
    validator.check_optional("phone", Some("   "), &StringValidator::new().min_length(8));

    assert!(!validator.has_errors());
    assert!(validator.finish().is_ok());
}

#[test]
fn display_lists_all_messages() {
    let mut validator = Validator::new();
    validator
        .check("email", "", &EmailValidator::new())
        .check("date_of_birth", "12/04/1990", &DateValidator::new(DateRule::Past));

    let rendered = validator.finish().unwrap_err().to_string();
    assert_eq!(
        rendered,
        "Validation failed with 2 errors: email: Email is required; \
         date_of_birth: Date must use the YYYY-MM-DD format"
    );
}
