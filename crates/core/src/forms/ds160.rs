// DS-160 step validation
use std::collections::BTreeMap;

use chrono::{NaiveDate, Utc};
use serde_json::Value;
use visadesk_common::validation::{
    DateRule, DateValidator, EmailValidator, FieldError, StringValidator, ValidationError,
    Validator,
};
use visadesk_domain::{Ds160Section, Result, SectionData, VisadeskError};

use crate::validation::{to_domain_error, IntoDomainError};

const PASSPORT_NUMBER_PATTERN: &str = r"^[A-Za-z0-9]{6,12}$";
const PHONE_PATTERN: &str = r"^\+?[0-9 ()\-]{7,20}$";

/// Field value as text; absent and non-scalar values read as empty
fn text(data: &SectionData, field: &str) -> String {
    match data.get(field) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

fn optional_text(data: &SectionData, field: &str) -> Option<String> {
    Some(text(data, field)).filter(|s| !s.trim().is_empty())
}

fn required() -> StringValidator {
    StringValidator::new().not_empty().message("required", "This field is required")
}

fn pattern(regex: &str, message: &str) -> Result<StringValidator> {
    required()
        .pattern(regex)
        .map(|v| v.message("pattern", message))
        .map_err(|e| VisadeskError::Internal(format!("invalid field pattern: {e}")))
}

/// Validate one section against today's date
///
/// # Errors
/// Returns `Validation` listing every offending field as `section.field`
pub fn validate_section(section: Ds160Section, data: &SectionData) -> Result<()> {
    validate_section_on(section, data, Utc::now().date_naive())
}

/// Validate one section with date rules evaluated relative to `today`
///
/// # Errors
/// Returns `Validation` listing every offending field as `section.field`
pub fn validate_section_on(section: Ds160Section, data: &SectionData, today: NaiveDate) -> Result<()> {
    section_errors(section, data, today)?.finish().into_domain()
}

fn section_errors(section: Ds160Section, data: &SectionData, today: NaiveDate) -> Result<Validator> {
    let past = DateValidator::new(DateRule::Past).relative_to(today);
    let future = DateValidator::new(DateRule::Future).relative_to(today);
    let mut v = Validator::with_prefix(section.as_str());

    match section {
        Ds160Section::Personal => {
            v.check("surname", &text(data, "surname"), &required().max_length(100))
                .check("given_names", &text(data, "given_names"), &required().max_length(100))
                .check("date_of_birth", &text(data, "date_of_birth"), &past)
                .check("nationality", &text(data, "nationality"), &required());
        }
        Ds160Section::Travel => {
            v.check("purpose", &text(data, "purpose"), &required())
                .check("intended_arrival_date", &text(data, "intended_arrival_date"), &future);
        }
        Ds160Section::Passport => {
            let number = pattern(PASSPORT_NUMBER_PATTERN, "Use 6 to 12 letters or digits")?;
            v.check("passport_number", &text(data, "passport_number"), &number)
                .check("issuing_country", &text(data, "issuing_country"), &required())
                .check_optional("issue_date", optional_text(data, "issue_date").as_deref(), &past)
                .check("expiry_date", &text(data, "expiry_date"), &future);
        }
        Ds160Section::Contact => {
            let phone = pattern(PHONE_PATTERN, "Invalid phone number")?;
            v.check("email", &text(data, "email"), &EmailValidator::new())
                .check("phone", &text(data, "phone"), &phone);
        }
        Ds160Section::Family => {
            for field in ["father_date_of_birth", "mother_date_of_birth", "spouse_date_of_birth"] {
                v.check_optional(field, optional_text(data, field).as_deref(), &past);
            }
        }
        Ds160Section::WorkEducation => {
            v.check("primary_occupation", &text(data, "primary_occupation"), &required());
        }
        Ds160Section::Security => {
            for (field, value) in data {
                if !value.is_boolean() {
                    v.add_error(field, "Answer yes or no");
                }
            }
        }
    }
    Ok(v)
}

/// Validate a whole form before submission
///
/// Every required section must be present and every present section valid.
///
/// # Errors
/// Returns `Validation` with one `section_missing` error per absent required
/// section plus the field errors of every invalid section
pub fn validate_submission(sections: &BTreeMap<Ds160Section, SectionData>) -> Result<()> {
    let today = Utc::now().date_naive();
    let mut errors = ValidationError::new();

    for section in Ds160Section::REQUIRED {
        if sections.get(&section).map_or(true, SectionData::is_empty) {
            errors.errors.push(
                FieldError::new(section.as_str(), "Section is incomplete").with_code("section_missing"),
            );
        }
    }
    for (section, data) in sections {
        if let Err(invalid) = section_errors(*section, data, today)?.finish() {
            errors.merge(invalid);
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(to_domain_error(errors))
    }
}
