// Case form validation
use visadesk_common::validation::{EmailValidator, StringValidator, Validator};
use visadesk_domain::{ApplicantSummary, CaseUpdate, NewCase, Result};

use crate::validation::IntoDomainError;

fn name_rule() -> StringValidator {
    StringValidator::new().not_empty().max_length(100)
}

fn check_applicant(validator: &mut Validator, applicant: &ApplicantSummary) {
    validator
        .check("applicant.firstName", &applicant.first_name, &name_rule())
        .check("applicant.lastName", &applicant.last_name, &name_rule())
        .check("applicant.email", &applicant.email, &EmailValidator::new())
        .check_optional(
            "applicant.phone",
            applicant.phone.as_deref(),
            &StringValidator::new().min_length(7).max_length(20),
        );
}

/// Validate the new-case form
///
/// # Errors
/// Returns `Validation` listing every offending field
pub fn validate_new_case(new_case: &NewCase) -> Result<()> {
    let mut validator = Validator::new();
    check_applicant(&mut validator, &new_case.applicant);
    validator.check("visaType", &new_case.visa_type, &StringValidator::new().not_empty());
    validator.finish().into_domain()
}

/// Validate the fields present in a partial update
///
/// # Errors
/// Returns `Validation` for an empty patch or any offending field
pub fn validate_case_update(patch: &CaseUpdate) -> Result<()> {
    let mut validator = Validator::new();
    if patch.is_empty() {
        validator.add_error("case", "Nothing to update");
    }
    if let Some(applicant) = &patch.applicant {
        check_applicant(&mut validator, applicant);
    }
    if let Some(visa_type) = &patch.visa_type {
        validator.check("visaType", visa_type, &StringValidator::new().not_empty());
    }
    validator.finish().into_domain()
}

#[cfg(test)]
mod tests {
    use visadesk_domain::CaseStatus;

    use super::*;

    fn applicant() -> ApplicantSummary {
        ApplicantSummary {
            first_name: "Ana".into(),
            last_name: "Silva".into(),
            email: "ana@example.com".into(),
            phone: None,
        }
    }

    #[test]
    fn complete_case_passes() {
        let new_case = NewCase { applicant: applicant(), visa_type: "B1/B2".into(), notes: None };
        assert!(validate_new_case(&new_case).is_ok());
    }

    #[test]
    fn missing_fields_are_all_reported() {
        let mut incomplete = applicant();
        incomplete.last_name = " ".into();
        incomplete.email = "ana@".into();
        let new_case = NewCase { applicant: incomplete, visa_type: String::new(), notes: None };

        let err = validate_new_case(&new_case).unwrap_err();
        let fields: Vec<_> = err.field_errors().iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, ["applicant.lastName", "applicant.email", "visaType"]);
    }

    #[test]
    fn empty_patch_is_rejected() {
        assert!(validate_case_update(&CaseUpdate::default()).is_err());
        let patch = CaseUpdate { status: Some(CaseStatus::Cancelled), ..Default::default() };
        assert!(validate_case_update(&patch).is_ok());
    }
}
