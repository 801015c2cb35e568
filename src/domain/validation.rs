//! Required-field validation for incoming submissions.

use validator::{Validate, ValidationErrors};

use crate::domain::entities::LeadSubmission;

/// Checks that `name`, `email` and `phone` are present and non-empty.
///
/// Returns the submission unchanged on success. Pure and synchronous.
///
/// # Errors
///
/// Returns [`ValidationErrors`] keyed by each missing or empty field.
pub fn validate_submission(submission: LeadSubmission) -> Result<LeadSubmission, ValidationErrors> {
    submission.validate()?;
    Ok(submission)
}

/// Lists the offending field names of a validation failure, sorted.
pub fn invalid_fields(errors: &ValidationErrors) -> Vec<String> {
    let mut fields: Vec<String> = errors
        .field_errors()
        .keys()
        .map(|field| field.to_string())
        .collect();
    fields.sort();
    fields
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_submission_is_returned_unchanged() {
        let submission = LeadSubmission {
            season: Some("Winter".to_string()),
            ..LeadSubmission::new("Jo", "jo@x.com", "555-1")
        };

        let validated = validate_submission(submission.clone()).unwrap();
        assert_eq!(validated, submission);
    }

    #[test]
    fn test_missing_fields_are_rejected() {
        let submission = LeadSubmission {
            name: Some("Jo".to_string()),
            ..LeadSubmission::default()
        };

        let errors = validate_submission(submission).unwrap_err();
        assert_eq!(invalid_fields(&errors), vec!["email", "phone"]);
    }

    #[test]
    fn test_empty_fields_are_rejected() {
        let submission = LeadSubmission::new("", "jo@x.com", "");

        let errors = validate_submission(submission).unwrap_err();
        assert_eq!(invalid_fields(&errors), vec!["name", "phone"]);
    }

    #[test]
    fn test_email_and_phone_shape_is_not_checked() {
        let submission = LeadSubmission::new("Jo", "not-an-email", "call me");
        assert!(validate_submission(submission).is_ok());
    }
}
