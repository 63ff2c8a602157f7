#![forbid(unsafe_code)]

//! Contact form validation and submit-button state.

use std::sync::LazyLock;

use regex::Regex;

use crate::api::ContactSubmission;
use crate::error::ValidationError;

/// Label shown on the submit button while a request is in flight.
pub const SENDING_LABEL: &str = "Sending...";
pub const SUBMIT_SUCCESS_MESSAGE: &str = "Thank you! Your message has been sent successfully.";
pub const SUBMIT_ERROR_MESSAGE: &str = "Error submitting form. Please try again.";

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap_or_else(|err| panic!("email pattern: {err}"))
});

/// `local@domain.tld` with no whitespace and exactly one `@`.
#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Validate a submission. Checks run in order and stop at the first failure:
/// required fields first, then the email shape.
pub fn validate(submission: &ContactSubmission) -> Result<(), ValidationError> {
    let required = [
        ("name", &submission.name),
        ("email", &submission.email),
        ("service", &submission.service),
        ("message", &submission.message),
    ];
    for (field, value) in required {
        if value.is_empty() {
            return Err(ValidationError::MissingField(field));
        }
    }
    if !is_valid_email(&submission.email) {
        return Err(ValidationError::InvalidEmail);
    }
    Ok(())
}

/// Submit button bookkeeping: remembers the label to restore.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmitState {
    saved_label: Option<String>,
}

impl SubmitState {
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.saved_label.is_some()
    }

    /// Enter the pending state. Returns `false` if a submission is already
    /// in flight.
    pub fn begin(&mut self, original_label: impl Into<String>) -> bool {
        if self.saved_label.is_some() {
            return false;
        }
        self.saved_label = Some(original_label.into());
        true
    }

    /// Leave the pending state, yielding the label to restore.
    pub fn finish(&mut self) -> Option<String> {
        self.saved_label.take()
    }
}
