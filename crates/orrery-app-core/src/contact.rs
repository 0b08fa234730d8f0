// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Contact form model shared by the browser client and the mail gateway.
//!
//! Validation lives here once so the client rejects exactly what the gateway
//! would reject: fields are trimmed, all three are required, the address must
//! look like `local@domain.tld`, and each field has a character cap.

use std::sync::OnceLock;
use std::time::Duration;

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::toast::{ToastKind, ToastService, DEFAULT_TOAST_TTL};

/// Maximum name length in characters.
pub const MAX_NAME_CHARS: usize = 100;
/// Maximum e-mail length in characters.
pub const MAX_EMAIL_CHARS: usize = 255;
/// Maximum message length in characters.
pub const MAX_MESSAGE_CHARS: usize = 5000;

const EMAIL_PATTERN: &str = r"^[^\s@]+@[^\s@]+\.[^\s@]+$";

/// Toast title shown after a successful submission.
pub const SENT_TITLE: &str = "Message sent!";
/// Toast body shown after a successful submission.
pub const SENT_BODY: &str = "We'll get back to you as soon as possible.";
/// Toast title shown when a submission fails.
pub const FAILED_TITLE: &str = "Failed to send message";
/// Toast body shown when delivery fails.
pub const FAILED_BODY: &str = "Please try again or contact us directly via email.";

/// Validation and submission errors.
///
/// The `Display` strings are the exact messages returned by the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContactError {
    /// At least one field was blank after trimming.
    #[error("Missing required fields: name, email, and message are required")]
    MissingFields,
    /// Address did not match the e-mail pattern.
    #[error("Invalid email format")]
    InvalidEmail,
    /// A field exceeded its character cap.
    #[error("Input exceeds maximum length")]
    TooLong,
    /// A submission is already in flight.
    #[error("a message is already being sent")]
    InFlight,
}

fn email_regex() -> Option<&'static Regex> {
    static EMAIL: OnceLock<Option<Regex>> = OnceLock::new();
    EMAIL.get_or_init(|| Regex::new(EMAIL_PATTERN).ok()).as_ref()
}

/// Returns true when `email` matches `local@domain.tld` with no whitespace.
pub fn is_valid_email(email: &str) -> bool {
    email_regex().is_some_and(|re| re.is_match(email))
}

/// Wire payload of `POST /send-contact-email`.
///
/// Missing JSON fields deserialize as empty strings so they fail the
/// required-field check rather than the parser.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactMessage {
    /// Sender name.
    pub name: String,
    /// Sender e-mail (used as reply-to).
    pub email: String,
    /// Free-form message body.
    pub message: String,
}

impl ContactMessage {
    /// Build a message from raw field values.
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            message: message.into(),
        }
    }

    /// Trim every field and validate the result.
    ///
    /// Checks run in the gateway's order: required, e-mail format, length.
    pub fn validated(&self) -> Result<Self, ContactError> {
        let name = self.name.trim();
        let email = self.email.trim();
        let message = self.message.trim();
        if name.is_empty() || email.is_empty() || message.is_empty() {
            return Err(ContactError::MissingFields);
        }
        if !is_valid_email(email) {
            return Err(ContactError::InvalidEmail);
        }
        if name.chars().count() > MAX_NAME_CHARS
            || email.chars().count() > MAX_EMAIL_CHARS
            || message.chars().count() > MAX_MESSAGE_CHARS
        {
            return Err(ContactError::TooLong);
        }
        Ok(Self::new(name, email, message))
    }
}

/// Response body of `POST /send-contact-email`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactResponse {
    /// Present and true on success.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,
    /// Delivery id reported by the mail provider.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Error message on failure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ContactResponse {
    /// Success body carrying the provider's delivery id.
    pub fn sent(id: Option<String>) -> Self {
        Self {
            success: Some(true),
            id,
            error: None,
        }
    }

    /// Error body.
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: None,
            id: None,
            error: Some(error.into()),
        }
    }

    /// Whether the body reports a delivered message.
    pub fn is_success(&self) -> bool {
        self.success == Some(true) && self.error.is_none()
    }
}

/// Result of a finished submission, as seen by the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Message delivered; the form was cleared.
    Sent,
    /// Delivery failed; field values were kept.
    Failed,
}

/// Client-side contact form state.
#[derive(Debug, Clone, Default)]
pub struct ContactForm {
    /// Name field as typed.
    pub name: String,
    /// E-mail field as typed.
    pub email: String,
    /// Message field as typed.
    pub message: String,
    in_flight: bool,
}

impl ContactForm {
    /// Empty form.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a submission is awaiting its response.
    pub fn is_submitting(&self) -> bool {
        self.in_flight
    }

    /// Validate the fields and mark the form in flight.
    ///
    /// Returns the trimmed payload to send. Validation failures push an error
    /// toast carrying the validation message and leave the form editable.
    pub fn begin_submit(
        &mut self,
        toasts: &mut ToastService,
        now: Duration,
    ) -> Result<ContactMessage, ContactError> {
        if self.in_flight {
            return Err(ContactError::InFlight);
        }
        let payload = ContactMessage::new(
            self.name.as_str(),
            self.email.as_str(),
            self.message.as_str(),
        )
        .validated()
        .inspect_err(|err| {
            debug!(%err, "contact form rejected locally");
            let body = Some(err.to_string());
            toasts.push(ToastKind::Error, FAILED_TITLE, body, DEFAULT_TOAST_TTL, now);
        })?;
        self.in_flight = true;
        Ok(payload)
    }

    /// Record the transport result of the submission started by
    /// [`ContactForm::begin_submit`].
    ///
    /// `response` is `Err` when the request never produced a body.
    pub fn finish_submit<E: std::fmt::Display>(
        &mut self,
        response: Result<ContactResponse, E>,
        toasts: &mut ToastService,
        now: Duration,
    ) -> SubmitOutcome {
        self.in_flight = false;
        match response {
            Ok(body) if body.is_success() => {
                let detail = Some(SENT_BODY.to_owned());
                toasts.push(ToastKind::Success, SENT_TITLE, detail, DEFAULT_TOAST_TTL, now);
                self.name.clear();
                self.email.clear();
                self.message.clear();
                SubmitOutcome::Sent
            }
            Ok(body) => {
                warn!(error = ?body.error, "contact gateway reported failure");
                Self::report_failure(toasts, now)
            }
            Err(err) => {
                warn!(%err, "contact request failed");
                Self::report_failure(toasts, now)
            }
        }
    }

    fn report_failure(toasts: &mut ToastService, now: Duration) -> SubmitOutcome {
        let body = Some(FAILED_BODY.to_owned());
        toasts.push(ToastKind::Error, FAILED_TITLE, body, DEFAULT_TOAST_TTL, now);
        SubmitOutcome::Failed
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn fields_are_trimmed() {
        let msg = ContactMessage::new("  Ada ", " ada@example.com\n", "\thello ")
            .validated()
            .unwrap();
        assert_eq!(msg, ContactMessage::new("Ada", "ada@example.com", "hello"));
    }

    #[test]
    fn blank_field_is_missing() {
        let err = ContactMessage::new("Ada", "ada@example.com", "   ").validated();
        assert_eq!(err, Err(ContactError::MissingFields));
        assert_eq!(
            ContactError::MissingFields.to_string(),
            "Missing required fields: name, email, and message are required"
        );
    }

    #[test]
    fn email_pattern() {
        assert!(is_valid_email("a@b.co"));
        assert!(is_valid_email("first.last@sub.example.org"));
        assert!(!is_valid_email("no-at-sign.com"));
        assert!(!is_valid_email("a@nodot"));
        assert!(!is_valid_email("a b@c.d"));
        assert!(!is_valid_email("a@@b.c"));
    }

    #[test]
    fn format_is_checked_before_length() {
        let long_bad = "x".repeat(300);
        assert_eq!(
            ContactMessage::new("Ada", long_bad, "hi").validated(),
            Err(ContactError::InvalidEmail)
        );
    }

    #[test]
    fn caps_count_characters() {
        let name = "é".repeat(MAX_NAME_CHARS);
        assert!(ContactMessage::new(name.clone(), "a@b.co", "hi").validated().is_ok());
        let too_long = format!("{name}é");
        assert_eq!(
            ContactMessage::new(too_long, "a@b.co", "hi").validated(),
            Err(ContactError::TooLong)
        );
        let message = "m".repeat(MAX_MESSAGE_CHARS + 1);
        assert_eq!(
            ContactMessage::new("Ada", "a@b.co", message).validated(),
            Err(ContactError::TooLong)
        );
    }

    #[test]
    fn missing_json_fields_deserialize_empty() {
        let msg: ContactMessage = serde_json::from_str(r#"{"name":"Ada"}"#).unwrap();
        assert_eq!(msg.validated(), Err(ContactError::MissingFields));
    }

    #[test]
    fn success_clears_form_and_toasts() {
        let mut toasts = ToastService::new(4);
        let mut form = ContactForm {
            name: "Ada".into(),
            email: "ada@example.com".into(),
            message: "Hello".into(),
            ..ContactForm::default()
        };
        let payload = form.begin_submit(&mut toasts, Duration::ZERO).unwrap();
        assert_eq!(payload.name, "Ada");
        assert!(form.is_submitting());
        assert_eq!(
            form.begin_submit(&mut toasts, Duration::ZERO),
            Err(ContactError::InFlight)
        );

        let outcome = form.finish_submit::<String>(
            Ok(ContactResponse::sent(Some("re_1".into()))),
            &mut toasts,
            Duration::ZERO,
        );
        assert_eq!(outcome, SubmitOutcome::Sent);
        assert!(form.name.is_empty() && form.email.is_empty() && form.message.is_empty());
        let shown = toasts.visible(Duration::from_millis(1));
        assert_eq!(shown[0].title, SENT_TITLE);
        assert_eq!(shown[0].body.as_deref(), Some(SENT_BODY));
    }

    #[test]
    fn failure_keeps_fields() {
        let mut toasts = ToastService::new(4);
        let mut form = ContactForm {
            name: "Ada".into(),
            email: "ada@example.com".into(),
            message: "Hello".into(),
            ..ContactForm::default()
        };
        form.begin_submit(&mut toasts, Duration::ZERO).unwrap();
        let outcome = form.finish_submit(Err("connection reset"), &mut toasts, Duration::ZERO);
        assert_eq!(outcome, SubmitOutcome::Failed);
        assert!(!form.is_submitting());
        assert_eq!(form.name, "Ada");
        let shown = toasts.visible(Duration::from_millis(1));
        assert_eq!(shown[0].kind, ToastKind::Error);
        assert_eq!(shown[0].body.as_deref(), Some(FAILED_BODY));

        form.begin_submit(&mut toasts, Duration::ZERO).unwrap();
        let outcome = form.finish_submit::<String>(
            Ok(ContactResponse::failed("provider down")),
            &mut toasts,
            Duration::ZERO,
        );
        assert_eq!(outcome, SubmitOutcome::Failed);
    }

    #[test]
    fn local_rejection_shows_reason() {
        let mut toasts = ToastService::new(4);
        let mut form = ContactForm {
            name: "Ada".into(),
            email: "not-an-email".into(),
            message: "Hello".into(),
            ..ContactForm::default()
        };
        assert_eq!(
            form.begin_submit(&mut toasts, Duration::ZERO),
            Err(ContactError::InvalidEmail)
        );
        assert!(!form.is_submitting());
        let shown = toasts.visible(Duration::from_millis(1));
        assert_eq!(shown[0].body.as_deref(), Some("Invalid email format"));
    }
}
