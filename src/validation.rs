//! Request validation and per-field sanitization.

use crate::error::ValidationError;
use crate::models::SendEmailRequest;
use crate::sanitize::{is_email, sanitize, FieldKind};

/// Declared kind of every field accepted by the send endpoint.
const FIELDS: &[(&str, FieldKind)] = &[
    ("to", FieldKind::Recipients),
    ("subject", FieldKind::PlainText),
    ("message", FieldKind::SafeHtml),
    ("from", FieldKind::Email),
    ("sender_name", FieldKind::PlainText),
    ("reply_to", FieldKind::Email),
];

/// A request whose fields have all been sanitized for their kind.
///
/// Optional sender fields are `None` when absent, blank, or (for addresses) not a
/// valid email after sanitization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SanitizedRequest {
    pub to: String,
    pub subject: String,
    pub message: String,
    pub from: Option<String>,
    pub sender_name: Option<String>,
    pub reply_to: Option<String>,
}

fn field_kind(name: &str) -> FieldKind {
    FIELDS
        .iter()
        .find(|(field, _)| *field == name)
        .map(|(_, kind)| *kind)
        .unwrap_or(FieldKind::PlainText)
}

fn required(name: &str, raw: Option<&str>) -> Result<String, ValidationError> {
    let raw = match raw {
        Some(value) if !value.trim().is_empty() => value,
        _ => return Err(ValidationError::missing(name)),
    };

    let clean = sanitize(field_kind(name), raw);
    if clean.trim().is_empty() {
        return Err(ValidationError::empty(name));
    }
    Ok(clean)
}

fn optional(name: &str, raw: Option<&str>) -> Option<String> {
    let kind = field_kind(name);
    let clean = sanitize(kind, raw?);

    if clean.is_empty() {
        return None;
    }
    if kind == FieldKind::Email && !is_email(&clean) {
        return None;
    }
    Some(clean)
}

/// Check required fields and sanitize every field per its declared kind.
pub fn validate(raw: &SendEmailRequest) -> Result<SanitizedRequest, ValidationError> {
    Ok(SanitizedRequest {
        to: required("to", raw.to.as_deref())?,
        subject: required("subject", raw.subject.as_deref())?,
        message: required("message", raw.message.as_deref())?,
        from: optional("from", raw.from.as_deref()),
        sender_name: optional("sender_name", raw.sender_name.as_deref()),
        reply_to: optional("reply_to", raw.reply_to.as_deref()),
    })
}
