//! Field sanitizers, selected by the declared kind of each request field.

pub mod email;
pub mod html;
pub mod text;

pub use email::{is_email, sanitize_email};
pub use html::sanitize_html;
pub use text::{sanitize_recipients, sanitize_text};

/// Semantic type of an input field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// A single email address.
    Email,
    /// Free text with all markup removed.
    PlainText,
    /// HTML restricted to an allow-list of formatting tags.
    SafeHtml,
    /// A raw, comma-separated recipient list.
    Recipients,
}

pub type Sanitizer = fn(&str) -> String;

const SANITIZERS: &[(FieldKind, Sanitizer)] = &[
    (FieldKind::Email, sanitize_email as Sanitizer),
    (FieldKind::PlainText, sanitize_text as Sanitizer),
    (FieldKind::SafeHtml, sanitize_html as Sanitizer),
    (FieldKind::Recipients, sanitize_recipients as Sanitizer),
];

pub fn sanitizer_for(kind: FieldKind) -> Sanitizer {
    SANITIZERS
        .iter()
        .find(|(k, _)| *k == kind)
        .map(|(_, sanitizer)| *sanitizer)
        .unwrap_or(sanitize_text)
}

pub fn sanitize(kind: FieldKind, value: &str) -> String {
    sanitizer_for(kind)(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_kind_has_a_sanitizer() {
        for kind in [
            FieldKind::Email,
            FieldKind::PlainText,
            FieldKind::SafeHtml,
            FieldKind::Recipients,
        ] {
            assert!(SANITIZERS.iter().any(|(k, _)| *k == kind), "{:?}", kind);
        }
    }

    #[test]
    fn test_dispatch_by_kind() {
        assert_eq!(sanitize(FieldKind::Email, " a@example.com "), "a@example.com");
        assert_eq!(sanitize(FieldKind::PlainText, "<b>Hi</b>"), "Hi");
        assert_eq!(sanitize(FieldKind::SafeHtml, "<p>Hi</p>"), "<p>Hi</p>");
        assert_eq!(
            sanitize(FieldKind::Recipients, " <a@example.com>, b@example.com "),
            "a@example.com, b@example.com"
        );
    }
}
