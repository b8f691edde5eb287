pub mod resend;

pub use resend::ResendMailer;

use async_trait::async_trait;

pub const CONTENT_TYPE_HTML: &str = "Content-Type: text/html; charset=UTF-8";

/// Outbound mail capability. Returns whether the message was accepted for delivery.
///
/// Implementations own their timeouts and never retry on behalf of the caller.
#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn send(&self, to: &[String], subject: &str, body: &str, headers: &[String]) -> bool;
}

/// Split a `Name: value` header line.
pub fn split_header(line: &str) -> Option<(&str, &str)> {
    let (name, value) = line.split_once(':')?;
    let name = name.trim();
    if name.is_empty() {
        return None;
    }
    Some((name, value.trim()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_header() {
        assert_eq!(
            split_header("From: Name <a@example.com>"),
            Some(("From", "Name <a@example.com>"))
        );
        assert_eq!(split_header("X-Tag:  v "), Some(("X-Tag", "v")));
        assert_eq!(split_header("no colon"), None);
        assert_eq!(split_header(": empty name"), None);
    }
}
