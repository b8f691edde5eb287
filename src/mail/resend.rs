use std::collections::BTreeMap;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;

use super::{split_header, MailTransport};
use crate::config::{Config, ConfigError};

#[derive(Debug, Serialize, PartialEq)]
struct Payload {
    from: String,
    to: Vec<String>,
    subject: String,
    html: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_to: Option<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    headers: BTreeMap<String, String>,
}

/// Mail transport backed by the Resend HTTP API.
#[derive(Clone)]
pub struct ResendMailer {
    client: Client,
    api_key: String,
    api_url: String,
    from: String,
}

impl ResendMailer {
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        let api_key = config
            .resend_api_key
            .clone()
            .filter(|key| !key.is_empty())
            .ok_or(ConfigError::MissingResendApiKey)?;

        Ok(Self {
            client: Client::new(),
            api_key,
            api_url: config.resend_api_url.clone(),
            from: config.mail_from.clone(),
        })
    }

    /// Map header lines onto the API fields; unknown headers pass through.
    fn payload(&self, to: &[String], subject: &str, body: &str, headers: &[String]) -> Payload {
        let mut payload = Payload {
            from: self.from.clone(),
            to: to.to_vec(),
            subject: subject.to_string(),
            html: body.to_string(),
            reply_to: None,
            headers: BTreeMap::new(),
        };

        for (name, value) in headers.iter().filter_map(|line| split_header(line)) {
            match name.to_ascii_lowercase().as_str() {
                "from" => payload.from = value.to_string(),
                "reply-to" => payload.reply_to = Some(value.to_string()),
                "content-type" => {}
                _ => {
                    payload.headers.insert(name.to_string(), value.to_string());
                }
            }
        }

        payload
    }
}

#[async_trait]
impl MailTransport for ResendMailer {
    async fn send(&self, to: &[String], subject: &str, body: &str, headers: &[String]) -> bool {
        let payload = self.payload(to, subject, body, headers);

        let res = match self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
        {
            Ok(res) => res,
            Err(e) => {
                tracing::error!(error = %e, "Mail send failed");
                return false;
            }
        };

        if !res.status().is_success() {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            tracing::error!(%status, body = %body, "Resend API error");
            return false;
        }

        true
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::mail::CONTENT_TYPE_HTML;

    fn mailer() -> ResendMailer {
        ResendMailer {
            client: Client::new(),
            api_key: "re_test".to_string(),
            api_url: "http://localhost/emails".to_string(),
            from: "Fallback <fallback@example.com>".to_string(),
        }
    }

    #[test]
    fn test_payload_maps_headers() {
        let headers = vec![
            CONTENT_TYPE_HTML.to_string(),
            "From: My NAS <nas@example.com>".to_string(),
            "Reply-To: noreply@example.com".to_string(),
            "X-Campaign: weekly".to_string(),
        ];

        let payload = mailer().payload(
            &["a@example.com".to_string()],
            "Subject",
            "<p>Hi</p>",
            &headers,
        );

        assert_eq!(
            payload,
            Payload {
                from: "My NAS <nas@example.com>".to_string(),
                to: vec!["a@example.com".to_string()],
                subject: "Subject".to_string(),
                html: "<p>Hi</p>".to_string(),
                reply_to: Some("noreply@example.com".to_string()),
                headers: BTreeMap::from([("X-Campaign".to_string(), "weekly".to_string())]),
            }
        );
    }

    #[test]
    fn test_payload_without_from_uses_fallback() {
        let payload = mailer().payload(
            &["a@example.com".to_string()],
            "Subject",
            "<p>Hi</p>",
            &[CONTENT_TYPE_HTML.to_string()],
        );

        assert_eq!(payload.from, "Fallback <fallback@example.com>");
        assert_eq!(payload.reply_to, None);
        assert!(payload.headers.is_empty());
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_reports_failure() {
        let mailer = ResendMailer {
            api_url: "http://127.0.0.1:9/emails".to_string(),
            ..mailer()
        };

        let sent = mailer
            .send(&["a@example.com".to_string()], "S", "<p>B</p>", &[])
            .await;

        assert!(!sent);
    }
}
