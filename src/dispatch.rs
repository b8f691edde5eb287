//! Header composition and hand-off to the mail transport.

use std::sync::Arc;

use crate::email_log::EmailLog;
use crate::error::{AppError, Result};
use crate::mail::{MailTransport, CONTENT_TYPE_HTML};
use crate::models::{LogEntry, Settings};
use crate::rate_limit::RateLimiter;
use crate::recipients::RecipientSet;
use crate::sanitize::is_email;
use crate::validation::SanitizedRequest;

/// Everything about to be handed to the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundEmail {
    pub recipients: Vec<String>,
    pub subject: String,
    pub message: String,
    pub headers: Vec<String>,
}

/// Inspects an outbound email and may veto it.
///
/// A veto's message is returned to the caller as a 400; nothing is sent or logged.
pub trait RequestInterceptor: Send + Sync {
    fn inspect(&self, email: &OutboundEmail) -> std::result::Result<(), String>;
}

/// Adjusts the header list after composition, just before sending.
pub trait HeaderMutator: Send + Sync {
    fn mutate(&self, headers: &mut Vec<String>, email: &OutboundEmail);
}

/// Outcome of an accepted send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendReceipt {
    pub recipients: Vec<String>,
}

impl SendReceipt {
    pub fn message(&self) -> String {
        format!("Email sent successfully to {}.", self.recipients.join(", "))
    }
}

/// Resolve From / Reply-To against the settings defaults and build the header list.
pub fn compose_headers(request: &SanitizedRequest, settings: &Settings) -> Vec<String> {
    let from_email = request.from.as_deref().unwrap_or(&settings.from_email);
    let sender_name = request
        .sender_name
        .as_deref()
        .unwrap_or(&settings.from_name);
    let reply_to = request.reply_to.as_deref().unwrap_or(&settings.reply_to);

    let mut headers = vec![CONTENT_TYPE_HTML.to_string()];

    if !from_email.is_empty() && is_email(from_email) {
        if sender_name.is_empty() {
            headers.push(format!("From: {}", from_email));
        } else {
            headers.push(format!("From: {} <{}>", sender_name, from_email));
        }
    }

    if !reply_to.is_empty() && is_email(reply_to) {
        headers.push(format!("Reply-To: {}", reply_to));
    }

    headers
}

#[derive(Clone)]
pub struct Dispatcher {
    transport: Arc<dyn MailTransport>,
    rate_limiter: RateLimiter,
    log: EmailLog,
    interceptor: Option<Arc<dyn RequestInterceptor>>,
    header_mutator: Option<Arc<dyn HeaderMutator>>,
}

impl Dispatcher {
    pub fn new(transport: Arc<dyn MailTransport>, rate_limiter: RateLimiter, log: EmailLog) -> Self {
        Self {
            transport,
            rate_limiter,
            log,
            interceptor: None,
            header_mutator: None,
        }
    }

    pub fn with_interceptor(mut self, interceptor: Arc<dyn RequestInterceptor>) -> Self {
        self.interceptor = Some(interceptor);
        self
    }

    pub fn with_header_mutator(mut self, mutator: Arc<dyn HeaderMutator>) -> Self {
        self.header_mutator = Some(mutator);
        self
    }

    /// Send `request` to `recipients`.
    ///
    /// Every transport call, successful or not, is counted against the rate window and
    /// appended to the email log. Store failures during that bookkeeping are logged;
    /// the result reflects the transport alone. Transport failures are not retried.
    pub async fn dispatch(
        &self,
        request: &SanitizedRequest,
        recipients: &RecipientSet,
        settings: &Settings,
    ) -> Result<SendReceipt> {
        let mut email = OutboundEmail {
            recipients: recipients.as_slice().to_vec(),
            subject: request.subject.clone(),
            message: request.message.clone(),
            headers: compose_headers(request, settings),
        };

        if let Some(interceptor) = &self.interceptor {
            if let Err(reason) = interceptor.inspect(&email) {
                tracing::warn!(reason = %reason, "Send vetoed");
                return Err(AppError::DispatchVetoed(reason));
            }
        }

        if let Some(mutator) = &self.header_mutator {
            let mut headers = email.headers.clone();
            mutator.mutate(&mut headers, &email);
            email.headers = headers;
        }

        let sent = self
            .transport
            .send(&email.recipients, &email.subject, &email.message, &email.headers)
            .await;

        // Bookkeeping never changes the outcome of a send that already happened.
        let count = match self.rate_limiter.record_attempt().await {
            Ok(count) => Some(count),
            Err(e) => {
                tracing::error!(error = %e, "Failed to record send attempt");
                None
            }
        };
        if let Err(e) = self
            .log
            .append(LogEntry::new(&email.recipients, &email.subject, sent))
            .await
        {
            tracing::error!(error = %e, "Failed to append email log entry");
        }

        tracing::info!(
            recipients = email.recipients.len(),
            success = sent,
            window_count = ?count,
            "Send attempt finished"
        );

        if !sent {
            return Err(AppError::TransportFailure);
        }

        Ok(SendReceipt {
            recipients: email.recipients,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    use async_trait::async_trait;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::store::{KeyValueStore, MemoryStore};

    type Sent = (Vec<String>, String, String, Vec<String>);

    #[derive(Default)]
    struct RecordingTransport {
        fail: AtomicBool,
        sent: Mutex<Vec<Sent>>,
    }

    #[async_trait]
    impl MailTransport for RecordingTransport {
        async fn send(&self, to: &[String], subject: &str, body: &str, headers: &[String]) -> bool {
            self.sent.lock().unwrap().push((
                to.to_vec(),
                subject.to_string(),
                body.to_string(),
                headers.to_vec(),
            ));
            !self.fail.load(Ordering::SeqCst)
        }
    }

    struct Veto;

    impl RequestInterceptor for Veto {
        fn inspect(&self, email: &OutboundEmail) -> std::result::Result<(), String> {
            if email.subject.contains("spam") {
                Err("Subject rejected by policy".to_string())
            } else {
                Ok(())
            }
        }
    }

    struct AddTag;

    impl HeaderMutator for AddTag {
        fn mutate(&self, headers: &mut Vec<String>, _email: &OutboundEmail) {
            headers.push("X-Mailer-Tag: test".to_string());
        }
    }

    /// Memory store whose counter is unavailable.
    struct BrokenCounter(MemoryStore);

    #[async_trait]
    impl KeyValueStore for BrokenCounter {
        async fn get(&self, key: &str) -> Result<Option<String>> {
            self.0.get(key).await
        }

        async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<()> {
            self.0.set(key, value, ttl).await
        }

        async fn delete(&self, key: &str) -> Result<()> {
            self.0.delete(key).await
        }

        async fn increment(&self, _key: &str, _ttl: Duration) -> Result<i64> {
            Err(AppError::Store("counter unavailable".to_string()))
        }
    }

    struct Fixture {
        transport: Arc<RecordingTransport>,
        limiter: RateLimiter,
        log: EmailLog,
        dispatcher: Dispatcher,
    }

    fn fixture() -> Fixture {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let transport = Arc::new(RecordingTransport::default());
        let limiter = RateLimiter::new(store.clone());
        let log = EmailLog::new(store);
        let dispatcher = Dispatcher::new(transport.clone(), limiter.clone(), log.clone());

        Fixture {
            transport,
            limiter,
            log,
            dispatcher,
        }
    }

    fn request() -> SanitizedRequest {
        SanitizedRequest {
            to: "a@example.com".to_string(),
            subject: "Hello".to_string(),
            message: "<p>Hi</p>".to_string(),
            from: None,
            sender_name: None,
            reply_to: None,
        }
    }

    #[test]
    fn test_headers_from_request() {
        let request = SanitizedRequest {
            from: Some("sender@example.com".to_string()),
            sender_name: Some("My NAS".to_string()),
            reply_to: Some("noreply@example.com".to_string()),
            ..request()
        };

        assert_eq!(
            compose_headers(&request, &Settings::default()),
            vec![
                CONTENT_TYPE_HTML.to_string(),
                "From: My NAS <sender@example.com>".to_string(),
                "Reply-To: noreply@example.com".to_string(),
            ]
        );
    }

    #[test]
    fn test_headers_fall_back_to_settings() {
        let settings = Settings {
            from_email: "default@example.com".to_string(),
            reply_to: "replies@example.com".to_string(),
            ..Settings::default()
        };

        assert_eq!(
            compose_headers(&request(), &settings),
            vec![
                CONTENT_TYPE_HTML.to_string(),
                "From: default@example.com".to_string(),
                "Reply-To: replies@example.com".to_string(),
            ]
        );
    }

    #[test]
    fn test_headers_mix_request_name_with_default_address() {
        let settings = Settings {
            from_email: "default@example.com".to_string(),
            from_name: "Default".to_string(),
            ..Settings::default()
        };
        let request = SanitizedRequest {
            sender_name: Some("Override".to_string()),
            ..request()
        };

        assert_eq!(
            compose_headers(&request, &settings)[1],
            "From: Override <default@example.com>"
        );
    }

    #[test]
    fn test_headers_without_sender_only_declare_html() {
        let settings = Settings {
            from_name: "Name Without Address".to_string(),
            reply_to: "invalid".to_string(),
            ..Settings::default()
        };

        assert_eq!(
            compose_headers(&request(), &settings),
            vec![CONTENT_TYPE_HTML.to_string()]
        );
    }

    #[tokio::test]
    async fn test_successful_dispatch_counts_and_logs() {
        let f = fixture();
        let recipients = RecipientSet::parse("a@example.com, b@example.com");

        let receipt = f
            .dispatcher
            .dispatch(&request(), &recipients, &Settings::default())
            .await
            .unwrap();

        assert_eq!(receipt.recipients, ["a@example.com", "b@example.com"]);
        assert!(receipt.message().contains("a@example.com, b@example.com"));
        assert_eq!(f.limiter.current_count().await.unwrap(), 1);

        let entries = f.log.list().await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].to, "a@example.com, b@example.com");
        assert!(entries[0].success);

        let sent = f.transport.sent.lock().unwrap();
        assert_eq!(sent[0].0, ["a@example.com", "b@example.com"]);
        assert_eq!(sent[0].2, "<p>Hi</p>");
    }

    #[tokio::test]
    async fn test_transport_failure_still_counts_and_logs() {
        let f = fixture();
        f.transport.fail.store(true, Ordering::SeqCst);
        let recipients = RecipientSet::parse("a@example.com");

        let err = f
            .dispatcher
            .dispatch(&request(), &recipients, &Settings::default())
            .await
            .unwrap_err();

        assert_eq!(err.code(), "send_failed");
        assert_eq!(err.status().as_u16(), 500);
        assert_eq!(f.limiter.current_count().await.unwrap(), 1);
        assert!(!f.log.list().await.unwrap()[0].success);
        assert_eq!(f.transport.sent.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_veto_skips_send_count_and_log() {
        let f = fixture();
        let dispatcher = f.dispatcher.clone().with_interceptor(Arc::new(Veto));
        let request = SanitizedRequest {
            subject: "Buy spam now".to_string(),
            ..request()
        };

        let err = dispatcher
            .dispatch(&request, &RecipientSet::parse("a@example.com"), &Settings::default())
            .await
            .unwrap_err();

        assert_eq!(err.code(), "dispatch_vetoed");
        assert_eq!(err.to_string(), "Subject rejected by policy");
        assert!(f.transport.sent.lock().unwrap().is_empty());
        assert_eq!(f.limiter.current_count().await.unwrap(), 0);
        assert!(f.log.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_header_mutator_applied_before_send() {
        let f = fixture();
        let dispatcher = f
            .dispatcher
            .clone()
            .with_interceptor(Arc::new(Veto))
            .with_header_mutator(Arc::new(AddTag));

        dispatcher
            .dispatch(&request(), &RecipientSet::parse("a@example.com"), &Settings::default())
            .await
            .unwrap();

        let sent = f.transport.sent.lock().unwrap();
        assert_eq!(
            sent[0].3,
            vec![
                CONTENT_TYPE_HTML.to_string(),
                "X-Mailer-Tag: test".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_delivered_email_succeeds_when_counter_fails() {
        let store: Arc<dyn KeyValueStore> = Arc::new(BrokenCounter(MemoryStore::new()));
        let transport = Arc::new(RecordingTransport::default());
        let log = EmailLog::new(store.clone());
        let dispatcher = Dispatcher::new(transport.clone(), RateLimiter::new(store), log.clone());

        let receipt = dispatcher
            .dispatch(&request(), &RecipientSet::parse("a@example.com"), &Settings::default())
            .await
            .unwrap();

        assert_eq!(receipt.recipients, ["a@example.com"]);
        assert_eq!(transport.sent.lock().unwrap().len(), 1);
        let entries = log.list().await.unwrap();
        assert_eq!(entries.len(), 1);
        assert!(entries[0].success);
    }
}
