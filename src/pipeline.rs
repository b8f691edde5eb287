//! The send-email request pipeline.
//!
//! ```text
//! authenticate -> rate check -> validate -> parse recipients -> dispatch
//! ```
//!
//! Each stage either passes the request on or returns the error that ends it.

use crate::auth::authenticate;
use crate::dispatch::{Dispatcher, SendReceipt};
use crate::error::{AppError, Result};
use crate::models::{Identity, SendEmailRequest, Settings};
use crate::rate_limit::RateLimiter;
use crate::recipients::RecipientSet;
use crate::settings::SettingsStore;
use crate::validation::validate;

#[derive(Clone)]
pub struct SendPipeline {
    settings: SettingsStore,
    rate_limiter: RateLimiter,
    dispatcher: Dispatcher,
}

impl SendPipeline {
    pub fn new(settings: SettingsStore, rate_limiter: RateLimiter, dispatcher: Dispatcher) -> Self {
        Self {
            settings,
            rate_limiter,
            dispatcher,
        }
    }

    /// Authentication and rate admission. Returns the settings the rest of the
    /// request runs against.
    pub async fn admit(
        &self,
        identity: Option<&Identity>,
        api_key: Option<&[u8]>,
    ) -> Result<Settings> {
        let settings = self.settings.load().await?;

        if let Err(e) = authenticate(identity, api_key, &settings) {
            tracing::warn!(
                code = e.code(),
                subject = identity.map(|id| id.subject.as_str()).unwrap_or("-"),
                "Send request rejected"
            );
            return Err(e);
        }

        self.rate_limiter.check(&settings).await?;
        Ok(settings)
    }

    /// Validation, recipient parsing and dispatch for an admitted request.
    pub async fn send(&self, settings: &Settings, raw: &SendEmailRequest) -> Result<SendReceipt> {
        let request = validate(raw).map_err(|e| {
            tracing::warn!(error = %e, "Send request failed validation");
            AppError::from(e)
        })?;

        let recipients = RecipientSet::parse(&request.to);
        if recipients.is_empty() {
            tracing::warn!("Send request has no valid recipient");
            return Err(AppError::InvalidRecipient);
        }

        self.dispatcher.dispatch(&request, &recipients, settings).await
    }

    /// The whole pipeline for an already-decoded request body.
    pub async fn handle(
        &self,
        identity: Option<&Identity>,
        api_key: Option<&[u8]>,
        raw: &SendEmailRequest,
    ) -> Result<SendReceipt> {
        let settings = self.admit(identity, api_key).await?;
        self.send(&settings, raw).await
    }
}
