//! Persistence and sanitization of the mailer settings record.

use std::sync::Arc;

use crate::error::Result;
use crate::models::{Settings, SettingsUpdate};
use crate::sanitize::{sanitize_email, sanitize_text};
use crate::store::{KeyValueStore, SETTINGS_KEY};

#[derive(Clone)]
pub struct SettingsStore {
    store: Arc<dyn KeyValueStore>,
}

impl SettingsStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Current settings; defaults when nothing has been stored yet.
    pub async fn load(&self) -> Result<Settings> {
        match self.store.get(SETTINGS_KEY).await? {
            Some(json) => Ok(serde_json::from_str(&json)?),
            None => Ok(Settings::default()),
        }
    }

    pub async fn save(&self, settings: &Settings) -> Result<()> {
        let mut settings = settings.clone();
        settings.rate_limit_per_minute = settings.rate_limit_per_minute.max(1);

        let json = serde_json::to_string(&settings)?;
        self.store.set(SETTINGS_KEY, &json, None).await
    }

    /// Sanitize `update` over the current record and store the result.
    pub async fn update(&self, update: SettingsUpdate) -> Result<Settings> {
        let current = self.load().await?;
        let settings = sanitize_settings(&current, update);
        self.save(&settings).await?;

        tracing::info!(
            require_api_key = settings.require_api_key,
            api_key_set = !settings.api_key.is_empty(),
            rate_limit_per_minute = settings.rate_limit_per_minute,
            "Settings updated"
        );
        Ok(settings)
    }

    /// Write `initial` only when no settings record exists. Returns whether it was written.
    pub async fn seed_if_missing(&self, initial: SettingsUpdate) -> Result<bool> {
        if self.store.get(SETTINGS_KEY).await?.is_some() {
            return Ok(false);
        }

        let settings = sanitize_settings(&Settings::default(), initial);
        self.save(&settings).await?;
        Ok(true)
    }
}

/// Clean administrator input field by field, keeping `current` values for absent fields.
///
/// Keys and names are plain text, addresses must sanitize to a valid email (otherwise
/// they are cleared), and the rate limit is taken as an absolute value of at least 1.
pub fn sanitize_settings(current: &Settings, update: SettingsUpdate) -> Settings {
    let email = |value: String| sanitize_email(&value);

    Settings {
        api_key: update
            .api_key
            .map(|key| sanitize_text(&key))
            .unwrap_or_else(|| current.api_key.clone()),
        require_api_key: update.require_api_key.unwrap_or(current.require_api_key),
        from_email: update
            .from_email
            .map(email)
            .unwrap_or_else(|| current.from_email.clone()),
        from_name: update
            .from_name
            .map(|name| sanitize_text(&name))
            .unwrap_or_else(|| current.from_name.clone()),
        reply_to: update
            .reply_to
            .map(email)
            .unwrap_or_else(|| current.reply_to.clone()),
        rate_limit_per_minute: update
            .rate_limit_per_minute
            .map(|limit| limit.unsigned_abs().clamp(1, u32::MAX as u64) as u32)
            .unwrap_or(current.rate_limit_per_minute),
    }
}
