use serde::{Deserialize, Serialize};

pub const DEFAULT_RATE_LIMIT_PER_MINUTE: u32 = 10;

/// Mailer configuration record, read by every request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub api_key: String,
    pub require_api_key: bool,
    pub from_email: String,
    pub from_name: String,
    pub reply_to: String,
    pub rate_limit_per_minute: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            require_api_key: true,
            from_email: String::new(),
            from_name: String::new(),
            reply_to: String::new(),
            rate_limit_per_minute: DEFAULT_RATE_LIMIT_PER_MINUTE,
        }
    }
}

impl Settings {
    /// Limit used for admission. A stored value below 1 falls back to the default.
    pub fn effective_rate_limit(&self) -> u32 {
        if self.rate_limit_per_minute < 1 {
            DEFAULT_RATE_LIMIT_PER_MINUTE
        } else {
            self.rate_limit_per_minute
        }
    }
}

/// Raw administrator input for the settings record. Absent fields keep their current value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingsUpdate {
    pub api_key: Option<String>,
    pub require_api_key: Option<bool>,
    pub from_email: Option<String>,
    pub from_name: Option<String>,
    pub reply_to: Option<String>,
    pub rate_limit_per_minute: Option<i64>,
}

impl SettingsUpdate {
    pub fn is_empty(&self) -> bool {
        self == &SettingsUpdate::default()
    }
}
