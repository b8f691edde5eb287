use std::env;

use crate::models::SettingsUpdate;

#[derive(Debug, Clone)]
pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    pub redis_url: Option<String>,
    pub jwt_secret: String,
    pub jwt_expiry_seconds: u64,
    pub resend_api_key: Option<String>,
    pub resend_api_url: String,
    pub mail_from: String,
    /// Settings written to the store on first start, when no record exists yet.
    pub initial_settings: SettingsUpdate,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Ok(Config {
            server_host: env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            server_port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidPort)?,
            redis_url: env::var("REDIS_URL").ok().filter(|url| !url.is_empty()),
            jwt_secret: env::var("JWT_SECRET").map_err(|_| ConfigError::MissingJwtSecret)?,
            jwt_expiry_seconds: env::var("JWT_EXPIRY_SECONDS")
                .unwrap_or_else(|_| "3600".to_string())
                .parse()
                .unwrap_or(3600),
            resend_api_key: env::var("RESEND_API_KEY").ok(),
            resend_api_url: env::var("RESEND_API_URL")
                .unwrap_or_else(|_| "https://api.resend.com/emails".to_string()),
            mail_from: env::var("MAIL_FROM")
                .unwrap_or_else(|_| "Rest Mailer <onboarding@resend.dev>".to_string()),
            initial_settings: initial_settings_from_env(),
        })
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

fn initial_settings_from_env() -> SettingsUpdate {
    SettingsUpdate {
        api_key: env::var("MAILER_API_KEY").ok(),
        require_api_key: env::var("MAILER_REQUIRE_API_KEY")
            .ok()
            .map(|value| parse_flag(&value)),
        from_email: env::var("MAILER_FROM_EMAIL").ok(),
        from_name: env::var("MAILER_FROM_NAME").ok(),
        reply_to: env::var("MAILER_REPLY_TO").ok(),
        rate_limit_per_minute: env::var("MAILER_RATE_LIMIT")
            .ok()
            .and_then(|value| value.trim().parse().ok()),
    }
}

/// "0", "false", "no", "off" and the empty string disable a flag; anything else enables it.
fn parse_flag(value: &str) -> bool {
    !matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "" | "0" | "false" | "no" | "off"
    )
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid server port")]
    InvalidPort,
    #[error("JWT_SECRET environment variable is required")]
    MissingJwtSecret,
    #[error("RESEND_API_KEY environment variable is required to send mail")]
    MissingResendApiKey,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flag() {
        assert!(parse_flag("1"));
        assert!(parse_flag("true"));
        assert!(parse_flag("YES"));
        assert!(!parse_flag("0"));
        assert!(!parse_flag(" off "));
        assert!(!parse_flag(""));
    }

    #[test]
    fn test_server_addr() {
        let config = Config {
            server_host: "127.0.0.1".to_string(),
            server_port: 9000,
            redis_url: None,
            jwt_secret: "secret".to_string(),
            jwt_expiry_seconds: 60,
            resend_api_key: None,
            resend_api_url: "http://localhost".to_string(),
            mail_from: "a@example.com".to_string(),
            initial_settings: SettingsUpdate::default(),
        };

        assert_eq!(config.server_addr(), "127.0.0.1:9000");
    }
}
