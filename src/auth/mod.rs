//! Caller authentication: identity tokens plus the optional API key.

pub mod api_key;

pub use api_key::{authenticate, require_capability, CAP_MANAGE_OPTIONS, CAP_SEND_EMAIL};

use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};

use crate::config::Config;
use crate::error::Result;
use crate::models::{Claims, Identity};

/// JWT Authentication Service
#[derive(Clone)]
pub struct AuthService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    expiry_seconds: u64,
}

impl AuthService {
    pub fn new(config: &Config) -> Self {
        Self::from_secret(&config.jwt_secret, config.jwt_expiry_seconds)
    }

    pub fn from_secret(secret: &str, expiry_seconds: u64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            expiry_seconds,
        }
    }

    /// Generate a JWT token granting `capabilities` to `subject`
    pub fn generate_token(&self, subject: &str, capabilities: &[String]) -> Result<String> {
        let now = Utc::now().timestamp();
        let exp = now + self.expiry_seconds as i64;

        let claims = Claims {
            sub: subject.to_string(),
            capabilities: capabilities.to_vec(),
            iat: now,
            exp,
        };

        let token = encode(&Header::default(), &claims, &self.encoding_key)?;
        Ok(token)
    }

    /// Validate a JWT token and return the claims
    pub fn validate_token(&self, token: &str) -> Result<Claims> {
        let validation = Validation::default();
        let token_data = decode::<Claims>(token, &self.decoding_key, &validation)?;

        Ok(token_data.claims)
    }

    /// Resolve a bearer token into an identity. Missing or invalid tokens identify nobody.
    pub fn identify(&self, bearer_token: Option<&str>) -> Option<Identity> {
        let token = bearer_token?;
        match self.validate_token(token) {
            Ok(claims) => Some(claims.into()),
            Err(e) => {
                tracing::debug!(error = %e, "Rejected identity token");
                None
            }
        }
    }
}
