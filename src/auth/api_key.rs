use crate::error::{AppError, Result};
use crate::models::{Identity, Settings};
use crate::security::ct_eq;

/// Capability required to send mail.
pub const CAP_SEND_EMAIL: &str = "edit_posts";
/// Capability required for administration (settings, log).
pub const CAP_MANAGE_OPTIONS: &str = "manage_options";

/// Two-layer gate for the send endpoint.
///
/// Layer 1 requires an identity holding `edit_posts`. Layer 2 runs only when the
/// settings require an API key: an enabled check with no stored key rejects every
/// caller, otherwise the raw `X-API-Key` bytes must match the stored key.
pub fn authenticate(
    identity: Option<&Identity>,
    api_key_header: Option<&[u8]>,
    settings: &Settings,
) -> Result<()> {
    if !identity.is_some_and(|id| id.has_capability(CAP_SEND_EMAIL)) {
        return Err(AppError::AuthForbidden(CAP_SEND_EMAIL.to_string()));
    }

    if !settings.require_api_key {
        return Ok(());
    }

    if settings.api_key.is_empty() {
        return Err(AppError::ApiKeyNotConfigured);
    }

    let provided = match api_key_header {
        Some(key) if !key.is_empty() => key,
        _ => return Err(AppError::MissingApiKey),
    };

    if !ct_eq(settings.api_key.as_bytes(), provided) {
        return Err(AppError::InvalidApiKey);
    }

    Ok(())
}

/// Capability gate for administrative routes.
pub fn require_capability(identity: Option<&Identity>, capability: &str) -> Result<()> {
    if identity.is_some_and(|id| id.has_capability(capability)) {
        Ok(())
    } else {
        Err(AppError::AuthForbidden(capability.to_string()))
    }
}
