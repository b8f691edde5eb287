use serde::{Deserialize, Serialize};

/// JSON body of `POST /api/v1/send-email`.
///
/// Every field is optional at the serde level so that absent required fields are
/// reported as `missing_field` rather than as a JSON decoding failure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SendEmailRequest {
    pub to: Option<String>,
    pub subject: Option<String>,
    pub message: Option<String>,
    pub from: Option<String>,
    #[serde(alias = "senderName")]
    pub sender_name: Option<String>,
    #[serde(alias = "replyTo")]
    pub reply_to: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendEmailResponse {
    pub status: String,
    pub message: String,
}

impl SendEmailResponse {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            status: "success".to_string(),
            message: message.into(),
        }
    }
}
