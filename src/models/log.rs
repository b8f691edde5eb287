use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One send attempt, as recorded in the email log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: DateTime<Utc>,
    /// Recipients joined with ", ".
    pub to: String,
    pub subject: String,
    pub success: bool,
}

impl LogEntry {
    pub fn new(recipients: &[String], subject: &str, success: bool) -> Self {
        Self {
            timestamp: Utc::now(),
            to: recipients.join(", "),
            subject: subject.to_string(),
            success,
        }
    }
}
