//! Bounded log of send attempts.

use std::sync::Arc;

use crate::error::Result;
use crate::models::LogEntry;
use crate::store::{KeyValueStore, EMAIL_LOG_KEY};

pub const MAX_LOG_ENTRIES: usize = 50;

#[derive(Clone)]
pub struct EmailLog {
    store: Arc<dyn KeyValueStore>,
}

impl EmailLog {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Entries in insertion order, oldest first.
    async fn load(&self) -> Result<Vec<LogEntry>> {
        match self.store.get(EMAIL_LOG_KEY).await? {
            Some(json) => Ok(serde_json::from_str(&json)?),
            None => Ok(Vec::new()),
        }
    }

    /// Append `entry`, evicting the oldest entries beyond the cap.
    pub async fn append(&self, entry: LogEntry) -> Result<()> {
        let mut entries = self.load().await?;
        entries.push(entry);

        if entries.len() > MAX_LOG_ENTRIES {
            let overflow = entries.len() - MAX_LOG_ENTRIES;
            entries.drain(..overflow);
        }

        let json = serde_json::to_string(&entries)?;
        self.store.set(EMAIL_LOG_KEY, &json, None).await
    }

    /// Entries for display, most recent first.
    pub async fn list(&self) -> Result<Vec<LogEntry>> {
        let mut entries = self.load().await?;
        entries.reverse();
        Ok(entries)
    }

    pub async fn clear(&self) -> Result<()> {
        self.store.delete(EMAIL_LOG_KEY).await?;
        tracing::info!("Email log cleared");
        Ok(())
    }
}
