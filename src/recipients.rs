//! Recipient list parsing.

use std::collections::HashSet;

use crate::sanitize::{is_email, sanitize_email};

/// Validated, deduplicated recipient addresses in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipientSet {
    addresses: Vec<String>,
}

impl RecipientSet {
    /// Split `raw_to` on commas, keep each part that sanitizes to a valid address.
    ///
    /// Invalid parts are dropped silently. An empty result means no usable recipient.
    pub fn parse(raw_to: &str) -> Self {
        let mut seen = HashSet::new();
        let addresses = raw_to
            .split(',')
            .map(|part| sanitize_email(part.trim()))
            .filter(|email| is_email(email))
            .filter(|email| seen.insert(email.clone()))
            .collect();

        Self { addresses }
    }

    pub fn is_empty(&self) -> bool {
        self.addresses.is_empty()
    }

    pub fn len(&self) -> usize {
        self.addresses.len()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.addresses
    }

    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.addresses.iter()
    }

    pub fn joined(&self) -> String {
        self.addresses.join(", ")
    }
}
