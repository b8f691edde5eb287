use serde::{Deserialize, Serialize};

/// JWT Claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    #[serde(default)]
    pub capabilities: Vec<String>,
    pub iat: i64,
    pub exp: i64,
}

/// Caller identity established by the hosting environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub subject: String,
    pub capabilities: Vec<String>,
}

impl Identity {
    pub fn new(subject: impl Into<String>, capabilities: &[&str]) -> Self {
        Self {
            subject: subject.into(),
            capabilities: capabilities.iter().map(|c| c.to_string()).collect(),
        }
    }

    pub fn has_capability(&self, capability: &str) -> bool {
        self.capabilities.iter().any(|c| c == capability)
    }
}

impl From<Claims> for Identity {
    fn from(claims: Claims) -> Self {
        Self {
            subject: claims.sub,
            capabilities: claims.capabilities,
        }
    }
}
