pub mod email;
pub mod log;
pub mod settings;
pub mod user;

pub use email::{SendEmailRequest, SendEmailResponse};
pub use log::LogEntry;
pub use settings::{Settings, SettingsUpdate, DEFAULT_RATE_LIMIT_PER_MINUTE};
pub use user::{Claims, Identity};
