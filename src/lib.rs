pub mod api;
pub mod auth;
pub mod config;
pub mod dispatch;
pub mod email_log;
pub mod error;
pub mod mail;
pub mod models;
pub mod pipeline;
pub mod rate_limit;
pub mod recipients;
pub mod sanitize;
pub mod security;
pub mod settings;
pub mod state;
pub mod store;
pub mod validation;

pub use config::Config;
pub use error::{AppError, Result};
pub use state::AppState;
