use std::sync::Arc;

use crate::auth::AuthService;
use crate::dispatch::Dispatcher;
use crate::email_log::EmailLog;
use crate::mail::MailTransport;
use crate::pipeline::SendPipeline;
use crate::rate_limit::RateLimiter;
use crate::settings::SettingsStore;
use crate::store::KeyValueStore;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<AuthService>,
    pub store: Arc<dyn KeyValueStore>,
    pub settings: SettingsStore,
    pub email_log: EmailLog,
    pub pipeline: Arc<SendPipeline>,
}

impl AppState {
    pub fn new(
        auth: AuthService,
        store: Arc<dyn KeyValueStore>,
        transport: Arc<dyn MailTransport>,
    ) -> Self {
        let dispatcher = Dispatcher::new(
            transport,
            RateLimiter::new(store.clone()),
            EmailLog::new(store.clone()),
        );
        Self::with_dispatcher(auth, store, dispatcher)
    }

    /// Build state around a dispatcher that may carry interceptors or header mutators.
    pub fn with_dispatcher(
        auth: AuthService,
        store: Arc<dyn KeyValueStore>,
        dispatcher: Dispatcher,
    ) -> Self {
        let settings = SettingsStore::new(store.clone());
        let pipeline = SendPipeline::new(
            settings.clone(),
            RateLimiter::new(store.clone()),
            dispatcher,
        );

        Self {
            auth: Arc::new(auth),
            email_log: EmailLog::new(store.clone()),
            store,
            settings,
            pipeline: Arc::new(pipeline),
        }
    }
}
