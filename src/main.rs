use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use rest_mailer::api;
use rest_mailer::auth::AuthService;
use rest_mailer::config::Config;
use rest_mailer::mail::ResendMailer;
use rest_mailer::state::AppState;
use rest_mailer::store::{create_pool, KeyValueStore, MemoryStore, RedisStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rest_mailer=info,tower_http=info".into()),
        )
        .init();

    tracing::info!("Starting Rest Mailer...");

    // Load configuration
    let config = Config::from_env()?;
    tracing::info!(
        host = %config.server_host,
        port = %config.server_port,
        "Configuration loaded"
    );

    let store: Arc<dyn KeyValueStore> = match &config.redis_url {
        Some(url) => Arc::new(RedisStore::new(create_pool(url)?)),
        None => {
            tracing::warn!("REDIS_URL not set, using in-memory store (state is lost on restart)");
            Arc::new(MemoryStore::new())
        }
    };

    match store.health_check().await {
        Ok(true) => tracing::info!("Store connection established"),
        Ok(false) => tracing::warn!("Store health check returned false"),
        Err(e) => {
            tracing::error!(error = %e, "Failed to connect to store");
            // Continue anyway, might recover later
        }
    }

    let auth = AuthService::new(&config);
    let mailer = ResendMailer::new(&config)?;
    let state = AppState::new(auth, store, Arc::new(mailer));

    match state
        .settings
        .seed_if_missing(config.initial_settings.clone())
        .await
    {
        Ok(true) => tracing::info!("Initial settings stored"),
        Ok(false) => {
            if !config.initial_settings.is_empty() {
                tracing::info!("Settings already stored, ignoring MAILER_* bootstrap values");
            }
        }
        Err(e) => tracing::error!(error = %e, "Failed to seed settings"),
    }

    // Build router
    let app = Router::new()
        .merge(api::create_router(state))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http());

    // Start server
    let addr: SocketAddr = config.server_addr().parse()?;
    let listener = TcpListener::bind(addr).await?;

    tracing::info!(address = %addr, "Server listening");

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");

    Ok(())
}

/// Handle shutdown signals
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install signal handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, shutting down...");
        },
        _ = terminate => {
            tracing::info!("Received terminate signal, shutting down...");
        },
    }
}
