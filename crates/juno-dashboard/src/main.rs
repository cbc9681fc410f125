use anyhow::{Context, Result};
use juno_dashboard::config::load_config;
use juno_dashboard::state::AppState;
use juno_sdk::{JunoBackend, JunoClient};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    tracing::info!("Starting Juno dashboard");

    // Load configuration
    let config_path =
        std::env::var("JUNO_CONFIG").unwrap_or_else(|_| "dashboard-config.yaml".to_string());

    tracing::info!("Loading config from: {}", config_path);
    let config = load_config(&config_path)?;

    let backend_settings = config
        .backend
        .resolve(|name| std::env::var(name).ok())
        .context("Invalid backend configuration")?;

    tracing::info!("Using Juno backend at {}", backend_settings.base_url);

    // One client for the whole process
    let client = JunoClient::new(
        &backend_settings.base_url,
        backend_settings.api_key.as_deref(),
        backend_settings.timeout,
    )
    .context("Failed to build Juno client")?;
    let backend: Arc<dyn JunoBackend> = Arc::new(client);

    if !config.session.secure {
        tracing::warn!("Session cookie is not marked Secure; use only over plain-HTTP development setups");
    }
    if !config.account_requests.is_empty() {
        tracing::info!(
            "Preloading {} pending account request(s)",
            config.account_requests.len()
        );
    }

    let listen = config.listen.clone();
    let state = AppState::new(backend, config);

    // Build router
    let app = juno_dashboard::web::build_router(state);

    // Start server with graceful shutdown
    let listener = tokio::net::TcpListener::bind(&listen)
        .await
        .with_context(|| format!("Failed to bind to {}", listen))?;

    tracing::info!("Dashboard listening on {}", listen);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, stopping...");
}
