use std::sync::Arc;

use casmgmt_core::ServicesManager;
use casmgmt_db::{fixtures, DbRegistry};
use casmgmt_server::{handlers, router, serve, AppState, Config};
use metrics_exporter_prometheus::PrometheusBuilder;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let recorder = PrometheusBuilder::new().build_recorder();
    let handle = recorder.handle();
    metrics::set_global_recorder(recorder).ok();

    let registry: Arc<dyn ServicesManager> = Arc::new(DbRegistry::new(&config.database_url)?);
    if let Some(path) = &config.services_file {
        fixtures::seed_from_file(registry.as_ref(), path)?;
    }

    let state = AppState::new(registry, config.default_service_url.clone()).with_metrics(handle);
    if let Some(created) = handlers::ensure_default_service(&state).await? {
        tracing::info!(id = created.id, "seeded default service");
    }

    let listener = std::net::TcpListener::bind(config.bind_addr)?;
    tracing::info!("listening on {}", config.bind_addr);

    if let Err(e) = serve(listener, router(state), shutdown_signal()).await {
        tracing::error!("server error: {}", e);
    }
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install signal handler: {}", e);
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

    tracing::info!("signal received, starting graceful shutdown");
}
