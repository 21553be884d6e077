use anyhow::Context;
use axum::Router;
use axum::routing::get;
use axum_prometheus::PrometheusMetricLayer;
use linktabs_server::app::create_app;
use linktabs_server::config::AppConfig;
use linktabs_server::metrics::register_metrics;
use linktabs_server::secrets::SecretSources;
use linktabs_server::state::AppState;
use std::sync::Arc;
use tokio::signal;
use tokio::sync::watch;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!(
                    "{}=debug,tower_http=debug,axum::rejection=trace",
                    env!("CARGO_CRATE_NAME")
                )
                .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::parse()?;
    tracing::debug!(?config, "Loaded config");

    let secrets = SecretSources::from_config(&config.auth);
    let secret = secrets.resolve();
    if secret.is_none() {
        tracing::warn!(
            key = secrets.key(),
            "Admin password is not configured, admin login is disabled"
        );
    }

    let (prometheus_layer, metrics_handle) = PrometheusMetricLayer::pair();
    register_metrics();

    let (shutdown_tx, shutdown_rx) = watch::channel(());

    let app_state = Arc::new(AppState::new(config.clone(), secret)?);
    let app = create_app(app_state).layer(prometheus_layer);

    let metrics_app = Router::new().route(
        "/metrics",
        get(move || std::future::ready(metrics_handle.render())),
    );
    let metrics_listener = tokio::net::TcpListener::bind(&config.server.metrics_bind_addr)
        .await
        .context("Failed to bind metrics listener")?;
    tracing::info!(
        addr = %metrics_listener.local_addr()?,
        "Serving metrics"
    );
    let mut metrics_shutdown_rx = shutdown_rx.clone();
    let metrics_server = tokio::spawn(async move {
        axum::serve(metrics_listener, metrics_app)
            .with_graceful_shutdown(async move {
                metrics_shutdown_rx.changed().await.ok();
            })
            .await
    });

    let listener = tokio::net::TcpListener::bind(&config.server.bind_addr)
        .await
        .context("Failed to bind listener")?;
    tracing::info!(addr = %listener.local_addr()?, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown_tx))
        .await
        .context("Server error")?;

    metrics_server
        .await
        .context("Metrics server task panicked")?
        .context("Metrics server error")?;

    tracing::info!("Server shut down");
    Ok(())
}

async fn shutdown_signal(shutdown_tx: watch::Sender<()>) {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            tracing::error!(?err, "Failed to install CTRL+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(?err, "Failed to install terminate handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }

    tracing::info!("Shutdown signal received, terminating gracefully...");

    if shutdown_tx.send(()).is_err() {
        tracing::debug!("No shutdown receivers left");
    }
}
