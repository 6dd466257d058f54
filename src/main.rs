use anyhow::Context;
use creche::logging::{init_tracing, shutdown_tracer};
use creche::metrics::{init_metrics, metrics_app};
use creche::router::init_router;
use creche::state::init_app_state;
use dotenvy::dotenv;
use tracing::{error, info};

fn env_flag(name: &str, default: bool) -> bool {
    std::env::var(name)
        .map(|v| !matches!(v.trim().to_lowercase().as_str(), "false" | "0"))
        .unwrap_or(default)
}

fn env_port(name: &str, default: u16) -> u16 {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    init_tracing();

    if let Some(handle) = init_metrics()? {
        let metrics_port = env_port("METRICS_PORT", 9090);
        let listener = tokio::net::TcpListener::bind(("0.0.0.0", metrics_port))
            .await
            .context("Failed to bind metrics port")?;
        info!(port = metrics_port, "Metrics exporter listening on /metrics");
        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, metrics_app(handle)).await {
                error!(error = %e, "Metrics server stopped");
            }
        });
    }

    let state = init_app_state().await?;
    if env_flag("RUN_MIGRATIONS", true) {
        creche_db::run_migrations(&state.db).await?;
    }

    let app = init_router(state);

    let port = env_port("PORT", 3000);
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port))
        .await
        .context("Failed to bind HTTP port")?;
    info!(port, "Server running");
    info!("Swagger UI available at /swagger-ui, Scalar at /scalar");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    shutdown_tracer().await;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
