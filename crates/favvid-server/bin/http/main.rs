mod cli;

use crate::cli::{StorageBackendArg, CLI, DEFAULT_LOG_FILTER};
use anyhow::Context;
use axum::Router;
use clap::Parser;
use favvid_server::{bootstrap, App, AppState};
use favvid_telemetry::TelemetryConfig;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = CLI::parse();

    let _telemetry = favvid_telemetry::init(
        TelemetryConfig::builder()
            .service_name("favvid")
            .default_filter(DEFAULT_LOG_FILTER)
            .format(config.log_format)
            .otlp_endpoint(config.otlp_endpoint.clone())
            .build(),
    )?;

    info!(
        listen_addr = %config.listen_addr,
        storage_backend = %config.storage,
        "starting favvid server"
    );

    let listener = TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.listen_addr))?;

    match config.storage {
        StorageBackendArg::JsonFile => {
            let app = bootstrap::json_file_router(&config.data_file).await;
            serve(listener, app).await?;
        }
        StorageBackendArg::Mysql => {
            let mysql_dsn = config
                .mysql_dsn
                .context("mysql dsn is required when storage backend is mysql")?;
            let repository = bootstrap::mysql_repository(&mysql_dsn)
                .await
                .context("failed to connect to database")?;

            let app = App::router(AppState::new(Arc::new(repository.clone())));
            let served = serve(listener, app).await;
            repository.close().await;
            served?;
        }
    }

    info!("favvid server stopped");
    Ok(())
}

async fn serve(listener: TcpListener, app: Router) -> std::io::Result<()> {
    info!(listen_addr = %listener.local_addr()?, "listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to listen for SIGTERM");
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

    info!("shutdown signal received");
}
