#![forbid(unsafe_code)]

use std::sync::Arc;

use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;
use vitrine_gate::AdmissionGate;
use vitrine_icns::{CommandPackager, IcnsPipeline};
use vitrine_server::{AppState, ServerConfig, app};

#[tokio::main]
async fn main() -> std::io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = ServerConfig::from_env();
    let state = AppState {
        gate: AdmissionGate::new(config.max_icns_jobs),
        pipeline: IcnsPipeline::new(Arc::new(CommandPackager::default())),
        static_root: config.static_root.clone(),
    };

    let listener = TcpListener::bind(("0.0.0.0", config.port)).await?;
    tracing::info!(
        port = config.port,
        max_icns_jobs = config.max_icns_jobs,
        root = %config.static_root.display(),
        "vitrine listening"
    );

    let cancel = CancellationToken::new();
    let shutdown = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("shutdown requested");
            shutdown.cancel();
        }
    });

    axum::serve(listener, app(state))
        .with_graceful_shutdown(async move { cancel.cancelled().await })
        .await
}
