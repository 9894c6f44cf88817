#![doc = include_str!("../README.md")]

mod server;

use clap::Parser;
use server::config::{CliArgs, ServerConfig};
use server::service::handler::{AppService, router};
use server::telemetry::init_telemetry;
use tokio::net::TcpListener;
use tokio::signal;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

// Using mimalloc for better performance under contention, especially in musl
// environments.
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load from .env
    let _ = dotenvy::dotenv();
    let args = CliArgs::parse();
    let config = ServerConfig::try_from(args)?;

    init_telemetry()?;

    let listener = TcpListener::bind(&config.server_addr).await?;
    log_startup_info(&config);

    let service = AppService::new(&config);
    let app = router(service.clone()).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods(Any)
                    .allow_headers(Any),
            ),
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(service))
        .await?;

    tracing::info!("Service shut down successfully");
    Ok(())
}

fn log_startup_info(config: &ServerConfig) {
    if cfg!(debug_assertions) {
        tracing::info!(
            "Starting request registry on {} with full config: {:#?}",
            config.server_addr,
            config
        );
    } else {
        tracing::info!(
            "Starting request registry on {} with {} workers",
            config.server_addr,
            config.num_workers
        );
    }
}

async fn shutdown_signal(service: AppService) {
    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    tokio::select! {
        () = ctrl_c => tracing::info!("Received Ctrl+C signal"),
        () = terminate => tracing::info!("Received SIGTERM signal"),
    }

    tracing::info!("Shutdown signal received, terminating gracefully...");

    if let Err(e) = service.shutdown().await {
        tracing::error!("Error during service shutdown: {e:?}");
    }
}
