use tokio::signal;
use tracing::{error, info};

use crate::api;
use crate::config::Config;
use crate::db::Store;
use crate::services::{BootMode, Heartbeat, Startup, run_boot_hook};

pub async fn cmd_serve(config: Config) -> anyhow::Result<()> {
    info!("rosterd v{} starting...", env!("CARGO_PKG_VERSION"));

    let store = Store::with_pool_options(
        &config.general.database_path,
        config.general.max_db_connections,
        config.general.min_db_connections,
    )
    .await?;

    let startup = Startup::from_store(&store, &config);
    if let Some(report) = run_boot_hook(&startup, BootMode::from_config(&config.seed)).await {
        info!(
            "Boot seeding: {} created, {} unchanged, {} failed",
            report.created.len(),
            report.skipped.len(),
            report.failed.len()
        );
    }

    let mut heartbeat = Heartbeat::new(config.heartbeat.clone()).start().await?;

    let server_handle: Option<tokio::task::JoinHandle<()>> = if config.server.enabled {
        let port = config.server.port;
        let app = api::router(api::create_app_state(config.clone(), store.clone()));
        let addr = format!("0.0.0.0:{}", port);
        let listener = tokio::net::TcpListener::bind(&addr).await?;

        Some(tokio::spawn(async move {
            info!("🌐 Web Server running at http://0.0.0.0:{}", port);
            if let Err(e) = axum::serve(listener, app).await {
                error!("Web server error: {}", e);
            }
        }))
    } else {
        info!("Web server is disabled in config");
        None
    };

    info!("Host running. Press Ctrl+C to stop.");

    match signal::ctrl_c().await {
        Ok(()) => {
            info!("Shutdown signal received");
        }
        Err(e) => {
            error!("Error listening for shutdown: {}", e);
        }
    }

    if let Some(sched) = heartbeat.as_mut()
        && let Err(e) = sched.shutdown().await
    {
        error!("Failed to stop heartbeat: {}", e);
    }
    if let Some(handle) = server_handle {
        handle.abort();
    }
    info!("Host stopped");

    Ok(())
}
