use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::{AppState, router};
use pms_core::{CoreConfig, activity_capacity_from_env_value, constants::DEFAULT_PATIENT_DATA_DIR};

/// Main entry point for the patient management service
///
/// Resolves configuration once, opens the manager over the saved snapshot and serves the REST
/// API until interrupted.
///
/// # Environment Variables
/// - `PMS_REST_ADDR`: REST server address (default: "0.0.0.0:5000")
/// - `PATIENT_DATA_DIR`: Directory for the patient snapshot (default: "patient_data")
/// - `PMS_ACTIVITY_CAPACITY`: Activity log capacity (default: 100)
///
/// # Returns
/// * `Ok(())` - If the server starts and shuts down cleanly
/// * `Err(anyhow::Error)` - If configuration, binding or serving fails
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("pms_run=info".parse()?)
                .add_directive("pms_core=info".parse()?)
                .add_directive("api_rest=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let rest_addr = std::env::var("PMS_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:5000".into());
    let patient_data_dir =
        std::env::var("PATIENT_DATA_DIR").unwrap_or_else(|_| DEFAULT_PATIENT_DATA_DIR.into());
    let activity_capacity =
        activity_capacity_from_env_value(std::env::var("PMS_ACTIVITY_CAPACITY").ok())?;
    let cfg = CoreConfig::new(PathBuf::from(patient_data_dir), activity_capacity)?;

    tracing::info!("++ Starting patient management REST on {}", rest_addr);
    tracing::info!("++ Snapshot file: {}", cfg.snapshot_path().display());

    let app = router(AppState::new(&cfg));

    let listener = tokio::net::TcpListener::bind(&rest_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("-- Patient management service stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
