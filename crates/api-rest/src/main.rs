//! Standalone REST API server binary.
//!
//! ## Purpose
//! Runs the REST API server on its own.
//!
//! ## Intended use
//! Useful during development when you want the REST server (with OpenAPI/Swagger UI) without the
//! workspace's `pms-run` wrapper. Both binaries serve the same router.

use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::{router, AppState};
use pms_core::{activity_capacity_from_env_value, CoreConfig};

/// Main entry point for the patient management REST API server
///
/// # Environment Variables
/// - `PMS_REST_ADDR`: Server address (default: "0.0.0.0:5000")
/// - `PATIENT_DATA_DIR`: Snapshot directory (default: "patient_data"), created on first save
/// - `PMS_ACTIVITY_CAPACITY`: Activity log capacity (default: 100)
///
/// # Errors
/// Returns an error if:
/// - the logging/tracing configuration cannot be initialised,
/// - the configuration values are invalid,
/// - the server address cannot be bound, or
/// - the HTTP server fails while running.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("api_rest=info".parse()?)
                .add_directive("pms_core=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let addr = std::env::var("PMS_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:5000".into());

    let patient_data_dir = std::env::var("PATIENT_DATA_DIR")
        .unwrap_or_else(|_| pms_core::constants::DEFAULT_PATIENT_DATA_DIR.into());
    let activity_capacity =
        activity_capacity_from_env_value(std::env::var("PMS_ACTIVITY_CAPACITY").ok())?;
    let cfg = CoreConfig::new(PathBuf::from(patient_data_dir), activity_capacity)?;

    tracing::info!("-- Starting patient management REST API on {}", addr);
    tracing::info!("-- Snapshot file: {}", cfg.snapshot_path().display());

    let app = router(AppState::new(&cfg));

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
