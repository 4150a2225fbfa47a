use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::{router, AppState};
use filestore_core::constants::{MAX_UPLOAD_BYTES_ENV, REST_ADDR_ENV, STORAGE_DIR_ENV};
use filestore_core::{initialise_storage, CoreConfig};

/// Main entry point for the file storage service
///
/// Resolves configuration once, prepares the storage root and serves the REST API.
///
/// # Environment Variables
/// - `FILESTORE_STORAGE_DIR`: Storage root (default: "data-storage")
/// - `FILESTORE_REST_ADDR`: REST server address (default: "0.0.0.0:3000")
/// - `FILESTORE_MAX_UPLOAD_BYTES`: Request body limit in bytes (default: 10 MiB)
/// - `RUST_LOG`: Extra tracing directives
///
/// # Returns
/// * `Ok(())` - If the server starts and shuts down cleanly
/// * `Err(anyhow::Error)` - If configuration, storage setup or binding fails
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("filestore=info".parse()?)
                .add_directive("api_rest=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cfg = CoreConfig::from_env_values(
        std::env::var(STORAGE_DIR_ENV).ok(),
        std::env::var(REST_ADDR_ENV).ok(),
        std::env::var(MAX_UPLOAD_BYTES_ENV).ok(),
    )?;

    let files = initialise_storage(&cfg)?;
    tracing::info!("++ Storage root at {}", cfg.storage_dir().display());
    tracing::info!("++ Starting file storage REST on {}", cfg.rest_addr());

    let app = router(AppState::new(files), cfg.max_upload_bytes());

    let listener = tokio::net::TcpListener::bind(cfg.rest_addr()).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
