//! # Filestore Core
//!
//! Startup wiring shared by the REST server and the CLI:
//! - [`CoreConfig`], resolved once from raw environment values
//! - [`initialise_storage`], which prepares the storage root and hands back a
//!   ready [`FilesService`]
//!
//! **No API concerns**: HTTP routing and response envelopes belong in `api-rest` and
//! `api-shared`.

pub mod config;
pub mod constants;
mod error;

pub use config::CoreConfig;
pub use constants::{DEFAULT_PAGE_SIZE, DEFAULT_STORAGE_DIR};
pub use error::{CoreError, CoreResult};
pub use filestore_files::{FilesError, FilesService};

use std::fs;

/// Ensures the configured storage root exists and opens a [`FilesService`] on it.
///
/// The directory (and any missing parents) is created if absent. Callers should treat
/// an error here as fatal: no storage operation can succeed without the root.
///
/// # Errors
///
/// Returns [`CoreError::StorageInit`] if the directory cannot be created, or
/// [`CoreError::Files`] if the path exists but is not a usable directory.
pub fn initialise_storage(cfg: &CoreConfig) -> CoreResult<FilesService> {
    let root = cfg.storage_dir();

    if !root.exists() {
        fs::create_dir_all(root).map_err(|source| {
            tracing::error!("failed to create storage directory {}: {}", root.display(), source);
            CoreError::StorageInit {
                path: root.to_path_buf(),
                source,
            }
        })?;
        tracing::info!("storage directory initialised at {}", root.display());
    }

    Ok(FilesService::new(root)?)
}
