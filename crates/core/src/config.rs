//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into services.
//! Nothing in the request path reads environment variables; binaries collect the raw
//! values and hand them to [`CoreConfig::from_env_values`].

use crate::constants::{DEFAULT_MAX_UPLOAD_BYTES, DEFAULT_REST_ADDR, DEFAULT_STORAGE_DIR};
use crate::{CoreError, CoreResult};
use std::path::{Path, PathBuf};

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    storage_dir: PathBuf,
    rest_addr: String,
    max_upload_bytes: usize,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidConfig`] if the storage directory or address is blank,
    /// or if the upload limit is zero.
    pub fn new(
        storage_dir: PathBuf,
        rest_addr: String,
        max_upload_bytes: usize,
    ) -> CoreResult<Self> {
        if storage_dir.as_os_str().to_string_lossy().trim().is_empty() {
            return Err(CoreError::InvalidConfig(
                "storage directory cannot be empty".into(),
            ));
        }

        if rest_addr.trim().is_empty() {
            return Err(CoreError::InvalidConfig(
                "REST address cannot be empty".into(),
            ));
        }

        if max_upload_bytes == 0 {
            return Err(CoreError::InvalidConfig(
                "max upload size must be greater than zero".into(),
            ));
        }

        Ok(Self {
            storage_dir,
            rest_addr,
            max_upload_bytes,
        })
    }

    /// Build a config from optional raw values, falling back to defaults.
    ///
    /// Empty or whitespace-only values count as unset.
    pub fn from_env_values(
        storage_dir: Option<String>,
        rest_addr: Option<String>,
        max_upload_bytes: Option<String>,
    ) -> CoreResult<Self> {
        let storage_dir = non_blank(storage_dir)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STORAGE_DIR));
        let rest_addr = non_blank(rest_addr).unwrap_or_else(|| DEFAULT_REST_ADDR.into());
        let max_upload_bytes = max_upload_bytes_from_env_value(max_upload_bytes)?;

        Self::new(storage_dir, rest_addr, max_upload_bytes)
    }

    pub fn storage_dir(&self) -> &Path {
        &self.storage_dir
    }

    pub fn rest_addr(&self) -> &str {
        &self.rest_addr
    }

    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_bytes
    }
}

/// Parse the upload limit from an optional string value.
///
/// If `value` is `None` or empty/whitespace, returns the default limit.
pub fn max_upload_bytes_from_env_value(value: Option<String>) -> CoreResult<usize> {
    match non_blank(value) {
        None => Ok(DEFAULT_MAX_UPLOAD_BYTES),
        Some(v) => v.parse::<usize>().map_err(|e| {
            CoreError::InvalidConfig(format!("invalid max upload size '{}': {}", v, e))
        }),
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_unset() {
        let cfg = CoreConfig::from_env_values(None, None, None).unwrap();
        assert_eq!(cfg.storage_dir(), Path::new(DEFAULT_STORAGE_DIR));
        assert_eq!(cfg.rest_addr(), DEFAULT_REST_ADDR);
        assert_eq!(cfg.max_upload_bytes(), DEFAULT_MAX_UPLOAD_BYTES);
    }

    #[test]
    fn blank_values_fall_back_to_defaults() {
        let cfg =
            CoreConfig::from_env_values(Some("  ".into()), Some("".into()), Some(" ".into()))
                .unwrap();
        assert_eq!(cfg.storage_dir(), Path::new(DEFAULT_STORAGE_DIR));
        assert_eq!(cfg.rest_addr(), DEFAULT_REST_ADDR);
    }

    #[test]
    fn explicit_values_are_used() {
        let cfg = CoreConfig::from_env_values(
            Some("/srv/files".into()),
            Some("127.0.0.1:8080".into()),
            Some("2048".into()),
        )
        .unwrap();
        assert_eq!(cfg.storage_dir(), Path::new("/srv/files"));
        assert_eq!(cfg.rest_addr(), "127.0.0.1:8080");
        assert_eq!(cfg.max_upload_bytes(), 2048);
    }

    #[test]
    fn rejects_unparseable_upload_limit() {
        let result = CoreConfig::from_env_values(None, None, Some("ten megs".into()));
        assert!(matches!(result, Err(CoreError::InvalidConfig(_))));
    }

    #[test]
    fn rejects_zero_upload_limit() {
        let result = CoreConfig::from_env_values(None, None, Some("0".into()));
        assert!(matches!(result, Err(CoreError::InvalidConfig(_))));
    }

    #[test]
    fn new_rejects_blank_storage_dir() {
        let result = CoreConfig::new(PathBuf::new(), DEFAULT_REST_ADDR.into(), 1);
        assert!(matches!(result, Err(CoreError::InvalidConfig(_))));
    }
}
