//! Name validation and shard resolution.
//!
//! Every location in the store is a pure function of the file name: no index is kept,
//! and the same name always resolves to the same path.

use crate::constants::{MAX_BASE_NAME_LEN, SHARD_KEY_LEN, TEMP_FILE_SUFFIX};
use crate::{FilesError, FilesResult};
use filestore_types::{FileName, StoragePath};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};

/// Returns `name` without its last extension.
///
/// Everything from the last `.` onwards is dropped; a name without a dot is returned
/// unchanged. Only one extension is stripped, so `archive.tar.gz` yields `archive.tar`.
pub fn base_name(name: &str) -> &str {
    match name.rfind('.') {
        Some(idx) => &name[..idx],
        None => name,
    }
}

/// Validates a name for storage.
///
/// The base name (see [`base_name`]) must be 1 to 64 characters drawn from
/// `[a-zA-Z0-9_-]`. The extension is not inspected.
///
/// # Errors
///
/// Returns [`FilesError::InvalidName`] carrying the full name if the base is rejected.
pub fn validate_name(name: &str) -> FilesResult<()> {
    let base = base_name(name);
    tracing::debug!("validating base name '{}'", base);

    let ok = (1..=MAX_BASE_NAME_LEN).contains(&base.len())
        && base
            .bytes()
            .all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'z' | b'A'..=b'Z' | b'_' | b'-'));

    if !ok {
        tracing::warn!("invalid file name '{}'", name);
        return Err(FilesError::InvalidName(name.to_owned()));
    }

    Ok(())
}

/// Computes the shard directory for `name`.
///
/// The shard is the first two lowercase hex characters of SHA-256 over the raw name
/// bytes, giving 256 possible shards.
pub fn shard_key(name: &str) -> String {
    let digest = Sha256::digest(name.as_bytes());
    let mut key = hex::encode(digest);
    key.truncate(SHARD_KEY_LEN);
    key
}

/// Maps file names to locations under a storage root.
#[derive(Debug, Clone)]
pub struct PathResolver {
    root: PathBuf,
}

impl PathResolver {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The storage root all paths are resolved against.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolves `name` to `<root>/<shard>/<name>`.
    ///
    /// # Errors
    ///
    /// Returns [`FilesError::InvalidInput`] if `name` is blank or is not a single path
    /// component.
    pub fn resolve(&self, name: &str) -> FilesResult<PathBuf> {
        let name = FileName::new(name)?;
        Ok(self.resolve_name(&name))
    }

    /// Resolves an already validated [`FileName`].
    pub fn resolve_name(&self, name: &FileName) -> PathBuf {
        let path = self.shard_dir(name).join(name);
        tracing::debug!("resolved '{}' to {}", name, path.display());
        path
    }

    /// Directory holding `name`'s shard.
    pub fn shard_dir(&self, name: &FileName) -> PathBuf {
        self.root.join(shard_key(name.as_str()))
    }

    /// Storage-relative path returned to callers after a write.
    pub fn storage_path(&self, name: &FileName) -> StoragePath {
        StoragePath::new(&self.root, &shard_key(name.as_str()), name)
    }

    /// Staging location for an update of `name`.
    ///
    /// Lives in the storage root rather than the shard so it never shows up in a shard
    /// listing.
    pub fn temp_path(&self, name: &FileName) -> PathBuf {
        self.root.join(format!("{}{}", name, TEMP_FILE_SUFFIX))
    }
}
