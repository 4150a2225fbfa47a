//! Value types shared by the storage engine, the REST API and the CLI.
//!
//! - [`FileName`] is a caller-supplied file name that is safe to use as a single path
//!   component. It does not enforce the stored-file naming rules; those live in the
//!   storage crate because `retrieve` and `delete` accept any resolvable name.
//! - [`StoragePath`] is the forward-slash path string handed back to clients after a
//!   write.

use std::path::Path;

/// Errors that can occur when creating validated name types.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum NameError {
    /// The name was empty or contained only whitespace
    #[error("File name cannot be null or empty when resolving path")]
    Blank,

    /// The name would escape its shard directory
    #[error("File name must be a single path component: {0}")]
    NotSingleComponent(String),
}

/// A file name that resolves to exactly one entry inside a shard directory.
///
/// Unlike a trimmed text type, the original spelling is kept verbatim: the name is
/// hashed and written to disk exactly as received. Only blank names and names that
/// would traverse out of the shard (`/`, `\`, `.`, `..`) are refused.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FileName(String);

impl FileName {
    /// Validates `input` as a single path component.
    ///
    /// # Errors
    ///
    /// Returns [`NameError::Blank`] if `input` is empty after trimming, or
    /// [`NameError::NotSingleComponent`] if it contains a path separator or is `.`/`..`.
    pub fn new(input: impl AsRef<str>) -> Result<Self, NameError> {
        let raw = input.as_ref();
        if raw.trim().is_empty() {
            return Err(NameError::Blank);
        }

        if raw.contains(|c| c == '/' || c == '\\') || raw == "." || raw == ".." {
            return Err(NameError::NotSingleComponent(raw.to_owned()));
        }

        Ok(Self(raw.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for FileName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for FileName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl AsRef<Path> for FileName {
    fn as_ref(&self) -> &Path {
        Path::new(&self.0)
    }
}

/// Storage-relative location of a file: `<root>/<shard>/<name>`.
///
/// Always uses `/` separators regardless of host conventions, so the value can be
/// returned to clients unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct StoragePath(String);

impl StoragePath {
    /// Builds the path for `name` inside `shard` under the storage root `root`.
    pub fn new(root: &Path, shard: &str, name: &FileName) -> Self {
        let root = root.to_string_lossy().replace('\\', "/");
        let root = root.trim_end_matches('/');
        Self(format!("{}/{}/{}", root, shard, name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl std::fmt::Display for StoragePath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
