//! Sharded File Storage
//!
//! This crate owns a single storage root and everything written beneath it. Files are
//! addressed by their *name*, not their content: the SHA-256 digest of the name picks a
//! shard directory, and the file is stored under its original name inside that shard.
//!
//! ## Storage Layout
//!
//! ```text
//! <storage_root>/
//! ├── 0c/
//! │   └── a1.txt        # sha256("a1.txt") starts with 0c
//! ├── 7b/
//! │   └── b2.txt
//! └── report.pdf.tmp    # transient, only while an update is in flight
//! ```
//!
//! Shard directories are created lazily on first write and are never removed.
//!
//! ## Operations
//!
//! - [`PathResolver`] validates names and maps them to shard locations.
//! - [`FilesService`] saves, updates, retrieves and deletes single files.
//! - [`FilesService::list_matching`] pages through every stored name that fully matches
//!   a regular expression.
//! - [`FilesService::count_all`] counts every regular file under the root.
//!
//! ## Example Usage
//!
//! ```no_run
//! use filestore_files::FilesService;
//! use std::path::Path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let service = FilesService::new(Path::new("data-storage"))?;
//! let stored = service.save("notes.txt", &b"hello"[..])?;
//! println!("stored at {}", stored);
//!
//! let page = service.list_matching(r"notes\..*", 0, 10)?;
//! assert_eq!(page.total_matching, 1);
//! # Ok(())
//! # }
//! ```

mod constants;
mod count;
mod files;
mod listing;
mod paths;

pub use constants::{MAX_BASE_NAME_LEN, SHARD_KEY_LEN, TEMP_FILE_SUFFIX};
pub use files::FilesService;
pub use filestore_types::{FileName, StoragePath};
pub use listing::{FileDescriptor, ListingPage};
pub use paths::{base_name, shard_key, validate_name, PathResolver};

/// Errors that can occur during file operations
#[derive(Debug, thiserror::Error)]
pub enum FilesError {
    /// Base name does not satisfy the stored-file naming rules
    #[error("Invalid file name: {0}")]
    InvalidName(String),

    /// Missing or unusable input (for example an empty file name)
    #[error("{0}")]
    InvalidInput(String),

    /// The uploaded file's own name differs from the name being updated
    #[error("File name mismatch: expected '{expected}', but received '{received}'.")]
    NameMismatch { expected: String, received: String },

    /// No regular file exists for the given name
    #[error("File not found: {0}")]
    NotFound(String),

    /// The listing pattern does not compile
    #[error("Invalid regex pattern: {pattern}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// Storage root does not exist or is not a directory
    #[error("Invalid root directory: {0}")]
    InvalidRootDirectory(String),

    /// I/O error occurred
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<filestore_types::NameError> for FilesError {
    fn from(err: filestore_types::NameError) -> Self {
        FilesError::InvalidInput(err.to_string())
    }
}

/// Result type for storage operations.
pub type FilesResult<T> = Result<T, FilesError>;
