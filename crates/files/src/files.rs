//! Single-file storage operations.
//!
//! [`FilesService`] is bound to one storage root and implements the create, update,
//! retrieve and delete operations on the name-sharded layout described in the crate
//! docs.
//!
//! # Create vs. modify
//!
//! The two write paths follow different idempotency rules:
//!
//! - [`FilesService::save`] never overwrites. If a file with the same name is already
//!   stored, the incoming content is dropped and the existing location is returned.
//! - [`FilesService::update`] requires the file to exist and replaces its content in one
//!   visible step by staging the new bytes in `<root>/<name>.tmp` and renaming over the
//!   target.
//!
//! Neither path takes a lock. Concurrent writers to the same name race; the rename in
//! `update` only guarantees that readers of the final path never see a partial file.

use crate::paths::{validate_name, PathResolver};
use crate::{FilesError, FilesResult};
use filestore_types::{FileName, StoragePath};
use std::fs;
use std::io::{self, ErrorKind, Read};
use std::path::{Path, PathBuf};

/// Service for storing files under a sharded storage root
///
/// The service holds no state beyond the root location, so it is cheap to share behind
/// an `Arc` across request handlers.
#[derive(Debug, Clone)]
pub struct FilesService {
    resolver: PathResolver,
}

impl FilesService {
    /// Creates a new `FilesService` rooted at `root_directory`
    ///
    /// The root is used as given (not canonicalised) so that storage paths reported to
    /// callers keep the configured spelling.
    ///
    /// # Errors
    ///
    /// Returns [`FilesError::InvalidRootDirectory`] if the root does not exist or is not
    /// a directory.
    pub fn new(root_directory: &Path) -> FilesResult<Self> {
        if !root_directory.exists() {
            return Err(FilesError::InvalidRootDirectory(format!(
                "Directory does not exist: {}",
                root_directory.display()
            )));
        }

        if !root_directory.is_dir() {
            return Err(FilesError::InvalidRootDirectory(format!(
                "Path is not a directory: {}",
                root_directory.display()
            )));
        }

        Ok(Self {
            resolver: PathResolver::new(root_directory),
        })
    }

    /// Returns the storage root
    pub fn root_directory(&self) -> &Path {
        self.resolver.root()
    }

    /// Returns the resolver used to locate files
    pub fn resolver(&self) -> &PathResolver {
        &self.resolver
    }

    /// Stores `content` under `name` unless a file with that name already exists
    ///
    /// # Arguments
    ///
    /// * `name` - Original file name, used verbatim as the stored name
    /// * `content` - Byte stream to write; it is not inspected
    ///
    /// # Returns
    ///
    /// The storage-relative path of the file, whether it was written now or earlier.
    ///
    /// # Errors
    ///
    /// Returns `FilesError` if:
    /// - `name` is empty or not a single path component (`InvalidInput`)
    /// - the base name fails validation (`InvalidName`)
    /// - creating the shard directory or writing the file fails (`Io`)
    pub fn save<R: Read>(&self, name: &str, mut content: R) -> FilesResult<StoragePath> {
        tracing::info!("saving file '{}'", name);

        if name.is_empty() {
            return Err(FilesError::InvalidInput("File name cannot be empty".into()));
        }

        validate_name(name)?;
        let file_name = FileName::new(name)?;
        let target = self.resolver.resolve_name(&file_name);
        let storage_path = self.resolver.storage_path(&file_name);

        fs::create_dir_all(self.resolver.shard_dir(&file_name)).map_err(|e| {
            tracing::error!("failed to create shard directory for '{}': {}", name, e);
            FilesError::Io(e)
        })?;

        let mut file = match fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&target)
        {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                tracing::debug!(
                    "file already exists at {}, keeping stored content",
                    target.display()
                );
                return Ok(storage_path);
            }
            Err(e) => {
                tracing::error!("error creating file '{}': {}", name, e);
                return Err(FilesError::Io(e));
            }
        };

        // Only this call created the file, so only this call may remove it.
        if let Err(e) = copy_and_sync(&mut file, &mut content) {
            tracing::error!("error saving file '{}': {}", name, e);
            drop(file);
            let _ = fs::remove_file(&target);
            return Err(FilesError::Io(e));
        }

        tracing::info!("file stored at {}", target.display());
        Ok(storage_path)
    }

    /// Replaces the content of an existing file
    ///
    /// # Arguments
    ///
    /// * `name` - Name of the stored file to replace
    /// * `content` - New byte stream
    /// * `uploaded_name` - Name the new content arrived with, if any; when present and
    ///   non-empty it must equal `name`
    ///
    /// # Errors
    ///
    /// Returns `FilesError` if:
    /// - `uploaded_name` differs from `name` (`NameMismatch`)
    /// - the name fails validation (`InvalidName` / `InvalidInput`)
    /// - no file is stored under `name` (`NotFound`)
    /// - staging or renaming fails (`Io`); the staging file is removed and the stored
    ///   content is left untouched
    pub fn update<R: Read>(
        &self,
        name: &str,
        mut content: R,
        uploaded_name: Option<&str>,
    ) -> FilesResult<StoragePath> {
        tracing::info!("updating file '{}'", name);

        if let Some(uploaded) = uploaded_name.filter(|n| !n.is_empty()) {
            if uploaded != name {
                tracing::debug!(
                    "file name mismatch: expected '{}', but got '{}'",
                    name,
                    uploaded
                );
                return Err(FilesError::NameMismatch {
                    expected: name.to_owned(),
                    received: uploaded.to_owned(),
                });
            }
        }

        validate_name(name)?;
        let file_name = FileName::new(name)?;
        let target = self.resolver.resolve_name(&file_name);

        if !target.exists() {
            tracing::debug!("file not found {}", target.display());
            return Err(FilesError::NotFound(name.to_owned()));
        }

        let staging = self.resolver.temp_path(&file_name);
        let replaced =
            write_stream(&staging, &mut content).and_then(|()| fs::rename(&staging, &target));

        if let Err(e) = replaced {
            tracing::error!("error updating file '{}': {}", name, e);
            let _ = fs::remove_file(&staging);
            return Err(FilesError::Io(e));
        }

        tracing::info!("file updated at {}", target.display());
        Ok(self.resolver.storage_path(&file_name))
    }

    /// Locates a stored file without reading it
    ///
    /// # Returns
    ///
    /// The on-disk path of the file, for the caller to stream.
    ///
    /// # Errors
    ///
    /// Returns `FilesError` if:
    /// - `name` is blank or not a single path component (`InvalidInput`)
    /// - nothing is stored under `name`, or the path is not a regular file (`NotFound`)
    pub fn retrieve(&self, name: &str) -> FilesResult<PathBuf> {
        tracing::info!("retrieving file '{}'", name);
        let path = self.resolver.resolve(name)?;

        if !path.is_file() {
            tracing::debug!("file not found {}", path.display());
            return Err(FilesError::NotFound(name.to_owned()));
        }

        Ok(path)
    }

    /// Deletes a stored file
    ///
    /// The shard directory is kept even if it becomes empty.
    ///
    /// # Returns
    ///
    /// `true` if a file was removed, `false` if it disappeared between lookup and removal.
    ///
    /// # Errors
    ///
    /// Returns `FilesError` if:
    /// - the file cannot be retrieved (see [`Self::retrieve`])
    /// - the removal itself fails (`Io`)
    pub fn delete(&self, name: &str) -> FilesResult<bool> {
        tracing::info!("deleting file '{}'", name);
        let path = self.retrieve(name)?;

        match fs::remove_file(&path) {
            Ok(()) => {
                tracing::info!("file deleted {}", path.display());
                Ok(true)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => {
                tracing::error!("error deleting file '{}': {}", name, e);
                Err(FilesError::Io(e))
            }
        }
    }
}

/// Copies `content` into a freshly created (or truncated) file at `path`.
fn write_stream(path: &Path, content: &mut impl Read) -> io::Result<()> {
    let mut file = fs::File::create(path)?;
    copy_and_sync(&mut file, content)
}

fn copy_and_sync(file: &mut fs::File, content: &mut impl Read) -> io::Result<()> {
    io::copy(content, file)?;
    file.sync_all()
}
