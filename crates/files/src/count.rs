//! Full recursive file count.

use crate::files::FilesService;
use crate::{FilesError, FilesResult};
use walkdir::WalkDir;

impl FilesService {
    /// Counts every regular file under the storage root, at any depth.
    ///
    /// Nothing is cached; each call walks the whole tree. Staging files from in-flight
    /// updates are regular files too and are included while they exist.
    ///
    /// # Errors
    ///
    /// Returns [`FilesError::Io`] if the root or any directory below it cannot be read.
    pub fn count_all(&self) -> FilesResult<u64> {
        tracing::info!("counting total stored files");

        let mut total = 0u64;
        for entry in WalkDir::new(self.root_directory()) {
            let entry = entry.map_err(|e| {
                tracing::error!("error accessing storage directory: {}", e);
                FilesError::Io(e.into())
            })?;
            if entry.file_type().is_file() {
                total += 1;
            }
        }

        tracing::info!("total files counted={}", total);
        Ok(total)
    }
}
