#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("failed to create storage directory {path}: {source}", path = path.display())]
    StorageInit {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("storage error: {0}")]
    Files(#[from] filestore_files::FilesError),
}

pub type CoreResult<T> = std::result::Result<T, CoreError>;
