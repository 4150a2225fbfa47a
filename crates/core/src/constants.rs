//! Defaults used when configuration values are not supplied.

/// Storage root used when `FILESTORE_STORAGE_DIR` is unset.
pub const DEFAULT_STORAGE_DIR: &str = "data-storage";

/// REST bind address used when `FILESTORE_REST_ADDR` is unset.
pub const DEFAULT_REST_ADDR: &str = "0.0.0.0:3000";

/// Upload body limit used when `FILESTORE_MAX_UPLOAD_BYTES` is unset (10 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Page size applied to searches that do not specify one.
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Environment variable naming the storage root.
pub const STORAGE_DIR_ENV: &str = "FILESTORE_STORAGE_DIR";

/// Environment variable naming the REST bind address.
pub const REST_ADDR_ENV: &str = "FILESTORE_REST_ADDR";

/// Environment variable holding the upload body limit in bytes.
pub const MAX_UPLOAD_BYTES_ENV: &str = "FILESTORE_MAX_UPLOAD_BYTES";
