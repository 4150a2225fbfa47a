//! Layout constants for the sharded storage root.

/// Number of leading hex characters of the name hash used as the shard directory.
pub const SHARD_KEY_LEN: usize = 2;

/// Maximum length of a file's base name (the part before its last `.`).
pub const MAX_BASE_NAME_LEN: usize = 64;

/// Suffix of the staging file written in the storage root during an update.
pub const TEMP_FILE_SUFFIX: &str = ".tmp";
