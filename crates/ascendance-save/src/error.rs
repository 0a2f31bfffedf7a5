//! Error types for the save layer.

/// Errors that can occur while reading or writing a save.
#[derive(Debug, thiserror::Error)]
pub enum SaveError {
    /// Reading or writing the backing file failed.
    #[error("Save I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The blob is not valid JSON or does not match the game state shape.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The blob was written by an incompatible format version.
    #[error("Unsupported save version {found} (expected {expected})")]
    UnsupportedVersion {
        /// Version found in the blob.
        found: u32,
        /// Version this build reads.
        expected: u32,
    },

    /// The key cannot be used as a file name.
    #[error("Invalid save key: {0:?}")]
    InvalidKey(String),

    /// An in-memory store's lock was poisoned.
    #[error("Save store unavailable: {0}")]
    Unavailable(String),
}
