//! Error types for the engine binary.
//!
//! [`EngineError`] is the top-level error type that wraps all possible
//! failure modes during engine startup.

/// Top-level error for the engine binary.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: ascendance_core::ConfigError,
    },

    /// Reading the existing save failed.
    #[error("save error: {source}")]
    Save {
        /// The underlying save error.
        #[from]
        source: ascendance_save::SaveError,
    },
}
