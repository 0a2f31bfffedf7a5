//! Persistence for Ascendance.
//!
//! The whole game is saved as a single versioned JSON blob under one key.
//! This crate owns the blob format (and revival of untrusted blobs) and the
//! stores the blob can live in.
//!
//! # Modules
//!
//! - [`blob`] -- Versioned encoding, decoding, and revival
//! - [`store`] -- [`SaveStore`] trait with file and in-memory backends
//! - [`error`] -- Shared error types

pub mod blob;
pub mod error;
pub mod store;

pub use blob::{SAVE_VERSION, decode, encode, revive};
pub use error::SaveError;
pub use store::{FileSaveStore, MemorySaveStore, SaveStore, load_state, save_state};
