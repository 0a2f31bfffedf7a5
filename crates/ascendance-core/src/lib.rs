//! Simulation core for Ascendance.
//!
//! Everything that changes a [`GameState`](ascendance_types::GameState)
//! lives here. The per-frame tick, crisis evaluation, tech purchases, the
//! era transition, and offline catch-up are plain functions over
//! `&mut GameState`; [`GameStore`] wraps them into the action surface the
//! front-end and the engine binary drive.
//!
//! # Modules
//!
//! - [`tick`] -- Era 1 and era 2 resource formulas
//! - [`crisis`] -- Crisis rules, evaluator, and effect aggregation
//! - [`tech`] -- Tech catalog and purchase
//! - [`era`] -- Era 1 to era 2 transition
//! - [`offline`] -- Bulk catch-up for time spent away
//! - [`store`] -- [`GameStore`] actions and queries
//! - [`log`] -- Bounded in-game event log
//! - [`clock`] -- Injectable time source
//! - [`config`] -- YAML configuration
//! - [`display`] -- Number formatting for the UI
//! - [`error`] -- Error types

pub mod clock;
pub mod config;
pub mod crisis;
pub mod display;
pub mod era;
pub mod error;
pub mod log;
pub mod offline;
pub mod store;
pub mod tech;
pub mod tick;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{ConfigError, GameConfig};
pub use crisis::CrisisRules;
pub use error::{ActionError, TickError};
pub use store::GameStore;
pub use tech::TechUpgrade;
pub use tick::TickSummary;
