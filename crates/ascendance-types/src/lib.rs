//! Shared type definitions for the Ascendance simulation.
//!
//! This crate is the single source of truth for the game's data model. The
//! same types are persisted in the save blob and flow downstream to
//! `TypeScript` via `ts-rs` for the browser front-end.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe UUID wrapper for log entries
//! - [`enums`] -- Eras, statuses, sliders, tech and crisis identifiers
//! - [`structs`] -- [`GameState`] and its parts

pub mod enums;
pub mod ids;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::{CrisisId, Currency, Era, GameStatus, LogKind, Slider, TechId};
pub use ids::LogEntryId;
pub use structs::{
    GameState, LOG_CAPACITY, LogEntry, OfflineGains, Resources, SLIDER_MAX, Sliders,
};

#[cfg(test)]
mod tests {
    //! `TypeScript` binding generation.

    #[test]
    fn export_bindings() {
        // ts-rs writes the bindings to `bindings/` relative to the crate
        // root when `export_all` runs.
        use ts_rs::TS;

        let _ = crate::ids::LogEntryId::export_all();

        let _ = crate::enums::Era::export_all();
        let _ = crate::enums::GameStatus::export_all();
        let _ = crate::enums::Slider::export_all();
        let _ = crate::enums::TechId::export_all();
        let _ = crate::enums::CrisisId::export_all();
        let _ = crate::enums::Currency::export_all();
        let _ = crate::enums::LogKind::export_all();

        let _ = crate::structs::Sliders::export_all();
        let _ = crate::structs::Resources::export_all();
        let _ = crate::structs::LogEntry::export_all();
        let _ = crate::structs::OfflineGains::export_all();
        let _ = crate::structs::GameState::export_all();
    }
}
