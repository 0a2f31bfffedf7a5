//! Core state structs for the Ascendance simulation.
//!
//! [`GameState`] is the single owned value that every action and every tick
//! operates on. It serializes to the persisted save blob and, through
//! `ts-rs`, to the front-end's `TypeScript` types. Every resource quantity is
//! a [`Decimal`] and is written as a string so no precision is lost across
//! the wire.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use ts_rs::TS;

use crate::enums::{CrisisId, Currency, Era, GameStatus, LogKind, Slider, TechId};
use crate::ids::LogEntryId;

/// Maximum number of entries kept in the event log.
pub const LOG_CAPACITY: usize = 50;

/// Upper bound of every slider.
pub const SLIDER_MAX: u8 = 100;

// ---------------------------------------------------------------------------
// Sliders
// ---------------------------------------------------------------------------

/// The four player-set levers, each in `0..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(default)]
pub struct Sliders {
    /// Growth versus consumption.
    #[serde(deserialize_with = "clamped_slider")]
    pub metabolism: u8,
    /// Research output.
    #[serde(deserialize_with = "clamped_slider")]
    pub intellect: u8,
    /// Carrying capacity and territory.
    #[serde(deserialize_with = "clamped_slider")]
    pub aggression: u8,
    /// Resilience against crises.
    #[serde(deserialize_with = "clamped_slider")]
    pub adaptability: u8,
}

/// Any integer clamped into `0..=100`.
fn clamp_slider(value: i64) -> u8 {
    u8::try_from(value.clamp(0, i64::from(SLIDER_MAX))).unwrap_or(SLIDER_MAX)
}

/// Stored sliders are read as plain integers so an out-of-range value is
/// clamped instead of failing the whole state.
fn clamped_slider<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u8, D::Error> {
    i64::deserialize(deserializer).map(clamp_slider)
}

impl Default for Sliders {
    fn default() -> Self {
        Self {
            metabolism: 50,
            intellect: 50,
            aggression: 50,
            adaptability: 50,
        }
    }
}

impl Sliders {
    /// Read one slider.
    pub const fn get(&self, slider: Slider) -> u8 {
        match slider {
            Slider::Metabolism => self.metabolism,
            Slider::Intellect => self.intellect,
            Slider::Aggression => self.aggression,
            Slider::Adaptability => self.adaptability,
        }
    }

    /// Set one slider, clamping `value` into `0..=100`. Returns the stored value.
    pub fn set(&mut self, slider: Slider, value: i64) -> u8 {
        let clamped = clamp_slider(value);
        match slider {
            Slider::Metabolism => self.metabolism = clamped,
            Slider::Intellect => self.intellect = clamped,
            Slider::Aggression => self.aggression = clamped,
            Slider::Adaptability => self.adaptability = clamped,
        }
        clamped
    }

    /// Clamp every slider into range. Used when reviving untrusted saves.
    pub fn clamp_all(&mut self) {
        self.metabolism = self.metabolism.min(SLIDER_MAX);
        self.intellect = self.intellect.min(SLIDER_MAX);
        self.aggression = self.aggression.min(SLIDER_MAX);
        self.adaptability = self.adaptability.min(SLIDER_MAX);
    }
}

// ---------------------------------------------------------------------------
// Resources
// ---------------------------------------------------------------------------

/// Scalar resource quantities. None of them is ever negative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(default)]
pub struct Resources {
    /// Number of organisms (era 1) or people (era 2).
    #[ts(as = "String")]
    pub population: Decimal,
    /// Biomass in era 1, food in era 2.
    #[ts(as = "String")]
    pub biomass: Decimal,
    /// Era 1 currency.
    #[ts(as = "String")]
    pub dna: Decimal,
    /// Era 2 currency.
    #[ts(as = "String")]
    pub knowledge: Decimal,
    /// Era 2 land capacity.
    #[ts(as = "String")]
    pub territory: Decimal,
}

impl Default for Resources {
    fn default() -> Self {
        Self {
            population: Decimal::ONE,
            biomass: Decimal::TEN,
            dna: Decimal::ZERO,
            knowledge: Decimal::ZERO,
            territory: Decimal::ONE_HUNDRED,
        }
    }
}

impl Resources {
    /// The balance held in the given currency.
    pub const fn balance(&self, currency: Currency) -> Decimal {
        match currency {
            Currency::Dna => self.dna,
            Currency::Knowledge => self.knowledge,
        }
    }

    /// Mutable access to the balance held in the given currency.
    pub const fn balance_mut(&mut self, currency: Currency) -> &mut Decimal {
        match currency {
            Currency::Dna => &mut self.dna,
            Currency::Knowledge => &mut self.knowledge,
        }
    }
}

// ---------------------------------------------------------------------------
// Event log
// ---------------------------------------------------------------------------

/// A single narrated event shown in the log panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct LogEntry {
    /// Unique entry identifier.
    pub id: LogEntryId,
    /// Human-readable message.
    pub message: String,
    /// When the entry was written.
    pub timestamp: DateTime<Utc>,
    /// Styling class.
    #[serde(rename = "type", default)]
    pub kind: LogKind,
}

// ---------------------------------------------------------------------------
// Offline progress
// ---------------------------------------------------------------------------

/// Summary of progress approximated while the game was closed.
///
/// Shown to the player once on load, then cleared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct OfflineGains {
    /// Biomass gained.
    #[ts(as = "String")]
    pub biomass: Decimal,
    /// DNA gained.
    #[ts(as = "String")]
    pub dna: Decimal,
    /// Knowledge gained.
    #[serde(default)]
    #[ts(as = "String")]
    pub knowledge: Decimal,
    /// Seconds the game was away.
    #[ts(as = "String")]
    pub elapsed_seconds: Decimal,
}

// ---------------------------------------------------------------------------
// Game state
// ---------------------------------------------------------------------------

/// The complete state of one game.
///
/// Fields missing from a persisted blob take their fresh-game defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(default)]
pub struct GameState {
    /// Current era.
    pub era: Era,
    /// Lifecycle status.
    pub status: GameStatus,
    /// Resource quantities.
    pub resources: Resources,
    /// Player-set sliders.
    pub sliders: Sliders,
    /// Techs bought so far. Purchases are never undone.
    pub unlocked_techs: BTreeSet<TechId>,
    /// Currently active crises in activation order, unique by id.
    pub active_crises: Vec<CrisisId>,
    /// Crises whose notice the player has dismissed.
    pub dismissed_crises: Vec<CrisisId>,
    /// Event log, newest first, at most [`LOG_CAPACITY`] entries.
    pub logs: Vec<LogEntry>,
    /// Time of the last tick (or of creation).
    pub last_save: DateTime<Utc>,
    /// Pending offline-progress summary, if any.
    pub offline_gains: Option<OfflineGains>,
}

impl GameState {
    /// A fresh game on the landing screen.
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            era: Era::Primordial,
            status: GameStatus::Landing,
            resources: Resources::default(),
            sliders: Sliders::default(),
            unlocked_techs: BTreeSet::new(),
            active_crises: Vec::new(),
            dismissed_crises: Vec::new(),
            logs: Vec::new(),
            last_save: now,
            offline_gains: None,
        }
    }

    /// Whether `tech` has been bought.
    pub fn has_tech(&self, tech: TechId) -> bool {
        self.unlocked_techs.contains(&tech)
    }

    /// Whether `crisis` is currently active.
    pub fn is_crisis_active(&self, crisis: CrisisId) -> bool {
        self.active_crises.contains(&crisis)
    }

    /// Whether the player has dismissed the notice for `crisis`.
    pub fn is_crisis_dismissed(&self, crisis: CrisisId) -> bool {
        self.dismissed_crises.contains(&crisis)
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(Utc::now())
    }
}
