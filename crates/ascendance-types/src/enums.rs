//! Enumeration types for the Ascendance simulation.
//!
//! Wire names are `snake_case` so that persisted saves and the generated
//! `TypeScript` bindings use the same identifiers the front-end always used
//! (`"rna_replication"`, `"volcanic_winter"`, ...).

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ---------------------------------------------------------------------------
// Eras
// ---------------------------------------------------------------------------

/// A stage of the species' development.
///
/// The game starts in [`Era::Primordial`] and can transition exactly once,
/// irreversibly, into [`Era::Civilization`].
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[ts(export, export_to = "bindings/")]
pub enum Era {
    /// Era 1: single cells in the primordial soup. Currency is DNA.
    #[default]
    Primordial,
    /// Era 2: settled civilization. Currency is knowledge.
    Civilization,
}

impl Era {
    /// The era's ordinal as shown to the player (1 or 2).
    pub const fn number(self) -> u8 {
        match self {
            Self::Primordial => 1,
            Self::Civilization => 2,
        }
    }

    /// Minimum population while the game is running in this era.
    pub const fn population_floor(self) -> Decimal {
        match self {
            Self::Primordial => Decimal::ONE,
            Self::Civilization => Decimal::TEN,
        }
    }

    /// The currency techs of this era are bought with.
    pub const fn currency(self) -> Currency {
        match self {
            Self::Primordial => Currency::Dna,
            Self::Civilization => Currency::Knowledge,
        }
    }
}

impl core::fmt::Display for Era {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Primordial => write!(f, "Era 1: Primordial"),
            Self::Civilization => write!(f, "Era 2: Civilization"),
        }
    }
}

// ---------------------------------------------------------------------------
// Game flow
// ---------------------------------------------------------------------------

/// Lifecycle status of a game session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    /// The landing screen; nothing has been initialized yet.
    #[default]
    Landing,
    /// Initialized and waiting for the player to start.
    Ready,
    /// The simulation advances every frame.
    Playing,
    /// The simulation is halted until resumed.
    Paused,
}

// ---------------------------------------------------------------------------
// Sliders
// ---------------------------------------------------------------------------

/// One of the four player-controlled levers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "snake_case")]
pub enum Slider {
    /// Growth versus consumption.
    Metabolism,
    /// Research output (DNA in era 1, knowledge in era 2).
    Intellect,
    /// Carrying capacity and territory.
    Aggression,
    /// Resilience against crises.
    Adaptability,
}

impl Slider {
    /// Every slider, in display order.
    pub const ALL: [Self; 4] = [
        Self::Metabolism,
        Self::Aggression,
        Self::Adaptability,
        Self::Intellect,
    ];

    /// The wire name of this slider.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Metabolism => "metabolism",
            Self::Intellect => "intellect",
            Self::Aggression => "aggression",
            Self::Adaptability => "adaptability",
        }
    }

    /// Look up a slider by its wire name (case-insensitive).
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|slider| slider.as_str().eq_ignore_ascii_case(name))
    }
}

// ---------------------------------------------------------------------------
// Techs
// ---------------------------------------------------------------------------

/// Identifier of a purchasable tech upgrade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "snake_case")]
pub enum TechId {
    // --- Era 1 ---
    /// Growth rate +10%.
    RnaReplication,
    /// Biomass consumption -20%.
    CellWall,
    /// Passive biomass +0.5/s.
    Cilia,
    /// Consumption efficiency x2.
    Mitochondria,
    /// Prerequisite flavour for the era transition; no mechanical effect.
    Multicellularity,

    // --- Era 2 ---
    /// Food base x2.
    Agriculture,
    /// Knowledge generation +20%.
    Writing,
    /// Territory capacity +50.
    Masonry,
    /// Territory capacity +10%.
    BronzeWorking,
}

impl TechId {
    /// Every tech, era 1 first.
    pub const ALL: [Self; 9] = [
        Self::RnaReplication,
        Self::CellWall,
        Self::Cilia,
        Self::Mitochondria,
        Self::Multicellularity,
        Self::Agriculture,
        Self::Writing,
        Self::Masonry,
        Self::BronzeWorking,
    ];

    /// The wire name of this tech.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::RnaReplication => "rna_replication",
            Self::CellWall => "cell_wall",
            Self::Cilia => "cilia",
            Self::Mitochondria => "mitochondria",
            Self::Multicellularity => "multicellularity",
            Self::Agriculture => "agriculture",
            Self::Writing => "writing",
            Self::Masonry => "masonry",
            Self::BronzeWorking => "bronze_working",
        }
    }

    /// Look up a tech by its wire name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|tech| tech.as_str() == name)
    }
}

impl core::fmt::Display for TechId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Crises
// ---------------------------------------------------------------------------

/// Identifier of a crisis definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "snake_case")]
pub enum CrisisId {
    /// Era 1: an eruption blots out the sun and halves biomass inflow.
    VolcanicWinter,
    /// Era 1: biomass ran out and the population is dying.
    Famine,
    /// Era 2: dense population breeds a pathogen.
    Plague,
}

impl CrisisId {
    /// Every crisis.
    pub const ALL: [Self; 3] = [Self::VolcanicWinter, Self::Famine, Self::Plague];

    /// The wire name of this crisis.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::VolcanicWinter => "volcanic_winter",
            Self::Famine => "famine",
            Self::Plague => "plague",
        }
    }

    /// Look up a crisis by its wire name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|crisis| crisis.as_str() == name)
    }

    /// The era whose tick evaluates this crisis.
    pub const fn era(self) -> Era {
        match self {
            Self::VolcanicWinter | Self::Famine => Era::Primordial,
            Self::Plague => Era::Civilization,
        }
    }
}

impl core::fmt::Display for CrisisId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Currency and logging
// ---------------------------------------------------------------------------

/// The resource spent when buying a tech.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "snake_case")]
pub enum Currency {
    /// Era 1 currency.
    Dna,
    /// Era 2 currency.
    Knowledge,
}

impl core::fmt::Display for Currency {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Dna => f.write_str("DNA"),
            Self::Knowledge => f.write_str("Knowledge"),
        }
    }
}

/// Severity/styling class of a log entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "snake_case")]
pub enum LogKind {
    /// Plain narration.
    #[default]
    Default,
    /// A crisis or other danger.
    Alert,
    /// A purchase, transition or other achievement.
    Success,
    /// Informational system message.
    Info,
}
