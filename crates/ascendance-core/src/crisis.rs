//! Crisis definitions and the crisis evaluator.
//!
//! Each [`CrisisId`] carries a typed trigger predicate, a solve predicate and
//! an effect through the [`CrisisRules`] extension trait. Every tick the
//! evaluator walks the crises of the current era against a snapshot of the
//! pre-tick state:
//!
//! - an inactive crisis whose trigger holds becomes active, its dismissal is
//!   forgotten and an alert is logged;
//! - an active crisis whose solve condition holds is removed.
//!
//! Removal is not permanent; a solved crisis re-triggers whenever its trigger
//! holds again.

use ascendance_types::{CrisisId, Era, GameState, LogKind};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tracing::info;

use crate::log;

const VOLCANIC_WINTER_POPULATION: Decimal = Decimal::from_parts(500, 0, 0, false, 0);
const VOLCANIC_WINTER_ADAPTABILITY: u8 = 30;
const FAMINE_POPULATION: Decimal = Decimal::TEN;
const FAMINE_RECOVERY_BIOMASS: Decimal = Decimal::ONE_HUNDRED;
const PLAGUE_TRIGGER_POPULATION: Decimal = Decimal::from_parts(5000, 0, 0, false, 0);
const PLAGUE_SOLVE_POPULATION: Decimal = Decimal::from_parts(2000, 0, 0, false, 0);
const PLAGUE_SOLVE_ADAPTABILITY: u8 = 80;

/// Multiplier adjustments a single active crisis imposes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CrisisEffect {
    /// Factor applied to environmental biomass inflow.
    pub biomass_multiplier: Option<Decimal>,
    /// Factor applied to the population growth rate. Negative means dying.
    pub growth_multiplier: Option<Decimal>,
}

/// The combined effect of every active crisis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Modifiers {
    /// Product of all biomass multipliers, `1` when none apply.
    pub biomass: Decimal,
    /// The most severe negative growth multiplier, if any crisis imposes one.
    pub growth_override: Option<Decimal>,
}

impl Default for Modifiers {
    fn default() -> Self {
        Self {
            biomass: Decimal::ONE,
            growth_override: None,
        }
    }
}

/// Typed rules for each crisis.
pub trait CrisisRules {
    /// Display name used in alerts.
    fn name(self) -> &'static str;

    /// Flavour text shown with the alert.
    fn description(self) -> &'static str;

    /// Whether the crisis should start.
    fn triggered_by(self, state: &GameState) -> bool;

    /// Whether an active crisis is over.
    fn solved_by(self, state: &GameState) -> bool;

    /// What the crisis does while active.
    fn effect(self) -> CrisisEffect;
}

impl CrisisRules for CrisisId {
    fn name(self) -> &'static str {
        match self {
            Self::VolcanicWinter => "Volcanic Winter",
            Self::Famine => "Great Famine",
            Self::Plague => "The Great Plague",
        }
    }

    fn description(self) -> &'static str {
        match self {
            Self::VolcanicWinter => {
                "A massive eruption has obscured the sun. Photosynthesis halts. Biomass \
                 production is halved. Survive by adapting or stockpiling food."
            }
            Self::Famine => {
                "The population has outgrown the ecosystem's carrying capacity. Starvation \
                 is imminent."
            }
            Self::Plague => "High population density has bred a deadly pathogen.",
        }
    }

    fn triggered_by(self, state: &GameState) -> bool {
        let resources = &state.resources;
        match self {
            Self::VolcanicWinter => {
                resources.population >= VOLCANIC_WINTER_POPULATION
                    && state.sliders.adaptability < VOLCANIC_WINTER_ADAPTABILITY
            }
            Self::Famine => {
                resources.biomass <= Decimal::ZERO && resources.population > FAMINE_POPULATION
            }
            Self::Plague => {
                state.era == Era::Civilization && resources.population > PLAGUE_TRIGGER_POPULATION
            }
        }
    }

    fn solved_by(self, state: &GameState) -> bool {
        let resources = &state.resources;
        match self {
            Self::VolcanicWinter => state.sliders.adaptability >= VOLCANIC_WINTER_ADAPTABILITY,
            Self::Famine => resources.biomass > FAMINE_RECOVERY_BIOMASS,
            Self::Plague => {
                resources.population < PLAGUE_SOLVE_POPULATION
                    || state.sliders.adaptability > PLAGUE_SOLVE_ADAPTABILITY
            }
        }
    }

    fn effect(self) -> CrisisEffect {
        match self {
            Self::VolcanicWinter => CrisisEffect {
                biomass_multiplier: Some(Decimal::new(5, 1)),
                growth_multiplier: None,
            },
            Self::Famine => CrisisEffect {
                biomass_multiplier: None,
                growth_multiplier: Some(Decimal::new(-5, 1)),
            },
            Self::Plague => CrisisEffect {
                biomass_multiplier: None,
                growth_multiplier: Some(Decimal::new(-8, 1)),
            },
        }
    }
}

/// Crises evaluated by the tick of `era`.
pub fn crises_for_era(era: Era) -> impl Iterator<Item = CrisisId> {
    CrisisId::ALL.into_iter().filter(move |crisis| crisis.era() == era)
}

/// What changed during one evaluation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrisisTransitions {
    /// Crises that started this tick.
    pub activated: Vec<CrisisId>,
    /// Crises that ended this tick.
    pub resolved: Vec<CrisisId>,
}

/// Evaluate the crises of the current era and update the active list.
///
/// All predicates see the state as it was when the call started.
pub fn evaluate(state: &mut GameState, now: DateTime<Utc>) -> CrisisTransitions {
    let mut transitions = CrisisTransitions::default();
    for crisis in crises_for_era(state.era) {
        if state.is_crisis_active(crisis) {
            if crisis.solved_by(state) {
                transitions.resolved.push(crisis);
            }
        } else if crisis.triggered_by(state) {
            transitions.activated.push(crisis);
        }
    }

    for crisis in &transitions.resolved {
        state.active_crises.retain(|active| active != crisis);
        info!(crisis = %crisis, "Crisis resolved");
    }
    for &crisis in &transitions.activated {
        state.active_crises.push(crisis);
        state.dismissed_crises.retain(|dismissed| *dismissed != crisis);
        log::record(state, LogKind::Alert, format!("CRISIS: {}", crisis.name()), now);
        info!(crisis = %crisis, "Crisis triggered");
    }

    transitions
}

/// Combine the effects of the given active crises.
///
/// Biomass multipliers compose by multiplication. Negative growth
/// multipliers do not compound; the most severe one wins, so two concurrent
/// die-offs never cancel into growth.
pub fn aggregate<'a>(active: impl IntoIterator<Item = &'a CrisisId>) -> Modifiers {
    let mut modifiers = Modifiers::default();
    for crisis in active {
        let effect = crisis.effect();
        if let Some(factor) = effect.biomass_multiplier {
            modifiers.biomass = modifiers.biomass.saturating_mul(factor);
        }
        if let Some(factor) = effect.growth_multiplier
            && factor < Decimal::ZERO
        {
            modifiers.growth_override = Some(
                modifiers
                    .growth_override
                    .map_or(factor, |current| current.min(factor)),
            );
        }
    }
    modifiers
}
