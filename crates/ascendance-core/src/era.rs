//! The one-way transition from era 1 to era 2.

use ascendance_types::{Era, GameState, LogKind};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tracing::info;

use crate::error::ActionError;
use crate::log;

/// Population an era-1 species needs before it can advance.
pub const ERA_TRANSITION_POPULATION: Decimal = Decimal::ONE_HUNDRED;

/// Territory a fresh civilization starts with.
pub const ERA_TWO_STARTING_TERRITORY: Decimal = Decimal::ONE_THOUSAND;

const POPULATION_DIVISOR: Decimal = Decimal::ONE_HUNDRED;
const KNOWLEDGE_DIVISOR: Decimal = Decimal::TEN;

/// Whether [`advance_era`] would succeed.
pub fn can_advance(state: &GameState) -> bool {
    state.era == Era::Primordial && state.resources.population >= ERA_TRANSITION_POPULATION
}

/// Move from era 1 to era 2.
///
/// Knowledge is seeded with a tenth of the accumulated DNA, population is
/// divided by 100 (but kept at the era-2 floor), and territory restarts at
/// 1000. Era-1 crises are cleared since their evaluator never runs again.
pub fn advance_era(state: &mut GameState, now: DateTime<Utc>) -> Result<Era, ActionError> {
    if state.era != Era::Primordial {
        return Err(ActionError::FinalEra(state.era));
    }
    if state.resources.population < ERA_TRANSITION_POPULATION {
        return Err(ActionError::PopulationTooLow {
            population: state.resources.population,
            required: ERA_TRANSITION_POPULATION,
        });
    }

    let resources = &mut state.resources;
    resources.knowledge = resources
        .dna
        .checked_div(KNOWLEDGE_DIVISOR)
        .unwrap_or(Decimal::ZERO);
    resources.population = resources
        .population
        .checked_div(POPULATION_DIVISOR)
        .unwrap_or(Decimal::ZERO)
        .max(Era::Civilization.population_floor());
    resources.territory = ERA_TWO_STARTING_TERRITORY;

    state.era = Era::Civilization;
    state.active_crises.retain(|crisis| crisis.era() == Era::Civilization);
    state.dismissed_crises.retain(|crisis| crisis.era() == Era::Civilization);

    log::record(
        state,
        LogKind::Success,
        "The Dawn of Civilization. Your species has conquered the land.",
        now,
    );
    info!(
        population = %state.resources.population,
        knowledge = %state.resources.knowledge,
        "Advanced to {}",
        state.era
    );
    Ok(state.era)
}
