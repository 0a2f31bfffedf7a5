//! Per-frame simulation tick.
//!
//! [`run_tick`] advances a playing game by `dt` seconds. The era decides
//! which formulas apply:
//!
//! - **Era 1** evaluates the primordial crises, folds their effects into the
//!   growth and biomass rates, then updates biomass, DNA and population
//!   (logistic growth against a carrying capacity set by aggression).
//! - **Era 2** evaluates the civilization crises, then updates food,
//!   knowledge, territory and population (logistic growth against the land
//!   cap).
//!
//! Quantities accumulate at full decimal precision; truncation only happens
//! for display (see [`crate::display`]).

use ascendance_types::{CrisisId, Era, GameState, GameStatus, TechId};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use tracing::debug;

use crate::crisis;
use crate::error::TickError;

/// Slider midpoint; rates are expressed relative to a slider at 50.
const SLIDER_MIDPOINT: u32 = 50;

// --- Era 1 ---
const ERA1_BASE_GROWTH: Decimal = Decimal::from_parts(1, 0, 0, false, 1);
const ERA1_BASE_CONSUMPTION: Decimal = Decimal::from_parts(5, 0, 0, false, 2);
const ERA1_ENVIRONMENT_INFLOW: Decimal = Decimal::TEN;
const STARVATION_GROWTH: Decimal = Decimal::from_parts(5, 0, 0, true, 1);
const RNA_GROWTH_BONUS: Decimal = Decimal::from_parts(11, 0, 0, false, 1);
const CELL_WALL_CONSUMPTION: Decimal = Decimal::from_parts(8, 0, 0, false, 1);
const MITOCHONDRIA_EFFICIENCY: Decimal = Decimal::TWO;
const CILIA_PASSIVE_BIOMASS: Decimal = Decimal::from_parts(5, 0, 0, false, 1);
const DNA_INTELLECT_DIVISOR: u32 = 1000;
const ERA1_BASE_CAPACITY: u32 = 100;
const ERA1_CAPACITY_PER_AGGRESSION: u32 = 5;

// --- Era 2 ---
const FOOD_BASE: Decimal = Decimal::ONE_HUNDRED;
const AGRICULTURE_FOOD_BONUS: Decimal = Decimal::TWO;
const FOOD_PER_CAPITA: Decimal = Decimal::from_parts(1, 0, 0, false, 1);
const KNOWLEDGE_INTELLECT_DIVISOR: u32 = 500;
const WRITING_KNOWLEDGE_BONUS: Decimal = Decimal::from_parts(12, 0, 0, false, 1);
const ERA2_BASE_LAND: u32 = 1000;
const ERA2_LAND_PER_AGGRESSION: u32 = 10;
const BRONZE_WORKING_LAND_BONUS: Decimal = Decimal::from_parts(11, 0, 0, false, 1);
const MASONRY_LAND: Decimal = Decimal::from_parts(50, 0, 0, false, 0);
const ERA2_BASE_GROWTH: Decimal = Decimal::from_parts(5, 0, 0, false, 2);
const ERA2_FAMINE_GROWTH: Decimal = Decimal::from_parts(1, 0, 0, true, 1);
const ERA2_GROWTH_FOOD_THRESHOLD: Decimal = Decimal::TEN;

/// What happened during one tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickSummary {
    /// The era whose formulas ran.
    pub era: Era,
    /// Crises that started this tick.
    pub activated: Vec<CrisisId>,
    /// Crises that ended this tick.
    pub resolved: Vec<CrisisId>,
    /// Biomass (food) ran out this tick.
    pub starving: bool,
}

/// Advance the simulation by `dt` seconds.
///
/// Returns `Ok(None)` without touching the state unless the game is
/// playing. A negative, NaN or infinite `dt` is rejected.
pub fn run_tick(
    state: &mut GameState,
    dt: f64,
    now: DateTime<Utc>,
) -> Result<Option<TickSummary>, TickError> {
    let dt = seconds(dt)?;
    if state.status != GameStatus::Playing {
        return Ok(None);
    }

    let summary = match state.era {
        Era::Primordial => tick_primordial(state, dt, now),
        Era::Civilization => tick_civilization(state, dt, now),
    };
    state.last_save = now;

    debug!(
        era = state.era.number(),
        population = %state.resources.population,
        biomass = %state.resources.biomass,
        starving = summary.starving,
        "Tick complete"
    );
    Ok(Some(summary))
}

/// Convert a frame delta to a non-negative decimal.
///
/// Finite deltas beyond the decimal range saturate at [`Decimal::MAX`];
/// ones too small to represent count as zero.
fn seconds(dt: f64) -> Result<Decimal, TickError> {
    if !dt.is_finite() || dt < 0.0 {
        return Err(TickError::InvalidDelta(dt));
    }
    Ok(Decimal::from_f64(dt).unwrap_or(if dt < 1.0 {
        Decimal::ZERO
    } else {
        Decimal::MAX
    }))
}

fn tick_primordial(state: &mut GameState, dt: Decimal, now: DateTime<Utc>) -> TickSummary {
    let transitions = crisis::evaluate(state, now);
    let modifiers = crisis::aggregate(&state.active_crises);

    let sliders = state.sliders;
    let resources = &mut state.resources;
    let population = resources.population;
    let metabolism = ratio(sliders.metabolism, SLIDER_MIDPOINT);

    let base_growth = ERA1_BASE_GROWTH.saturating_mul(metabolism);
    let mut growth = modifiers
        .growth_override
        .map_or(base_growth, |factor| base_growth.saturating_mul(factor));

    let mut consumption = ERA1_BASE_CONSUMPTION.saturating_mul(metabolism);
    if state.unlocked_techs.contains(&TechId::Mitochondria) {
        consumption = consumption
            .checked_div(MITOCHONDRIA_EFFICIENCY)
            .unwrap_or(Decimal::ZERO);
    }
    if state.unlocked_techs.contains(&TechId::CellWall) {
        consumption = consumption.saturating_mul(CELL_WALL_CONSUMPTION);
    }
    if state.unlocked_techs.contains(&TechId::RnaReplication) {
        growth = growth.saturating_mul(RNA_GROWTH_BONUS);
    }
    let passive = if state.unlocked_techs.contains(&TechId::Cilia) {
        CILIA_PASSIVE_BIOMASS
    } else {
        Decimal::ZERO
    };

    let inflow = ERA1_ENVIRONMENT_INFLOW.saturating_mul(modifiers.biomass);
    let net_biomass = inflow
        .saturating_add(passive)
        .saturating_sub(population.saturating_mul(consumption));
    let mut biomass = resources.biomass.saturating_add(net_biomass.saturating_mul(dt));

    let starving = biomass <= Decimal::ZERO;
    if starving {
        biomass = Decimal::ZERO;
        growth = STARVATION_GROWTH;
    }

    let dna_rate = population.saturating_mul(ratio(sliders.intellect, DNA_INTELLECT_DIVISOR));
    let capacity = Decimal::from(
        ERA1_BASE_CAPACITY
            .saturating_add(u32::from(sliders.aggression).saturating_mul(ERA1_CAPACITY_PER_AGGRESSION)),
    );

    resources.biomass = biomass;
    resources.dna = resources.dna.saturating_add(dna_rate.saturating_mul(dt));
    resources.population = next_population(population, growth, capacity, dt)
        .max(Era::Primordial.population_floor());

    TickSummary {
        era: Era::Primordial,
        activated: transitions.activated,
        resolved: transitions.resolved,
        starving,
    }
}

fn tick_civilization(state: &mut GameState, dt: Decimal, now: DateTime<Utc>) -> TickSummary {
    // Era 2 crises are tracked and announced, but their effects do not feed
    // into the civilization formulas.
    let transitions = crisis::evaluate(state, now);

    let sliders = state.sliders;
    let has = |tech: TechId| state.unlocked_techs.contains(&tech);
    let population = state.resources.population;

    let mut food = FOOD_BASE;
    if has(TechId::Agriculture) {
        food = food.saturating_mul(AGRICULTURE_FOOD_BONUS);
    }
    let net_food = food.saturating_sub(population.saturating_mul(FOOD_PER_CAPITA));
    let biomass = state
        .resources
        .biomass
        .saturating_add(net_food.saturating_mul(dt))
        .max(Decimal::ZERO);

    let mut knowledge_rate =
        population.saturating_mul(ratio(sliders.intellect, KNOWLEDGE_INTELLECT_DIVISOR));
    if has(TechId::Writing) {
        knowledge_rate = knowledge_rate.saturating_mul(WRITING_KNOWLEDGE_BONUS);
    }

    let mut land_cap = Decimal::from(
        ERA2_BASE_LAND
            .saturating_add(u32::from(sliders.aggression).saturating_mul(ERA2_LAND_PER_AGGRESSION)),
    );
    if has(TechId::BronzeWorking) {
        land_cap = land_cap.saturating_mul(BRONZE_WORKING_LAND_BONUS);
    }
    if has(TechId::Masonry) {
        land_cap = land_cap.saturating_add(MASONRY_LAND);
    }

    let growth = if biomass > ERA2_GROWTH_FOOD_THRESHOLD {
        ERA2_BASE_GROWTH.saturating_mul(ratio(sliders.metabolism, SLIDER_MIDPOINT))
    } else {
        ERA2_FAMINE_GROWTH
    };

    let resources = &mut state.resources;
    resources.biomass = biomass;
    resources.knowledge = resources
        .knowledge
        .saturating_add(knowledge_rate.saturating_mul(dt));
    resources.territory = land_cap;
    resources.population = next_population(population, growth, land_cap, dt)
        .max(Era::Civilization.population_floor());

    TickSummary {
        era: Era::Civilization,
        activated: transitions.activated,
        resolved: transitions.resolved,
        starving: biomass.is_zero(),
    }
}

/// Logistic growth toward `capacity` when `growth` is positive, plain
/// exponential decay otherwise.
fn next_population(population: Decimal, growth: Decimal, capacity: Decimal, dt: Decimal) -> Decimal {
    let mut change = growth.saturating_mul(population);
    if growth > Decimal::ZERO {
        let crowding = population.checked_div(capacity).unwrap_or(Decimal::ONE);
        change = change.saturating_mul(Decimal::ONE.saturating_sub(crowding));
    }
    population.saturating_add(change.saturating_mul(dt))
}

/// `value / divisor` as a decimal.
fn ratio(value: u8, divisor: u32) -> Decimal {
    Decimal::from(value)
        .checked_div(Decimal::from(divisor))
        .unwrap_or(Decimal::ZERO)
}

#[cfg(test)]
mod tests {
    use ascendance_types::LogKind;
    use rust_decimal_macros::dec;

    use super::*;

    fn playing(era: Era) -> GameState {
        let mut state = GameState::default();
        state.status = GameStatus::Playing;
        state.era = era;
        if era == Era::Civilization {
            state.resources.population = dec!(10);
            state.resources.territory = dec!(1000);
        }
        state
    }

    #[allow(clippy::unwrap_used)]
    fn tick(state: &mut GameState, dt: f64) -> TickSummary {
        run_tick(state, dt, Utc::now()).unwrap().unwrap()
    }

    #[test]
    fn era_one_reference_frame() {
        let mut state = playing(Era::Primordial);
        let _ = tick(&mut state, 1.0);

        // inflow 10 - consumption 1 x 0.05
        assert_eq!(state.resources.biomass, dec!(19.95));
        // 1 x 50 / 1000
        assert_eq!(state.resources.dna, dec!(0.05));
        // 1 + 0.1 x 1 x (1 - 1/350)
        assert_eq!(state.resources.population.round_dp(10), dec!(1.0997142857));
    }

    #[test]
    fn not_playing_is_a_no_op() {
        for status in [GameStatus::Landing, GameStatus::Ready, GameStatus::Paused] {
            let mut state = GameState::default();
            state.status = status;
            let before = state.clone();
            assert_eq!(run_tick(&mut state, 1.0, Utc::now()), Ok(None));
            assert_eq!(state, before);
        }
    }

    #[test]
    fn invalid_delta_is_rejected() {
        let mut state = playing(Era::Primordial);
        assert!(run_tick(&mut state, -0.5, Utc::now()).is_err());
        assert!(run_tick(&mut state, f64::NAN, Utc::now()).is_err());
        assert!(run_tick(&mut state, f64::INFINITY, Utc::now()).is_err());
    }

    #[test]
    fn huge_delta_saturates_instead_of_failing() {
        for era in [Era::Primordial, Era::Civilization] {
            let mut state = playing(era);
            let summary = run_tick(&mut state, 1.0e40, Utc::now());
            assert!(matches!(summary, Ok(Some(_))));
            assert!(state.resources.biomass >= Decimal::ZERO);
            assert!(state.resources.population >= era.population_floor());
        }
    }

    #[test]
    fn zero_delta_changes_nothing_but_timestamp() {
        let mut state = playing(Era::Primordial);
        let before = state.resources.clone();
        let _ = tick(&mut state, 0.0);
        assert_eq!(state.resources, before);
    }

    #[test]
    fn starvation_clamps_biomass_and_shrinks_population() {
        let mut state = playing(Era::Primordial);
        state.resources.population = dec!(300);
        state.resources.biomass = dec!(1);
        state.sliders.metabolism = 100;

        let summary = tick(&mut state, 1.0);
        assert!(summary.starving);
        assert_eq!(state.resources.biomass, Decimal::ZERO);
        // 300 + (-0.5 x 300 x 1)
        assert_eq!(state.resources.population, dec!(150));
    }

    #[test]
    fn population_never_drops_below_floor() {
        let mut state = playing(Era::Primordial);
        state.resources.population = dec!(50);
        state.resources.biomass = Decimal::ZERO;
        state.sliders.metabolism = 100;
        let _ = tick(&mut state, 1000.0);
        assert_eq!(state.resources.population, Decimal::ONE);
        assert!(state.resources.biomass >= Decimal::ZERO);
    }

    #[test]
    fn techs_change_era_one_rates() {
        let mut state = playing(Era::Primordial);
        state.resources.population = dec!(100);
        state.unlocked_techs.insert(TechId::Mitochondria);
        state.unlocked_techs.insert(TechId::CellWall);
        state.unlocked_techs.insert(TechId::Cilia);

        let _ = tick(&mut state, 1.0);
        // consumption 0.05 / 2 x 0.8 = 0.02 per organism
        // 10 + 10 inflow + 0.5 cilia - 2 consumed
        assert_eq!(state.resources.biomass, dec!(18.5));
    }

    #[test]
    fn volcanic_winter_halves_inflow_in_same_tick() {
        let mut state = playing(Era::Primordial);
        state.resources.population = dec!(500);
        state.resources.biomass = dec!(1000);
        state.sliders.adaptability = 0;

        let summary = tick(&mut state, 1.0);
        assert_eq!(summary.activated, vec![CrisisId::VolcanicWinter]);
        // inflow 5 - 500 x 0.05
        assert_eq!(state.resources.biomass, dec!(980));
    }

    #[test]
    fn famine_forces_decline() {
        let mut state = playing(Era::Primordial);
        state.resources.population = dec!(100);
        state.resources.biomass = dec!(50);
        state.active_crises.push(CrisisId::Famine);

        let _ = tick(&mut state, 1.0);
        // growth 0.1 x -0.5 = -0.05
        assert_eq!(state.resources.population, dec!(95));
    }

    #[test]
    fn era_two_reference_frame() {
        let mut state = playing(Era::Civilization);
        state.resources.biomass = dec!(100);

        let _ = tick(&mut state, 1.0);
        // food 100 - 10 x 0.1
        assert_eq!(state.resources.biomass, dec!(199));
        // 10 x 50 / 500
        assert_eq!(state.resources.knowledge, dec!(1));
        assert_eq!(state.resources.territory, dec!(1500));
        // 10 + 0.05 x 10 x (1 - 10/1500)
        assert_eq!(state.resources.population.round_dp(10), dec!(10.4966666667));
    }

    #[test]
    fn era_two_land_cap_techs() {
        let mut state = playing(Era::Civilization);
        state.unlocked_techs.insert(TechId::BronzeWorking);
        state.unlocked_techs.insert(TechId::Masonry);
        let _ = tick(&mut state, 1.0);
        assert_eq!(state.resources.territory, dec!(1700));
    }

    #[test]
    fn era_two_population_floor() {
        let mut state = playing(Era::Civilization);
        state.resources.biomass = Decimal::ZERO;
        state.resources.population = dec!(2000);
        let summary = tick(&mut state, 100.0);
        assert!(summary.starving);
        assert_eq!(state.resources.population, dec!(10));
    }

    #[test]
    fn plague_is_tracked_without_effect() {
        let mut state = playing(Era::Civilization);
        state.resources.population = dec!(6000);
        state.resources.biomass = dec!(1_000_000);
        state.sliders.aggression = 100;

        let summary = tick(&mut state, 1.0);
        assert_eq!(summary.activated, vec![CrisisId::Plague]);
        // Plain logistic shrink toward the 2000 land cap: 0.05 x 6000 x (1 - 3)
        assert_eq!(state.resources.population, dec!(5400));
    }

    #[test]
    fn plague_outbreak_is_announced() {
        let mut state = playing(Era::Civilization);
        state.resources.population = dec!(6000);
        state.resources.biomass = dec!(1_000_000);

        let _ = tick(&mut state, 1.0);
        let newest = state.logs.first();
        assert_eq!(newest.map(|e| e.kind), Some(LogKind::Alert));
        assert_eq!(
            newest.map(|e| e.message.as_str()),
            Some("CRISIS: The Great Plague")
        );
    }
}
