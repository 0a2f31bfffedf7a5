//! Offline catch-up.
//!
//! When a saved game that was playing is loaded after more than
//! [`OFFLINE_THRESHOLD_SECONDS`], the time away is credited in one bulk step.
//! This is not a replay of the tick: it uses flat rates that ignore sliders,
//! crises and techs, and leaves population untouched. The gains are recorded
//! in [`GameState::offline_gains`] so the front-end can show them once.

use ascendance_types::{Era, GameState, GameStatus, OfflineGains};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use tracing::info;

use crate::clock::elapsed_seconds;

/// Default seconds that must be strictly exceeded before catch-up applies.
pub const OFFLINE_THRESHOLD_SECONDS: u64 = 10;

const OFFLINE_BIOMASS_RATE: Decimal = Decimal::TEN;
const OFFLINE_DNA_PER_CAPITA: Decimal = Decimal::from_parts(1, 0, 0, false, 2);
const OFFLINE_KNOWLEDGE_PER_CAPITA: Decimal = Decimal::from_parts(5, 0, 0, false, 2);

/// Credit the time between `state.last_save` and `now`.
///
/// Does nothing and returns `None` unless the game was playing and more than
/// `threshold_seconds` have passed. `last_save` itself is left alone; the
/// next tick refreshes it.
pub fn catch_up(
    state: &mut GameState,
    now: DateTime<Utc>,
    threshold_seconds: u64,
) -> Option<OfflineGains> {
    if state.status != GameStatus::Playing {
        return None;
    }
    let elapsed = elapsed_seconds(state.last_save, now);
    if elapsed <= Decimal::from(threshold_seconds) {
        return None;
    }

    let population = state.resources.population;
    let gains = match state.era {
        Era::Primordial => OfflineGains {
            biomass: OFFLINE_BIOMASS_RATE.saturating_mul(elapsed),
            dna: population
                .saturating_mul(OFFLINE_DNA_PER_CAPITA)
                .saturating_mul(elapsed),
            knowledge: Decimal::ZERO,
            elapsed_seconds: elapsed,
        },
        Era::Civilization => OfflineGains {
            biomass: OFFLINE_BIOMASS_RATE.saturating_mul(elapsed),
            dna: Decimal::ZERO,
            knowledge: population
                .saturating_mul(OFFLINE_KNOWLEDGE_PER_CAPITA)
                .saturating_mul(elapsed),
            elapsed_seconds: elapsed,
        },
    };

    let resources = &mut state.resources;
    resources.biomass = resources.biomass.saturating_add(gains.biomass);
    resources.dna = resources.dna.saturating_add(gains.dna);
    resources.knowledge = resources.knowledge.saturating_add(gains.knowledge);
    state.offline_gains = Some(gains.clone());

    info!(
        elapsed = %format_elapsed(elapsed),
        biomass = %gains.biomass,
        dna = %gains.dna,
        knowledge = %gains.knowledge,
        "Offline progress applied"
    );
    Some(gains)
}

/// Render a duration for the welcome-back summary: `42s`, `3m 7s` or `5h 12m`.
pub fn format_elapsed(seconds: Decimal) -> String {
    let total = seconds.trunc().to_u64().unwrap_or(0);
    if total < 60 {
        format!("{total}s")
    } else if total < 3600 {
        format!("{}m {}s", total / 60, total % 60)
    } else {
        format!("{}h {}m", total / 3600, (total % 3600) / 60)
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeDelta;
    use rust_decimal_macros::dec;

    use super::*;

    fn playing_since(last_save: DateTime<Utc>) -> GameState {
        let mut state = GameState::new(last_save);
        state.status = GameStatus::Playing;
        state
    }

    #[test]
    fn exactly_threshold_gains_nothing() {
        let start = DateTime::<Utc>::default();
        let mut state = playing_since(start);
        let before = state.clone();

        let gains = catch_up(&mut state, start + TimeDelta::seconds(10), 10);
        assert!(gains.is_none());
        assert_eq!(state, before);
    }

    #[test]
    fn just_over_threshold_counts() {
        let start = DateTime::<Utc>::default();
        let mut state = playing_since(start);

        let gains = catch_up(&mut state, start + TimeDelta::milliseconds(10_001), 10);
        assert_eq!(gains.map(|g| g.biomass), Some(dec!(100.01)));
    }

    #[test]
    fn era_one_flat_rates() {
        let start = DateTime::<Utc>::default();
        let mut state = playing_since(start);
        state.resources.population = dec!(200);

        let gains = catch_up(&mut state, start + TimeDelta::seconds(60), 10);
        assert_eq!(
            gains,
            Some(OfflineGains {
                biomass: dec!(600),
                dna: dec!(120),
                knowledge: dec!(0),
                elapsed_seconds: dec!(60),
            })
        );
        assert_eq!(state.resources.biomass, dec!(610));
        assert_eq!(state.resources.dna, dec!(120));
        assert_eq!(state.resources.population, dec!(200));
        assert!(state.offline_gains.is_some());
        assert_eq!(state.last_save, start);
    }

    #[test]
    fn era_two_flat_rates() {
        let start = DateTime::<Utc>::default();
        let mut state = playing_since(start);
        state.era = Era::Civilization;
        state.resources.population = dec!(40);

        let gains = catch_up(&mut state, start + TimeDelta::seconds(100), 10);
        assert_eq!(gains.as_ref().map(|g| g.knowledge), Some(dec!(200)));
        assert_eq!(gains.as_ref().map(|g| g.dna), Some(dec!(0)));
        assert_eq!(state.resources.biomass, dec!(1010));
    }

    #[test]
    fn paused_game_is_not_credited() {
        let start = DateTime::<Utc>::default();
        let mut state = playing_since(start);
        state.status = GameStatus::Paused;

        assert!(catch_up(&mut state, start + TimeDelta::hours(1), 10).is_none());
        assert!(state.offline_gains.is_none());
    }

    #[test]
    fn custom_threshold() {
        let start = DateTime::<Utc>::default();
        let mut state = playing_since(start);
        assert!(catch_up(&mut state, start + TimeDelta::seconds(20), 30).is_none());
        assert!(catch_up(&mut state, start + TimeDelta::seconds(31), 30).is_some());
    }

    #[test]
    fn elapsed_formatting() {
        assert_eq!(format_elapsed(dec!(42.9)), "42s");
        assert_eq!(format_elapsed(dec!(187)), "3m 7s");
        assert_eq!(format_elapsed(dec!(18720)), "5h 12m");
        assert_eq!(format_elapsed(dec!(0)), "0s");
    }
}
