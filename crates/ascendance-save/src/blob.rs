//! The persisted save blob.
//!
//! A save is one JSON document:
//!
//! ```json
//! { "version": 1, "state": { "era": "Primordial", "resources": { "population": "1.0997", ... }, ... } }
//! ```
//!
//! Resource quantities are written as decimal strings so nothing is lost to
//! floating point. On load the state is revived: values that a hand-edited
//! or older blob could get wrong are pulled back inside the game's
//! invariants before the store sees them.

use ascendance_types::{GameState, LOG_CAPACITY};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::SaveError;

/// Format version written by this build.
pub const SAVE_VERSION: u32 = 1;

#[derive(Serialize)]
struct BlobRef<'a> {
    version: u32,
    state: &'a GameState,
}

#[derive(Deserialize)]
struct Envelope {
    version: u32,
    state: serde_json::Value,
}

/// Serialize `state` into a versioned blob.
pub fn encode(state: &GameState) -> Result<String, SaveError> {
    let blob = BlobRef {
        version: SAVE_VERSION,
        state,
    };
    Ok(serde_json::to_string(&blob)?)
}

/// Parse a blob, check its version, and revive the state.
///
/// Fields missing from the stored state take their fresh-game defaults.
pub fn decode(blob: &str) -> Result<GameState, SaveError> {
    let envelope: Envelope = serde_json::from_str(blob)?;
    if envelope.version != SAVE_VERSION {
        return Err(SaveError::UnsupportedVersion {
            found: envelope.version,
            expected: SAVE_VERSION,
        });
    }
    let mut state: GameState = serde_json::from_value(envelope.state)?;
    revive(&mut state);
    Ok(state)
}

/// Restore invariants on a state read from storage.
///
/// Negative quantities become zero, population is raised to the era floor,
/// sliders are clamped, crisis lists are deduplicated and the log is cut to
/// capacity.
pub fn revive(state: &mut GameState) {
    let resources = &mut state.resources;
    for value in [
        &mut resources.population,
        &mut resources.biomass,
        &mut resources.dna,
        &mut resources.knowledge,
        &mut resources.territory,
    ] {
        *value = (*value).max(Decimal::ZERO);
    }
    resources.population = resources.population.max(state.era.population_floor());

    state.sliders.clamp_all();
    dedup_in_order(&mut state.active_crises);
    dedup_in_order(&mut state.dismissed_crises);
    state.logs.truncate(LOG_CAPACITY);
}

fn dedup_in_order<T: PartialEq + Copy>(items: &mut Vec<T>) {
    let mut seen = Vec::with_capacity(items.len());
    items.retain(|item| {
        if seen.contains(item) {
            false
        } else {
            seen.push(*item);
            true
        }
    });
}

#[cfg(test)]
mod tests {
    use ascendance_types::{CrisisId, Era, GameStatus, TechId};
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn decimals_are_written_as_strings() {
        let mut state = GameState::default();
        state.resources.dna = dec!(0.05);
        let json = encode(&state).ok();
        let value: Option<serde_json::Value> =
            json.as_deref().and_then(|s| serde_json::from_str(s).ok());

        let version = value.as_ref().and_then(|v| v.get("version")).cloned();
        assert_eq!(version, Some(serde_json::json!(1)));
        let dna = value
            .as_ref()
            .and_then(|v| v.pointer("/state/resources/dna"))
            .cloned();
        assert_eq!(dna, Some(serde_json::json!("0.05")));
    }

    #[test]
    fn encoded_state_decodes_unchanged() {
        let mut state = GameState::default();
        state.status = GameStatus::Playing;
        state.resources.population = dec!(123.4567890123456789);
        state.unlocked_techs.insert(TechId::Cilia);
        state.active_crises.push(CrisisId::Famine);

        let decoded = encode(&state).and_then(|blob| decode(&blob));
        assert_eq!(decoded.ok(), Some(state));
    }

    #[test]
    fn unknown_version_is_rejected() {
        let result = decode(r#"{"version": 7, "state": {}}"#);
        assert!(matches!(
            result,
            Err(SaveError::UnsupportedVersion { found: 7, expected: 1 })
        ));
    }

    #[test]
    fn garbage_is_a_serialization_error() {
        assert!(matches!(
            decode("not json"),
            Err(SaveError::Serialization(_))
        ));
    }

    #[test]
    fn sparse_state_takes_defaults() {
        let state = decode(r#"{"version": 1, "state": {"status": "paused"}}"#);
        assert!(state.is_ok());
        let state = state.ok().unwrap_or_default();
        assert_eq!(state.status, GameStatus::Paused);
        assert_eq!(state.resources.biomass, dec!(10));
    }

    #[test]
    fn revive_restores_invariants() {
        let blob = r#"{
            "version": 1,
            "state": {
                "era": "Civilization",
                "resources": {
                    "population": "3",
                    "biomass": "-12.5",
                    "dna": "-1",
                    "knowledge": "40",
                    "territory": "1000"
                },
                "sliders": { "metabolism": 250, "intellect": 50, "aggression": 101, "adaptability": 0 },
                "active_crises": ["plague", "plague"],
                "dismissed_crises": ["famine", "plague", "famine"]
            }
        }"#;
        let state = decode(blob);
        assert!(state.is_ok());
        let state = state.ok().unwrap_or_default();

        assert_eq!(state.era, Era::Civilization);
        assert_eq!(state.resources.population, dec!(10));
        assert_eq!(state.resources.biomass, Decimal::ZERO);
        assert_eq!(state.resources.dna, Decimal::ZERO);
        assert_eq!(state.resources.knowledge, dec!(40));
        assert_eq!(state.sliders.metabolism, 100);
        assert_eq!(state.sliders.aggression, 100);
        assert_eq!(state.active_crises, vec![CrisisId::Plague]);
        assert_eq!(
            state.dismissed_crises,
            vec![CrisisId::Famine, CrisisId::Plague]
        );
    }

    #[test]
    fn sliders_beyond_a_byte_still_load() {
        let state = decode(
            r#"{"version": 1, "state": {"status": "playing", "sliders": {"metabolism": 300, "adaptability": -40}}}"#,
        );
        assert!(state.is_ok());
        let state = state.ok().unwrap_or_default();
        assert_eq!(state.status, GameStatus::Playing);
        assert_eq!(state.sliders.metabolism, 100);
        assert_eq!(state.sliders.adaptability, 0);
        assert_eq!(state.sliders.intellect, 50);
    }
}
