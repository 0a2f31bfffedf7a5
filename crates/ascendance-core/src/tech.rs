//! The tech catalog and tech purchase.
//!
//! Each era has a fixed list of upgrades bought with that era's currency
//! (DNA in era 1, knowledge in era 2). A purchase is atomic and one-way:
//! either the balance covers the cost and the tech is not yet owned, in which
//! case the cost is deducted and the tech unlocked in one step, or nothing
//! changes at all.
//!
//! The mechanical effect of each tech lives in the tick (see [`crate::tick`]);
//! the catalog only carries what the player sees and pays.

use ascendance_types::{Currency, Era, GameState, LogKind, TechId};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tracing::info;

use crate::error::ActionError;
use crate::log;

/// Static definition of a purchasable upgrade.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TechUpgrade {
    /// Identifier.
    pub id: TechId,
    /// Display name.
    pub name: &'static str,
    /// Price in the era's currency.
    pub cost: u32,
    /// Era the tech is offered in.
    pub era: Era,
    /// One-line effect description.
    pub description: &'static str,
}

impl TechUpgrade {
    /// Price as a decimal.
    pub fn cost(&self) -> Decimal {
        Decimal::from(self.cost)
    }

    /// Currency the tech is priced in.
    pub const fn currency(&self) -> Currency {
        self.era.currency()
    }
}

// ---------------------------------------------------------------------------
// Era 1
// ---------------------------------------------------------------------------

static RNA_REPLICATION: TechUpgrade = TechUpgrade {
    id: TechId::RnaReplication,
    name: "RNA Replication",
    cost: 10,
    era: Era::Primordial,
    description: "Unlocks the ability to reproduce more efficiently. Boosts Growth Rate +10%.",
};

static CELL_WALL: TechUpgrade = TechUpgrade {
    id: TechId::CellWall,
    name: "Cell Wall",
    cost: 50,
    era: Era::Primordial,
    description: "Protects against environmental damage. Reduces Bio-Consumption by 20%.",
};

static CILIA: TechUpgrade = TechUpgrade {
    id: TechId::Cilia,
    name: "Cilia",
    cost: 150,
    era: Era::Primordial,
    description: "Movement allows for better scavenging. Increases passive Biomass gain.",
};

static MITOCHONDRIA: TechUpgrade = TechUpgrade {
    id: TechId::Mitochondria,
    name: "Mitochondria",
    cost: 500,
    era: Era::Primordial,
    description: "The powerhouse of the cell. Energy efficiency doubles.",
};

static MULTICELLULARITY: TechUpgrade = TechUpgrade {
    id: TechId::Multicellularity,
    name: "Multicellularity",
    cost: 2000,
    era: Era::Primordial,
    description: "Cells work together. Unlocks Era 2 Pre-requisites.",
};

// ---------------------------------------------------------------------------
// Era 2
// ---------------------------------------------------------------------------

static AGRICULTURE: TechUpgrade = TechUpgrade {
    id: TechId::Agriculture,
    name: "Agriculture",
    cost: 1000,
    era: Era::Civilization,
    description: "Shift from foraging to farming. Doubles Food (Biomass) production base.",
};

static WRITING: TechUpgrade = TechUpgrade {
    id: TechId::Writing,
    name: "Writing",
    cost: 2500,
    era: Era::Civilization,
    description: "Record keeping enhances knowledge transfer. +20% Knowledge generation.",
};

static MASONRY: TechUpgrade = TechUpgrade {
    id: TechId::Masonry,
    name: "Masonry",
    cost: 5000,
    era: Era::Civilization,
    description: "Stone structures allow verticality. +50 Territory Capacity.",
};

static BRONZE_WORKING: TechUpgrade = TechUpgrade {
    id: TechId::BronzeWorking,
    name: "Bronze Working",
    cost: 10000,
    era: Era::Civilization,
    description: "Better tools and weapons. +10% Territory Capacity (Expansion).",
};

/// Era 1 techs in display order.
pub static ERA_1_TECHS: [&TechUpgrade; 5] = [
    &RNA_REPLICATION,
    &CELL_WALL,
    &CILIA,
    &MITOCHONDRIA,
    &MULTICELLULARITY,
];

/// Era 2 techs in display order.
pub static ERA_2_TECHS: [&TechUpgrade; 4] = [&AGRICULTURE, &WRITING, &MASONRY, &BRONZE_WORKING];

/// Look up the static definition of a tech.
pub const fn tech(id: TechId) -> &'static TechUpgrade {
    match id {
        TechId::RnaReplication => &RNA_REPLICATION,
        TechId::CellWall => &CELL_WALL,
        TechId::Cilia => &CILIA,
        TechId::Mitochondria => &MITOCHONDRIA,
        TechId::Multicellularity => &MULTICELLULARITY,
        TechId::Agriculture => &AGRICULTURE,
        TechId::Writing => &WRITING,
        TechId::Masonry => &MASONRY,
        TechId::BronzeWorking => &BRONZE_WORKING,
    }
}

/// The techs offered in `era`.
pub const fn techs_for_era(era: Era) -> &'static [&'static TechUpgrade] {
    match era {
        Era::Primordial => &ERA_1_TECHS,
        Era::Civilization => &ERA_2_TECHS,
    }
}

/// Buy a tech.
///
/// Verifies the tech belongs to the current era, is not already owned, and
/// that the era's currency covers its cost; then deducts the cost and unlocks
/// the tech. On any error the state is left untouched.
pub fn purchase(
    state: &mut GameState,
    id: TechId,
    now: DateTime<Utc>,
) -> Result<&'static TechUpgrade, ActionError> {
    let upgrade = tech(id);

    if upgrade.era != state.era {
        return Err(ActionError::WrongEra {
            tech: id,
            tech_era: upgrade.era,
            current: state.era,
        });
    }
    if state.has_tech(id) {
        return Err(ActionError::AlreadyUnlocked(id));
    }

    let currency = upgrade.currency();
    let cost = upgrade.cost();
    let available = state.resources.balance(currency);
    if available < cost {
        return Err(ActionError::InsufficientFunds {
            tech: id,
            cost,
            currency,
            available,
        });
    }

    *state.resources.balance_mut(currency) = available.saturating_sub(cost);
    state.unlocked_techs.insert(id);

    let verb = match state.era {
        Era::Primordial => "Evolved",
        Era::Civilization => "Researched",
    };
    log::record(state, LogKind::Success, format!("{verb}: {}", upgrade.name), now);
    info!(tech = %id, %cost, %currency, "Tech unlocked");

    Ok(upgrade)
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    fn state_with_dna(dna: Decimal) -> GameState {
        let mut state = GameState::default();
        state.resources.dna = dna;
        state
    }

    #[test]
    fn catalog_covers_every_tech() {
        for id in TechId::ALL {
            assert_eq!(tech(id).id, id);
        }
        assert_eq!(techs_for_era(Era::Primordial).len(), 5);
        assert_eq!(techs_for_era(Era::Civilization).len(), 4);
        assert!(
            techs_for_era(Era::Civilization)
                .iter()
                .all(|t| t.currency() == Currency::Knowledge)
        );
    }

    #[test]
    fn catalog_costs() {
        assert_eq!(tech(TechId::RnaReplication).cost(), dec!(10));
        assert_eq!(tech(TechId::Multicellularity).cost(), dec!(2000));
        assert_eq!(tech(TechId::BronzeWorking).cost(), dec!(10000));
    }

    #[test]
    fn purchase_deducts_and_unlocks() {
        let mut state = state_with_dna(dec!(60));
        let result = purchase(&mut state, TechId::CellWall, Utc::now());
        assert!(result.is_ok());
        assert_eq!(state.resources.dna, dec!(10));
        assert!(state.has_tech(TechId::CellWall));
        assert_eq!(state.logs.first().map(|e| e.kind), Some(LogKind::Success));
    }

    #[test]
    fn exact_balance_is_enough() {
        let mut state = state_with_dna(dec!(10));
        assert!(purchase(&mut state, TechId::RnaReplication, Utc::now()).is_ok());
        assert_eq!(state.resources.dna, Decimal::ZERO);
    }

    #[test]
    fn already_unlocked_is_a_no_op() {
        let mut state = state_with_dna(dec!(100));
        assert!(purchase(&mut state, TechId::RnaReplication, Utc::now()).is_ok());
        let before = state.clone();

        let result = purchase(&mut state, TechId::RnaReplication, Utc::now());
        assert_eq!(result.err(), Some(ActionError::AlreadyUnlocked(TechId::RnaReplication)));
        assert_eq!(state, before);
    }

    #[test]
    fn insufficient_funds_is_a_no_op() {
        let mut state = state_with_dna(dec!(149.99));
        let before = state.clone();

        let result = purchase(&mut state, TechId::Cilia, Utc::now());
        assert!(matches!(result, Err(ActionError::InsufficientFunds { .. })));
        assert_eq!(state, before);
    }

    #[test]
    fn other_era_tech_is_rejected() {
        let mut state = state_with_dna(dec!(1_000_000));
        state.resources.knowledge = dec!(1_000_000);
        let before = state.clone();

        let result = purchase(&mut state, TechId::Agriculture, Utc::now());
        assert!(matches!(result, Err(ActionError::WrongEra { .. })));
        assert_eq!(state, before);
    }

    #[test]
    fn era_two_spends_knowledge() {
        let mut state = GameState::default();
        state.era = Era::Civilization;
        state.resources.dna = dec!(5000);
        state.resources.knowledge = dec!(2600);

        assert!(purchase(&mut state, TechId::Writing, Utc::now()).is_ok());
        assert_eq!(state.resources.knowledge, dec!(100));
        assert_eq!(state.resources.dna, dec!(5000));
    }
}
