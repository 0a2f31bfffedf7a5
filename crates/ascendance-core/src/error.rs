//! Error types for the `ascendance-core` crate.
//!
//! Rejected player actions never change state. The front-end is free to
//! ignore the error (a rejected purchase is simply a no-op), but the reason is
//! kept typed so callers and tests can tell the cases apart.

use ascendance_types::{Currency, Era, TechId};
use rust_decimal::Decimal;

/// Why a player action was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ActionError {
    /// The tech is already in the unlocked set.
    #[error("tech {0} is already unlocked")]
    AlreadyUnlocked(TechId),

    /// The balance does not cover the tech's cost.
    #[error("cannot afford {tech}: costs {cost} {currency}, have {available}")]
    InsufficientFunds {
        /// The tech being bought.
        tech: TechId,
        /// Its price.
        cost: Decimal,
        /// The currency it is priced in.
        currency: Currency,
        /// What the player holds.
        available: Decimal,
    },

    /// The tech belongs to a different era than the current one.
    #[error("tech {tech} belongs to {tech_era}, current era is {current}")]
    WrongEra {
        /// The tech being bought.
        tech: TechId,
        /// The era the tech belongs to.
        tech_era: Era,
        /// The era the game is in.
        current: Era,
    },

    /// The era transition gate has not been met.
    #[error("population {population} is below the {required} needed to advance")]
    PopulationTooLow {
        /// Current population.
        population: Decimal,
        /// Population required.
        required: Decimal,
    },

    /// There is no era to advance to.
    #[error("{0} is the final era")]
    FinalEra(Era),
}

/// Errors that can occur during tick execution.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TickError {
    /// The elapsed time was negative, NaN, infinite, or too large to represent.
    #[error("invalid tick delta: {0} seconds")]
    InvalidDelta(f64),
}
