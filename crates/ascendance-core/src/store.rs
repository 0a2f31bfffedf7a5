//! The game store: one owned [`GameState`] plus the actions the UI can take.
//!
//! Every action takes `&mut self` and runs to completion, so a single driver
//! serializes all mutations without locks. Timestamps come from the store's
//! [`Clock`].

use ascendance_types::{CrisisId, Era, GameState, GameStatus, LogKind, Slider, TechId};
use tracing::{debug, info};

use crate::clock::{Clock, SystemClock};
use crate::error::{ActionError, TickError};
use crate::tech::{self, TechUpgrade};
use crate::tick::{self, TickSummary};
use crate::{era, log, offline};

/// Owns the game state and exposes its mutations.
#[derive(Debug, Clone)]
pub struct GameStore<C = SystemClock> {
    state: GameState,
    clock: C,
}

impl GameStore<SystemClock> {
    /// A fresh game on the landing screen, timed by the system clock.
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl Default for GameStore<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> GameStore<C> {
    /// A fresh game timed by `clock`.
    pub fn with_clock(clock: C) -> Self {
        let state = GameState::new(clock.now());
        Self { state, clock }
    }

    /// Resume a persisted game, crediting time spent away if it was playing
    /// for longer than `threshold_seconds`.
    pub fn restore(state: GameState, clock: C, threshold_seconds: u64) -> Self {
        let mut store = Self { state, clock };
        let now = store.clock.now();
        let _ = offline::catch_up(&mut store.state, now, threshold_seconds);
        store
    }

    /// Read-only view of the state.
    pub const fn state(&self) -> &GameState {
        &self.state
    }

    /// Consume the store, returning the state.
    pub fn into_state(self) -> GameState {
        self.state
    }

    /// The store's clock.
    pub const fn clock(&self) -> &C {
        &self.clock
    }

    // -- Lifecycle ----------------------------------------------------------

    /// Leave the landing screen.
    pub fn initialize(&mut self) {
        self.log(LogKind::Info, "Simulation initialized. The primordial soup awaits.");
        self.state.status = GameStatus::Ready;
        info!("Game initialized");
    }

    /// Begin the simulation.
    pub fn start(&mut self) {
        self.log(LogKind::Success, "Evolutionary process started.");
        self.state.status = GameStatus::Playing;
        info!("Game started");
    }

    /// Halt ticking. Only a playing game can be paused.
    pub fn pause(&mut self) {
        if self.state.status == GameStatus::Playing {
            self.state.status = GameStatus::Paused;
            info!("Game paused");
        } else {
            debug!(status = ?self.state.status, "Pause ignored");
        }
    }

    /// Continue ticking. Only a paused game can be resumed.
    pub fn resume(&mut self) {
        if self.state.status == GameStatus::Paused {
            self.state.status = GameStatus::Playing;
            info!("Game resumed");
        } else {
            debug!(status = ?self.state.status, "Resume ignored");
        }
    }

    /// Throw the game away and return to the landing screen.
    pub fn reset(&mut self) {
        self.state = GameState::new(self.clock.now());
        info!("Game reset");
    }

    // -- Player actions ---------------------------------------------------

    /// Move a slider. Out-of-range values are clamped; returns the stored value.
    pub fn set_slider(&mut self, slider: Slider, value: i64) -> u8 {
        let stored = self.state.sliders.set(slider, value);
        debug!(slider = slider.as_str(), value = stored, "Slider set");
        stored
    }

    /// Buy a tech of the current era.
    pub fn buy_upgrade(&mut self, id: TechId) -> Result<&'static TechUpgrade, ActionError> {
        let now = self.clock.now();
        tech::purchase(&mut self.state, id, now)
    }

    /// Move to the next era.
    pub fn advance_era(&mut self) -> Result<Era, ActionError> {
        let now = self.clock.now();
        era::advance_era(&mut self.state, now)
    }

    /// Hide the notice for a crisis. The crisis itself stays active.
    pub fn dismiss_crisis(&mut self, crisis: CrisisId) {
        if !self.state.is_crisis_dismissed(crisis) {
            self.state.dismissed_crises.push(crisis);
        }
    }

    /// Acknowledge the offline-progress summary.
    pub const fn clear_offline_results(&mut self) {
        self.state.offline_gains = None;
    }

    /// Advance the simulation by `dt` seconds.
    pub fn tick(&mut self, dt: f64) -> Result<Option<TickSummary>, TickError> {
        let now = self.clock.now();
        tick::run_tick(&mut self.state, dt, now)
    }

    // -- Queries ----------------------------------------------------------

    /// The first active crisis whose notice has not been dismissed.
    pub fn current_alert(&self) -> Option<CrisisId> {
        self.state
            .active_crises
            .iter()
            .copied()
            .find(|crisis| !self.state.is_crisis_dismissed(*crisis))
    }

    /// Whether the era transition is available.
    pub fn can_advance_era(&self) -> bool {
        era::can_advance(&self.state)
    }

    /// Techs offered in the current era.
    pub const fn available_techs(&self) -> &'static [&'static TechUpgrade] {
        tech::techs_for_era(self.state.era)
    }

    fn log(&mut self, kind: LogKind, message: &str) {
        let now = self.clock.now();
        log::record(&mut self.state, kind, message, now);
    }
}
