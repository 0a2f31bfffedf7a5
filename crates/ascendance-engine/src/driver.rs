//! The frame driver.
//!
//! A single task owns the [`GameStore`] and multiplexes three inputs:
//!
//! 1. a frame deadline, each expiry ticks the store by the measured time
//!    since the previous frame and schedules the next deadline;
//! 2. console lines, parsed into [`Command`]s and applied between frames;
//! 3. a shutdown signal.
//!
//! Every state change is written to the save store right away. Save failures
//! are logged and never stop the game.

use std::future::Future;
use std::time::Duration;

use ascendance_core::clock::{Clock, SystemClock};
use ascendance_core::{CrisisRules, GameStore, TickSummary};
use ascendance_save::{SaveStore, save_state};
use ascendance_types::GameStatus;
use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::console::{self, Command, HELP};

/// Whether the loop should keep going after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Keep running.
    Continue,
    /// Save and stop.
    Quit,
}

/// Owns the game and its save slot.
#[derive(Debug)]
pub struct Driver<S, C = SystemClock> {
    store: GameStore<C>,
    saves: S,
    key: String,
}

impl<S: SaveStore, C: Clock> Driver<S, C> {
    /// Drive `store`, persisting it to `saves` under `key`.
    pub fn new(store: GameStore<C>, saves: S, key: impl Into<String>) -> Self {
        Self {
            store,
            saves,
            key: key.into(),
        }
    }

    /// The game being driven.
    pub const fn store(&self) -> &GameStore<C> {
        &self.store
    }

    /// The save store.
    #[cfg(test)]
    pub const fn saves(&self) -> &S {
        &self.saves
    }

    /// Advance one frame of `dt` seconds.
    pub fn frame(&mut self, dt: f64) -> Option<TickSummary> {
        match self.store.tick(dt) {
            Ok(Some(summary)) => {
                for crisis in &summary.activated {
                    println!("CRISIS: {} -- {}", crisis.name(), crisis.description());
                }
                for crisis in &summary.resolved {
                    println!("Crisis over: {}", crisis.name());
                }
                self.persist();
                Some(summary)
            }
            Ok(None) => None,
            Err(e) => {
                warn!(error = %e, "Frame skipped");
                None
            }
        }
    }

    /// Apply one console command.
    pub fn apply(&mut self, command: Command) -> Flow {
        debug!(?command, "Console command");
        match command {
            Command::Start => {
                if self.store.state().status == GameStatus::Landing {
                    self.store.initialize();
                }
                self.store.start();
            }
            Command::Pause => self.store.pause(),
            Command::Resume => self.store.resume(),
            Command::Reset => {
                self.store.reset();
                if let Err(e) = self.saves.remove(&self.key) {
                    warn!(error = %e, key = %self.key, "Failed to remove save");
                }
                println!("The simulation has been wiped.");
                return Flow::Continue;
            }
            Command::Evolve => match self.store.advance_era() {
                Ok(era) => println!("Welcome to {era}."),
                Err(e) => println!("{e}"),
            },
            Command::Slider(slider, value) => {
                let stored = self.store.set_slider(slider, value);
                println!("{} = {stored}", slider.as_str());
            }
            Command::Buy(tech) => match self.store.buy_upgrade(tech) {
                Ok(upgrade) => println!("Unlocked {}.", upgrade.name),
                Err(e) => println!("{e}"),
            },
            Command::Dismiss(crisis) => self.store.dismiss_crisis(crisis),
            Command::Ack => self.store.clear_offline_results(),
            Command::Status => {
                print!("{}", console::status_report(&self.store));
                return Flow::Continue;
            }
            Command::Help => {
                println!("{HELP}");
                return Flow::Continue;
            }
            Command::Quit => return Flow::Quit,
        }
        self.persist();
        Flow::Continue
    }

    /// Write the current state to the save store.
    pub fn persist(&self) {
        if let Err(e) = save_state(&self.saves, &self.key, self.store.state()) {
            warn!(error = %e, key = %self.key, "Autosave failed");
        }
    }
}

/// Run frames every `frame_interval` until `quit` is typed or `shutdown`
/// completes, then save once more and hand the driver back.
pub async fn run<S, C>(
    mut driver: Driver<S, C>,
    frame_interval: Duration,
    mut commands: mpsc::Receiver<String>,
    shutdown: impl Future<Output = ()>,
) -> Driver<S, C>
where
    S: SaveStore,
    C: Clock,
{
    let mut last_frame = Instant::now();
    let mut next_frame = next_deadline(last_frame, frame_interval);
    let mut input_open = true;
    tokio::pin!(shutdown);

    info!(
        frame_interval_ms = frame_interval.as_millis(),
        "Entering frame loop"
    );

    loop {
        tokio::select! {
            () = tokio::time::sleep_until(next_frame) => {
                let now = Instant::now();
                let dt = now.duration_since(last_frame).as_secs_f64();
                last_frame = now;
                next_frame = next_deadline(now, frame_interval);
                let _ = driver.frame(dt);
            }
            line = commands.recv(), if input_open => {
                let Some(line) = line else {
                    debug!("Console input closed");
                    input_open = false;
                    continue;
                };
                match console::parse_command(&line) {
                    Ok(Some(command)) => {
                        if driver.apply(command) == Flow::Quit {
                            break;
                        }
                    }
                    Ok(None) => {}
                    Err(e) => println!("{e}"),
                }
            }
            () = &mut shutdown => {
                info!("Shutdown requested");
                break;
            }
        }
    }

    driver.persist();
    info!(
        era = driver.store().state().era.number(),
        status = ?driver.store().state().status,
        "Frame loop stopped, game saved"
    );
    driver
}

/// When the frame after `now` is due. A late frame is not made up for; the
/// next one is scheduled a full interval after it ran.
fn next_deadline(now: Instant, frame_interval: Duration) -> Instant {
    now.checked_add(frame_interval).unwrap_or(now)
}

#[cfg(test)]
mod tests {
    use ascendance_core::ManualClock;
    use ascendance_save::{MemorySaveStore, load_state};
    use ascendance_types::{CrisisId, Slider, TechId};
    use chrono::{DateTime, Utc};
    use rust_decimal_macros::dec;

    use super::*;

    const KEY: &str = "ascendance-storage";

    fn driver() -> Driver<MemorySaveStore, ManualClock> {
        let store = GameStore::with_clock(ManualClock::new(DateTime::<Utc>::default()));
        Driver::new(store, MemorySaveStore::new(), KEY)
    }

    #[test]
    fn start_from_landing_initializes_first() {
        let mut driver = driver();
        assert_eq!(driver.apply(Command::Start), Flow::Continue);
        let state = driver.store().state();
        assert_eq!(state.status, GameStatus::Playing);
        assert_eq!(state.logs.len(), 2);
    }

    #[test]
    fn frames_tick_and_autosave() {
        let mut driver = driver();
        let _ = driver.apply(Command::Start);

        let summary = driver.frame(1.0);
        assert!(summary.is_some());
        let saved = load_state(driver.saves(), KEY).ok().flatten();
        assert_eq!(
            saved.map(|s| s.resources.biomass),
            Some(dec!(19.95))
        );
    }

    #[test]
    fn frames_do_nothing_before_start() {
        let mut driver = driver();
        assert!(driver.frame(1.0).is_none());
        assert!(matches!(driver.saves().load(KEY), Ok(None)));
    }

    #[test]
    fn bad_delta_skips_frame() {
        let mut driver = driver();
        let _ = driver.apply(Command::Start);
        assert!(driver.frame(-1.0).is_none());
        assert_eq!(driver.store().state().resources.biomass, dec!(10));
    }

    #[test]
    fn reset_removes_save() {
        let mut driver = driver();
        let _ = driver.apply(Command::Start);
        let _ = driver.frame(1.0);
        assert!(matches!(driver.saves().load(KEY), Ok(Some(_))));

        let _ = driver.apply(Command::Reset);
        assert!(matches!(driver.saves().load(KEY), Ok(None)));
        assert_eq!(driver.store().state().status, GameStatus::Landing);
    }

    #[test]
    fn commands_reach_the_store() {
        let mut driver = driver();
        let _ = driver.apply(Command::Start);
        let _ = driver.apply(Command::Slider(Slider::Intellect, 120));
        let _ = driver.apply(Command::Buy(TechId::Cilia));
        let _ = driver.apply(Command::Dismiss(CrisisId::Famine));
        let _ = driver.apply(Command::Pause);

        let state = driver.store().state();
        assert_eq!(state.sliders.intellect, 100);
        assert!(!state.has_tech(TechId::Cilia));
        assert_eq!(state.dismissed_crises, vec![CrisisId::Famine]);
        assert_eq!(state.status, GameStatus::Paused);

        let saved = load_state(driver.saves(), KEY).ok().flatten();
        assert_eq!(saved.map(|s| s.status), Some(GameStatus::Paused));
        assert_eq!(driver.apply(Command::Quit), Flow::Quit);
    }

    #[tokio::test(start_paused = true)]
    async fn loop_runs_until_shutdown() {
        let mut driver = driver();
        let _ = driver.apply(Command::Start);
        let (_tx, rx) = mpsc::channel(8);

        let driver = run(
            driver,
            Duration::from_millis(16),
            rx,
            tokio::time::sleep(Duration::from_secs(2)),
        )
        .await;

        let state = driver.store().state();
        assert!(state.resources.population > dec!(1));
        let saved = load_state(driver.saves(), KEY).ok().flatten();
        assert_eq!(saved.as_ref(), Some(state));
    }

    #[tokio::test(start_paused = true)]
    async fn quit_command_stops_loop() {
        let (tx, rx) = mpsc::channel(8);
        assert!(tx.send("start".to_owned()).await.is_ok());
        assert!(tx.send("slider metabolism 80".to_owned()).await.is_ok());
        assert!(tx.send("not a command".to_owned()).await.is_ok());
        assert!(tx.send("quit".to_owned()).await.is_ok());

        let driver = run(driver(), Duration::from_millis(16), rx, std::future::pending()).await;

        let state = driver.store().state();
        assert_eq!(state.status, GameStatus::Playing);
        assert_eq!(state.sliders.metabolism, 80);
    }
}
