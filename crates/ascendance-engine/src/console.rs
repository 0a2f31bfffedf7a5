//! Console commands and the status report.
//!
//! Each line typed on standard input maps to one UI action. Parsing is
//! forgiving about case and surrounding whitespace; anything it cannot
//! understand is reported back and otherwise ignored.

use std::fmt::Write as _;

use ascendance_core::clock::Clock;
use ascendance_core::display::{fixed, whole};
use ascendance_core::{CrisisRules, GameStore, TechUpgrade, offline};
use ascendance_types::{CrisisId, Era, Slider, TechId};

/// One player action read from the console.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Leave the landing screen (if needed) and start playing.
    Start,
    /// Pause the simulation.
    Pause,
    /// Resume a paused simulation.
    Resume,
    /// Wipe the game and its save.
    Reset,
    /// Advance to the next era.
    Evolve,
    /// Move a slider.
    Slider(Slider, i64),
    /// Buy a tech.
    Buy(TechId),
    /// Dismiss a crisis notice.
    Dismiss(CrisisId),
    /// Acknowledge the offline-progress summary.
    Ack,
    /// Print the status report.
    Status,
    /// Print the command list.
    Help,
    /// Save and exit.
    Quit,
}

/// Why a console line was not understood.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    /// The first word is not a command.
    #[error("unknown command {0:?} (try `help`)")]
    Unknown(String),

    /// A required argument is missing.
    #[error("`{command}` needs a {argument}")]
    MissingArgument {
        /// The command typed.
        command: &'static str,
        /// What was expected.
        argument: &'static str,
    },

    /// The slider name is not recognised.
    #[error("unknown slider {0:?}")]
    UnknownSlider(String),

    /// The slider value is not an integer.
    #[error("slider value {0:?} is not a whole number")]
    InvalidValue(String),

    /// The tech id is not recognised.
    #[error("unknown tech {0:?}")]
    UnknownTech(String),

    /// The crisis id is not recognised.
    #[error("unknown crisis {0:?}")]
    UnknownCrisis(String),
}

/// Command summary printed by `help`.
pub const HELP: &str = "\
commands:
  start                     begin (or restart) the simulation
  pause | resume            halt or continue ticking
  slider <name> <0-100>     metabolism, intellect, aggression, adaptability
  buy <tech_id>             e.g. buy rna_replication
  evolve                    advance to the next era
  dismiss <crisis_id>       hide a crisis notice
  ack                       acknowledge offline progress
  status                    show resources and techs
  reset                     wipe the game and its save
  quit                      save and exit";

/// Parse one console line. Blank lines yield `Ok(None)`.
pub fn parse_command(line: &str) -> Result<Option<Command>, CommandError> {
    let mut words = line.split_whitespace();
    let Some(head) = words.next() else {
        return Ok(None);
    };

    let command = match head.to_ascii_lowercase().as_str() {
        "start" => Command::Start,
        "pause" => Command::Pause,
        "resume" => Command::Resume,
        "reset" => Command::Reset,
        "evolve" | "advance" => Command::Evolve,
        "ack" => Command::Ack,
        "status" => Command::Status,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        "slider" => {
            let name = words.next().ok_or(CommandError::MissingArgument {
                command: "slider",
                argument: "slider name",
            })?;
            let slider =
                Slider::from_name(name).ok_or_else(|| CommandError::UnknownSlider(name.to_owned()))?;
            let raw = words.next().ok_or(CommandError::MissingArgument {
                command: "slider",
                argument: "value",
            })?;
            let value = raw
                .parse::<i64>()
                .map_err(|_e| CommandError::InvalidValue(raw.to_owned()))?;
            Command::Slider(slider, value)
        }
        "buy" => {
            let id = words.next().ok_or(CommandError::MissingArgument {
                command: "buy",
                argument: "tech id",
            })?;
            let tech = TechId::from_name(&id.to_ascii_lowercase())
                .ok_or_else(|| CommandError::UnknownTech(id.to_owned()))?;
            Command::Buy(tech)
        }
        "dismiss" => {
            let id = words.next().ok_or(CommandError::MissingArgument {
                command: "dismiss",
                argument: "crisis id",
            })?;
            let crisis = CrisisId::from_name(&id.to_ascii_lowercase())
                .ok_or_else(|| CommandError::UnknownCrisis(id.to_owned()))?;
            Command::Dismiss(crisis)
        }
        other => return Err(CommandError::Unknown(other.to_owned())),
    };
    Ok(Some(command))
}

/// Render the current game the way the dashboard would.
pub fn status_report<C: Clock>(store: &GameStore<C>) -> String {
    let state = store.state();
    let r = &state.resources;
    let s = &state.sliders;
    let mut out = String::new();

    let _ = writeln!(out, "{} [{:?}]", state.era, state.status);
    match state.era {
        Era::Primordial => {
            let _ = writeln!(
                out,
                "  population {}  biomass {}  dna {}",
                whole(r.population),
                whole(r.biomass),
                fixed(r.dna, 2)
            );
        }
        Era::Civilization => {
            let _ = writeln!(
                out,
                "  population {}  food {}  knowledge {}  territory {}",
                whole(r.population),
                whole(r.biomass),
                fixed(r.knowledge, 2),
                whole(r.territory)
            );
        }
    }
    let _ = writeln!(
        out,
        "  metabolism {}  intellect {}  aggression {}  adaptability {}",
        s.metabolism, s.intellect, s.aggression, s.adaptability
    );

    let _ = writeln!(out, "  techs:");
    for upgrade in store.available_techs() {
        let _ = writeln!(out, "    {}", tech_line(upgrade, state.has_tech(upgrade.id)));
    }

    if let Some(crisis) = store.current_alert() {
        let _ = writeln!(out, "  ALERT {}: {}", crisis.name(), crisis.description());
    }
    if store.can_advance_era() {
        let _ = writeln!(out, "  The species is ready to evolve (`evolve`).");
    }
    if let Some(gains) = &state.offline_gains {
        let _ = writeln!(
            out,
            "  While away ({}): +{} biomass, +{} dna, +{} knowledge (`ack`)",
            offline::format_elapsed(gains.elapsed_seconds),
            whole(gains.biomass),
            fixed(gains.dna, 2),
            fixed(gains.knowledge, 2)
        );
    }
    for entry in state.logs.iter().take(5) {
        let _ = writeln!(out, "  > {}", entry.message);
    }
    out
}

fn tech_line(upgrade: &TechUpgrade, owned: bool) -> String {
    let mark = if owned { "x" } else { " " };
    format!(
        "[{mark}] {:<18} {:>6} {:<9} {}",
        upgrade.id.as_str(),
        upgrade.cost,
        upgrade.currency().to_string(),
        upgrade.description
    )
}
