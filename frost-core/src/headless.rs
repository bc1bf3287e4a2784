//! Headless widget driver for programmatic use.
//!
//! Runs the widget on a virtual clock so scripts and agents can press the
//! button and skip forward in time without a terminal.
//!
//! # Example
//!
//! ```ignore
//! use frost_core::headless::{HeadlessCommand, HeadlessWidget};
//! use frost_core::WidgetConfig;
//!
//! let mut widget = HeadlessWidget::seeded(WidgetConfig::default(), 7)?;
//! widget.execute(HeadlessCommand::Press);
//! for t in widget.execute(HeadlessCommand::RunUntilIdle).transitions {
//!     println!("{} -> {}", t.from, t.to);
//! }
//! println!("value: {}", widget.view().value);
//! ```

use crate::config::{ConfigError, WidgetConfig};
use crate::machine::{RollMachine, RollState, Transition, TriggerResult};
use crate::outcome::{OutcomeSource, RandomOutcomes};
use crate::particles::{ParticleSource, RandomParticles};
use crate::view::WidgetView;
use rand::rngs::StdRng;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// Errors from parsing headless commands.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum HeadlessError {
    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    #[error("Usage: {0}")]
    Usage(&'static str),

    #[error("Invalid duration: {0}")]
    InvalidDuration(String),
}

/// One line of the headless protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeadlessCommand {
    /// Press the button.
    Press,
    /// Advance the virtual clock.
    Wait(Duration),
    /// Advance until the widget is idle again.
    RunUntilIdle,
    Status,
    Help,
    Quit,
}

impl FromStr for HeadlessCommand {
    type Err = HeadlessError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = line.split_whitespace().collect();
        match parts.as_slice() {
            ["go" | "press" | "g"] => Ok(HeadlessCommand::Press),
            ["wait" | "w", ms] => {
                let ms = ms.trim_end_matches("ms");
                ms.parse::<u64>()
                    .map(|ms| HeadlessCommand::Wait(Duration::from_millis(ms)))
                    .map_err(|_| HeadlessError::InvalidDuration(ms.to_string()))
            }
            ["wait" | "w", ..] => Err(HeadlessError::Usage("wait <ms>")),
            ["run"] => Ok(HeadlessCommand::RunUntilIdle),
            ["status" | "s"] => Ok(HeadlessCommand::Status),
            ["help" | "h" | "?"] => Ok(HeadlessCommand::Help),
            ["quit" | "exit" | "q"] => Ok(HeadlessCommand::Quit),
            [] => Err(HeadlessError::Usage("go | wait <ms> | run | status | help | quit")),
            [other, ..] => Err(HeadlessError::UnknownCommand(other.to_string())),
        }
    }
}

/// What a command did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeadlessReply {
    /// Set for `Press`.
    pub trigger: Option<TriggerResult>,
    /// Transitions fired while the clock moved.
    pub transitions: Vec<Transition>,
    pub quit: bool,
}

/// Widget plus virtual clock.
pub struct HeadlessWidget<O = RandomOutcomes, P = RandomParticles> {
    machine: RollMachine<O, P>,
    now: Duration,
}

impl HeadlessWidget {
    pub fn new(config: WidgetConfig) -> Result<Self, ConfigError> {
        Ok(Self::from_machine(RollMachine::from_config(config)?))
    }
}

impl HeadlessWidget<RandomOutcomes<StdRng>, RandomParticles<StdRng>> {
    pub fn seeded(config: WidgetConfig, seed: u64) -> Result<Self, ConfigError> {
        Ok(Self::from_machine(RollMachine::seeded(config, seed)?))
    }
}

impl<O: OutcomeSource, P: ParticleSource> HeadlessWidget<O, P> {
    pub fn from_machine(machine: RollMachine<O, P>) -> Self {
        Self {
            machine,
            now: Duration::ZERO,
        }
    }

    pub fn execute(&mut self, command: HeadlessCommand) -> HeadlessReply {
        match command {
            HeadlessCommand::Press => HeadlessReply {
                trigger: Some(self.machine.trigger(self.now)),
                ..HeadlessReply::default()
            },
            HeadlessCommand::Wait(by) => HeadlessReply {
                transitions: self.wait(by),
                ..HeadlessReply::default()
            },
            HeadlessCommand::RunUntilIdle => HeadlessReply {
                transitions: self.run_until_idle(),
                ..HeadlessReply::default()
            },
            HeadlessCommand::Status | HeadlessCommand::Help => HeadlessReply::default(),
            HeadlessCommand::Quit => {
                self.machine.teardown();
                HeadlessReply {
                    quit: true,
                    ..HeadlessReply::default()
                }
            }
        }
    }

    /// Advance the virtual clock by `by`.
    pub fn wait(&mut self, by: Duration) -> Vec<Transition> {
        self.now = self.now.saturating_add(by);
        self.machine.advance(self.now)
    }

    /// Jump from deadline to deadline until idle.
    pub fn run_until_idle(&mut self) -> Vec<Transition> {
        let mut fired = Vec::new();
        while self.machine.state() != RollState::Idle {
            let Some(due) = self.machine.next_deadline() else {
                break;
            };
            self.now = self.now.max(due);
            fired.extend(self.machine.advance(self.now));
        }
        fired
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn machine(&self) -> &RollMachine<O, P> {
        &self.machine
    }

    pub fn view(&self) -> WidgetView<'_> {
        WidgetView::project(&self.machine, self.now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outcome::Outcome;
    use crate::testing::{FixedParticles, ScriptedOutcomes};

    #[test]
    fn test_parse_commands() {
        assert_eq!("go".parse::<HeadlessCommand>(), Ok(HeadlessCommand::Press));
        assert_eq!(
            "wait 650".parse::<HeadlessCommand>(),
            Ok(HeadlessCommand::Wait(Duration::from_millis(650)))
        );
        assert_eq!(
            " w 100ms ".parse::<HeadlessCommand>(),
            Ok(HeadlessCommand::Wait(Duration::from_millis(100)))
        );
        assert_eq!("run".parse::<HeadlessCommand>(), Ok(HeadlessCommand::RunUntilIdle));
        assert_eq!("quit".parse::<HeadlessCommand>(), Ok(HeadlessCommand::Quit));
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            "wait".parse::<HeadlessCommand>(),
            Err(HeadlessError::Usage("wait <ms>"))
        );
        assert_eq!(
            "wait soon".parse::<HeadlessCommand>(),
            Err(HeadlessError::InvalidDuration("soon".to_string()))
        );
        assert_eq!(
            "dance".parse::<HeadlessCommand>(),
            Err(HeadlessError::UnknownCommand("dance".to_string()))
        );
        assert!("".parse::<HeadlessCommand>().is_err());
    }

    #[test]
    fn test_scripted_session() {
        let machine = RollMachine::new(
            WidgetConfig::default(),
            ScriptedOutcomes::new(vec![Outcome::Rare]),
            FixedParticles::uniform(5, Duration::ZERO, Duration::from_millis(2_000)),
        );
        let mut widget = HeadlessWidget::from_machine(machine);

        let reply = widget.execute(HeadlessCommand::Press);
        assert!(reply.trigger.unwrap().started());

        let reply = widget.execute(HeadlessCommand::Wait(Duration::from_millis(650)));
        assert_eq!(reply.transitions[0].to, RollState::Frozen);

        let reply = widget.execute(HeadlessCommand::RunUntilIdle);
        let states: Vec<_> = reply.transitions.iter().map(|t| t.to).collect();
        assert_eq!(states, vec![RollState::Melting, RollState::Idle]);
        assert_eq!(widget.now(), Duration::from_millis(650 + 2_000 + 150 + 2_250));

        assert!(widget.execute(HeadlessCommand::Quit).quit);
        assert!(widget.machine().is_torn_down());
    }

    #[test]
    fn test_wait_saturates_at_end_of_time() {
        let config = WidgetConfig::default().with_rare_probability(1.0);
        let mut widget = HeadlessWidget::seeded(config, 11).unwrap();
        let forever = "wait 18446744073709551615".parse::<HeadlessCommand>().unwrap();

        for _ in 0..1_100 {
            widget.execute(forever);
        }
        assert_eq!(widget.now(), Duration::MAX);

        assert!(widget.execute(HeadlessCommand::Press).trigger.unwrap().started());
        let fired = widget.run_until_idle();
        assert_eq!(fired.len(), 3);
        assert!(fired.iter().all(|t| t.at == Duration::MAX));
        assert_eq!(widget.view().state, RollState::Idle);
    }

    #[test]
    fn test_seeded_widget_runs() {
        let config = WidgetConfig::default().with_rare_probability(1.0);
        let mut widget = HeadlessWidget::seeded(config, 3).unwrap();
        widget.execute(HeadlessCommand::Press);
        let fired = widget.run_until_idle();
        assert_eq!(fired.len(), 3);
        assert_eq!(widget.view().value, 67);
    }
}
