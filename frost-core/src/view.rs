//! Observable outputs of the widget at a point in time.

use crate::frost::{self, FrostFrame};
use crate::machine::{RollMachine, RollState};
use crate::outcome::OutcomeSource;
use crate::particles::{ParticleSample, ParticleSource, RunId};
use std::time::Duration;

/// Shown in place of the number while rolling.
pub const ROLLING_PLACEHOLDER: &str = "…";

/// Everything a renderer needs for one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct WidgetView<'a> {
    pub state: RollState,
    pub value: i64,
    pub enabled: bool,
    pub label: &'a str,
    /// Active run and its particles, while one exists.
    pub particles: Option<(RunId, Vec<ParticleSample>)>,
    pub frost: Option<FrostFrame>,
}

impl<'a> WidgetView<'a> {
    /// Project the machine's state at `now`.
    pub fn project<O, P>(machine: &'a RollMachine<O, P>, now: Duration) -> Self
    where
        O: OutcomeSource,
        P: ParticleSource,
    {
        let state = machine.state();
        let config = machine.config();
        let label = match state {
            RollState::Idle => config.labels.idle.as_str(),
            RollState::Rolling => config.labels.rolling.as_str(),
            RollState::Frozen | RollState::Melting => config.labels.frozen.as_str(),
        };

        let particles = machine
            .active_run()
            .map(|run| (run.id(), run.sample(now)));

        // Teardown drops the run; the frost goes with it.
        let frost = match (state, machine.melt_started_at()) {
            _ if machine.is_torn_down() => None,
            (RollState::Frozen, _) => frost::sample(false, Duration::ZERO, config.melt_duration()),
            (RollState::Melting, Some(started)) => frost::sample(
                true,
                now.saturating_sub(started),
                config.melt_duration(),
            ),
            _ => None,
        };

        Self {
            state,
            value: machine.displayed(),
            enabled: !state.is_busy() && !machine.is_torn_down(),
            label,
            particles,
            frost,
        }
    }

    pub fn is_rolling(&self) -> bool {
        self.state == RollState::Rolling
    }

    /// Text for the number display.
    pub fn display_text(&self) -> String {
        if self.is_rolling() {
            ROLLING_PLACEHOLDER.to_string()
        } else {
            self.value.to_string()
        }
    }
}
