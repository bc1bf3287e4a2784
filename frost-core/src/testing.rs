//! Testing utilities for the roll widget.
//!
//! This module provides tools for deterministic tests:
//! - `ScriptedOutcomes` to force the outcome of each roll
//! - `FixedParticles` to hand-build particle sets
//! - `TestHarness` for scripted scenarios on a virtual clock
//! - Assertion helpers for verifying widget state

use crate::config::WidgetConfig;
use crate::machine::{RollMachine, RollState, Transition, TriggerResult};
use crate::outcome::{Outcome, OutcomeSource};
use crate::particles::{
    EffectRun, Particle, ParticleColor, ParticleConfig, ParticleSource, RandomParticles,
};
use crate::view::WidgetView;
use std::collections::VecDeque;
use std::time::Duration;

/// Outcome source that returns queued outcomes in order.
///
/// Once the queue is empty every draw is `Common`.
#[derive(Debug, Clone, Default)]
pub struct ScriptedOutcomes {
    queue: VecDeque<Outcome>,
    draws: usize,
}

impl ScriptedOutcomes {
    pub fn new(outcomes: Vec<Outcome>) -> Self {
        Self {
            queue: outcomes.into(),
            draws: 0,
        }
    }

    /// Queue another outcome.
    pub fn push(&mut self, outcome: Outcome) {
        self.queue.push_back(outcome);
    }

    /// How many times `draw` has been called.
    pub fn draws(&self) -> usize {
        self.draws
    }
}

impl OutcomeSource for ScriptedOutcomes {
    fn draw(&mut self) -> Outcome {
        self.draws += 1;
        self.queue.pop_front().unwrap_or(Outcome::Common)
    }
}

/// Particle source that always returns the same hand-built set.
///
/// The requested count is ignored so tests control every particle.
#[derive(Debug, Clone, Default)]
pub struct FixedParticles {
    particles: Vec<Particle>,
}

impl FixedParticles {
    pub fn new(particles: Vec<Particle>) -> Self {
        Self { particles }
    }

    /// `count` identical particles.
    pub fn uniform(count: usize, delay: Duration, fall: Duration) -> Self {
        Self::new(vec![test_particle(delay, fall); count])
    }

    /// Add one particle to the set.
    pub fn with(mut self, particle: Particle) -> Self {
        self.particles.push(particle);
        self
    }
}

impl ParticleSource for FixedParticles {
    fn spawn(&mut self, _count: usize) -> Vec<Particle> {
        self.particles.clone()
    }
}

/// A centred particle with the given timing.
pub fn test_particle(delay: Duration, fall: Duration) -> Particle {
    Particle {
        x: 0.5,
        size: 1.0,
        rotation: 0.0,
        fall,
        delay,
        drift: 0.0,
        color: ParticleColor::Snow,
    }
}

/// Test harness driving a machine on a virtual clock.
pub struct TestHarness {
    pub machine: RollMachine<ScriptedOutcomes, Box<dyn ParticleSource>>,
    now: Duration,
    /// Every transition observed so far.
    pub transitions: Vec<Transition>,
}

impl TestHarness {
    /// Default config with seeded random particles.
    pub fn new() -> Self {
        Self::with_config(WidgetConfig::default())
    }

    pub fn with_config(config: WidgetConfig) -> Self {
        let particles = RandomParticles::seeded(config.particles.clone(), 0xf2057);
        Self::build(config, Box::new(particles))
    }

    /// Default config with a hand-built particle set.
    pub fn with_particles(particles: FixedParticles) -> Self {
        Self::build(WidgetConfig::default(), Box::new(particles))
    }

    fn build(config: WidgetConfig, particles: Box<dyn ParticleSource>) -> Self {
        Self {
            machine: RollMachine::new(config, ScriptedOutcomes::default(), particles),
            now: Duration::ZERO,
            transitions: Vec::new(),
        }
    }

    /// Queue the outcome of a future roll.
    pub fn expect_outcome(&mut self, outcome: Outcome) -> &mut Self {
        self.machine.outcomes_mut().push(outcome);
        self
    }

    /// Press the button at the current virtual time.
    pub fn trigger(&mut self) -> TriggerResult {
        let result = self.machine.trigger(self.now);
        if result.started() {
            self.transitions.push(Transition {
                from: RollState::Idle,
                to: RollState::Rolling,
                at: self.now,
                outcome: None,
                run: None,
            });
        }
        result
    }

    /// Move the clock forward, firing due timers.
    pub fn advance(&mut self, by: Duration) -> Vec<Transition> {
        self.now += by;
        let fired = self.machine.advance(self.now);
        self.transitions.extend(fired.iter().copied());
        fired
    }

    pub fn advance_ms(&mut self, ms: u64) -> Vec<Transition> {
        self.advance(Duration::from_millis(ms))
    }

    /// Jump straight to the next timer, if any.
    pub fn advance_to_next_deadline(&mut self) -> Vec<Transition> {
        match self.machine.next_deadline() {
            Some(due) => self.advance(due.saturating_sub(self.now)),
            None => Vec::new(),
        }
    }

    /// Fire timers until the machine is idle again.
    pub fn run_until_idle(&mut self) -> Vec<Transition> {
        let mut fired = Vec::new();
        while self.machine.state().is_busy() && self.machine.next_deadline().is_some() {
            fired.extend(self.advance_to_next_deadline());
        }
        fired
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn state(&self) -> RollState {
        self.machine.state()
    }

    pub fn displayed(&self) -> i64 {
        self.machine.displayed()
    }

    pub fn active_run(&self) -> Option<&EffectRun> {
        self.machine.active_run()
    }

    pub fn draws(&mut self) -> usize {
        self.machine.outcomes_mut().draws()
    }

    pub fn view(&self) -> WidgetView<'_> {
        WidgetView::project(&self.machine, self.now)
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

/// Particle config at the low end of the usual particle counts.
pub fn sparse_particle_config() -> ParticleConfig {
    ParticleConfig {
        count: 140,
        ..ParticleConfig::default()
    }
}

// ============================================================================
// Assertion Helpers
// ============================================================================

/// Assert the machine is in the expected state.
#[track_caller]
pub fn assert_state(harness: &TestHarness, expected: RollState) {
    assert_eq!(
        harness.state(),
        expected,
        "Expected state {expected} at t={}ms",
        harness.now().as_millis()
    );
}

/// Assert an effect run exists.
#[track_caller]
pub fn assert_has_run(harness: &TestHarness) {
    assert!(
        harness.active_run().is_some(),
        "Expected an active effect run in state {}",
        harness.state()
    );
}

/// Assert no effect run exists.
#[track_caller]
pub fn assert_no_run(harness: &TestHarness) {
    assert!(
        harness.active_run().is_none(),
        "Expected no effect run in state {}",
        harness.state()
    );
}

/// Assert every observed transition is an edge of the state machine.
#[track_caller]
pub fn assert_legal_transitions(harness: &TestHarness) {
    for t in &harness.transitions {
        let legal = matches!(
            (t.from, t.to),
            (RollState::Idle, RollState::Rolling)
                | (RollState::Rolling, RollState::Idle)
                | (RollState::Rolling, RollState::Frozen)
                | (RollState::Frozen, RollState::Melting)
                | (RollState::Melting, RollState::Idle)
        );
        assert!(legal, "Illegal transition {} -> {}", t.from, t.to);
    }
}
