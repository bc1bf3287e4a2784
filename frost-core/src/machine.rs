//! Roll/freeze state machine.
//!
//! ```text
//!   Idle --trigger--> Rolling --RollSettled--> Idle            (common)
//!                             --RollSettled--> Frozen          (rare, starts an EffectRun)
//!   Frozen --EffectCompleted{run}--> Melting --MeltFinished--> Idle
//! ```
//!
//! Every transition that waits owns exactly one timer. Triggers outside
//! `Idle` are ignored, which is the only guard against overlapping rolls:
//! timers are never cancelled mid-flight. Completion messages for any run
//! other than the active one are dropped.

use crate::config::{ConfigError, WidgetConfig};
use crate::outcome::{Outcome, OutcomeSource, RandomOutcomes};
use crate::particles::{EffectRun, ParticleSource, RandomParticles, RunId};
use crate::timers::{Event, Timers};
use rand::rngs::StdRng;
use std::fmt;
use std::time::Duration;
use tracing::{debug, trace};

/// Lifecycle phase of the widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RollState {
    #[default]
    Idle,
    Rolling,
    Frozen,
    Melting,
}

impl RollState {
    /// True in every state that rejects triggers.
    pub fn is_busy(self) -> bool {
        !matches!(self, RollState::Idle)
    }
}

impl fmt::Display for RollState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RollState::Idle => "idle",
            RollState::Rolling => "rolling",
            RollState::Frozen => "frozen",
            RollState::Melting => "melting",
        };
        f.write_str(name)
    }
}

/// A state change, stamped with the time it logically happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: RollState,
    pub to: RollState,
    pub at: Duration,
    /// Set when leaving `Rolling`.
    pub outcome: Option<Outcome>,
    /// Set when an effect run is started or retired.
    pub run: Option<RunId>,
}

/// What happened to a trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerResult {
    /// A roll started and will settle at the given time.
    Started { settles_at: Duration },
    /// The widget was busy; nothing changed.
    Ignored(RollState),
    /// The widget has been torn down.
    TornDown,
}

impl TriggerResult {
    pub fn started(&self) -> bool {
        matches!(self, TriggerResult::Started { .. })
    }
}

/// The widget's state machine. It is the only owner of the state, the
/// displayed value and the active effect run.
pub struct RollMachine<O = RandomOutcomes, P = RandomParticles> {
    config: WidgetConfig,
    outcomes: O,
    particles: P,
    state: RollState,
    displayed: i64,
    last_outcome: Option<Outcome>,
    active_run: Option<EffectRun>,
    last_run_id: RunId,
    melt_started_at: Option<Duration>,
    timers: Timers,
    completed_rolls: u64,
    torn_down: bool,
}

impl RollMachine {
    /// Machine backed by the thread-local RNG.
    pub fn from_config(config: WidgetConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let outcomes = RandomOutcomes::new(config.rare_probability);
        let particles = RandomParticles::new(config.particles.clone());
        Ok(Self::new(config, outcomes, particles))
    }
}

impl RollMachine<RandomOutcomes<StdRng>, RandomParticles<StdRng>> {
    /// Machine whose draws and particle sets are reproducible.
    pub fn seeded(config: WidgetConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        let outcomes = RandomOutcomes::seeded(config.rare_probability, seed);
        let particles = RandomParticles::seeded(config.particles.clone(), seed.rotate_left(32));
        Ok(Self::new(config, outcomes, particles))
    }
}

/// Machine whose sources are picked at runtime.
pub type BoxedMachine = RollMachine<Box<dyn OutcomeSource>, Box<dyn ParticleSource>>;

impl BoxedMachine {
    /// Seeded sources when `seed` is given, thread-local ones otherwise.
    pub fn boxed(config: WidgetConfig, seed: Option<u64>) -> Result<Self, ConfigError> {
        config.validate()?;
        let (outcomes, particles): (Box<dyn OutcomeSource>, Box<dyn ParticleSource>) = match seed
        {
            Some(seed) => (
                Box::new(RandomOutcomes::seeded(config.rare_probability, seed)),
                Box::new(RandomParticles::seeded(
                    config.particles.clone(),
                    seed.rotate_left(32),
                )),
            ),
            None => (
                Box::new(RandomOutcomes::new(config.rare_probability)),
                Box::new(RandomParticles::new(config.particles.clone())),
            ),
        };
        Ok(Self::new(config, outcomes, particles))
    }
}

impl<O: OutcomeSource, P: ParticleSource> RollMachine<O, P> {
    pub fn new(config: WidgetConfig, outcomes: O, particles: P) -> Self {
        let displayed = config.values.common;
        Self {
            config,
            outcomes,
            particles,
            state: RollState::Idle,
            displayed,
            last_outcome: None,
            active_run: None,
            last_run_id: RunId::new(0),
            melt_started_at: None,
            timers: Timers::new(),
            completed_rolls: 0,
            torn_down: false,
        }
    }

    /// User activation. Only honoured in `Idle`.
    pub fn trigger(&mut self, now: Duration) -> TriggerResult {
        if self.torn_down {
            return TriggerResult::TornDown;
        }
        if self.state.is_busy() {
            trace!(state = %self.state, "trigger ignored");
            return TriggerResult::Ignored(self.state);
        }

        let settles_at = now.saturating_add(self.config.roll_duration());
        self.timers.schedule(settles_at, Event::RollSettled);
        self.state = RollState::Rolling;
        debug!(at_ms = now.as_millis() as u64, "idle -> rolling");
        TriggerResult::Started { settles_at }
    }

    /// Fire every timer due at or before `now`, in order.
    pub fn advance(&mut self, now: Duration) -> Vec<Transition> {
        let mut transitions = Vec::new();
        while let Some((due, event)) = self.timers.pop_due(now) {
            if let Some(t) = self.handle(event, due) {
                transitions.push(t);
            }
        }
        transitions
    }

    /// Deliver a completion signal from the particle overlay directly.
    ///
    /// The scheduled completion timer for the same run becomes a no-op.
    pub fn complete_effect(&mut self, run: RunId, now: Duration) -> Option<Transition> {
        if self.torn_down {
            return None;
        }
        self.handle(Event::EffectCompleted { run }, now)
    }

    /// When the next timer is due.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.timers.next_deadline()
    }

    /// Drop pending timers and the active run. Idempotent.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        let dropped = self.timers.clear();
        let run = self.active_run.take().map(|r| r.id());
        self.melt_started_at = None;
        self.torn_down = true;
        debug!(state = %self.state, dropped, ?run, "torn down");
    }

    fn handle(&mut self, event: Event, at: Duration) -> Option<Transition> {
        match (self.state, event) {
            (RollState::Rolling, Event::RollSettled) => Some(self.settle(at)),
            (RollState::Frozen, Event::EffectCompleted { run })
                if self.active_run.as_ref().map(EffectRun::id) == Some(run) =>
            {
                let melt_done = at.saturating_add(self.config.melt_duration());
                self.timers.schedule(melt_done, Event::MeltFinished);
                self.melt_started_at = Some(at);
                Some(self.enter(RollState::Melting, at, None, Some(run)))
            }
            (RollState::Melting, Event::MeltFinished) => {
                let run = self.active_run.take().map(|r| r.id());
                self.melt_started_at = None;
                Some(self.enter(RollState::Idle, at, None, run))
            }
            (state, event) => {
                trace!(%state, ?event, "stale event dropped");
                None
            }
        }
    }

    fn settle(&mut self, at: Duration) -> Transition {
        let outcome = self.outcomes.draw();
        self.displayed = self.config.values.value_of(outcome);
        self.last_outcome = Some(outcome);
        self.completed_rolls += 1;

        match outcome {
            Outcome::Common => self.enter(RollState::Idle, at, Some(outcome), None),
            Outcome::Rare => {
                let id = self.last_run_id.next();
                self.last_run_id = id;
                let particles = self.particles.spawn(self.config.particles.count);
                let run = EffectRun::new(id, at, particles, self.config.particles.spin_degrees);
                let completes_at = run.completes_at(self.config.completion_buffer());
                debug!(
                    %id,
                    particles = run.particles().len(),
                    lifetime_ms = run.lifetime().as_millis() as u64,
                    "effect run started"
                );
                self.timers
                    .schedule(completes_at, Event::EffectCompleted { run: id });
                self.active_run = Some(run);
                self.enter(RollState::Frozen, at, Some(outcome), Some(id))
            }
        }
    }

    fn enter(
        &mut self,
        to: RollState,
        at: Duration,
        outcome: Option<Outcome>,
        run: Option<RunId>,
    ) -> Transition {
        let from = std::mem::replace(&mut self.state, to);
        debug!(%from, %to, at_ms = at.as_millis() as u64, "transition");
        Transition {
            from,
            to,
            at,
            outcome,
            run,
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn state(&self) -> RollState {
        self.state
    }

    /// Number currently shown on the widget.
    pub fn displayed(&self) -> i64 {
        self.displayed
    }

    pub fn last_outcome(&self) -> Option<Outcome> {
        self.last_outcome
    }

    pub fn active_run(&self) -> Option<&EffectRun> {
        self.active_run.as_ref()
    }

    /// When melting began, while melting.
    pub fn melt_started_at(&self) -> Option<Duration> {
        self.melt_started_at
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    pub fn completed_rolls(&self) -> u64 {
        self.completed_rolls
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    pub fn config(&self) -> &WidgetConfig {
        &self.config
    }

    pub fn outcomes_mut(&mut self) -> &mut O {
        &mut self.outcomes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FixedParticles, ScriptedOutcomes};

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn machine(outcomes: Vec<Outcome>) -> RollMachine<ScriptedOutcomes, FixedParticles> {
        RollMachine::new(
            WidgetConfig::default(),
            ScriptedOutcomes::new(outcomes),
            FixedParticles::uniform(3, ms(100), ms(1_000)),
        )
    }

    #[test]
    fn test_starts_idle_with_default_value() {
        let m = machine(vec![]);
        assert_eq!(m.state(), RollState::Idle);
        assert_eq!(m.displayed(), 69);
        assert!(m.active_run().is_none());
        assert_eq!(m.next_deadline(), None);
    }

    #[test]
    fn test_common_roll_returns_to_idle() {
        let mut m = machine(vec![Outcome::Common]);
        assert_eq!(
            m.trigger(ms(0)),
            TriggerResult::Started {
                settles_at: ms(650)
            }
        );
        assert_eq!(m.state(), RollState::Rolling);
        assert!(m.advance(ms(649)).is_empty());

        let ts = m.advance(ms(650));
        assert_eq!(ts.len(), 1);
        assert_eq!(ts[0].from, RollState::Rolling);
        assert_eq!(ts[0].to, RollState::Idle);
        assert_eq!(ts[0].outcome, Some(Outcome::Common));
        assert_eq!(m.pending_timers(), 0);
    }

    #[test]
    fn test_rare_roll_runs_full_sequence() {
        let mut m = machine(vec![Outcome::Rare]);
        m.trigger(ms(0));

        let ts = m.advance(ms(650));
        assert_eq!(ts[0].to, RollState::Frozen);
        assert_eq!(m.displayed(), 67);
        let run = m.active_run().unwrap().id();
        assert_eq!(run, RunId::new(1));
        // lifetime 1100 + buffer 150
        assert_eq!(m.next_deadline(), Some(ms(650 + 1_100 + 150)));

        let ts = m.advance(ms(1_900));
        assert_eq!(ts[0].to, RollState::Melting);
        assert_eq!(m.melt_started_at(), Some(ms(1_900)));

        let ts = m.advance(ms(1_900 + 2_250));
        assert_eq!(ts[0].to, RollState::Idle);
        assert_eq!(ts[0].run, Some(run));
        assert!(m.active_run().is_none());
        assert_eq!(m.melt_started_at(), None);
    }

    #[test]
    fn test_late_advance_uses_due_times() {
        let mut m = machine(vec![Outcome::Rare]);
        m.trigger(ms(0));
        let ts = m.advance(ms(60_000));
        let path: Vec<_> = ts.iter().map(|t| (t.to, t.at)).collect();
        assert_eq!(
            path,
            vec![
                (RollState::Frozen, ms(650)),
                (RollState::Melting, ms(1_900)),
                (RollState::Idle, ms(4_150)),
            ]
        );
    }

    #[test]
    fn test_busy_triggers_are_ignored() {
        let mut m = machine(vec![Outcome::Rare]);
        m.trigger(ms(0));
        assert_eq!(m.trigger(ms(10)), TriggerResult::Ignored(RollState::Rolling));
        assert_eq!(m.pending_timers(), 1);

        m.advance(ms(650));
        assert_eq!(m.trigger(ms(700)), TriggerResult::Ignored(RollState::Frozen));
        assert_eq!(m.pending_timers(), 1);
        assert_eq!(m.displayed(), 67);

        m.advance(ms(1_900));
        assert_eq!(m.trigger(ms(2_000)), TriggerResult::Ignored(RollState::Melting));
        assert_eq!(m.active_run().unwrap().id(), RunId::new(1));
    }

    #[test]
    fn test_stale_completion_is_dropped() {
        let mut m = machine(vec![Outcome::Rare]);
        m.trigger(ms(0));
        m.advance(ms(650));

        assert!(m.complete_effect(RunId::new(99), ms(700)).is_none());
        assert_eq!(m.state(), RollState::Frozen);

        let t = m.complete_effect(RunId::new(1), ms(800)).unwrap();
        assert_eq!(t.to, RollState::Melting);
        // The scheduled completion for run 1 fires later and is ignored.
        let ts = m.advance(ms(1_900));
        assert!(ts.is_empty());
        assert_eq!(m.state(), RollState::Melting);
        let ts = m.advance(ms(800 + 2_250));
        assert_eq!(ts[0].to, RollState::Idle);
    }

    #[test]
    fn test_run_ids_increase() {
        let mut m = machine(vec![Outcome::Rare, Outcome::Rare]);
        m.trigger(ms(0));
        m.advance(ms(650));
        assert_eq!(m.active_run().unwrap().id(), RunId::new(1));
        m.advance(ms(10_000));
        m.trigger(ms(10_000));
        m.advance(ms(10_650));
        assert_eq!(m.active_run().unwrap().id(), RunId::new(2));
    }

    #[test]
    fn test_teardown_drops_timers() {
        let mut m = machine(vec![Outcome::Rare]);
        m.trigger(ms(0));
        m.advance(ms(650));
        m.teardown();

        assert!(m.is_torn_down());
        assert_eq!(m.pending_timers(), 0);
        assert!(m.active_run().is_none());
        assert!(m.advance(ms(60_000)).is_empty());
        assert_eq!(m.trigger(ms(60_000)), TriggerResult::TornDown);
        assert!(m.complete_effect(RunId::new(1), ms(60_000)).is_none());
        m.teardown();
    }

    #[test]
    fn test_seeded_machines_agree() {
        let config = WidgetConfig::default().with_rare_probability(0.5);
        let mut a = RollMachine::seeded(config.clone(), 11).unwrap();
        let mut b = RollMachine::seeded(config, 11).unwrap();
        let mut now = ms(0);
        for _ in 0..20 {
            a.trigger(now);
            b.trigger(now);
            now += ms(20_000);
            assert_eq!(a.advance(now), b.advance(now));
            assert_eq!(a.displayed(), b.displayed());
        }
    }

    #[test]
    fn test_boxed_seeded_matches_seeded() {
        let config = WidgetConfig::default().with_rare_probability(0.5);
        let mut boxed = BoxedMachine::boxed(config.clone(), Some(5)).unwrap();
        let mut plain = RollMachine::seeded(config, 5).unwrap();
        for i in 0..10u64 {
            let now = ms(i * 20_000);
            boxed.trigger(now);
            plain.trigger(now);
            assert_eq!(boxed.advance(now + ms(19_999)), plain.advance(now + ms(19_999)));
        }
        assert!(BoxedMachine::boxed(WidgetConfig::default(), None).is_ok());
    }

    #[test]
    fn test_from_config_validates() {
        let bad = WidgetConfig::default().with_rare_probability(2.0);
        assert!(RollMachine::from_config(bad).is_err());
        assert!(RollMachine::from_config(WidgetConfig::default()).is_ok());
    }
}
