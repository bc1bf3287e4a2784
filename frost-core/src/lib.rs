//! Frost roll widget core.
//!
//! This crate provides:
//! - A biased two-way outcome generator
//! - The roll/freeze state machine with its timers
//! - The falling-particle and frost overlays as pure functions of time
//! - A view projection, headless driver and test harness
//!
//! Nothing here reads a clock. Callers pass the time since the widget was
//! mounted, which keeps every transition reproducible.
//!
//! # Quick Start
//!
//! ```ignore
//! use frost_core::{RollMachine, WidgetConfig, WidgetView};
//! use std::time::Duration;
//!
//! let mut machine = RollMachine::from_config(WidgetConfig::default())?;
//! machine.trigger(Duration::ZERO);
//!
//! for t in machine.advance(Duration::from_millis(650)) {
//!     println!("{} -> {}", t.from, t.to);
//! }
//! let view = WidgetView::project(&machine, Duration::from_millis(650));
//! println!("{} [{}]", view.display_text(), view.label);
//! ```

pub mod config;
pub mod frost;
pub mod headless;
pub mod machine;
pub mod outcome;
pub mod particles;
pub mod testing;
pub mod timers;
pub mod view;

// Primary public API
pub use config::{ConfigError, Labels, WidgetConfig};
pub use headless::{HeadlessCommand, HeadlessError, HeadlessReply, HeadlessWidget};
pub use machine::{BoxedMachine, RollMachine, RollState, Transition, TriggerResult};
pub use outcome::{Outcome, OutcomeSource, OutcomeValues, RandomOutcomes};
pub use particles::{EffectRun, Particle, ParticleConfig, ParticleSource, RandomParticles, RunId};
pub use testing::{FixedParticles, ScriptedOutcomes, TestHarness};
pub use view::WidgetView;
