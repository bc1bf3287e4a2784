//! Widget configuration.
//!
//! Defaults reproduce the stock widget. A JSON file can override any
//! subset of fields, and a handful of `FROST_*` environment variables
//! override the file.

use crate::outcome::{OutcomeValues, DEFAULT_RARE_PROBABILITY};
use crate::particles::ParticleConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Upper bound on particles per run.
pub const MAX_PARTICLES: usize = 2_000;

/// Errors from loading or validating a [`WidgetConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid value for {var}: {value:?}")]
    InvalidEnv { var: &'static str, value: String },

    #[error("rare_probability must be within [0, 1], got {0}")]
    Probability(f64),

    #[error("particle count must be between 1 and {max}, got {0}", max = MAX_PARTICLES)]
    ParticleCount(usize),

    #[error("empty range for {0}: min is greater than max")]
    EmptyRange(&'static str),

    #[error("{0} must be greater than zero")]
    ZeroDuration(&'static str),

    #[error("range for {0} must have finite bounds")]
    NonFiniteRange(&'static str),
}

/// Button label text per state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Labels {
    pub idle: String,
    pub rolling: String,
    /// Shown while frozen and while melting.
    pub frozen: String,
}

impl Default for Labels {
    fn default() -> Self {
        Self {
            idle: "Generate".to_string(),
            rolling: "Rolling…".to_string(),
            frozen: "Frozen".to_string(),
        }
    }
}

/// Everything that parameterizes a widget instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WidgetConfig {
    /// Length of the roll animation.
    pub roll_duration_ms: u64,
    /// Length of the frost melt.
    pub melt_duration_ms: u64,
    /// Slack added after the last particle lands.
    pub completion_buffer_ms: u64,
    pub rare_probability: f64,
    pub values: OutcomeValues,
    pub labels: Labels,
    pub particles: ParticleConfig,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            roll_duration_ms: 650,
            melt_duration_ms: 2_250,
            completion_buffer_ms: 150,
            rare_probability: DEFAULT_RARE_PROBABILITY,
            values: OutcomeValues::default(),
            labels: Labels::default(),
            particles: ParticleConfig::default(),
        }
    }
}

impl WidgetConfig {
    /// Read a JSON config file. Missing fields take their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Apply `FROST_*` overrides from the process environment.
    pub fn with_env_overrides(self) -> Result<Self, ConfigError> {
        self.with_overrides_from(|var| std::env::var(var).ok())
    }

    /// Apply overrides from an arbitrary lookup, e.g. a map in tests.
    pub fn with_overrides_from<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&'static str) -> Option<String>,
    {
        if let Some(ms) = parse_var(&lookup, "FROST_ROLL_MS")? {
            self.roll_duration_ms = ms;
        }
        if let Some(ms) = parse_var(&lookup, "FROST_MELT_MS")? {
            self.melt_duration_ms = ms;
        }
        if let Some(count) = parse_var(&lookup, "FROST_PARTICLES")? {
            self.particles.count = count;
        }
        if let Some(p) = parse_var(&lookup, "FROST_RARE_PROBABILITY")? {
            self.rare_probability = p;
        }
        Ok(self)
    }

    /// Set the roll duration.
    pub fn with_roll_duration(mut self, duration: Duration) -> Self {
        self.roll_duration_ms = duration.as_millis() as u64;
        self
    }

    /// Set the melt duration.
    pub fn with_melt_duration(mut self, duration: Duration) -> Self {
        self.melt_duration_ms = duration.as_millis() as u64;
        self
    }

    /// Set the number of particles per run.
    pub fn with_particle_count(mut self, count: usize) -> Self {
        self.particles.count = count;
        self
    }

    /// Set the probability of a rare outcome.
    pub fn with_rare_probability(mut self, p: f64) -> Self {
        self.rare_probability = p;
        self
    }

    pub fn roll_duration(&self) -> Duration {
        Duration::from_millis(self.roll_duration_ms)
    }

    pub fn melt_duration(&self) -> Duration {
        Duration::from_millis(self.melt_duration_ms)
    }

    pub fn completion_buffer(&self) -> Duration {
        Duration::from_millis(self.completion_buffer_ms)
    }

    /// Check the config describes a widget that can actually run.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.rare_probability) {
            return Err(ConfigError::Probability(self.rare_probability));
        }
        if self.roll_duration_ms == 0 {
            return Err(ConfigError::ZeroDuration("roll_duration_ms"));
        }
        if self.melt_duration_ms == 0 {
            return Err(ConfigError::ZeroDuration("melt_duration_ms"));
        }

        let p = &self.particles;
        if p.count == 0 || p.count > MAX_PARTICLES {
            return Err(ConfigError::ParticleCount(p.count));
        }
        if !p.size.is_valid() {
            return Err(ConfigError::EmptyRange("particles.size"));
        }
        if !p.fall_ms.is_valid() {
            return Err(ConfigError::EmptyRange("particles.fall_ms"));
        }
        if p.fall_ms.min == 0 {
            return Err(ConfigError::ZeroDuration("particles.fall_ms.min"));
        }
        if !p.delay_ms.is_valid() {
            return Err(ConfigError::EmptyRange("particles.delay_ms"));
        }
        if !p.drift.is_valid() {
            return Err(ConfigError::EmptyRange("particles.drift"));
        }
        if !p.size.is_finite() {
            return Err(ConfigError::NonFiniteRange("particles.size"));
        }
        if !p.drift.is_finite() {
            return Err(ConfigError::NonFiniteRange("particles.drift"));
        }
        if p.palette.is_empty() {
            return Err(ConfigError::EmptyRange("particles.palette"));
        }
        Ok(())
    }
}

fn parse_var<F, T>(lookup: &F, var: &'static str) -> Result<Option<T>, ConfigError>
where
    F: Fn(&'static str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(var) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidEnv { var, value }),
    }
}
