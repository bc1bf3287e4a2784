//! Falling-particle overlay.
//!
//! A particle set is generated once when an [`EffectRun`] starts and never
//! regenerated. Rendering is a pure function of the run and the current
//! time: each particle falls linearly from just above the viewport to just
//! below it, drifting sideways and spinning a fixed amount, then stays off
//! screen. The run is finished once its longest-lived particle has landed.

use rand::rngs::{StdRng, ThreadRng};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Vertical start position, as a fraction of viewport height.
pub const FALL_START_Y: f32 = -0.1;
/// Vertical end position, as a fraction of viewport height.
pub const FALL_END_Y: f32 = 1.1;

/// Identity token of one effect run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RunId(u64);

impl RunId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn get(self) -> u64 {
        self.0
    }

    /// The id that follows this one.
    pub fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "run#{}", self.0)
    }
}

/// Icy palette used by the overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParticleColor {
    Snow,
    Ice,
    Glacier,
    Frost,
    Lilac,
}

impl ParticleColor {
    pub const ALL: [ParticleColor; 5] = [
        ParticleColor::Snow,
        ParticleColor::Ice,
        ParticleColor::Glacier,
        ParticleColor::Frost,
        ParticleColor::Lilac,
    ];

    /// sRGB components.
    pub fn rgb(self) -> (u8, u8, u8) {
        match self {
            ParticleColor::Snow => (248, 250, 252),
            ParticleColor::Ice => (186, 230, 253),
            ParticleColor::Glacier => (125, 211, 252),
            ParticleColor::Frost => (165, 243, 252),
            ParticleColor::Lilac => (221, 214, 254),
        }
    }
}

/// Inclusive `[min, max]` range used for randomized attributes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Span<T> {
    pub min: T,
    pub max: T,
}

impl<T: PartialOrd + Copy> Span<T> {
    pub fn new(min: T, max: T) -> Self {
        Self { min, max }
    }

    pub fn is_valid(&self) -> bool {
        self.min <= self.max
    }
}

impl Span<f32> {
    /// Both bounds and the width between them are finite.
    pub fn is_finite(&self) -> bool {
        (self.max - self.min).is_finite()
    }
}

/// Parameters for particle generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleConfig {
    /// Particles per run.
    pub count: usize,
    /// Relative glyph size.
    pub size: Span<f32>,
    /// Time to cross the viewport.
    pub fall_ms: Span<u64>,
    /// Delay before a particle starts falling.
    pub delay_ms: Span<u64>,
    /// Total horizontal drift over the fall, as a fraction of viewport width.
    pub drift: Span<f32>,
    /// Rotation added over a particle's fall.
    pub spin_degrees: f32,
    pub palette: Vec<ParticleColor>,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            count: 200,
            size: Span::new(0.6, 1.8),
            fall_ms: Span::new(2_600, 5_200),
            delay_ms: Span::new(0, 1_400),
            drift: Span::new(-0.08, 0.08),
            spin_degrees: 360.0,
            palette: ParticleColor::ALL.to_vec(),
        }
    }
}

/// One generated particle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    /// Horizontal start position, fraction of viewport width.
    pub x: f32,
    pub size: f32,
    /// Initial rotation in degrees.
    pub rotation: f32,
    pub fall: Duration,
    pub delay: Duration,
    pub drift: f32,
    pub color: ParticleColor,
}

impl Particle {
    /// Time from run start until this particle has left the viewport.
    pub fn lifetime(&self) -> Duration {
        self.delay + self.fall
    }
}

/// Where a particle is in its single pass through the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParticlePhase {
    Waiting,
    Falling,
    Landed,
}

/// Position of one particle at a point in time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleSample {
    pub x: f32,
    pub y: f32,
    pub rotation: f32,
    pub size: f32,
    pub color: ParticleColor,
    pub phase: ParticlePhase,
}

/// Source of particle sets for new runs.
pub trait ParticleSource {
    fn spawn(&mut self, count: usize) -> Vec<Particle>;
}

impl<T: ParticleSource + ?Sized> ParticleSource for Box<T> {
    fn spawn(&mut self, count: usize) -> Vec<Particle> {
        (**self).spawn(count)
    }
}

/// Draws every particle attribute independently from the configured ranges.
#[derive(Debug, Clone)]
pub struct RandomParticles<R = ThreadRng> {
    rng: R,
    config: ParticleConfig,
}

impl RandomParticles<ThreadRng> {
    pub fn new(config: ParticleConfig) -> Self {
        Self::with_rng(rand::thread_rng(), config)
    }
}

impl RandomParticles<StdRng> {
    pub fn seeded(config: ParticleConfig, seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed), config)
    }
}

impl<R: Rng> RandomParticles<R> {
    pub fn with_rng(rng: R, config: ParticleConfig) -> Self {
        Self { rng, config }
    }

    fn one(&mut self) -> Particle {
        let cfg = &self.config;
        let color = cfg
            .palette
            .choose(&mut self.rng)
            .copied()
            .unwrap_or(ParticleColor::Snow);

        Particle {
            x: self.rng.gen_range(0.0..=1.0),
            size: self.rng.gen_range(cfg.size.min..=cfg.size.max),
            rotation: self.rng.gen_range(0.0..360.0),
            fall: Duration::from_millis(self.rng.gen_range(cfg.fall_ms.min..=cfg.fall_ms.max)),
            delay: Duration::from_millis(self.rng.gen_range(cfg.delay_ms.min..=cfg.delay_ms.max)),
            drift: self.rng.gen_range(cfg.drift.min..=cfg.drift.max),
            color,
        }
    }
}

impl<R: Rng> ParticleSource for RandomParticles<R> {
    fn spawn(&mut self, count: usize) -> Vec<Particle> {
        (0..count).map(|_| self.one()).collect()
    }
}

/// One instantiation of the particle overlay.
#[derive(Debug, Clone, PartialEq)]
pub struct EffectRun {
    id: RunId,
    started_at: Duration,
    particles: Vec<Particle>,
    spin_degrees: f32,
}

impl EffectRun {
    pub fn new(id: RunId, started_at: Duration, particles: Vec<Particle>, spin_degrees: f32) -> Self {
        Self {
            id,
            started_at,
            particles,
            spin_degrees,
        }
    }

    pub fn id(&self) -> RunId {
        self.id
    }

    pub fn started_at(&self) -> Duration {
        self.started_at
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Lifetime of the longest-lived particle; zero for an empty run.
    pub fn lifetime(&self) -> Duration {
        self.particles
            .iter()
            .map(Particle::lifetime)
            .max()
            .unwrap_or(Duration::ZERO)
    }

    /// When the completion signal fires, given the trailing buffer.
    pub fn completes_at(&self, buffer: Duration) -> Duration {
        self.started_at
            .saturating_add(self.lifetime())
            .saturating_add(buffer)
    }

    /// Sample every particle at `now`.
    pub fn sample(&self, now: Duration) -> Vec<ParticleSample> {
        let elapsed = now.saturating_sub(self.started_at);
        self.particles
            .iter()
            .map(|p| sample_particle(p, elapsed, self.spin_degrees))
            .collect()
    }
}

fn sample_particle(p: &Particle, elapsed: Duration, spin_degrees: f32) -> ParticleSample {
    let (progress, phase) = if elapsed < p.delay {
        (0.0, ParticlePhase::Waiting)
    } else if p.fall.is_zero() || elapsed >= p.lifetime() {
        (1.0, ParticlePhase::Landed)
    } else {
        let t = (elapsed - p.delay).as_secs_f32() / p.fall.as_secs_f32();
        (t.clamp(0.0, 1.0), ParticlePhase::Falling)
    };

    ParticleSample {
        x: p.x + p.drift * progress,
        y: FALL_START_Y + (FALL_END_Y - FALL_START_Y) * progress,
        rotation: (p.rotation + spin_degrees * progress) % 360.0,
        size: p.size,
        color: p.color,
        phase,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn particle(delay_ms: u64, fall_ms: u64) -> Particle {
        Particle {
            x: 0.5,
            size: 1.0,
            rotation: 0.0,
            fall: Duration::from_millis(fall_ms),
            delay: Duration::from_millis(delay_ms),
            drift: 0.1,
            color: ParticleColor::Snow,
        }
    }

    #[test]
    fn test_lifetime_is_longest_particle() {
        let run = EffectRun::new(
            RunId::new(1),
            Duration::from_millis(1_000),
            vec![particle(0, 3_000), particle(900, 2_500), particle(200, 1_000)],
            360.0,
        );
        assert_eq!(run.lifetime(), Duration::from_millis(3_400));
        assert_eq!(
            run.completes_at(Duration::from_millis(150)),
            Duration::from_millis(4_550)
        );
    }

    #[test]
    fn test_empty_run_has_zero_lifetime() {
        let run = EffectRun::new(RunId::new(1), Duration::from_secs(2), Vec::new(), 360.0);
        assert_eq!(run.lifetime(), Duration::ZERO);
        assert_eq!(run.completes_at(Duration::from_millis(150)), Duration::from_millis(2_150));
    }

    #[test]
    fn test_sample_phases() {
        let run = EffectRun::new(RunId::new(1), Duration::ZERO, vec![particle(500, 1_000)], 360.0);

        let waiting = run.sample(Duration::from_millis(100))[0];
        assert_eq!(waiting.phase, ParticlePhase::Waiting);
        assert_eq!(waiting.y, FALL_START_Y);

        let halfway = run.sample(Duration::from_millis(1_000))[0];
        assert_eq!(halfway.phase, ParticlePhase::Falling);
        assert!((halfway.y - 0.5).abs() < 1e-4);
        assert!((halfway.x - 0.55).abs() < 1e-4);
        assert!((halfway.rotation - 180.0).abs() < 1e-3);

        let landed = run.sample(Duration::from_millis(5_000))[0];
        assert_eq!(landed.phase, ParticlePhase::Landed);
        assert_eq!(landed.y, FALL_END_Y);
    }

    #[test]
    fn test_sampling_does_not_mutate_run() {
        let mut source = RandomParticles::seeded(ParticleConfig::default(), 7);
        let run = EffectRun::new(RunId::new(3), Duration::ZERO, source.spawn(50), 360.0);
        let before = run.clone();
        let a = run.sample(Duration::from_millis(1_234));
        let b = run.sample(Duration::from_millis(1_234));
        assert_eq!(a, b);
        assert_eq!(run, before);
    }

    #[test]
    fn test_random_particles_respect_ranges() {
        let config = ParticleConfig::default();
        let mut source = RandomParticles::seeded(config.clone(), 42);
        let particles = source.spawn(260);
        assert_eq!(particles.len(), 260);

        for p in &particles {
            assert!((0.0..=1.0).contains(&p.x));
            assert!(p.size >= config.size.min && p.size <= config.size.max);
            assert!(p.fall >= Duration::from_millis(config.fall_ms.min));
            assert!(p.fall <= Duration::from_millis(config.fall_ms.max));
            assert!(p.delay <= Duration::from_millis(config.delay_ms.max));
            assert!(p.drift >= config.drift.min && p.drift <= config.drift.max);
            assert!(config.palette.contains(&p.color));
        }
    }

    #[test]
    fn test_run_id_display_and_next() {
        let id = RunId::new(4);
        assert_eq!(id.next().get(), 5);
        assert_eq!(id.to_string(), "run#4");
    }
}
