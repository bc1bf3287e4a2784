//! Frost overlay layered over the button.
//!
//! The overlay has no state of its own. It renders solid while the widget
//! is frozen and plays a one-shot melt while `is_melting` is set, after
//! which it is removed.

use std::time::Duration;

/// Which visual phase the overlay is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrostPhase {
    Solid,
    Melting,
}

/// What to draw for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrostFrame {
    pub phase: FrostPhase,
    /// 1.0 is fully frosted, 0.0 is gone.
    pub opacity: f32,
}

/// Sample the overlay.
///
/// `since_melt` is the time elapsed since melting began and is ignored
/// while `is_melting` is false. Returns `None` once the melt has run for
/// `melt_duration`.
pub fn sample(is_melting: bool, since_melt: Duration, melt_duration: Duration) -> Option<FrostFrame> {
    if !is_melting {
        return Some(FrostFrame {
            phase: FrostPhase::Solid,
            opacity: 1.0,
        });
    }

    if since_melt >= melt_duration {
        return None;
    }

    let progress = since_melt.as_secs_f32() / melt_duration.as_secs_f32();
    Some(FrostFrame {
        phase: FrostPhase::Melting,
        opacity: 1.0 - ease_out_quad(progress),
    })
}

/// Quadratic ease-out.
fn ease_out_quad(t: f32) -> f32 {
    1.0 - (1.0 - t) * (1.0 - t)
}
