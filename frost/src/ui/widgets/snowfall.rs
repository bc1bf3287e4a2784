//! Falling particle overlay

use frost_core::particles::{ParticlePhase, ParticleSample};
use ratatui::{buffer::Buffer, layout::Rect, widgets::Widget};

use crate::ui::theme::WidgetTheme;

/// Draws the falling particles of an effect run over whatever is below.
///
/// Sample coordinates are fractions of the area; particles above or below
/// it are skipped.
pub struct SnowfallWidget<'a> {
    samples: &'a [ParticleSample],
    theme: &'a WidgetTheme,
}

impl<'a> SnowfallWidget<'a> {
    pub fn new(samples: &'a [ParticleSample], theme: &'a WidgetTheme) -> Self {
        Self { samples, theme }
    }
}

/// Glyph for a particle, picked by size and current spin.
fn glyph(sample: &ParticleSample) -> &'static str {
    if sample.size < 0.9 {
        return "·";
    }
    if sample.size < 1.4 {
        return "*";
    }
    // Quarter turns alternate between two flake shapes.
    let quarter = (sample.rotation.rem_euclid(360.0) / 90.0) as u32;
    if quarter % 2 == 0 {
        "❄"
    } else {
        "❅"
    }
}

/// Cell for a fractional position, if it lands inside `area`.
fn cell_at(area: Rect, x: f32, y: f32) -> Option<(u16, u16)> {
    if !(0.0..1.0).contains(&x) || !(0.0..1.0).contains(&y) {
        return None;
    }
    let col = area.x + (x * area.width as f32) as u16;
    let row = area.y + (y * area.height as f32) as u16;
    (col < area.right() && row < area.bottom()).then_some((col, row))
}

impl Widget for SnowfallWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        for sample in self.samples {
            if sample.phase != ParticlePhase::Falling {
                continue;
            }
            let Some(pos) = cell_at(area, sample.x, sample.y) else {
                continue;
            };
            buf[pos]
                .set_symbol(glyph(sample))
                .set_fg(self.theme.particle_color(sample.color));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use frost_core::particles::ParticleColor;

    fn sample(x: f32, y: f32, size: f32, phase: ParticlePhase) -> ParticleSample {
        ParticleSample {
            x,
            y,
            rotation: 0.0,
            size,
            color: ParticleColor::Ice,
            phase,
        }
    }

    #[test]
    fn test_only_falling_particles_drawn() {
        let theme = WidgetTheme::default();
        let samples = [
            sample(0.5, 0.5, 1.8, ParticlePhase::Falling),
            sample(0.1, -0.1, 1.8, ParticlePhase::Waiting),
            sample(0.9, 1.1, 1.8, ParticlePhase::Landed),
        ];
        let area = Rect::new(0, 0, 10, 10);
        let mut buf = Buffer::empty(area);
        SnowfallWidget::new(&samples, &theme).render(area, &mut buf);

        assert_eq!(buf[(5, 5)].symbol(), "❄");
        assert_eq!(buf[(5, 5)].fg, theme.particle_color(ParticleColor::Ice));
        let drawn = buf.content().iter().filter(|c| c.symbol() != " ").count();
        assert_eq!(drawn, 1);
    }

    #[test]
    fn test_glyph_by_size() {
        assert_eq!(glyph(&sample(0.0, 0.0, 0.6, ParticlePhase::Falling)), "·");
        assert_eq!(glyph(&sample(0.0, 0.0, 1.0, ParticlePhase::Falling)), "*");
        let mut big = sample(0.0, 0.0, 1.6, ParticlePhase::Falling);
        big.rotation = 100.0;
        assert_eq!(glyph(&big), "❅");
    }

    #[test]
    fn test_cell_at_bounds() {
        let area = Rect::new(2, 3, 10, 4);
        assert_eq!(cell_at(area, 0.0, 0.0), Some((2, 3)));
        assert_eq!(cell_at(area, 0.99, 0.99), Some((11, 6)));
        assert_eq!(cell_at(area, 1.0, 0.5), None);
        assert_eq!(cell_at(area, 0.5, -0.05), None);
    }
}
