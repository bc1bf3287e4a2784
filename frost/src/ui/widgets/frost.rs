//! Frost overlay drawn over the button

use frost_core::frost::{FrostFrame, FrostPhase};
use ratatui::{buffer::Buffer, layout::Rect, style::Color, widgets::Widget};

use crate::ui::theme::WidgetTheme;

/// Crystals used to fill empty cells, densest first.
const CRYSTALS: [&str; 3] = ["❄", "✻", "·"];

/// Covers an already rendered area with ice.
///
/// Text underneath stays readable: only blank cells get crystals, every
/// cell takes the frost background while the overlay is mostly opaque.
pub struct FrostWidget<'a> {
    frame: FrostFrame,
    theme: &'a WidgetTheme,
}

impl<'a> FrostWidget<'a> {
    pub fn new(frame: FrostFrame, theme: &'a WidgetTheme) -> Self {
        Self { frame, theme }
    }

    fn crystal(&self, x: u16, y: u16) -> Option<&'static str> {
        // Fewer cells carry a crystal as the overlay thins out.
        let density = (self.frame.opacity * 4.0).ceil() as u16;
        let hash = x.wrapping_mul(7).wrapping_add(y.wrapping_mul(13)) % 5;
        if hash >= density {
            return None;
        }
        let idx = match self.frame.phase {
            FrostPhase::Solid => 0,
            FrostPhase::Melting if self.frame.opacity > 0.6 => 1,
            FrostPhase::Melting => 2,
        };
        Some(CRYSTALS[(idx + hash as usize) % CRYSTALS.len()])
    }
}

impl Widget for FrostWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if self.frame.opacity <= 0.0 {
            return;
        }
        let color = self.theme.frost_color(self.frame.opacity);
        let opaque = self.frame.opacity >= 0.5;

        for y in area.top()..area.bottom() {
            for x in area.left()..area.right() {
                let crystal = self.crystal(x, y);
                let cell = &mut buf[(x, y)];
                let blank = cell.symbol() == " ";

                if opaque {
                    cell.set_bg(color).set_fg(Color::Rgb(12, 74, 110));
                } else {
                    cell.set_fg(color);
                }
                if blank {
                    if let Some(crystal) = crystal {
                        cell.set_symbol(crystal).set_fg(color);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(phase: FrostPhase, opacity: f32) -> FrostFrame {
        FrostFrame { phase, opacity }
    }

    fn crystal_count(buf: &Buffer) -> usize {
        buf.content()
            .iter()
            .filter(|c| CRYSTALS.contains(&c.symbol()))
            .count()
    }

    #[test]
    fn test_solid_frost_covers_background() {
        let theme = WidgetTheme::default();
        let area = Rect::new(0, 0, 10, 3);
        let mut buf = Buffer::empty(area);
        FrostWidget::new(frame(FrostPhase::Solid, 1.0), &theme).render(area, &mut buf);

        assert!(buf.content().iter().all(|c| c.bg == theme.frost_solid));
        assert!(crystal_count(&buf) > 0);
    }

    #[test]
    fn test_melting_thins_out() {
        let theme = WidgetTheme::default();
        let area = Rect::new(0, 0, 20, 3);

        let mut thick = Buffer::empty(area);
        FrostWidget::new(frame(FrostPhase::Melting, 0.9), &theme).render(area, &mut thick);
        let mut thin = Buffer::empty(area);
        FrostWidget::new(frame(FrostPhase::Melting, 0.1), &theme).render(area, &mut thin);

        assert!(crystal_count(&thin) < crystal_count(&thick));
        assert!(thin.content().iter().all(|c| c.bg == Color::Reset));
    }

    #[test]
    fn test_text_is_kept() {
        let theme = WidgetTheme::default();
        let area = Rect::new(0, 0, 6, 1);
        let mut buf = Buffer::with_lines(["Frozen"]);
        FrostWidget::new(frame(FrostPhase::Solid, 1.0), &theme).render(area, &mut buf);
        let text: String = buf.content().iter().map(|c| c.symbol()).collect();
        assert_eq!(text, "Frozen");
    }
}
