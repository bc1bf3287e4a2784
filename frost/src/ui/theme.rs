//! Color theme and styling for the frost TUI

use frost_core::particles::ParticleColor;
use ratatui::style::{Color, Modifier, Style};

/// Widget color theme
#[derive(Debug, Clone)]
pub struct WidgetTheme {
    // Base colors
    pub border: Color,
    pub muted: Color,

    // Number display
    pub number: Color,
    pub number_rare: Color,

    // Button
    pub button: Color,
    pub button_text: Color,
    pub button_disabled: Color,

    // Frost overlay, solid to faint
    pub frost_solid: Color,
    pub frost_faint: Color,
}

impl Default for WidgetTheme {
    fn default() -> Self {
        Self {
            border: Color::Rgb(127, 29, 29),
            muted: Color::DarkGray,

            number: Color::Rgb(248, 113, 113),
            number_rare: Color::Rgb(186, 230, 253),

            button: Color::Rgb(239, 68, 68),
            button_text: Color::White,
            button_disabled: Color::Rgb(127, 29, 29),

            frost_solid: Color::Rgb(224, 242, 254),
            frost_faint: Color::Rgb(125, 211, 252),
        }
    }
}

impl WidgetTheme {
    /// Get title style
    pub fn title_style(&self) -> Style {
        Style::default()
            .fg(self.number)
            .add_modifier(Modifier::BOLD)
    }

    pub fn border_style(&self) -> Style {
        Style::default().fg(self.border)
    }

    /// Get style for the displayed number
    pub fn number_style(&self, rare: bool) -> Style {
        Style::default()
            .fg(if rare { self.number_rare } else { self.number })
            .add_modifier(Modifier::BOLD)
    }

    /// Get button style; disabled buttons are dimmed
    pub fn button_style(&self, enabled: bool) -> Style {
        if enabled {
            Style::default()
                .fg(self.button_text)
                .bg(self.button)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default()
                .fg(self.muted)
                .bg(self.button_disabled)
        }
    }

    /// Get style for status and hint lines
    pub fn hint_style(&self) -> Style {
        Style::default()
            .fg(self.muted)
            .add_modifier(Modifier::DIM)
    }

    /// Frost color at the given opacity
    pub fn frost_color(&self, opacity: f32) -> Color {
        blend(self.frost_faint, self.frost_solid, opacity)
    }

    /// Terminal color for a particle
    pub fn particle_color(&self, color: ParticleColor) -> Color {
        let (r, g, b) = color.rgb();
        Color::Rgb(r, g, b)
    }
}

/// Linear mix of two RGB colors; `t = 1.0` yields `to`.
fn blend(from: Color, to: Color, t: f32) -> Color {
    match (from, to) {
        (Color::Rgb(r1, g1, b1), Color::Rgb(r2, g2, b2)) => {
            let t = t.clamp(0.0, 1.0);
            let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
            Color::Rgb(mix(r1, r2), mix(g1, g2), mix(b1, b2))
        }
        _ if t >= 0.5 => to,
        _ => from,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frost_color_endpoints() {
        let theme = WidgetTheme::default();
        assert_eq!(theme.frost_color(1.0), theme.frost_solid);
        assert_eq!(theme.frost_color(0.0), theme.frost_faint);
        assert_eq!(theme.frost_color(7.0), theme.frost_solid);
    }

    #[test]
    fn test_blend_named_colors() {
        assert_eq!(blend(Color::Red, Color::Blue, 0.2), Color::Red);
        assert_eq!(blend(Color::Red, Color::Blue, 0.8), Color::Blue);
    }
}
