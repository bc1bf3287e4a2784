//! Number display with a rolling animation

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use crate::ui::theme::WidgetTheme;

const SPIN_CHARS: [char; 4] = ['|', '/', '-', '\\'];

/// Widget showing the current value, or a spinner while rolling
pub struct NumberDisplayWidget<'a> {
    text: String,
    rolling: Option<u8>,
    rare: bool,
    theme: &'a WidgetTheme,
}

impl<'a> NumberDisplayWidget<'a> {
    pub fn new(text: impl Into<String>, theme: &'a WidgetTheme) -> Self {
        Self {
            text: text.into(),
            rolling: None,
            rare: false,
            theme,
        }
    }

    /// Show the rolling animation at the given frame.
    pub fn rolling(mut self, frame: Option<u8>) -> Self {
        self.rolling = frame;
        self
    }

    pub fn rare(mut self, rare: bool) -> Self {
        self.rare = rare;
        self
    }
}

impl Widget for NumberDisplayWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let style = self.theme.number_style(self.rare);
        let mut lines: Vec<Line> = Vec::new();

        match self.rolling {
            Some(frame) => {
                let spin = SPIN_CHARS[(frame as usize) % SPIN_CHARS.len()];
                lines.push(Line::from("╭─────╮"));
                lines.push(Line::from(Span::styled(format!("│ {spin}{:^2} │", self.text), style)));
                lines.push(Line::from("╰─────╯"));
            }
            None => {
                lines.push(Line::from("╭─────╮"));
                lines.push(Line::from(Span::styled(
                    format!("│ {:^3} │", self.text),
                    style,
                )));
                lines.push(Line::from("╰─────╯"));
            }
        }

        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            if self.rare { "rare" } else { "" },
            Style::default()
                .fg(self.theme.number_rare)
                .add_modifier(Modifier::ITALIC),
        )));

        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rendered(widget: NumberDisplayWidget, area: Rect) -> String {
        let mut buf = Buffer::empty(area);
        widget.render(area, &mut buf);
        buf.content().iter().map(|c| c.symbol()).collect()
    }

    #[test]
    fn test_renders_value() {
        let theme = WidgetTheme::default();
        let text = rendered(NumberDisplayWidget::new("69", &theme), Rect::new(0, 0, 20, 5));
        assert!(text.contains("69"));
        assert!(!text.contains("rare"));
    }

    #[test]
    fn test_rolling_shows_spinner_and_placeholder() {
        let theme = WidgetTheme::default();
        let widget = NumberDisplayWidget::new("…", &theme).rolling(Some(1));
        let text = rendered(widget, Rect::new(0, 0, 20, 5));
        assert!(text.contains('/'));
        assert!(text.contains('…'));
    }

    #[test]
    fn test_rare_tag() {
        let theme = WidgetTheme::default();
        let widget = NumberDisplayWidget::new("67", &theme).rare(true);
        assert!(rendered(widget, Rect::new(0, 0, 20, 5)).contains("rare"));
    }
}
