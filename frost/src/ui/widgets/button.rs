//! The roll button

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    widgets::{Block, BorderType, Borders, Paragraph, Widget},
};

use crate::ui::theme::WidgetTheme;

/// Widget for the roll button
pub struct ButtonWidget<'a> {
    label: &'a str,
    enabled: bool,
    theme: &'a WidgetTheme,
}

impl<'a> ButtonWidget<'a> {
    pub fn new(label: &'a str, theme: &'a WidgetTheme) -> Self {
        Self {
            label,
            enabled: true,
            theme,
        }
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }
}

impl Widget for ButtonWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let style = self.theme.button_style(self.enabled);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(style)
            .style(style);

        Paragraph::new(self.label)
            .alignment(Alignment::Center)
            .block(block)
            .render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_button_uses_disabled_background() {
        let theme = WidgetTheme::default();
        let area = Rect::new(0, 0, 20, 3);
        let mut buf = Buffer::empty(area);
        ButtonWidget::new("Rolling…", &theme)
            .enabled(false)
            .render(area, &mut buf);

        let text: String = buf.content().iter().map(|c| c.symbol()).collect();
        assert!(text.contains("Rolling"));
        assert_eq!(buf[(5, 1)].bg, theme.button_disabled);
    }
}
