//! Layout calculations for the frost TUI

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Width of the centered card holding the number and button.
pub const CARD_WIDTH: u16 = 36;
/// Height of the card.
pub const CARD_HEIGHT: u16 = 13;

/// Screen areas for one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WidgetLayout {
    pub title_area: Rect,
    pub card_area: Rect,
    pub number_area: Rect,
    pub button_area: Rect,
    pub status_bar: Rect,
    pub hint_bar: Rect,
}

impl WidgetLayout {
    /// Calculate layout based on terminal size
    pub fn calculate(area: Rect) -> Self {
        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // Title bar
                Constraint::Min(CARD_HEIGHT),
                Constraint::Length(1), // Status bar
                Constraint::Length(1), // Hint bar
            ])
            .split(area);

        let card_area = centered_rect_fixed(CARD_WIDTH, CARD_HEIGHT, main_chunks[1]);

        // Card interior: border, number, gap, button, border
        let card_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Length(5), // Number
                Constraint::Length(2),
                Constraint::Length(3), // Button
                Constraint::Min(0),
            ])
            .split(card_area);

        let button_area = centered_rect_fixed(20, 3, card_chunks[3]);

        Self {
            title_area: main_chunks[0],
            card_area,
            number_area: card_chunks[1],
            button_area,
            status_bar: main_chunks[2],
            hint_bar: main_chunks[3],
        }
    }

    /// Whether a terminal cell falls on the button.
    pub fn hits_button(&self, column: u16, row: u16) -> bool {
        let b = self.button_area;
        column >= b.x && column < b.x + b.width && row >= b.y && row < b.y + b.height
    }
}

/// Create a centered rectangle with fixed dimensions
pub fn centered_rect_fixed(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;

    Rect::new(x, y, width.min(area.width), height.min(area.height))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_button_inside_card() {
        let layout = WidgetLayout::calculate(Rect::new(0, 0, 80, 24));
        assert!(layout.card_area.contains(layout.button_area.as_position()));
        assert_eq!(layout.button_area.height, 3);
        assert_eq!(layout.card_area.width, CARD_WIDTH);
    }

    #[test]
    fn test_hits_button() {
        let layout = WidgetLayout::calculate(Rect::new(0, 0, 80, 24));
        let b = layout.button_area;
        assert!(layout.hits_button(b.x, b.y));
        assert!(layout.hits_button(b.x + b.width - 1, b.y + b.height - 1));
        assert!(!layout.hits_button(b.x + b.width, b.y));
        assert!(!layout.hits_button(0, 0));
    }

    #[test]
    fn test_centered_rect_clamps_to_area() {
        let rect = centered_rect_fixed(50, 20, Rect::new(0, 0, 30, 10));
        assert_eq!(rect, Rect::new(0, 0, 30, 10));
    }
}
