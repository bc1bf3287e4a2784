//! Render orchestration for the frost TUI

use ratatui::{
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

use frost_core::{Outcome, WidgetView};

use crate::app::App;
use crate::ui::layout::WidgetLayout;
use crate::ui::widgets::{ButtonWidget, FrostWidget, NumberDisplayWidget, SnowfallWidget};

const TITLE: &str = "Random Number Generator";
const HINTS: &str = "Enter/Space/g: generate  click: generate  q: quit";

/// Main render function. Returns the layout used, for mouse hit tests.
pub fn render(frame: &mut Frame, app: &App) -> WidgetLayout {
    let layout = WidgetLayout::calculate(frame.area());
    let view = app.view();

    render_title_bar(frame, app, layout.title_area);
    render_card(frame, app, &view, layout.card_area, layout.number_area);

    let button = ButtonWidget::new(view.label, &app.theme).enabled(view.enabled);
    frame.render_widget(button, layout.button_area);

    if let Some(frost) = view.frost {
        frame.render_widget(FrostWidget::new(frost, &app.theme), layout.button_area);
    }

    // Particles fall over the whole screen, on top of everything else.
    if let Some((_, samples)) = &view.particles {
        frame.render_widget(SnowfallWidget::new(samples, &app.theme), frame.area());
    }

    render_status_bar(frame, app, layout.status_bar);
    render_hint_bar(frame, app, layout.hint_bar);

    layout
}

/// Render the title bar
fn render_title_bar(frame: &mut Frame, app: &App, area: Rect) {
    let line = Line::from(Span::styled(TITLE, app.theme.title_style()));
    frame.render_widget(Paragraph::new(line).alignment(Alignment::Center), area);
}

fn render_card(frame: &mut Frame, app: &App, view: &WidgetView, card: Rect, number: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(app.theme.border_style());
    frame.render_widget(block, card);

    let rare = !view.is_rolling() && app.last_outcome() == Some(Outcome::Rare);
    let rolling = view.is_rolling().then_some(app.animation_frame);
    let display = NumberDisplayWidget::new(view.display_text(), &app.theme)
        .rolling(rolling)
        .rare(rare);
    frame.render_widget(display, number);
}

/// Render the status bar
fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let text = app.status_message().unwrap_or_default();
    let line = Line::from(Span::styled(format!(" {text}"), app.theme.hint_style()));
    frame.render_widget(Paragraph::new(line), area);
}

fn render_hint_bar(frame: &mut Frame, app: &App, area: Rect) {
    let line = Line::from(Span::styled(HINTS, app.theme.hint_style()));
    frame.render_widget(Paragraph::new(line).alignment(Alignment::Center), area);
}
