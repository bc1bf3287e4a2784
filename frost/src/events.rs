//! Event handling for the frost TUI

use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::layout::Rect;

use crate::app::App;

/// Result of handling an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventResult {
    Continue,
    Quit,
    NeedsRedraw,
}

/// Handle a terminal event
pub fn handle_event(app: &mut App, event: Event) -> EventResult {
    match event {
        Event::Key(key) => handle_key_event(app, key),
        Event::Mouse(mouse) => handle_mouse_event(app, mouse),
        Event::Resize(width, height) => {
            app.set_viewport(Rect::new(0, 0, width, height));
            EventResult::NeedsRedraw
        }
        _ => EventResult::Continue,
    }
}

/// Handle a key event
fn handle_key_event(app: &mut App, key: KeyEvent) -> EventResult {
    // Releases and repeats would double-press on some terminals
    if key.kind != KeyEventKind::Press {
        return EventResult::Continue;
    }

    if let (KeyCode::Char('c'), KeyModifiers::CONTROL) = (key.code, key.modifiers) {
        return EventResult::Quit;
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => EventResult::Quit,
        KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Char('g') => {
            app.activate();
            EventResult::NeedsRedraw
        }
        _ => EventResult::Continue,
    }
}

/// Handle a mouse event
fn handle_mouse_event(app: &mut App, mouse: MouseEvent) -> EventResult {
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left)
            if app.layout().hits_button(mouse.column, mouse.row) =>
        {
            app.activate();
            EventResult::NeedsRedraw
        }
        _ => EventResult::Continue,
    }
}
