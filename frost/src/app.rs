//! Main application state and logic

use std::time::{Duration, Instant};

use frost_core::{BoxedMachine, Outcome, RollState, Transition, TriggerResult, WidgetView};
use ratatui::layout::Rect;
use tracing::{debug, info};

use crate::ui::layout::WidgetLayout;
use crate::ui::theme::WidgetTheme;

/// Redraw interval while something is moving on screen.
pub const FRAME_INTERVAL: Duration = Duration::from_millis(33);
/// Longest sleep between wakeups while idle.
pub const IDLE_WAIT: Duration = Duration::from_secs(1);

/// Main application state
pub struct App {
    machine: BoxedMachine,
    mounted_at: Instant,
    /// Widget time of the last tick; every frame is drawn at this instant.
    last_tick: Duration,

    // UI state
    pub theme: WidgetTheme,
    /// Layout of the last drawn frame
    layout: WidgetLayout,

    // Status
    status_message: Option<String>,
    pub should_quit: bool,

    // Animation
    pub animation_frame: u8,
}

impl App {
    pub fn new(machine: BoxedMachine, viewport: Rect) -> Self {
        Self {
            machine,
            mounted_at: Instant::now(),
            last_tick: Duration::ZERO,
            theme: WidgetTheme::default(),
            layout: WidgetLayout::calculate(viewport),
            status_message: None,
            should_quit: false,
            animation_frame: 0,
        }
    }

    /// Time since the widget was mounted.
    pub fn now(&self) -> Duration {
        self.mounted_at.elapsed()
    }

    /// Press the button.
    pub fn activate(&mut self) -> TriggerResult {
        self.activate_at(self.now())
    }

    pub fn activate_at(&mut self, now: Duration) -> TriggerResult {
        let result = self.machine.trigger(now);
        match result {
            TriggerResult::Started { .. } => self.clear_status(),
            TriggerResult::Ignored(state) => debug!(%state, "button press ignored"),
            TriggerResult::TornDown => {}
        }
        result
    }

    /// Tick for animations and timers
    pub fn tick(&mut self) {
        self.tick_at(self.now());
    }

    pub fn tick_at(&mut self, now: Duration) {
        self.last_tick = now;
        if self.machine.state().is_busy() {
            self.animation_frame = self.animation_frame.wrapping_add(1);
        }
        for transition in self.machine.advance(now) {
            self.on_transition(&transition);
        }
    }

    fn on_transition(&mut self, t: &Transition) {
        match (t.to, t.outcome) {
            (RollState::Frozen, _) => {
                info!(value = self.machine.displayed(), "rare roll");
                self.set_status("Rare roll! Frozen until the snow settles");
            }
            (RollState::Melting, _) => self.set_status("Melting..."),
            (RollState::Idle, Some(Outcome::Common)) => {
                self.set_status(format!("Rolled {}", self.machine.displayed()));
            }
            (RollState::Idle, _) => self.set_status("Thawed"),
            (RollState::Rolling, _) => {}
        }
    }

    /// How long the event loop may sleep before the next tick.
    pub fn next_wake(&self, now: Duration) -> Duration {
        let until_deadline = self
            .machine
            .next_deadline()
            .map(|due| due.saturating_sub(now));

        if self.machine.state().is_busy() {
            until_deadline.map_or(FRAME_INTERVAL, |d| d.min(FRAME_INTERVAL))
        } else {
            until_deadline.map_or(IDLE_WAIT, |d| d.min(IDLE_WAIT))
        }
    }

    /// Drop pending timers before exit.
    pub fn teardown(&mut self) {
        self.machine.teardown();
    }

    /// Set status message (always overwrites)
    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    /// Clear status message
    pub fn clear_status(&mut self) {
        self.status_message = None;
    }

    // =========================================================================
    // Getters for private fields
    // =========================================================================

    /// Observable widget state at the last tick
    pub fn view(&self) -> WidgetView<'_> {
        WidgetView::project(&self.machine, self.last_tick)
    }

    pub fn last_outcome(&self) -> Option<Outcome> {
        self.machine.last_outcome()
    }

    /// Get the current status message
    pub fn status_message(&self) -> Option<&str> {
        self.status_message.as_deref()
    }

    pub fn layout(&self) -> &WidgetLayout {
        &self.layout
    }

    #[cfg(test)]
    pub fn machine(&self) -> &BoxedMachine {
        &self.machine
    }

    // =========================================================================
    // Setters for private fields
    // =========================================================================

    /// Recompute the layout for a new terminal size
    pub fn set_viewport(&mut self, area: Rect) {
        self.layout = WidgetLayout::calculate(area);
    }

    /// Keep the layout of the last drawn frame for mouse hit tests
    pub fn set_layout(&mut self, layout: WidgetLayout) {
        self.layout = layout;
    }
}
