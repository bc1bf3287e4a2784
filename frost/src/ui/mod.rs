//! UI module for the frost TUI

pub mod layout;
pub mod render;
pub mod theme;
pub mod widgets;
