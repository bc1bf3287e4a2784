//! TUI widgets for the frost roll widget

pub mod button;
pub mod frost;
pub mod number_display;
pub mod snowfall;

pub use button::ButtonWidget;
pub use frost::FrostWidget;
pub use number_display::NumberDisplayWidget;
pub use snowfall::SnowfallWidget;
