//! UI components
//!
//! The control panel, the loading overlay, and the scene viewport.

pub mod control_panel;
pub mod loading_screen;
pub mod viewport;

pub use control_panel::ControlPanel;
pub use loading_screen::{LoadingScreen, LoadingView};
pub use viewport::{Viewport, ViewportInfo};
