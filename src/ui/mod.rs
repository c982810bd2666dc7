//! Terminal rendering for the occupancy viewer.
//!
//! - [`common`]: header bar, tab bar, status bar, and help overlay
//! - [`status`]: the status indicator plus raw snapshot details
//! - [`history`]: the historical snapshot list
//! - [`theme`]: color themes with terminal background auto-detection

pub mod common;
pub mod history;
pub mod status;
pub mod theme;

pub use theme::Theme;
