//! TUI components for droidtail
//!
//! This crate provides the terminal user interface: state management,
//! keybindings, event handling, and the device-select and log-viewer
//! screens.

pub mod app;
pub mod config;
pub mod tui;
pub mod ui;

pub use app::{Action, AppState, FilterField, Screen, UiState};
pub use config::{KeyBinding, KeyBindings, KeyContext};
pub use tui::{Event, EventHandler, Tui};
pub use ui::components::{HelpOverlay, ListSelector, StatusBar, list_nav_hints};
pub use ui::screens::{DeviceSelectScreen, LogViewerScreen};
pub use ui::{Layout, Theme};
