//! Tempo - session controls and configurable keyboard shortcuts for a
//! productivity timer.
//!
//! This is the main crate. It re-exports everything in `tempo_core` and adds:
//!
//! - [`accel`]: parsing and formatting of shortcut strings
//! - [`accel_map`]: the accelerator map and accelerator groups
//! - [`config`]: configuration lookup and the INI configuration file
//! - [`shortcut`]: the [`ShortcutManager`](shortcut::ShortcutManager)
//! - [`session`]: session controllers
//! - [`widget`]: buttons, windows and the session control panel
//! - [`app`]: the [`Application`] composition root
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use tempo::Application;
//! use tempo::config::IniConfig;
//! use tempo::session::ManualSession;
//! use tempo::widget::Menu;
//!
//! struct AppMenu;
//! impl Menu for AppMenu {
//!     fn popup(&self) {}
//! }
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let app = Application::new(Arc::new(IniConfig::new()), Arc::new(AppMenu), |bus| {
//!         Arc::new(ManualSession::new(bus))
//!     })?;
//!     app.panel().start_button().click();
//!     assert!(app.panel().stop_button().is_visible());
//!     Ok(())
//! }
//! ```

pub use tempo_core::*;

pub mod accel;
pub mod accel_map;
pub mod app;
pub mod config;
pub mod session;
pub mod shortcut;
pub mod widget;

pub use accel::{Accelerator, ModifierMask, ParseError};
pub use app::Application;
pub use shortcut::{ShortcutError, ShortcutManager, Shortcuts};
