//! Headless widgets.
//!
//! Widgets here hold their visible state in [`Property`](tempo_core::Property)
//! values and announce interaction through [`Signal`](tempo_core::Signal)s.
//! Drawing them is left to whatever backend observes those properties.
//!
//! - [`Button`]: a clickable control with text, visibility and enabled state.
//! - [`Menu`]: the popup menu contract.
//! - [`Window`]: a top-level window that accelerator groups attach to.
//! - [`SessionControlPanel`]: the start/stop/reset controls and session title.

mod button;
mod menu;
pub mod session_panel;
mod window;

pub use button::Button;
pub use menu::Menu;
pub use session_panel::SessionControlPanel;
pub use window::Window;
