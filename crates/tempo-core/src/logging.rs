//! Logging facilities for Tempo.
//!
//! Tempo uses the `tracing` crate for instrumentation. Libraries never
//! install a subscriber; to see logs, install one in your application:
//!
//! ```ignore
//! fn main() {
//!     tracing_subscriber::fmt()
//!         .with_env_filter("tempo=debug,tempo_core=debug")
//!         .init();
//! }
//! ```

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Core crate target.
    pub const CORE: &str = "tempo_core";
    /// Signal/slot system target.
    pub const SIGNAL: &str = "tempo_core::signal";
    /// Session event bus target.
    pub const BUS: &str = "tempo_core::bus";
    /// Shortcut manager target.
    pub const SHORTCUT: &str = "tempo::shortcut";
    /// Session control panel target.
    pub const PANEL: &str = "tempo::panel";
    /// Configuration source target.
    pub const CONFIG: &str = "tempo::config";
    /// Session controller target.
    pub const SESSION: &str = "tempo::session";
    /// Composition root target.
    pub const APP: &str = "tempo::app";
}
