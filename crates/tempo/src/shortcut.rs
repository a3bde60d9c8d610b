//! User-configurable keyboard shortcuts.
//!
//! [`ShortcutManager`] reads shortcut strings from the `[shortcuts]`
//! configuration section, registers them in the accelerator map under the
//! action path `"<tempo>/Global/<name>"`, and binds callbacks to those paths
//! in its accelerator group.
//!
//! ```
//! use std::sync::Arc;
//! use tempo::accel_map::{AccelGroup, MemoryAccelMap};
//! use tempo::config::IniConfig;
//! use tempo::shortcut::ShortcutManager;
//!
//! let map = Arc::new(MemoryAccelMap::new());
//! let group = Arc::new(AccelGroup::new(map.clone()));
//! let config = Arc::new(IniConfig::from_str("[shortcuts]\nstop = <control>q\n").unwrap());
//! let shortcuts = ShortcutManager::new(config, map, group);
//!
//! assert_eq!(shortcuts.label(ShortcutManager::START).unwrap(), "Ctrl+S");
//! assert_eq!(shortcuts.label(ShortcutManager::STOP).unwrap(), "Ctrl+Q");
//! ```

use std::collections::HashSet;
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use tempo_core::logging::targets;

use crate::accel::{self, Accelerator, ParseError};
use crate::accel_map::{AccelCallback, AccelGroup, AccelMap, AccelWindow};
use crate::config::{ConfigError, ConfigSource};

/// Errors raised by shortcut operations.
#[derive(Debug, thiserror::Error)]
pub enum ShortcutError {
    /// The shortcut string could not be parsed.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// The shortcut could not be read from the configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The accelerator map refused the change.
    #[error("accelerator map rejected the shortcut for '{name}'")]
    Rejected { name: String },

    /// The accelerator group is already attached to this window.
    #[error("shortcuts are already attached to window {window_id}")]
    AlreadyAttached { window_id: u64 },
}

/// Result type alias for shortcut operations.
pub type ShortcutResult<T> = std::result::Result<T, ShortcutError>;

/// A live shortcut registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortcutBinding {
    /// Shortcut name, e.g. `"start"`.
    pub name: String,
    /// Accelerator mapped to the action path, `None` once another shortcut
    /// has taken it over.
    pub accelerator: Option<Accelerator>,
    /// Action path joining the map entry and the group binding.
    pub action_path: String,
}

/// The shortcut operations session widgets depend on.
pub trait Shortcuts: Send + Sync {
    /// Bind `callback` to the configured shortcut `name`.
    fn connect(&self, name: &str, callback: AccelCallback) -> ShortcutResult<()>;

    /// Display label of the configured shortcut `name`.
    fn label(&self, name: &str) -> ShortcutResult<String>;

    /// Rebind `name` to `shortcut`.
    fn change(&self, name: &str, shortcut: &str) -> ShortcutResult<Accelerator>;

    /// Remove every callback bound to `name`, returning how many were removed.
    fn disconnect(&self, name: &str) -> usize;
}

/// Owns the application's accelerator group and shortcut registrations.
pub struct ShortcutManager {
    config: Arc<dyn ConfigSource>,
    accel_map: Arc<dyn AccelMap>,
    accel_group: Arc<AccelGroup>,
    bindings: RwLock<Vec<ShortcutBinding>>,
    windows: Mutex<HashSet<u64>>,
}

impl ShortcutManager {
    /// Shortcut that starts a session.
    pub const START: &'static str = "start";
    /// Shortcut that stops the running session.
    pub const STOP: &'static str = "stop";
    /// Shortcut that clears the session history.
    pub const RESET: &'static str = "reset";

    /// Configuration section holding shortcut strings.
    pub const SECTION: &'static str = "shortcuts";
    /// Prefix of every action path.
    pub const NAMESPACE: &'static str = "<tempo>";

    /// Create a manager over a configuration source, the accelerator map and
    /// the accelerator group.
    pub fn new(
        config: Arc<dyn ConfigSource>,
        accel_map: Arc<dyn AccelMap>,
        accel_group: Arc<AccelGroup>,
    ) -> Self {
        Self {
            config,
            accel_map,
            accel_group,
            bindings: RwLock::new(Vec::new()),
            windows: Mutex::new(HashSet::new()),
        }
    }

    /// Action path for a shortcut name: `"<tempo>/Global/<name>"`.
    pub fn action_path(name: &str) -> String {
        format!("{}/Global/{}", Self::NAMESPACE, name)
    }

    /// Factory default shortcut string for `name`, if it has one.
    pub fn default_shortcut(name: &str) -> Option<&'static str> {
        match name {
            Self::START => Some("<control>s"),
            Self::STOP => Some("<control>p"),
            Self::RESET => Some("<control>r"),
            _ => None,
        }
    }

    /// The accelerator group callbacks are bound in.
    pub fn accel_group(&self) -> &Arc<AccelGroup> {
        &self.accel_group
    }

    fn configured(&self, name: &str) -> ShortcutResult<Accelerator> {
        let shortcut = self
            .config
            .get(Self::SECTION, name, Self::default_shortcut(name))?;
        Ok(accel::parse(&shortcut)?)
    }

    /// Display label of the configured shortcut, e.g. `"Ctrl+S"`.
    pub fn label(&self, name: &str) -> ShortcutResult<String> {
        let accelerator = self.configured(name)?;
        Ok(accel::format(&accelerator))
    }

    /// Register the configured shortcut `name` and bind `callback` to it.
    ///
    /// Every call registers again; the accelerator map decides what happens
    /// to a path that is already registered.
    pub fn connect(&self, name: &str, callback: AccelCallback) -> ShortcutResult<()> {
        let accelerator = self.configured(name)?;
        let action_path = Self::action_path(name);

        self.accel_map.add_entry(
            &action_path,
            accelerator.key_code,
            accelerator.modifier_mask,
        );
        self.accel_group.connect_by_path(&action_path, callback);

        tracing::debug!(
            target: targets::SHORTCUT,
            name,
            path = %action_path,
            accelerator = %accelerator,
            "shortcut connected"
        );

        let mut bindings = self.bindings.write();
        bindings.retain(|binding| binding.name != name);
        bindings.push(ShortcutBinding {
            name: name.to_string(),
            accelerator: self.accel_map.lookup_entry(&action_path),
            action_path,
        });
        Ok(())
    }

    /// Remove the callbacks bound to `name` and its row in
    /// [`bindings`](Self::bindings).
    ///
    /// The accelerator map entry is left in place.
    pub fn disconnect(&self, name: &str) -> usize {
        let action_path = Self::action_path(name);
        let removed = self.accel_group.disconnect_path(&action_path);
        self.bindings.write().retain(|binding| binding.name != name);
        tracing::debug!(
            target: targets::SHORTCUT,
            name,
            path = %action_path,
            removed,
            "shortcut disconnected"
        );
        removed
    }

    /// Rebind `name` to `shortcut`, replacing whatever the path had before.
    pub fn change(&self, name: &str, shortcut: &str) -> ShortcutResult<Accelerator> {
        let accelerator = accel::parse(shortcut)?;
        let action_path = Self::action_path(name);

        if !self.accel_map.change_entry(
            &action_path,
            accelerator.key_code,
            accelerator.modifier_mask,
            true,
        ) {
            tracing::warn!(
                target: targets::SHORTCUT,
                name,
                shortcut,
                "shortcut change rejected"
            );
            return Err(ShortcutError::Rejected {
                name: name.to_string(),
            });
        }

        tracing::info!(
            target: targets::SHORTCUT,
            name,
            path = %action_path,
            accelerator = %accelerator,
            "shortcut changed"
        );

        // Replacing may have taken the accelerator from other paths.
        for binding in self.bindings.write().iter_mut() {
            binding.accelerator = self.accel_map.lookup_entry(&binding.action_path);
        }
        Ok(accelerator)
    }

    /// Attach the accelerator group to `window`.
    ///
    /// Each window may only be initialized once.
    pub fn initialize(&self, window: &dyn AccelWindow) -> ShortcutResult<()> {
        let window_id = window.window_id();
        if !self.windows.lock().insert(window_id) {
            return Err(ShortcutError::AlreadyAttached { window_id });
        }
        window.add_accel_group(self.accel_group.clone());
        tracing::debug!(target: targets::SHORTCUT, window_id, "accelerator group attached");
        Ok(())
    }

    /// Shortcuts registered through [`connect`](Self::connect), in order.
    pub fn bindings(&self) -> Vec<ShortcutBinding> {
        self.bindings.read().clone()
    }

    /// Accelerator currently mapped to the action path of `name`.
    pub fn accelerator(&self, name: &str) -> Option<Accelerator> {
        self.accel_map.lookup_entry(&Self::action_path(name))
    }
}

impl Shortcuts for ShortcutManager {
    fn connect(&self, name: &str, callback: AccelCallback) -> ShortcutResult<()> {
        ShortcutManager::connect(self, name, callback)
    }

    fn label(&self, name: &str) -> ShortcutResult<String> {
        ShortcutManager::label(self, name)
    }

    fn change(&self, name: &str, shortcut: &str) -> ShortcutResult<Accelerator> {
        ShortcutManager::change(self, name, shortcut)
    }

    fn disconnect(&self, name: &str) -> usize {
        ShortcutManager::disconnect(self, name)
    }
}

impl std::fmt::Debug for ShortcutManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShortcutManager")
            .field("bindings", &*self.bindings.read())
            .field("windows", &*self.windows.lock())
            .finish()
    }
}
