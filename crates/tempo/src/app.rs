//! Application composition root.
//!
//! [`Application`] builds every shared component once and hands each one the
//! collaborators it needs: the session bus, the accelerator map and group,
//! the shortcut manager, the session controller and the session panel.
//!
//! ```
//! use std::sync::Arc;
//! use tempo::app::Application;
//! use tempo::config::IniConfig;
//! use tempo::session::ManualSession;
//! use tempo::widget::{Menu, Window};
//!
//! struct NoMenu;
//! impl Menu for NoMenu {
//!     fn popup(&self) {}
//! }
//!
//! let app = Application::new(Arc::new(IniConfig::new()), Arc::new(NoMenu), |bus| {
//!     Arc::new(ManualSession::new(bus))
//! })
//! .unwrap();
//!
//! let window = Window::new("Tempo");
//! app.attach(&window).unwrap();
//! assert!(app.activate(&"<control>s".parse().unwrap()));
//! assert!(!app.panel().start_button().is_visible());
//! ```

use std::sync::Arc;

use tempo_core::logging::targets;
use tempo_core::{ConnectionGuard, SessionEventBus};

use crate::accel::Accelerator;
use crate::accel_map::{AccelGroup, AccelWindow, MemoryAccelMap};
use crate::config::{ConfigChange, ConfigResult, IniConfig};
use crate::session::SessionController;
use crate::shortcut::{ShortcutManager, ShortcutResult};
use crate::widget::{Menu, SessionControlPanel};

/// The wired-up application.
pub struct Application {
    config: Arc<IniConfig>,
    bus: Arc<SessionEventBus>,
    shortcuts: Arc<ShortcutManager>,
    controller: Arc<dyn SessionController>,
    panel: Arc<SessionControlPanel>,
    _config_watch: ConnectionGuard<ConfigChange>,
}

impl Application {
    /// Build the application.
    ///
    /// `make_controller` receives the session bus the controller must
    /// announce on.
    ///
    /// # Errors
    ///
    /// Fails if one of the session shortcuts in `config` is invalid.
    pub fn new<F>(
        config: Arc<IniConfig>,
        menu: Arc<dyn Menu>,
        make_controller: F,
    ) -> ShortcutResult<Self>
    where
        F: FnOnce(Arc<SessionEventBus>) -> Arc<dyn SessionController>,
    {
        let bus = Arc::new(SessionEventBus::new());
        let accel_map = Arc::new(MemoryAccelMap::new());
        let accel_group = Arc::new(AccelGroup::new(accel_map.clone()));
        let shortcuts = Arc::new(ShortcutManager::new(config.clone(), accel_map, accel_group));
        let controller = make_controller(bus.clone());
        let panel = SessionControlPanel::new(
            controller.clone(),
            menu,
            &*shortcuts,
            bus.clone(),
        )?;

        let watched_shortcuts = Arc::downgrade(&shortcuts);
        let watched_panel = Arc::downgrade(&panel);
        let config_watch = config.changed().connect_scoped(move |(section, option, value)| {
            if section != ShortcutManager::SECTION {
                return;
            }
            let Some(shortcuts) = watched_shortcuts.upgrade() else {
                return;
            };
            if let Err(error) = shortcuts.change(option, value) {
                tracing::warn!(
                    target: targets::APP,
                    name = %option,
                    shortcut = %value,
                    %error,
                    "keeping previous shortcut"
                );
                return;
            }
            if let Some(panel) = watched_panel.upgrade() {
                if let Err(error) = panel.refresh_tooltips(&*shortcuts) {
                    tracing::warn!(target: targets::APP, %error, "shortcut tooltips not refreshed");
                }
            }
        });

        tracing::info!(target: targets::APP, "application ready");

        Ok(Self {
            config,
            bus,
            shortcuts,
            controller,
            panel,
            _config_watch: config_watch,
        })
    }

    /// Load the configuration from the platform configuration directory.
    ///
    /// Falls back to an empty configuration when there is no home directory.
    pub fn load_config() -> ConfigResult<IniConfig> {
        match IniConfig::default_path() {
            Some(path) => IniConfig::load(path),
            None => {
                tracing::warn!(target: targets::APP, "no configuration directory, using defaults");
                Ok(IniConfig::new())
            }
        }
    }

    /// Make the shortcuts active in `window`.
    pub fn attach(&self, window: &dyn AccelWindow) -> ShortcutResult<()> {
        self.shortcuts.initialize(window)
    }

    /// Dispatch a key chord. Returns `true` if a shortcut handled it.
    pub fn activate(&self, accelerator: &Accelerator) -> bool {
        self.shortcuts.accel_group().activate(accelerator)
    }

    /// The configuration.
    pub fn config(&self) -> &Arc<IniConfig> {
        &self.config
    }

    /// The session bus.
    pub fn bus(&self) -> &Arc<SessionEventBus> {
        &self.bus
    }

    /// The shortcut manager.
    pub fn shortcuts(&self) -> &Arc<ShortcutManager> {
        &self.shortcuts
    }

    /// The session controller.
    pub fn controller(&self) -> &Arc<dyn SessionController> {
        &self.controller
    }

    /// The session panel.
    pub fn panel(&self) -> &Arc<SessionControlPanel> {
        &self.panel
    }
}

impl std::fmt::Debug for Application {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Application")
            .field("bus", &self.bus)
            .field("shortcuts", &self.shortcuts)
            .field("panel", &self.panel)
            .finish()
    }
}
