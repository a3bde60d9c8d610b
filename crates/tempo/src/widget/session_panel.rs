//! Session control panel.
//!
//! [`SessionControlPanel`] is the row of controls at the top of the main
//! window: start, stop and reset buttons, a menu button, and a title showing
//! how many sessions have finished. It follows the session lifecycle by
//! listening on the [`SessionEventBus`]:
//!
//! | Event | Start | Stop | Reset | Title |
//! |---|---|---|---|---|
//! | started | hidden | shown | disabled | unchanged |
//! | stopped / finished, no sessions | shown | hidden | disabled | "No session yet" |
//! | stopped / finished, N sessions | shown | hidden | enabled | "Session N" |
//! | reset | unchanged | unchanged | disabled | unchanged |
//!
//! A new panel looks like the "stopped, no sessions" row.
//!
//! Clicking a button, or pressing its shortcut, only forwards to the
//! [`SessionController`]; the controls change when the controller's
//! notification comes back over the bus.

use std::sync::{Arc, Weak};

use tempo_core::logging::targets;
use tempo_core::{ConnectionId, Property, SessionEvent, SessionEventBus};

use crate::accel_map::AccelCallback;
use crate::session::SessionController;
use crate::shortcut::{ShortcutManager, ShortcutResult, Shortcuts};
use crate::widget::{Button, Menu};

/// Title shown while no session has finished.
pub const NO_SESSION_TITLE: &str = "No session yet";

/// Title for `count` finished sessions.
pub fn session_title(count: usize) -> String {
    if count == 0 {
        NO_SESSION_TITLE.to_string()
    } else {
        format!("Session {count}")
    }
}

/// Start/stop/reset controls bound to the session bus and shortcuts.
pub struct SessionControlPanel {
    controller: Arc<dyn SessionController>,
    bus: Arc<SessionEventBus>,
    subscription: ConnectionId,
    start_button: Button,
    stop_button: Button,
    reset_button: Button,
    menu_button: Button,
    title: Property<String>,
}

impl SessionControlPanel {
    /// Build the panel, subscribe it to `bus` and bind the `start`, `stop`
    /// and `reset` shortcuts to its click handlers.
    ///
    /// # Errors
    ///
    /// Fails if a shortcut cannot be read or parsed. The bus subscription and
    /// any shortcut already bound are released again in that case.
    pub fn new(
        controller: Arc<dyn SessionController>,
        menu: Arc<dyn Menu>,
        shortcuts: &dyn Shortcuts,
        bus: Arc<SessionEventBus>,
    ) -> ShortcutResult<Arc<Self>> {
        let panel = Arc::new_cyclic(|weak: &Weak<Self>| {
            let subscriber = weak.clone();
            let subscription = bus.connect(move |event| {
                if let Some(panel) = subscriber.upgrade() {
                    panel.update(event);
                }
            });

            let panel = Self {
                controller,
                bus: bus.clone(),
                subscription,
                start_button: Button::new("Start"),
                stop_button: Button::new("Stop"),
                reset_button: Button::new("Reset"),
                menu_button: Button::new("Menu"),
                title: Property::new(NO_SESSION_TITLE.to_string()),
            };
            panel.stop_button.set_visible(false);
            panel.reset_button.set_enabled(false);

            let handler = weak.clone();
            panel.start_button.clicked().connect(move |_| {
                if let Some(panel) = handler.upgrade() {
                    panel.on_start_clicked();
                }
            });
            let handler = weak.clone();
            panel.stop_button.clicked().connect(move |_| {
                if let Some(panel) = handler.upgrade() {
                    panel.on_stop_clicked();
                }
            });
            let handler = weak.clone();
            panel.reset_button.clicked().connect(move |_| {
                if let Some(panel) = handler.upgrade() {
                    panel.on_reset_clicked();
                }
            });
            panel.menu_button.clicked().connect(move |_| menu.popup());

            panel
        });

        let handlers: [(&str, fn(&Self)); 3] = [
            (ShortcutManager::START, Self::on_start_clicked),
            (ShortcutManager::STOP, Self::on_stop_clicked),
            (ShortcutManager::RESET, Self::on_reset_clicked),
        ];
        for (bound, (name, handler)) in handlers.iter().enumerate() {
            if let Err(error) = Self::bind_shortcut(&panel, shortcuts, name, *handler) {
                for (name, _) in &handlers[..=bound] {
                    shortcuts.disconnect(name);
                }
                tracing::warn!(target: targets::PANEL, %error, "session panel shortcuts not bound");
                return Err(error);
            }
        }

        tracing::debug!(
            target: targets::PANEL,
            subscription = ?panel.subscription,
            "session panel created"
        );
        Ok(panel)
    }

    fn bind_shortcut(
        panel: &Arc<Self>,
        shortcuts: &dyn Shortcuts,
        name: &str,
        handler: fn(&Self),
    ) -> ShortcutResult<()> {
        let weak = Arc::downgrade(panel);
        let callback: AccelCallback = Arc::new(move || {
            if let Some(panel) = weak.upgrade() {
                handler(&panel);
            }
        });
        shortcuts.connect(name, callback)?;
        panel.refresh_tooltip(shortcuts, name)
    }

    fn refresh_tooltip(&self, shortcuts: &dyn Shortcuts, name: &str) -> ShortcutResult<()> {
        let (button, description) = match name {
            ShortcutManager::START => (&self.start_button, "Start session"),
            ShortcutManager::STOP => (&self.stop_button, "Stop session"),
            ShortcutManager::RESET => (&self.reset_button, "Clear finished sessions"),
            _ => return Ok(()),
        };
        let label = shortcuts.label(name)?;
        button.set_tooltip(format!("{description} ({label})"));
        Ok(())
    }

    /// Re-read the shortcut labels shown in the button tooltips.
    ///
    /// Call after a shortcut was rebound. Names other than `start`, `stop`
    /// and `reset` are ignored.
    pub fn refresh_tooltips(&self, shortcuts: &dyn Shortcuts) -> ShortcutResult<()> {
        for name in [
            ShortcutManager::START,
            ShortcutManager::STOP,
            ShortcutManager::RESET,
        ] {
            self.refresh_tooltip(shortcuts, name)?;
        }
        Ok(())
    }

    /// Apply a session notification to the controls.
    fn update(&self, event: &SessionEvent) {
        tracing::debug!(target: targets::PANEL, state = %event.state(), "updating session panel");

        match event {
            SessionEvent::Started(_) => {
                self.start_button.set_visible(false);
                self.stop_button.set_visible(true);
                self.reset_button.set_enabled(false);
            }
            SessionEvent::Stopped(payload) | SessionEvent::Finished(payload) => {
                let count = payload.finished_count();
                self.start_button.set_visible(true);
                self.stop_button.set_visible(false);
                self.reset_button.set_enabled(count > 0);
                self.title.set(session_title(count));
            }
            SessionEvent::Reset(_) => {
                self.reset_button.set_enabled(false);
            }
        }
    }

    // =========================================================================
    // Click handlers
    // =========================================================================

    /// Forward a start click to the controller.
    pub fn on_start_clicked(&self) {
        tracing::trace!(target: targets::PANEL, "start clicked");
        self.controller.start();
    }

    /// Forward a stop click to the controller.
    pub fn on_stop_clicked(&self) {
        tracing::trace!(target: targets::PANEL, "stop clicked");
        self.controller.stop();
    }

    /// Forward a reset click to the controller.
    pub fn on_reset_clicked(&self) {
        tracing::trace!(target: targets::PANEL, "reset clicked");
        self.controller.reset();
    }

    // =========================================================================
    // Controls
    // =========================================================================

    /// The start button.
    pub fn start_button(&self) -> &Button {
        &self.start_button
    }

    /// The stop button.
    pub fn stop_button(&self) -> &Button {
        &self.stop_button
    }

    /// The reset button.
    pub fn reset_button(&self) -> &Button {
        &self.reset_button
    }

    /// The button that pops up the application menu.
    pub fn menu_button(&self) -> &Button {
        &self.menu_button
    }

    /// Current title text.
    pub fn title(&self) -> String {
        self.title.get()
    }

    /// Title property.
    pub fn title_property(&self) -> &Property<String> {
        &self.title
    }
}

impl Drop for SessionControlPanel {
    fn drop(&mut self) {
        self.bus.disconnect(self.subscription);
        tracing::debug!(target: targets::PANEL, "session panel dropped, bus subscription released");
    }
}

impl std::fmt::Debug for SessionControlPanel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionControlPanel")
            .field("start_button", &self.start_button)
            .field("stop_button", &self.stop_button)
            .field("reset_button", &self.reset_button)
            .field("title", &self.title())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_title() {
        assert_eq!(session_title(0), "No session yet");
        assert_eq!(session_title(1), "Session 1");
        assert_eq!(session_title(12), "Session 12");
    }
}
