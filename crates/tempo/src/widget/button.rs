use tempo_core::{Property, Signal};

/// A clickable control.
///
/// # Signals
///
/// - `clicked`: emitted by [`click`](Self::click)
///
/// ```
/// use tempo::widget::Button;
///
/// let button = Button::new("Start");
/// button.clicked().connect(|_| println!("clicked"));
/// button.set_visible(false);
/// assert!(!button.is_visible());
/// assert_eq!(button.click(), 1);
/// ```
pub struct Button {
    text: Property<String>,
    tooltip: Property<String>,
    visible: Property<bool>,
    enabled: Property<bool>,
    clicked: Signal<()>,
}

impl Button {
    /// Create a visible, enabled button.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: Property::new(text.into()),
            tooltip: Property::default(),
            visible: Property::new(true),
            enabled: Property::new(true),
            clicked: Signal::new(),
        }
    }

    // =========================================================================
    // State
    // =========================================================================

    /// The button label.
    pub fn text(&self) -> String {
        self.text.get()
    }

    /// Change the button label.
    pub fn set_text(&self, text: impl Into<String>) {
        self.text.set(text.into());
    }

    /// Hover text, empty when unset.
    pub fn tooltip(&self) -> String {
        self.tooltip.get()
    }

    /// Change the hover text.
    pub fn set_tooltip(&self, tooltip: impl Into<String>) {
        self.tooltip.set(tooltip.into());
    }

    /// Whether the button is shown.
    pub fn is_visible(&self) -> bool {
        self.visible.get()
    }

    /// Show or hide the button.
    pub fn set_visible(&self, visible: bool) {
        self.visible.set(visible);
    }

    /// Whether the button accepts clicks.
    pub fn is_enabled(&self) -> bool {
        self.enabled.get()
    }

    /// Enable or disable the button.
    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.set(enabled);
    }

    // =========================================================================
    // Signals
    // =========================================================================

    /// Label property.
    pub fn text_property(&self) -> &Property<String> {
        &self.text
    }

    /// Visibility property.
    pub fn visible_property(&self) -> &Property<bool> {
        &self.visible
    }

    /// Enabled-state property.
    pub fn enabled_property(&self) -> &Property<bool> {
        &self.enabled
    }

    /// Signal emitted when the button is clicked.
    pub fn clicked(&self) -> &Signal<()> {
        &self.clicked
    }

    /// Emit `clicked`, returning the number of handlers that ran.
    ///
    /// Disabled and hidden buttons still emit; filtering input to inactive
    /// controls is the backend's job.
    pub fn click(&self) -> usize {
        self.clicked.emit(())
    }
}

impl std::fmt::Debug for Button {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Button")
            .field("text", &self.text())
            .field("visible", &self.is_visible())
            .field("enabled", &self.is_enabled())
            .finish()
    }
}
