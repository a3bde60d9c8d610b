/// A popup menu.
pub trait Menu: Send + Sync {
    /// Show the menu.
    fn popup(&self);
}
