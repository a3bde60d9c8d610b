//! Observable properties.
//!
//! [`Property<T>`] wraps a value and announces changes on its own
//! [`Signal`]. Widgets expose their visible state (visibility, enabled state,
//! titles) through properties so a rendering backend can follow changes
//! without the widget knowing about it.
//!
//! ```
//! use tempo_core::Property;
//!
//! let title = Property::new(String::from("No session yet"));
//! title.changed().connect(|title| println!("title is now {title}"));
//!
//! assert!(title.set("Session 1".to_string()));
//! assert!(!title.set("Session 1".to_string()));
//! ```

use std::fmt;

use parking_lot::RwLock;

use crate::signal::Signal;

/// A value with change notification.
pub struct Property<T> {
    value: RwLock<T>,
    changed: Signal<T>,
}

impl<T: Clone + PartialEq + 'static> Property<T> {
    /// Create a property with an initial value.
    pub fn new(value: T) -> Self {
        Self {
            value: RwLock::new(value),
            changed: Signal::new(),
        }
    }

    /// Get a copy of the current value.
    pub fn get(&self) -> T {
        self.value.read().clone()
    }

    /// Access the value through a closure without cloning.
    pub fn with<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&T) -> R,
    {
        f(&self.value.read())
    }

    /// Set the value, returning `true` if it changed.
    ///
    /// `changed` is emitted with the new value only when it differs from the
    /// old one. The lock is released before the signal fires.
    pub fn set(&self, value: T) -> bool {
        {
            let mut current = self.value.write();
            if *current == value {
                return false;
            }
            *current = value.clone();
        }
        self.changed.emit(value);
        true
    }

    /// Signal emitted with the new value after every change.
    pub fn changed(&self) -> &Signal<T> {
        &self.changed
    }
}

impl<T: Clone + PartialEq + Default + 'static> Default for Property<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: Clone + PartialEq + fmt::Debug + 'static> fmt::Debug for Property<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Property")
            .field("value", &self.get())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use parking_lot::Mutex;

    use super::*;

    #[test]
    fn test_set_reports_change() {
        let prop = Property::new(42);
        assert_eq!(prop.get(), 42);
        assert!(!prop.set(42));
        assert!(prop.set(100));
        assert_eq!(prop.get(), 100);
    }

    #[test]
    fn test_changed_only_fires_on_real_change() {
        let prop = Property::new(false);
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = seen.clone();
        prop.changed().connect(move |&v| seen_clone.lock().push(v));

        prop.set(true);
        prop.set(true);
        prop.set(false);

        assert_eq!(*seen.lock(), vec![true, false]);
    }

    #[test]
    fn test_with_borrows_value() {
        let prop = Property::new(String::from("Session 3"));
        assert_eq!(prop.with(|s| s.len()), 9);
    }
}
