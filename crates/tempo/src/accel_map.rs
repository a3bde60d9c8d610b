//! Accelerator registration.
//!
//! Two pieces cooperate to turn a key chord into an action:
//!
//! - An [`AccelMap`] is the process-wide table from *action paths* such as
//!   `"<tempo>/Global/start"` to accelerators. The host toolkit usually owns
//!   it; [`MemoryAccelMap`] is the in-process implementation.
//! - An [`AccelGroup`] binds callbacks to action paths. Once attached to a
//!   window (see [`AccelWindow`]), a key press is resolved to a path through
//!   the map and the path's callbacks run.
//!
//! Keeping the path as the join key means a shortcut can be rebound in the
//! map without touching the callbacks bound in the group.

use std::sync::Arc;

use parking_lot::RwLock;
use tempo_core::logging::targets;

use crate::accel::{Accelerator, ModifierMask};

/// Callback bound to an action path.
pub type AccelCallback = Arc<dyn Fn() + Send + Sync>;

/// Table from action paths to accelerators.
pub trait AccelMap: Send + Sync {
    /// Register the default accelerator for `path`.
    ///
    /// An existing entry for the path is kept.
    fn add_entry(&self, path: &str, key_code: u32, modifiers: ModifierMask);

    /// Change the accelerator of `path`, adding the path if needed.
    ///
    /// If another path already uses the accelerator, the change only happens
    /// when `replace` is true, in which case the other path loses its
    /// accelerator. Returns whether the change was made.
    fn change_entry(
        &self,
        path: &str,
        key_code: u32,
        modifiers: ModifierMask,
        replace: bool,
    ) -> bool;

    /// The accelerator currently mapped to `path`.
    fn lookup_entry(&self, path: &str) -> Option<Accelerator>;

    /// The path currently mapped to `accelerator`.
    ///
    /// If several paths share the accelerator, the one registered first wins.
    fn find_path(&self, accelerator: &Accelerator) -> Option<String>;
}

/// In-process [`AccelMap`].
///
/// Entries are kept in registration order.
#[derive(Default)]
pub struct MemoryAccelMap {
    entries: RwLock<Vec<(String, Accelerator)>>,
}

impl MemoryAccelMap {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of paths with an accelerator.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Whether no path has an accelerator.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl AccelMap for MemoryAccelMap {
    fn add_entry(&self, path: &str, key_code: u32, modifiers: ModifierMask) {
        let mut entries = self.entries.write();
        if entries.iter().any(|(bound, _)| bound == path) {
            tracing::trace!(
                target: targets::SHORTCUT,
                path,
                "accelerator already registered, keeping it"
            );
            return;
        }
        entries.push((path.to_string(), Accelerator::new(key_code, modifiers)));
    }

    fn change_entry(
        &self,
        path: &str,
        key_code: u32,
        modifiers: ModifierMask,
        replace: bool,
    ) -> bool {
        let accelerator = Accelerator::new(key_code, modifiers);
        let mut entries = self.entries.write();

        let conflicts: Vec<String> = entries
            .iter()
            .filter(|(other, accel)| other != path && *accel == accelerator)
            .map(|(other, _)| other.clone())
            .collect();

        if !conflicts.is_empty() {
            if !replace {
                tracing::debug!(
                    target: targets::SHORTCUT,
                    path,
                    conflicts = ?conflicts,
                    "accelerator in use, not replacing"
                );
                return false;
            }
            entries.retain(|(other, _)| !conflicts.contains(other));
        }

        match entries.iter_mut().find(|(bound, _)| bound == path) {
            Some((_, accel)) => *accel = accelerator,
            None => entries.push((path.to_string(), accelerator)),
        }
        true
    }

    fn lookup_entry(&self, path: &str) -> Option<Accelerator> {
        self.entries
            .read()
            .iter()
            .find(|(bound, _)| bound == path)
            .map(|(_, accel)| *accel)
    }

    fn find_path(&self, accelerator: &Accelerator) -> Option<String> {
        self.entries
            .read()
            .iter()
            .find(|(_, accel)| accel == accelerator)
            .map(|(path, _)| path.clone())
    }
}

/// Callbacks bound to action paths, activated through an [`AccelMap`].
pub struct AccelGroup {
    map: Arc<dyn AccelMap>,
    bindings: RwLock<Vec<(String, AccelCallback)>>,
}

impl AccelGroup {
    /// Create a group that resolves key chords through `map`.
    pub fn new(map: Arc<dyn AccelMap>) -> Self {
        Self {
            map,
            bindings: RwLock::new(Vec::new()),
        }
    }

    /// Bind `callback` to `path`.
    pub fn connect_by_path(&self, path: &str, callback: AccelCallback) {
        self.bindings.write().push((path.to_string(), callback));
    }

    /// Remove every callback bound to `path`, returning how many were removed.
    pub fn disconnect_path(&self, path: &str) -> usize {
        let mut bindings = self.bindings.write();
        let before = bindings.len();
        bindings.retain(|(bound, _)| bound != path);
        before - bindings.len()
    }

    /// Whether any callback is bound to `path`.
    pub fn is_connected(&self, path: &str) -> bool {
        self.bindings.read().iter().any(|(bound, _)| bound == path)
    }

    /// Number of callbacks bound to `path`.
    pub fn binding_count(&self, path: &str) -> usize {
        self.bindings
            .read()
            .iter()
            .filter(|(bound, _)| bound == path)
            .count()
    }

    /// Run the callbacks of the path mapped to `accelerator`.
    ///
    /// Returns `true` if at least one callback ran.
    pub fn activate(&self, accelerator: &Accelerator) -> bool {
        let Some(path) = self.map.find_path(accelerator) else {
            return false;
        };

        let callbacks: Vec<AccelCallback> = self
            .bindings
            .read()
            .iter()
            .filter(|(bound, _)| *bound == path)
            .map(|(_, callback)| callback.clone())
            .collect();

        tracing::debug!(
            target: targets::SHORTCUT,
            path = %path,
            accelerator = %accelerator,
            callbacks = callbacks.len(),
            "accelerator activated"
        );

        for callback in &callbacks {
            callback();
        }
        !callbacks.is_empty()
    }
}

impl std::fmt::Debug for AccelGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let paths: Vec<String> = self
            .bindings
            .read()
            .iter()
            .map(|(path, _)| path.clone())
            .collect();
        f.debug_struct("AccelGroup").field("paths", &paths).finish()
    }
}

/// A window that accelerator groups can be attached to.
pub trait AccelWindow: Send + Sync {
    /// Identifier distinguishing this window from others.
    fn window_id(&self) -> u64;

    /// Make the group's accelerators active while this window has focus.
    fn add_accel_group(&self, group: Arc<AccelGroup>);
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::accel::parse;

    const START: &str = "<tempo>/Global/start";
    const STOP: &str = "<tempo>/Global/stop";

    fn ctrl(key: char) -> Accelerator {
        Accelerator::new(key as u32, ModifierMask::CONTROL)
    }

    #[test]
    fn test_add_entry_keeps_existing() {
        let map = MemoryAccelMap::new();
        map.add_entry(START, 's' as u32, ModifierMask::CONTROL);
        map.add_entry(START, 'x' as u32, ModifierMask::CONTROL);
        assert_eq!(map.lookup_entry(START), Some(ctrl('s')));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_change_entry_overwrites_path() {
        let map = MemoryAccelMap::new();
        map.add_entry(START, 's' as u32, ModifierMask::CONTROL);
        assert!(map.change_entry(START, 'b' as u32, ModifierMask::CONTROL, false));
        assert_eq!(map.lookup_entry(START), Some(ctrl('b')));
        assert_eq!(map.find_path(&ctrl('s')), None);
    }

    #[test]
    fn test_change_entry_conflicts() {
        let map = MemoryAccelMap::new();
        map.add_entry(START, 's' as u32, ModifierMask::CONTROL);
        map.add_entry(STOP, 'p' as u32, ModifierMask::CONTROL);

        assert!(!map.change_entry(STOP, 's' as u32, ModifierMask::CONTROL, false));
        assert_eq!(map.lookup_entry(STOP), Some(ctrl('p')));

        assert!(map.change_entry(STOP, 's' as u32, ModifierMask::CONTROL, true));
        assert_eq!(map.lookup_entry(STOP), Some(ctrl('s')));
        assert_eq!(map.lookup_entry(START), None);
    }

    #[test]
    fn test_change_entry_adds_missing_path() {
        let map = MemoryAccelMap::new();
        assert!(map.is_empty());
        assert!(map.change_entry("<tempo>/Global/name", 'b' as u32, ModifierMask::CONTROL, true));
        assert_eq!(map.find_path(&ctrl('b')).as_deref(), Some("<tempo>/Global/name"));
    }

    #[test]
    fn test_first_registered_path_wins_shared_chord() {
        let map = MemoryAccelMap::new();
        map.add_entry(START, 'p' as u32, ModifierMask::CONTROL);
        map.add_entry(STOP, 'p' as u32, ModifierMask::CONTROL);
        assert_eq!(map.len(), 2);
        assert_eq!(map.find_path(&ctrl('p')).as_deref(), Some(START));

        // Moving the first path away hands the chord to the next one.
        map.change_entry(START, 'x' as u32, ModifierMask::CONTROL, false);
        assert_eq!(map.find_path(&ctrl('p')).as_deref(), Some(STOP));
    }

    #[test]
    fn test_group_activation() {
        let map = Arc::new(MemoryAccelMap::new());
        map.add_entry(START, 's' as u32, ModifierMask::CONTROL);
        let group = AccelGroup::new(map.clone());

        let calls = Arc::new(AtomicUsize::new(0));
        let calls_clone = calls.clone();
        group.connect_by_path(
            START,
            Arc::new(move || {
                calls_clone.fetch_add(1, Ordering::SeqCst);
            }),
        );

        assert!(group.is_connected(START));
        assert!(group.activate(&parse("<control>s").unwrap()));
        assert!(!group.activate(&parse("<control>q").unwrap()));
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        // Rebinding in the map moves the callback to the new chord.
        map.change_entry(START, 'g' as u32, ModifierMask::CONTROL, true);
        assert!(!group.activate(&ctrl('s')));
        assert!(group.activate(&ctrl('g')));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_mapped_path_without_callbacks() {
        let map = Arc::new(MemoryAccelMap::new());
        map.add_entry(STOP, 'p' as u32, ModifierMask::CONTROL);
        let group = AccelGroup::new(map);
        assert!(!group.activate(&ctrl('p')));
    }

    #[test]
    fn test_disconnect_path() {
        let group = AccelGroup::new(Arc::new(MemoryAccelMap::new()));
        group.connect_by_path(START, Arc::new(|| {}));
        group.connect_by_path(START, Arc::new(|| {}));
        group.connect_by_path(STOP, Arc::new(|| {}));

        assert_eq!(group.binding_count(START), 2);
        assert_eq!(group.disconnect_path(START), 2);
        assert!(!group.is_connected(START));
        assert!(group.is_connected(STOP));
    }
}
