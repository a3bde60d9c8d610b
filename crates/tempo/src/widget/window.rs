use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;
use tempo_core::Property;

use crate::accel::Accelerator;
use crate::accel_map::{AccelGroup, AccelWindow};

static NEXT_WINDOW_ID: AtomicU64 = AtomicU64::new(1);

/// A top-level window.
///
/// Key presses delivered through [`key_press`](Self::key_press) are offered to
/// every attached accelerator group in attachment order until one handles it.
pub struct Window {
    id: u64,
    title: Property<String>,
    accel_groups: RwLock<Vec<Arc<AccelGroup>>>,
}

impl Window {
    /// Create a window with a unique id.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: NEXT_WINDOW_ID.fetch_add(1, Ordering::Relaxed),
            title: Property::new(title.into()),
            accel_groups: RwLock::new(Vec::new()),
        }
    }

    /// Window title.
    pub fn title(&self) -> String {
        self.title.get()
    }

    /// Change the window title.
    pub fn set_title(&self, title: impl Into<String>) {
        self.title.set(title.into());
    }

    /// Number of attached accelerator groups.
    pub fn accel_group_count(&self) -> usize {
        self.accel_groups.read().len()
    }

    /// Deliver a key chord. Returns `true` if an accelerator handled it.
    pub fn key_press(&self, accelerator: &Accelerator) -> bool {
        let groups = self.accel_groups.read().clone();
        groups.iter().any(|group| group.activate(accelerator))
    }
}

impl AccelWindow for Window {
    fn window_id(&self) -> u64 {
        self.id
    }

    fn add_accel_group(&self, group: Arc<AccelGroup>) {
        self.accel_groups.write().push(group);
    }
}

impl std::fmt::Debug for Window {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Window")
            .field("id", &self.id)
            .field("title", &self.title())
            .field("accel_groups", &self.accel_group_count())
            .finish()
    }
}
