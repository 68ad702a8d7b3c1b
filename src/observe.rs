//! Size and visibility subscriptions.
//!
//! The host toolkit reports measured sizes into a [`SizeObservers`] registry;
//! subscribers get called only when a key's size actually changes. Lives on
//! the UI thread, so callbacks need not be `Send`.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::hash::Hash;
use std::rc::Rc;

use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

type SizeCallback = Rc<dyn Fn(Size)>;

struct Subscription<K> {
    id: ObserverId,
    key: K,
    callback: SizeCallback,
}

pub struct SizeObservers<K> {
    subscriptions: RefCell<Vec<Subscription<K>>>,
    last: RefCell<HashMap<K, Size>>,
    next_id: Cell<u64>,
}

impl<K: Eq + Hash + Clone> SizeObservers<K> {
    pub fn new() -> Self {
        Self {
            subscriptions: RefCell::new(Vec::new()),
            last: RefCell::new(HashMap::new()),
            next_id: Cell::new(1),
        }
    }

    /// Subscribe to size changes of `key`. A size already known for the key
    /// is delivered immediately.
    pub fn observe(&self, key: K, callback: impl Fn(Size) + 'static) -> ObserverId {
        let id = ObserverId(self.next_id.get());
        self.next_id.set(id.0 + 1);

        let callback: SizeCallback = Rc::new(callback);
        let known = self.last.borrow().get(&key).copied();
        self.subscriptions.borrow_mut().push(Subscription {
            id,
            key,
            callback: callback.clone(),
        });
        if let Some(size) = known {
            callback(size);
        }
        id
    }

    /// Returns false if `id` was not subscribed.
    pub fn unobserve(&self, id: ObserverId) -> bool {
        let mut subscriptions = self.subscriptions.borrow_mut();
        let before = subscriptions.len();
        subscriptions.retain(|s| s.id != id);
        subscriptions.len() != before
    }

    /// Report a measured size. Subscribers run only when it differs from the
    /// last report for `key`. Returns how many were called.
    pub fn notify(&self, key: &K, size: Size) -> usize {
        {
            let mut last = self.last.borrow_mut();
            if last.get(key) == Some(&size) {
                return 0;
            }
            last.insert(key.clone(), size);
        }

        // Snapshot so callbacks may observe or unobserve re-entrantly.
        let callbacks: Vec<SizeCallback> = self
            .subscriptions
            .borrow()
            .iter()
            .filter(|s| &s.key == key)
            .map(|s| s.callback.clone())
            .collect();
        trace!(width = size.width, height = size.height, subscribers = callbacks.len(), "Size changed");
        for callback in &callbacks {
            callback(size);
        }
        callbacks.len()
    }

    pub fn last_size(&self, key: &K) -> Option<Size> {
        self.last.borrow().get(key).copied()
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscriptions.borrow().len()
    }
}

impl<K: Eq + Hash + Clone> Default for SizeObservers<K> {
    fn default() -> Self {
        Self::new()
    }
}

/// Fraction of the showcase that must be on screen before it mounts.
pub const VISIBILITY_THRESHOLD: f32 = 0.1;

/// Opens once the visible fraction reaches the threshold and stays open.
#[derive(Debug, Clone)]
pub struct VisibilityGate {
    threshold: f32,
    open: bool,
}

impl VisibilityGate {
    pub fn new(threshold: f32) -> Self {
        Self {
            threshold: threshold.clamp(0.0, 1.0),
            open: false,
        }
    }

    /// Feed the currently visible fraction; returns true exactly once, on the
    /// update that opens the gate.
    pub fn update(&mut self, visible_fraction: f32) -> bool {
        if self.open || !(visible_fraction >= self.threshold) || visible_fraction <= 0.0 {
            return false;
        }
        self.open = true;
        true
    }

    pub fn is_open(&self) -> bool {
        self.open
    }
}

impl Default for VisibilityGate {
    fn default() -> Self {
        Self::new(VISIBILITY_THRESHOLD)
    }
}

/// Fraction of `[top, top + height)` inside `[view_top, view_top + view_height)`.
pub fn visible_fraction(top: f32, height: f32, view_top: f32, view_height: f32) -> f32 {
    if height <= 0.0 || view_height <= 0.0 {
        return 0.0;
    }
    let start = top.max(view_top);
    let end = (top + height).min(view_top + view_height);
    ((end - start) / height).clamp(0.0, 1.0)
}
