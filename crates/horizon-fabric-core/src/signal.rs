//! Change notification between components.
//!
//! Components announce state changes through signals: a command bar emits
//! when an item moves into or out of its overflow menu, a resize group emits
//! after every commit, and hosts feed container sizes into a resize group
//! through a `Signal<f32>`. Connected slots run synchronously on the emitting
//! thread, in connection order.
//!
//! # Key Types
//!
//! - [`Signal<Args>`] - A list of slots called on every emission
//! - [`ConnectionId`] - Handle returned by [`Signal::connect`]
//! - [`ConnectionGuard`] - Disconnects its slot when dropped
//!
//! # Example
//!
//! ```
//! use horizon_fabric_core::Signal;
//!
//! let resized = Signal::<f32>::new();
//! let id = resized.connect(|width| {
//!     println!("container is now {width}px wide");
//! });
//!
//! resized.emit(320.0);
//! assert!(resized.disconnect(id));
//! ```

use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use slotmap::{SlotMap, new_key_type};

use crate::{fabric_debug, fabric_trace};

new_key_type! {
    /// Identifies one slot connected to a [`Signal`].
    pub struct ConnectionId;
}

type Slot<Args> = Arc<dyn Fn(&Args) + Send + Sync>;
type SlotTable<Args> = Mutex<SlotMap<ConnectionId, Slot<Args>>>;

/// A notification source with any number of connected slots.
///
/// `Args` is what each emission carries; use `()` for plain notifications.
///
/// Slots run after the slot table is unlocked, so a slot may connect to or
/// disconnect from the signal that is calling it. Such changes apply from the
/// next emission on.
pub struct Signal<Args> {
    slots: Arc<SlotTable<Args>>,
}

impl<Args: 'static> Default for Signal<Args> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Args: 'static> Signal<Args> {
    /// Create a signal nobody listens to yet.
    pub fn new() -> Self {
        Self {
            slots: Arc::new(Mutex::new(SlotMap::with_key())),
        }
    }

    /// Call `slot` on every future emission.
    pub fn connect<F>(&self, slot: F) -> ConnectionId
    where
        F: Fn(&Args) + Send + Sync + 'static,
    {
        self.slots.lock().insert(Arc::new(slot))
    }

    /// Like [`connect`](Self::connect), but the slot stays connected only as
    /// long as the returned guard lives.
    ///
    /// The guard may outlive the signal.
    pub fn connect_scoped<F>(&self, slot: F) -> ConnectionGuard<Args>
    where
        F: Fn(&Args) + Send + Sync + 'static,
    {
        ConnectionGuard {
            id: self.connect(slot),
            slots: Arc::downgrade(&self.slots),
        }
    }

    /// Remove one slot. Returns `false` if it was already gone.
    pub fn disconnect(&self, id: ConnectionId) -> bool {
        self.slots.lock().remove(id).is_some()
    }

    /// Remove every slot.
    pub fn disconnect_all(&self) {
        let mut slots = self.slots.lock();
        fabric_debug!(slots = slots.len(), "disconnecting all slots");
        slots.clear();
    }

    /// Number of connected slots.
    pub fn connection_count(&self) -> usize {
        self.slots.lock().len()
    }

    /// Call every connected slot with `args`.
    pub fn emit(&self, args: Args) {
        let slots: Vec<Slot<Args>> = self.slots.lock().values().cloned().collect();
        if slots.is_empty() {
            return;
        }
        fabric_trace!(slots = slots.len(), "signal emit");
        for slot in &slots {
            slot(&args);
        }
    }
}

impl<Args> std::fmt::Debug for Signal<Args> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signal")
            .field("slots", &self.slots.lock().len())
            .finish()
    }
}

/// Keeps a slot connected while alive.
///
/// Returned by [`Signal::connect_scoped`]. A resize group holds one of these
/// for its container observer and drops it on unmount.
///
/// ```
/// use std::sync::Arc;
/// use std::sync::atomic::{AtomicUsize, Ordering};
///
/// use horizon_fabric_core::Signal;
///
/// let commits = Signal::<()>::new();
/// let seen = Arc::new(AtomicUsize::new(0));
///
/// let guard = {
///     let seen = seen.clone();
///     commits.connect_scoped(move |_| {
///         seen.fetch_add(1, Ordering::SeqCst);
///     })
/// };
/// commits.emit(());
/// drop(guard);
/// commits.emit(());
///
/// assert_eq!(seen.load(Ordering::SeqCst), 1);
/// ```
pub struct ConnectionGuard<Args> {
    id: ConnectionId,
    slots: Weak<SlotTable<Args>>,
}

impl<Args> ConnectionGuard<Args> {
    /// The guarded connection.
    pub fn id(&self) -> ConnectionId {
        self.id
    }

    /// Whether the slot is still connected to a live signal.
    pub fn is_connected(&self) -> bool {
        self.slots
            .upgrade()
            .is_some_and(|slots| slots.lock().contains_key(self.id))
    }
}

impl<Args> Drop for ConnectionGuard<Args> {
    fn drop(&mut self) {
        if let Some(slots) = self.slots.upgrade() {
            slots.lock().remove(self.id);
        }
    }
}

impl<Args> std::fmt::Debug for ConnectionGuard<Args> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionGuard")
            .field("id", &self.id)
            .field("connected", &self.is_connected())
            .finish()
    }
}

static_assertions::assert_impl_all!(Signal<f32>: Send, Sync);
static_assertions::assert_impl_all!(ConnectionGuard<f32>: Send, Sync);

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    fn recorder<T: Clone + Send + 'static>(signal: &Signal<T>) -> (ConnectionId, Arc<Mutex<Vec<T>>>) {
        let log = Arc::new(Mutex::new(Vec::new()));
        let sink = log.clone();
        let id = signal.connect(move |value: &T| sink.lock().push(value.clone()));
        (id, log)
    }

    #[test]
    fn test_slots_see_every_emission_in_order() {
        let widths = Signal::<f32>::new();
        let (_, first) = recorder(&widths);
        let (_, second) = recorder(&widths);

        widths.emit(120.0);
        widths.emit(80.5);

        assert_eq!(*first.lock(), [120.0, 80.5]);
        assert_eq!(*second.lock(), [120.0, 80.5]);
    }

    #[test]
    fn test_disconnected_slot_stops_receiving() {
        let moved = Signal::<String>::new();
        let (id, log) = recorder(&moved);

        moved.emit("share".to_owned());
        assert!(moved.disconnect(id));
        assert!(!moved.disconnect(id));
        moved.emit("upload".to_owned());

        assert_eq!(*log.lock(), ["share"]);
    }

    #[test]
    fn test_disconnect_all() {
        let commits = Signal::<()>::new();
        recorder(&commits);
        recorder(&commits);
        assert_eq!(commits.connection_count(), 2);

        commits.disconnect_all();
        assert_eq!(commits.connection_count(), 0);
        commits.emit(());
    }

    #[test]
    fn test_guard_disconnects_on_drop() {
        let widths = Signal::<f32>::new();
        let seen = Arc::new(AtomicUsize::new(0));

        let counter = seen.clone();
        let guard = widths.connect_scoped(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        assert!(guard.is_connected());
        widths.emit(10.0);
        drop(guard);
        widths.emit(20.0);

        assert_eq!(seen.load(Ordering::SeqCst), 1);
        assert_eq!(widths.connection_count(), 0);
    }

    #[test]
    fn test_guard_outlives_signal() {
        let widths = Signal::<f32>::new();
        let guard = widths.connect_scoped(|_| {});
        drop(widths);
        assert!(!guard.is_connected());
    }

    #[test]
    fn test_slot_can_connect_during_emit() {
        let commits = Arc::new(Signal::<()>::new());
        let calls = Arc::new(AtomicUsize::new(0));

        let weak = Arc::downgrade(&commits);
        let counter = calls.clone();
        commits.connect(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            if let Some(commits) = weak.upgrade() {
                commits.connect(|_| {});
            }
        });

        commits.emit(());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(commits.connection_count(), 2);
    }
}
