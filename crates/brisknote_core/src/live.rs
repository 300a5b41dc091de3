//! Observable value holder for live view state.
//!
//! # Responsibility
//! - Hold one current value and deliver snapshots to subscribers.
//! - Deliver the current value to every new subscriber immediately, then
//!   re-deliver on every `set`.
//!
//! # Invariants
//! - Callbacks run synchronously on the thread that calls `set`.
//! - Dropping a [`Subscription`] detaches its callback; no notification work
//!   outlives the last subscriber.
//! - Callbacks must not mutate the store that feeds the value they observe;
//!   they may read other live values and derive state.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

/// Locks a mutex, recovering the inner data if a prior holder panicked.
pub(crate) fn relock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

struct Subscriber<T> {
    id: u64,
    callback: Arc<dyn Fn(&T) + Send + Sync>,
}

struct LiveCore<T> {
    value: Mutex<T>,
    subscribers: Mutex<Vec<Subscriber<T>>>,
    next_id: AtomicU64,
}

/// A shareable observable value.
///
/// Clones share the same underlying value and subscriber list.
pub struct Live<T> {
    core: Arc<LiveCore<T>>,
}

impl<T> Clone for Live<T> {
    fn clone(&self) -> Self {
        Self {
            core: Arc::clone(&self.core),
        }
    }
}

impl<T: Clone + Send + 'static> Live<T> {
    /// Creates a live value with an initial snapshot.
    pub fn new(initial: T) -> Self {
        Self {
            core: Arc::new(LiveCore {
                value: Mutex::new(initial),
                subscribers: Mutex::new(Vec::new()),
                next_id: AtomicU64::new(0),
            }),
        }
    }

    /// Returns a clone of the current snapshot.
    pub fn get(&self) -> T {
        relock(&self.core.value).clone()
    }

    /// Replaces the snapshot and notifies every subscriber.
    pub fn set(&self, value: T) {
        {
            let mut guard = relock(&self.core.value);
            *guard = value;
        }
        self.notify();
    }

    /// Registers a callback and delivers the current snapshot to it before
    /// returning.
    ///
    /// The returned guard detaches the callback when dropped.
    pub fn subscribe(&self, callback: impl Fn(&T) + Send + Sync + 'static) -> Subscription {
        let callback: Arc<dyn Fn(&T) + Send + Sync> = Arc::new(callback);
        let id = self.core.next_id.fetch_add(1, Ordering::Relaxed);
        relock(&self.core.subscribers).push(Subscriber {
            id,
            callback: Arc::clone(&callback),
        });

        let current = self.get();
        callback(&current);

        let core = Arc::downgrade(&self.core);
        Subscription {
            detach: Some(Box::new(move || {
                if let Some(core) = core.upgrade() {
                    relock(&core.subscribers).retain(|subscriber| subscriber.id != id);
                }
            })),
        }
    }

    /// Returns a handle that does not keep the value alive.
    pub fn downgrade(&self) -> WeakLive<T> {
        WeakLive {
            core: Arc::downgrade(&self.core),
        }
    }

    /// Number of attached subscribers.
    pub fn subscriber_count(&self) -> usize {
        relock(&self.core.subscribers).len()
    }

    fn notify(&self) {
        // Snapshot the callback list first so a callback that subscribes or
        // unsubscribes elsewhere cannot deadlock against this delivery.
        let callbacks: Vec<Arc<dyn Fn(&T) + Send + Sync>> = relock(&self.core.subscribers)
            .iter()
            .map(|subscriber| Arc::clone(&subscriber.callback))
            .collect();
        let value = self.get();
        for callback in callbacks {
            callback(&value);
        }
    }
}

/// Weak counterpart of [`Live`], used by store watchers so an abandoned
/// live query can be pruned.
pub struct WeakLive<T> {
    core: Weak<LiveCore<T>>,
}

impl<T> Clone for WeakLive<T> {
    fn clone(&self) -> Self {
        Self {
            core: Weak::clone(&self.core),
        }
    }
}

impl<T> WeakLive<T> {
    /// Upgrades to a strong handle if any consumer still holds one.
    pub fn upgrade(&self) -> Option<Live<T>> {
        self.core.upgrade().map(|core| Live { core })
    }
}

/// RAII guard for one live subscription.
pub struct Subscription {
    detach: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl Subscription {
    /// Explicitly detaches the callback. Equivalent to dropping the guard.
    pub fn unsubscribe(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(detach) = self.detach.take() {
            detach();
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("attached", &self.detach.is_some())
            .finish()
    }
}
