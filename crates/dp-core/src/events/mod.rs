//! Synchronous publish/subscribe primitives
//!
//! Every stateful component of the store is built on [`Notifier`]. Delivery
//! happens on the caller's stack, in subscription order, with no buffering
//! and no replay for late subscribers.

mod observable;

pub use observable::{Observable, SaveHook};

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;

/// Callback invoked with every notified event
pub type Listener<T> = Arc<dyn Fn(&T) + Send + Sync>;

struct ListenerEntry<T> {
    id: u64,
    listener: Listener<T>,
}

struct Registry<T> {
    next_id: u64,
    entries: Vec<ListenerEntry<T>>,
}

/// Ordered list of listeners for one kind of event
pub struct Notifier<T> {
    registry: Arc<Mutex<Registry<T>>>,
}

impl<T: 'static> Notifier<T> {
    /// Create a notifier with no listeners
    pub fn new() -> Self {
        Self {
            registry: Arc::new(Mutex::new(Registry {
                next_id: 0,
                entries: Vec::new(),
            })),
        }
    }

    /// Append a listener; it stays registered until the returned
    /// subscription is disposed or the notifier is dropped.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let mut registry = self.registry.lock();
        let id = registry.next_id;
        registry.next_id += 1;
        registry.entries.push(ListenerEntry {
            id,
            listener: Arc::new(listener),
        });
        drop(registry);

        let registry = Arc::downgrade(&self.registry);
        Subscription::new(move || {
            if let Some(registry) = registry.upgrade() {
                registry.lock().entries.retain(|entry| entry.id != id);
            }
        })
    }

    /// Deliver `event` to every listener registered right now.
    ///
    /// The listener list is copied before dispatch, so listeners added while
    /// dispatching only see the next round. A panicking listener unwinds into
    /// the caller and later listeners are not invoked.
    pub fn notify(&self, event: &T) {
        let listeners: Vec<Listener<T>> = self
            .registry
            .lock()
            .entries
            .iter()
            .map(|entry| entry.listener.clone())
            .collect();

        for listener in listeners {
            listener(event);
        }
    }

    /// Number of registered listeners
    pub fn listener_count(&self) -> usize {
        self.registry.lock().entries.len()
    }
}

impl<T: 'static> Default for Notifier<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Notifier<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Notifier")
            .field("listeners", &self.registry.lock().entries.len())
            .finish()
    }
}

/// Handle returned by [`Notifier::subscribe`]
///
/// Dropping the handle does not unsubscribe; call [`Subscription::dispose`].
pub struct Subscription {
    disposer: Mutex<Option<Box<dyn FnOnce() + Send>>>,
}

impl Subscription {
    fn new<F>(disposer: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        Self {
            disposer: Mutex::new(Some(Box::new(disposer))),
        }
    }

    /// Remove the listener. Calling this more than once is a no-op.
    pub fn dispose(&self) {
        let disposer = self.disposer.lock().take();
        if let Some(disposer) = disposer {
            disposer();
        }
    }

    /// Whether [`Subscription::dispose`] has already run
    pub fn is_disposed(&self) -> bool {
        self.disposer.lock().is_none()
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("disposed", &self.is_disposed())
            .finish()
    }
}
