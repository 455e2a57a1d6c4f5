//! Observable state fields

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

use super::{Notifier, Subscription};

/// Callback that writes the whole view state back to the host slot
#[derive(Clone)]
pub struct SaveHook(Arc<dyn Fn() + Send + Sync>);

impl SaveHook {
    /// Wrap a persistence callback
    pub fn new<F>(save: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        Self(Arc::new(save))
    }

    /// A hook that persists nothing, for state that lives outside a `ViewState`
    pub fn detached() -> Self {
        Self::new(|| {})
    }

    /// Run the callback
    pub fn save(&self) {
        (self.0)()
    }
}

impl fmt::Debug for SaveHook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SaveHook")
    }
}

/// A value paired with a change notifier and a persistence hook.
///
/// Writing a different value stores it, notifies subscribers with the new
/// value, then saves. Writing an equal value does nothing.
pub struct Observable<T> {
    value: RwLock<T>,
    changed: Notifier<T>,
    save: SaveHook,
}

impl<T> Observable<T>
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    pub fn new(value: T, save: SaveHook) -> Self {
        Self {
            value: RwLock::new(value),
            changed: Notifier::new(),
            save,
        }
    }

    /// Current value
    pub fn get(&self) -> T {
        self.value.read().clone()
    }

    /// Store `value`; returns whether it differed from the current value
    pub fn set(&self, value: T) -> bool {
        {
            let mut current = self.value.write();
            if *current == value {
                return false;
            }
            *current = value.clone();
        }

        self.changed.notify(&value);
        self.save.save();
        true
    }

    /// Listen for changes of this field
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        self.changed.subscribe(listener)
    }
}

impl<T: fmt::Debug> fmt::Debug for Observable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Observable").field(&*self.value.read()).finish()
    }
}
