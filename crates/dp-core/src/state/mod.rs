//! The view state aggregate
//!
//! [`ViewState`] is the single persistence boundary: every mutation in the
//! history, either storage namespace or the navigator ends in a full
//! snapshot being written to the host slot.

mod slot;
mod snapshot;

pub use slot::{MemorySlot, StateSlot};
pub use snapshot::{NavigatorSnapshot, NodeSnapshot, ViewStateSnapshot};

use std::sync::{Arc, Weak};

use tracing::{debug, warn};

use crate::config::ViewStateConfig;
use crate::events::SaveHook;
use crate::navigation::NavigationStack;
use crate::navigator::NavigatorTree;
use crate::storage::KeyedStore;

/// All UI state of the documentation preview
pub struct ViewState {
    slot: Arc<dyn StateSlot>,
    config: ViewStateConfig,
    history: Arc<NavigationStack>,
    local_storage: KeyedStore,
    session_storage: KeyedStore,
    navigator: NavigatorTree,
}

impl ViewState {
    /// Restore the view state from whatever the slot holds, or start empty
    pub fn new(slot: Arc<dyn StateSlot>, config: ViewStateConfig) -> Arc<Self> {
        let snapshot = match slot.get_state() {
            Some(value) => ViewStateSnapshot::from_value_lossy(&value, &config),
            None => ViewStateSnapshot::empty(&config),
        };
        Self::from_snapshot(slot, config, snapshot)
    }

    /// Build the view state from an already decoded snapshot
    pub fn from_snapshot(
        slot: Arc<dyn StateSlot>,
        config: ViewStateConfig,
        snapshot: ViewStateSnapshot,
    ) -> Arc<Self> {
        debug!(
            "Restoring view state: {} history entries, index present: {}",
            snapshot.history.len(),
            snapshot.navigator.index.is_some()
        );

        Arc::new_cyclic(|owner: &Weak<ViewState>| {
            let owner = owner.clone();
            let save = SaveHook::new(move || {
                if let Some(state) = owner.upgrade() {
                    state.save();
                }
            });

            let history = Arc::new(NavigationStack::new(save.clone(), snapshot.history));
            let navigator =
                NavigatorTree::new(history.clone(), save.clone(), &config, snapshot.navigator);

            Self {
                slot,
                history,
                local_storage: KeyedStore::new("local", save.clone(), snapshot.local_storage),
                session_storage: KeyedStore::new("session", save, snapshot.session_storage),
                navigator,
                config,
            }
        })
    }

    pub fn history(&self) -> &Arc<NavigationStack> {
        &self.history
    }

    pub fn local_storage(&self) -> &KeyedStore {
        &self.local_storage
    }

    pub fn session_storage(&self) -> &KeyedStore {
        &self.session_storage
    }

    pub fn navigator(&self) -> &NavigatorTree {
        &self.navigator
    }

    pub fn config(&self) -> &ViewStateConfig {
        &self.config
    }

    /// Serializable copy of the whole aggregate
    pub fn snapshot(&self) -> ViewStateSnapshot {
        ViewStateSnapshot {
            history: self.history.entries(),
            local_storage: self.local_storage.items(),
            session_storage: self.session_storage.items(),
            navigator: self.navigator.to_snapshot(),
        }
    }

    /// Write the full snapshot to the slot; fire-and-forget
    pub fn save(&self) {
        match self.snapshot().to_value() {
            Ok(value) => self.slot.set_state(value),
            Err(err) => warn!("Failed to serialize view state: {}", err),
        }
    }
}

impl std::fmt::Debug for ViewState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewState")
            .field("history", &self.history)
            .field("local_storage", &self.local_storage)
            .field("session_storage", &self.session_storage)
            .field("navigator", &self.navigator)
            .finish()
    }
}
