//! Host-provided persistence slot

use parking_lot::Mutex;
use serde_json::Value;

/// Opaque place where the host keeps the view state between reloads
pub trait StateSlot: Send + Sync {
    /// Last stored state, if any
    fn get_state(&self) -> Option<Value>;

    /// Replace the stored state; failures are the slot's business
    fn set_state(&self, state: Value);
}

/// In-memory slot that remembers the latest state and counts writes
#[derive(Debug, Default)]
pub struct MemorySlot {
    state: Mutex<Option<Value>>,
    writes: Mutex<usize>,
}

impl MemorySlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Slot pre-filled with a state from an earlier session
    pub fn with_state(state: Value) -> Self {
        Self {
            state: Mutex::new(Some(state)),
            writes: Mutex::new(0),
        }
    }

    pub fn current(&self) -> Option<Value> {
        self.state.lock().clone()
    }

    pub fn write_count(&self) -> usize {
        *self.writes.lock()
    }
}

impl StateSlot for MemorySlot {
    fn get_state(&self) -> Option<Value> {
        self.current()
    }

    fn set_state(&self, state: Value) {
        *self.state.lock() = Some(state);
        *self.writes.lock() += 1;
    }
}
