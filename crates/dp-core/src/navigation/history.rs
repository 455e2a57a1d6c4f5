//! Navigation history

use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::RendererBridge;
use crate::events::{Notifier, SaveHook, Subscription};
use crate::protocol::BridgeEvent;

/// One visited route
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryItem {
    pub path: String,
}

impl HistoryItem {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }
}

/// Append-only log of visited routes
///
/// The last entry is the current route. Navigation is a two-step exchange:
/// [`NavigationStack::navigate_to`] only asks the renderer to navigate, and
/// the stack grows once the renderer confirms through
/// [`NavigationStack::set_current_route`].
pub struct NavigationStack {
    entries: RwLock<Vec<HistoryItem>>,
    route_changed: Notifier<String>,
    bridge: RwLock<Option<Arc<dyn RendererBridge>>>,
    save: SaveHook,
}

impl NavigationStack {
    /// Create a stack seeded with previously persisted entries
    pub fn new(save: SaveHook, entries: Vec<HistoryItem>) -> Self {
        Self {
            entries: RwLock::new(entries),
            route_changed: Notifier::new(),
            bridge: RwLock::new(None),
            save,
        }
    }

    /// Route navigation requests to `bridge`
    pub fn attach_bridge(&self, bridge: Arc<dyn RendererBridge>) {
        *self.bridge.write() = Some(bridge);
    }

    /// Ask the renderer to navigate to `path`
    pub fn navigate_to(&self, path: &str) {
        if self.current_route().as_deref() == Some(path) {
            return;
        }

        let bridge = self.bridge.read().clone();
        match bridge {
            Some(bridge) => bridge.receive(BridgeEvent::Navigation {
                data: path.to_string(),
            }),
            None => debug!("Dropping navigation request to {}: no renderer attached", path),
        }
    }

    /// The last visited route
    pub fn current_route(&self) -> Option<String> {
        self.entries.read().last().map(|item| item.path.clone())
    }

    /// Record `path` as visited; returns whether the route changed
    pub fn set_current_route(&self, path: impl Into<String>) -> bool {
        let path = path.into();
        {
            let mut entries = self.entries.write();
            if entries.last().map(|item| item.path.as_str()) == Some(path.as_str()) {
                return false;
            }
            entries.push(HistoryItem { path: path.clone() });
        }

        debug!("Route changed to {}", path);
        self.route_changed.notify(&path);
        self.save.save();
        true
    }

    /// Listen for route changes
    pub fn on_did_change_route<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&String) + Send + Sync + 'static,
    {
        self.route_changed.subscribe(listener)
    }

    /// Number of live route-change listeners
    pub fn route_listener_count(&self) -> usize {
        self.route_changed.listener_count()
    }

    /// All visited routes, oldest first
    pub fn entries(&self) -> Vec<HistoryItem> {
        self.entries.read().clone()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl std::fmt::Debug for NavigationStack {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NavigationStack")
            .field("entries", &*self.entries.read())
            .finish()
    }
}
