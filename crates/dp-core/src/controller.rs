//! Message routing between the host, the renderer and the view state

use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use serde_json::json;
use tracing::{debug, info};

use crate::events::Subscription;
use crate::navigation::RendererBridge;
use crate::protocol::{BridgeEvent, HostChannel, HostMessage, WebviewMessage};
use crate::state::ViewState;

/// Session-storage key holding the last scroll position
pub const SCROLL_POSITION_KEY: &str = "scrollPosition";

/// Connects a [`ViewState`] to the host process and the renderer.
///
/// Route changes turn into `requestContent` messages, host index updates
/// rebuild the navigator, page content is passed through to the renderer
/// and renderer navigation confirmations land in the history.
pub struct WebviewController {
    state: Arc<ViewState>,
    host: Arc<dyn HostChannel>,
    renderer: Arc<dyn RendererBridge>,
    initial_route: RwLock<Option<String>>,
    subscriptions: Mutex<Vec<Subscription>>,
}

impl WebviewController {
    pub fn new(
        state: Arc<ViewState>,
        host: Arc<dyn HostChannel>,
        renderer: Arc<dyn RendererBridge>,
    ) -> Self {
        state.history().attach_bridge(renderer.clone());
        Self {
            state,
            host,
            renderer,
            initial_route: RwLock::new(None),
            subscriptions: Mutex::new(Vec::new()),
        }
    }

    /// Issue the startup requests and begin following route changes
    pub fn start(&self) {
        if let Some(route) = self.state.history().current_route() {
            info!("Resuming at {}", route);
            *self.initial_route.write() = Some(route.clone());
            self.host.post_message(WebviewMessage::RequestContent { location: route });
        }

        let host = self.host.clone();
        let subscription = self.state.history().on_did_change_route(move |location| {
            host.post_message(WebviewMessage::RequestContent {
                location: location.clone(),
            });
        });
        self.subscriptions.lock().push(subscription);

        if self.state.navigator().index().is_none() {
            debug!("No persisted index, requesting one");
            self.host.post_message(WebviewMessage::RequestIndex);
        }
    }

    /// Route the renderer should open first, if the session was restored
    pub fn initial_route(&self) -> Option<String> {
        self.initial_route.read().clone()
    }

    pub fn state(&self) -> &Arc<ViewState> {
        &self.state
    }

    pub fn handle_host_message(&self, message: HostMessage) {
        match message {
            HostMessage::IndexUpdate { data } => {
                debug!("Index update with {} archives", data.included_archive_identifiers.len());
                self.state.navigator().update_index(data);
            }
            HostMessage::ContentUpdate { data } => {
                self.renderer.receive(BridgeEvent::ContentUpdate { data });
            }
        }
    }

    pub fn handle_bridge_event(&self, event: BridgeEvent) {
        match event {
            BridgeEvent::Navigation { data } => {
                self.state.history().set_current_route(data);
            }
            BridgeEvent::ContentUpdate { .. } => {
                debug!("Ignoring content update sent back by the renderer");
            }
        }
    }

    /// Remember where the page was scrolled to for the current route
    pub fn record_scroll_position(&self, x: f64, y: f64) {
        let position = json!({
            "x": x,
            "y": y,
            "location": self.state.history().current_route(),
        });
        self.state
            .session_storage()
            .set(SCROLL_POSITION_KEY, position.to_string());
    }

    /// Stop following route changes
    pub fn dispose(&self) {
        for subscription in self.subscriptions.lock().drain(..) {
            subscription.dispose();
        }
    }
}

impl Drop for WebviewController {
    fn drop(&mut self) {
        self.dispose();
    }
}
