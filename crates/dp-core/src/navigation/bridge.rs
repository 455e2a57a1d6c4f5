//! Renderer bridge trait

use crate::protocol::BridgeEvent;

/// The embedded documentation renderer, as seen from the state store
pub trait RendererBridge: Send + Sync {
    /// Called for navigation requests and forwarded page content
    fn receive(&self, event: BridgeEvent);
}
