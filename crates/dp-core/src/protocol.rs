//! Messages exchanged with the host process and the documentation renderer

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::index::DocumentationIndex;

/// Messages the webview sends to the host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum WebviewMessage {
    /// Ask for the current documentation index
    RequestIndex,
    /// Ask for the content of a route
    RequestContent { location: String },
}

/// Messages the host sends to the webview
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum HostMessage {
    IndexUpdate { data: DocumentationIndex },
    /// Page content, opaque to the state store
    ContentUpdate { data: Value },
}

/// Events crossing the bridge between the state store and the renderer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum BridgeEvent {
    /// Sent to the renderer as a navigation request; sent back as the
    /// confirmation that the route is now active.
    Navigation { data: String },
    ContentUpdate { data: Value },
}

/// Outgoing side of the host connection
pub trait HostChannel: Send + Sync {
    /// Fire-and-forget send
    fn post_message(&self, message: WebviewMessage);
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_webview_message_wire_format() {
        let request = serde_json::to_value(WebviewMessage::RequestContent {
            location: "/documentation/kit".to_string(),
        })
        .unwrap();
        assert_eq!(request, json!({ "type": "requestContent", "location": "/documentation/kit" }));

        let index = serde_json::to_value(WebviewMessage::RequestIndex).unwrap();
        assert_eq!(index, json!({ "type": "requestIndex" }));
    }

    #[test]
    fn test_host_message_decoding() {
        let message: HostMessage = serde_json::from_value(json!({
            "type": "contentUpdate",
            "data": { "kind": "article" }
        }))
        .unwrap();
        assert_eq!(message, HostMessage::ContentUpdate { data: json!({ "kind": "article" }) });

        let message: HostMessage = serde_json::from_value(json!({
            "type": "indexUpdate",
            "data": { "interfaceLanguages": {} }
        }))
        .unwrap();
        assert!(matches!(message, HostMessage::IndexUpdate { .. }));
    }

    #[test]
    fn test_bridge_navigation_shape() {
        let event: BridgeEvent =
            serde_json::from_value(json!({ "type": "navigation", "data": "/foo" })).unwrap();
        assert_eq!(event, BridgeEvent::Navigation { data: "/foo".to_string() });
    }
}
