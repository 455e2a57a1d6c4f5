//! Host and renderer endpoints for the headless webview

use std::io::Write;

use dp_core::{BridgeEvent, HostChannel, RendererBridge, WebviewMessage};
use serde::Deserialize;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, warn};

/// Posts webview messages to the host as JSON lines on stdout
#[derive(Debug, Default)]
pub struct StdoutHost;

impl HostChannel for StdoutHost {
    fn post_message(&self, message: WebviewMessage) {
        let line = match serde_json::to_string(&message) {
            Ok(line) => line,
            Err(err) => {
                warn!("Failed to encode host message: {}", err);
                return;
            }
        };

        let mut stdout = std::io::stdout().lock();
        if let Err(err) = writeln!(stdout, "{}", line).and_then(|_| stdout.flush()) {
            warn!("Failed to post host message: {}", err);
        }
    }
}

/// Renderer stand-in: queues bridge events for the main loop, which
/// confirms navigations and reports rendered content.
#[derive(Debug, Clone)]
pub struct QueuedRenderer {
    events: UnboundedSender<BridgeEvent>,
}

impl QueuedRenderer {
    pub fn new(events: UnboundedSender<BridgeEvent>) -> Self {
        Self { events }
    }
}

impl RendererBridge for QueuedRenderer {
    fn receive(&self, event: BridgeEvent) {
        if self.events.send(event).is_err() {
            debug!("Renderer queue closed, dropping bridge event");
        }
    }
}

/// Commands that stand in for user interaction with the webview
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "command", rename_all = "camelCase")]
pub enum DriverCommand {
    Navigate { path: String },
    ToggleExpanded { path: String },
    ToggleNavigator,
    ResizeNavigator { width: f64 },
    Scroll { x: f64, y: f64 },
}

/// One line of stdin: either a host message or a driver command
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum InputLine {
    Host(dp_core::HostMessage),
    Driver(DriverCommand),
}
