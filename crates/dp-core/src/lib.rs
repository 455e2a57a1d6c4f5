//! Core state for the documentation preview webview
//!
//! This crate holds the persistent UI state of the preview: navigation
//! history, the two keyed storage namespaces, the navigator tree built from
//! the host's documentation index, and the message routing between host
//! and renderer.

pub mod config;
pub mod controller;
pub mod error;
pub mod events;
pub mod index;
pub mod navigation;
pub mod navigator;
pub mod protocol;
pub mod state;
pub mod storage;

// Re-export commonly used types
pub use config::{StateTransfer, ViewStateConfig};
pub use controller::{WebviewController, SCROLL_POSITION_KEY};
pub use error::{Result, StateError};
pub use events::{Notifier, Observable, SaveHook, Subscription};
pub use index::{DocumentationIndex, IndexElement, NodeKind};
pub use navigation::{HistoryItem, NavigationStack, RendererBridge};
pub use navigator::{NavigatorNode, NavigatorTree, AUTO_HEIGHT};
pub use protocol::{BridgeEvent, HostChannel, HostMessage, WebviewMessage};
pub use state::{MemorySlot, StateSlot, ViewState, ViewStateSnapshot};
pub use storage::{KeyedStore, Storage};
