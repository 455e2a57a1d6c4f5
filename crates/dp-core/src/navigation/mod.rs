mod bridge;
mod history;

pub use bridge::RendererBridge;
pub use history::{HistoryItem, NavigationStack};
