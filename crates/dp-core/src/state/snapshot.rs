//! Serializable form of the view state
//!
//! The snapshot is what the host keeps across webview reloads:
//!
//! ```json
//! {
//!   "history": [{ "path": "/documentation/kit" }],
//!   "localStorage": {},
//!   "sessionStorage": {},
//!   "navigator": {
//!     "index": { ... },
//!     "scroll": 0,
//!     "visible": true,
//!     "width": 256,
//!     "elements": [{ "expanded": true, "maxHeight": -1, "children": [] }]
//!   }
//! }
//! ```

use std::sync::Arc;

use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

use crate::config::ViewStateConfig;
use crate::error::{Result, StateError};
use crate::index::DocumentationIndex;
use crate::navigation::HistoryItem;

/// Persisted UI state of one navigator node
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeSnapshot {
    /// Only recorded when nodes are matched by path
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    #[serde(default)]
    pub expanded: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_height: Option<f64>,

    #[serde(default)]
    pub children: Vec<NodeSnapshot>,
}

/// Persisted navigator panel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigatorSnapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<Arc<DocumentationIndex>>,
    pub scroll: f64,
    pub visible: bool,
    pub width: f64,
    #[serde(default)]
    pub elements: Vec<NodeSnapshot>,
}

impl NavigatorSnapshot {
    /// Empty navigator with the configured default width
    pub fn empty(config: &ViewStateConfig) -> Self {
        Self {
            index: None,
            scroll: 0.0,
            visible: true,
            width: config.default_navigator_width(),
            elements: Vec::new(),
        }
    }

    fn from_object_lossy(object: &Map<String, Value>, config: &ViewStateConfig) -> Self {
        let defaults = Self::empty(config);
        Self {
            index: field(object, "index", "navigator.index").or(defaults.index),
            scroll: field(object, "scroll", "navigator.scroll").unwrap_or(defaults.scroll),
            visible: field(object, "visible", "navigator.visible").unwrap_or(defaults.visible),
            width: field(object, "width", "navigator.width").unwrap_or(defaults.width),
            elements: field(object, "elements", "navigator.elements").unwrap_or(defaults.elements),
        }
    }
}

/// Everything the view state persists
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewStateSnapshot {
    pub history: Vec<HistoryItem>,
    pub local_storage: IndexMap<String, String>,
    pub session_storage: IndexMap<String, String>,
    pub navigator: NavigatorSnapshot,
}

impl ViewStateSnapshot {
    /// Snapshot of a view state that has never been persisted
    pub fn empty(config: &ViewStateConfig) -> Self {
        Self {
            history: Vec::new(),
            local_storage: IndexMap::new(),
            session_storage: IndexMap::new(),
            navigator: NavigatorSnapshot::empty(config),
        }
    }

    /// Decode a snapshot, replacing every missing or malformed field with
    /// its default instead of failing.
    pub fn from_value_lossy(value: &Value, config: &ViewStateConfig) -> Self {
        let Some(object) = value.as_object() else {
            if !value.is_null() {
                warn!("Ignoring persisted view state: expected an object");
            }
            return Self::empty(config);
        };

        let navigator = match object.get("navigator") {
            Some(Value::Object(navigator)) => {
                NavigatorSnapshot::from_object_lossy(navigator, config)
            }
            Some(Value::Null) | None => NavigatorSnapshot::empty(config),
            Some(_) => {
                warn!("Ignoring malformed navigator state");
                NavigatorSnapshot::empty(config)
            }
        };

        Self {
            history: field(object, "history", "history").unwrap_or_default(),
            local_storage: field(object, "localStorage", "localStorage").unwrap_or_default(),
            session_storage: field(object, "sessionStorage", "sessionStorage").unwrap_or_default(),
            navigator,
        }
    }

    /// Strictly decode a snapshot from JSON text
    pub fn from_json_str(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json)?;
        if !value.is_object() {
            return Err(StateError::InvalidSnapshot("expected a JSON object".to_string()));
        }
        Ok(serde_json::from_value(value)?)
    }

    pub fn to_value(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }
}

/// Decode `key` from `object`; absent and null fields are `None` silently,
/// malformed ones are `None` with a warning naming `label`.
fn field<T: DeserializeOwned>(object: &Map<String, Value>, key: &str, label: &str) -> Option<T> {
    match object.get(key) {
        None | Some(Value::Null) => None,
        Some(value) => match serde_json::from_value(value.clone()) {
            Ok(decoded) => Some(decoded),
            Err(err) => {
                warn!("Ignoring malformed persisted field {}: {}", label, err);
                None
            }
        },
    }
}
