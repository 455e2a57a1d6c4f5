//! View state configuration

use serde::{Deserialize, Serialize};

use crate::state::NodeSnapshot;

/// How prior per-node state is matched to a rebuilt navigator forest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StateTransfer {
    /// The Nth new node takes the state of the Nth old sibling
    #[default]
    Positional,
    /// Nodes are matched by route; path-less nodes fall back to position,
    /// as does everything when the prior siblings were recorded without paths
    ByPath,
}

impl StateTransfer {
    /// Find the prior state for the node at `position` among `prior` siblings
    pub fn lookup<'a>(
        &self,
        prior: &'a [NodeSnapshot],
        position: usize,
        path: Option<&str>,
    ) -> Option<&'a NodeSnapshot> {
        match self {
            StateTransfer::Positional => prior.get(position),
            StateTransfer::ByPath => {
                if prior.iter().all(|snapshot| snapshot.path.is_none()) {
                    return prior.get(position);
                }
                match path {
                    Some(path) => prior
                        .iter()
                        .find(|snapshot| snapshot.path.as_deref() == Some(path)),
                    None => prior.get(position).filter(|snapshot| snapshot.path.is_none()),
                }
            }
        }
    }

    /// Whether snapshots need to carry node paths
    pub fn records_paths(&self) -> bool {
        matches!(self, StateTransfer::ByPath)
    }
}

/// Settings for a [`crate::ViewState`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ViewStateConfig {
    /// Width of the hosting viewport in pixels
    pub viewport_width: f64,

    /// Share of the viewport the navigator takes when no width was persisted
    pub navigator_width_ratio: f64,

    /// Matching strategy used when the navigator forest is rebuilt
    pub state_transfer: StateTransfer,
}

impl Default for ViewStateConfig {
    fn default() -> Self {
        Self {
            viewport_width: 1280.0,
            navigator_width_ratio: 0.2,
            state_transfer: StateTransfer::Positional,
        }
    }
}

impl ViewStateConfig {
    /// Navigator width used when the snapshot has none
    pub fn default_navigator_width(&self) -> f64 {
        self.viewport_width * self.navigator_width_ratio
    }

    pub fn with_state_transfer(mut self, state_transfer: StateTransfer) -> Self {
        self.state_transfer = state_transfer;
        self
    }

    pub fn with_viewport_width(mut self, viewport_width: f64) -> Self {
        self.viewport_width = viewport_width;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(path: Option<&str>, expanded: bool) -> NodeSnapshot {
        NodeSnapshot {
            path: path.map(str::to_string),
            expanded,
            max_height: None,
            children: Vec::new(),
        }
    }

    #[test]
    fn test_positional_lookup_ignores_paths() {
        let prior = vec![snapshot(Some("/a"), true), snapshot(Some("/b"), false)];
        let found = StateTransfer::Positional.lookup(&prior, 1, Some("/a"));
        assert_eq!(found, Some(&prior[1]));
        assert_eq!(StateTransfer::Positional.lookup(&prior, 2, None), None);
    }

    #[test]
    fn test_path_lookup_follows_moved_nodes() {
        let prior = vec![
            snapshot(Some("/a"), true),
            snapshot(None, true),
            snapshot(Some("/b"), false),
        ];
        let transfer = StateTransfer::ByPath;

        assert_eq!(transfer.lookup(&prior, 0, Some("/b")), Some(&prior[2]));
        assert_eq!(transfer.lookup(&prior, 1, None), Some(&prior[1]));
        assert_eq!(transfer.lookup(&prior, 0, None), None);
        assert_eq!(transfer.lookup(&prior, 0, Some("/missing")), None);
    }

    #[test]
    fn test_path_lookup_reads_positional_snapshots() {
        let prior = vec![snapshot(None, true), snapshot(None, false)];
        let transfer = StateTransfer::ByPath;

        assert_eq!(transfer.lookup(&prior, 0, Some("/a")), Some(&prior[0]));
        assert_eq!(transfer.lookup(&prior, 1, None), Some(&prior[1]));
        assert_eq!(transfer.lookup(&prior, 2, Some("/c")), None);
    }

    #[test]
    fn test_default_navigator_width() {
        let config = ViewStateConfig::default().with_viewport_width(1000.0);
        assert_eq!(config.default_navigator_width(), 200.0);
    }
}
