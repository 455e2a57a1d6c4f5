//! View state persisted to a JSON file

use std::fs;
use std::path::{Path, PathBuf};

use dp_core::{Result, StateSlot};
use serde_json::Value;
use tracing::{debug, warn};

/// A [`StateSlot`] backed by a single JSON file.
///
/// Writes go to a sibling temp file first and are renamed into place, so a
/// crash mid-write leaves the previous state intact.
#[derive(Debug, Clone)]
pub struct FileSlot {
    path: PathBuf,
}

impl FileSlot {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<Option<Value>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let text = fs::read_to_string(&self.path)?;
        Ok(Some(serde_json::from_str(&text)?))
    }

    fn write(&self, state: &Value) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let mut temp = self.path.clone().into_os_string();
        temp.push(".tmp");
        let temp = PathBuf::from(temp);

        fs::write(&temp, serde_json::to_vec_pretty(state)?)?;
        fs::rename(&temp, &self.path)?;
        Ok(())
    }
}

impl StateSlot for FileSlot {
    fn get_state(&self) -> Option<Value> {
        match self.read() {
            Ok(state) => state,
            Err(err) => {
                warn!("Ignoring unreadable state file {}: {}", self.path.display(), err);
                None
            }
        }
    }

    fn set_state(&self, state: Value) {
        match self.write(&state) {
            Ok(()) => debug!("View state written to {}", self.path.display()),
            Err(err) => warn!("Failed to write state file {}: {}", self.path.display(), err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_has_no_state() {
        let dir = TempDir::new().unwrap();
        let slot = FileSlot::new(dir.path().join("state.json"));
        assert_eq!(slot.get_state(), None);
    }

    #[test]
    fn test_write_then_read() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("state.json");
        let slot = FileSlot::new(&path);
        let state = json!({ "history": [{ "path": "/kit" }] });

        slot.set_state(state.clone());

        assert_eq!(slot.get_state(), Some(state));
        assert!(!dir.path().join("nested").join("state.json.tmp").exists());
    }

    #[test]
    fn test_corrupt_file_reads_as_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("state.json");
        fs::write(&path, "{ not json").unwrap();

        assert_eq!(FileSlot::new(&path).get_state(), None);
    }

    #[test]
    fn test_rewrite_replaces_previous_state() {
        let dir = TempDir::new().unwrap();
        let slot = FileSlot::new(dir.path().join("state.json"));

        slot.set_state(json!({ "history": [] }));
        slot.set_state(json!({ "history": [{ "path": "/guide" }] }));

        assert_eq!(slot.get_state(), Some(json!({ "history": [{ "path": "/guide" }] })));
    }
}
