//! Key-value storage namespaces backed by the persisted snapshot

use indexmap::IndexMap;
use parking_lot::RwLock;
use tracing::debug;

use crate::events::SaveHook;

/// Storage-like interface for code that expects ambient browser storage.
///
/// Handing a [`KeyedStore`] to such code as `&dyn Storage` redirects its
/// reads and writes into the view state without changing the caller.
pub trait Storage {
    fn get_item(&self, key: &str) -> Option<String>;
    fn set_item(&self, key: &str, value: &str);
    fn remove_item(&self, key: &str);
    fn clear(&self);
}

/// A flat string map persisted with the view state
pub struct KeyedStore {
    namespace: &'static str,
    items: RwLock<IndexMap<String, String>>,
    save: SaveHook,
}

impl KeyedStore {
    pub fn new(namespace: &'static str, save: SaveHook, items: IndexMap<String, String>) -> Self {
        Self {
            namespace,
            items: RwLock::new(items),
            save,
        }
    }

    /// Name of this namespace, e.g. `"local"` or `"session"`
    pub fn namespace(&self) -> &'static str {
        self.namespace
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.items.read().get(key).cloned()
    }

    pub fn set(&self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        debug!("{} storage: set {}", self.namespace, key);
        self.items.write().insert(key, value.into());
        self.save.save();
    }

    pub fn remove(&self, key: &str) {
        self.items.write().shift_remove(key);
        self.save.save();
    }

    pub fn clear(&self) {
        self.items.write().clear();
        self.save.save();
    }

    pub fn len(&self) -> usize {
        self.items.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.read().is_empty()
    }

    /// Copy of every entry, in insertion order
    pub fn items(&self) -> IndexMap<String, String> {
        self.items.read().clone()
    }
}

impl Storage for KeyedStore {
    fn get_item(&self, key: &str) -> Option<String> {
        self.get(key)
    }

    fn set_item(&self, key: &str, value: &str) {
        self.set(key, value);
    }

    fn remove_item(&self, key: &str) {
        self.remove(key);
    }

    fn clear(&self) {
        KeyedStore::clear(self);
    }
}

impl std::fmt::Debug for KeyedStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyedStore")
            .field("namespace", &self.namespace)
            .field("items", &*self.items.read())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counting_store() -> (KeyedStore, Arc<AtomicUsize>) {
        let saves = Arc::new(AtomicUsize::new(0));
        let counter = saves.clone();
        let store = KeyedStore::new(
            "local",
            SaveHook::new(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            }),
            IndexMap::new(),
        );
        (store, saves)
    }

    #[test]
    fn test_every_mutation_saves() {
        let (store, saves) = counting_store();

        store.set("theme", "dark");
        store.set("theme", "light");
        store.remove("theme");
        store.remove("missing");
        store.clear();

        assert_eq!(saves.load(Ordering::SeqCst), 5);
        assert!(store.is_empty());
    }

    #[test]
    fn test_get_missing_key() {
        let (store, saves) = counting_store();
        assert_eq!(store.get("nothing"), None);
        assert_eq!(saves.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_storage_trait_redirects_into_store() {
        fn remember_language(storage: &dyn Storage) {
            if storage.get_item("language").is_none() {
                storage.set_item("language", "swift");
            }
        }

        let (store, _) = counting_store();
        remember_language(&store);

        assert_eq!(store.get("language").as_deref(), Some("swift"));
        Storage::clear(&store);
        assert_eq!(store.len(), 0);
    }

    #[test]
    fn test_initial_items_keep_order() {
        let mut items = IndexMap::new();
        items.insert("b".to_string(), "2".to_string());
        items.insert("a".to_string(), "1".to_string());
        let store = KeyedStore::new("session", SaveHook::detached(), items);

        let keys: Vec<_> = store.items().keys().cloned().collect();
        assert_eq!(keys, vec!["b", "a"]);
    }
}
