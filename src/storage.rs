//! Client-side key-value persistence.
//!
//! Everything the front-end remembers between visits (the API key, the theme,
//! the backend URL override) goes through [`KeyValueStore`], so callers never
//! touch `window.localStorage` directly.

#[cfg(test)]
use std::{cell::RefCell, collections::HashMap, rc::Rc};

use crate::error::StorageError;

/// Local storage key holding the user's OpenAI API key.
pub const API_KEY_STORAGE_KEY: &str = "openai_api_key";
/// Local storage key for the theme preference.
pub const THEME_KEY: &str = "theme";
/// Local storage key for the backend URL override.
pub const API_BASE_URL_KEY: &str = "api_base_url";

pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    fn remove(&self, key: &str) -> Result<(), StorageError>;

    /// True when the key holds a non-empty value.
    fn exists(&self, key: &str) -> bool {
        self.get(key).is_some_and(|v| !v.is_empty())
    }
}

/// `window.localStorage`.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserStorage;

impl BrowserStorage {
    fn storage() -> Result<web_sys::Storage, StorageError> {
        web_sys::window()
            .ok_or(StorageError::Unavailable)?
            .local_storage()
            .map_err(|_| StorageError::Unavailable)?
            .ok_or(StorageError::Unavailable)
    }
}

impl KeyValueStore for BrowserStorage {
    fn get(&self, key: &str) -> Option<String> {
        Self::storage().ok()?.get_item(key).ok()?
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        Self::storage()?
            .set_item(key, value)
            .map_err(|e| StorageError::Write {
                key: key.to_string(),
                message: format!("{:?}", e),
            })
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        Self::storage()?
            .remove_item(key)
            .map_err(|e| StorageError::Write {
                key: key.to_string(),
                message: format!("{:?}", e),
            })
    }
}

/// In-memory store for tests. Clones share the same map.
#[cfg(test)]
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    items: Rc<RefCell<HashMap<String, String>>>,
}

#[cfg(test)]
impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.items.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.items
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.items.borrow_mut().remove(key);
        Ok(())
    }
}

/// The stored API key. Pure pass-through: format checks live in
/// [`crate::validation::validate_api_key`].
#[derive(Debug, Clone, Default)]
pub struct ApiKeyStore<S: KeyValueStore = BrowserStorage> {
    store: S,
}

impl ApiKeyStore<BrowserStorage> {
    pub fn browser() -> Self {
        Self {
            store: BrowserStorage,
        }
    }
}

impl<S: KeyValueStore> ApiKeyStore<S> {
    #[cfg(test)]
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn get(&self) -> Option<String> {
        self.store.get(API_KEY_STORAGE_KEY).filter(|k| !k.is_empty())
    }

    pub fn set(&self, key: &str) -> Result<(), StorageError> {
        self.store.set(API_KEY_STORAGE_KEY, key)
    }

    pub fn clear(&self) -> Result<(), StorageError> {
        self.store.remove(API_KEY_STORAGE_KEY)
    }

    pub fn exists(&self) -> bool {
        self.store.exists(API_KEY_STORAGE_KEY)
    }
}

/// Read a UI preference from browser storage.
pub fn get_preference(key: &str) -> Option<String> {
    BrowserStorage.get(key)
}

/// Persist a UI preference to browser storage. An empty value removes it.
pub fn set_preference(key: &str, value: &str) -> Result<(), StorageError> {
    if value.is_empty() {
        BrowserStorage.remove(key)
    } else {
        BrowserStorage.set(key, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_set_get_remove() {
        let store = MemoryStore::new();
        assert_eq!(store.get("a"), None);

        store.set("a", "1").unwrap();
        assert_eq!(store.get("a").as_deref(), Some("1"));
        assert!(store.exists("a"));

        store.remove("a").unwrap();
        assert_eq!(store.get("a"), None);
        assert!(!store.exists("a"));
    }

    #[test]
    fn test_empty_value_does_not_count_as_existing() {
        let store = MemoryStore::new();
        store.set("a", "").unwrap();
        assert!(!store.exists("a"));
    }

    #[test]
    fn test_memory_store_clones_share_state() {
        let store = MemoryStore::new();
        let other = store.clone();
        store.set("k", "v").unwrap();
        assert_eq!(other.get("k").as_deref(), Some("v"));
    }

    #[test]
    fn test_api_key_store_uses_well_known_key() {
        let store = MemoryStore::new();
        let keys = ApiKeyStore::new(store.clone());
        assert!(!keys.exists());
        assert_eq!(keys.get(), None);

        keys.set("sk-test-key-1234567890").unwrap();
        assert!(keys.exists());
        assert_eq!(
            store.get(API_KEY_STORAGE_KEY).as_deref(),
            Some("sk-test-key-1234567890")
        );

        keys.clear().unwrap();
        assert!(!keys.exists());
    }

    #[test]
    fn test_api_key_store_ignores_blank_value() {
        let store = MemoryStore::new();
        store.set(API_KEY_STORAGE_KEY, "").unwrap();
        let keys = ApiKeyStore::new(store);
        assert_eq!(keys.get(), None);
        assert!(!keys.exists());
    }
}
