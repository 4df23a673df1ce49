use super::KeyValueStore;
use crate::error::{Result, ShelfError};
use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;

/// In-memory key-value store for tests and throwaway sessions.
/// Does NOT persist data.
///
/// Uses `RefCell` since bookshelf is single-threaded, which lets the
/// `KeyValueStore` trait take `&self` everywhere.
#[derive(Debug, Default)]
pub struct MemKeyValueStore {
    items: RefCell<BTreeMap<String, String>>,
    quota: Option<usize>,
    simulate_write_error: Cell<bool>,
}

impl MemKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Caps the total size of all stored values, in bytes.
    pub fn with_quota(mut self, bytes: usize) -> Self {
        self.quota = Some(bytes);
        self
    }

    /// Enable write error simulation for testing error handling.
    pub fn set_simulate_write_error(&self, simulate: bool) {
        self.simulate_write_error.set(simulate);
    }

    fn used_bytes_without(&self, key: &str) -> usize {
        self.items
            .borrow()
            .iter()
            .filter(|(k, _)| k.as_str() != key)
            .map(|(_, v)| v.len())
            .sum()
    }
}

impl KeyValueStore for MemKeyValueStore {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.items.borrow().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        if self.simulate_write_error.get() {
            return Err(ShelfError::Store("Simulated write error".to_string()));
        }
        if let Some(quota) = self.quota {
            if self.used_bytes_without(key) + value.len() > quota {
                return Err(ShelfError::QuotaExceeded {
                    key: key.to_string(),
                });
            }
        }
        self.items
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        self.items.borrow_mut().remove(key);
        Ok(())
    }

    fn len(&self) -> Result<usize> {
        Ok(self.items.borrow().len())
    }
}

// --- Test Fixtures ---

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use super::*;
    use crate::model::BookProps;
    use crate::storage::SNAPSHOT_KEY;

    pub struct StoreFixture {
        pub store: MemKeyValueStore,
    }

    impl Default for StoreFixture {
        fn default() -> Self {
            Self::new()
        }
    }

    impl StoreFixture {
        pub fn new() -> Self {
            Self {
                store: MemKeyValueStore::new(),
            }
        }

        pub fn with_snapshot(self, books: &[BookProps]) -> Self {
            let json = serde_json::to_string(books).unwrap();
            self.with_raw(SNAPSHOT_KEY, &json)
        }

        pub fn with_raw(self, key: &str, value: &str) -> Self {
            self.store
                .items
                .borrow_mut()
                .insert(key.to_string(), value.to_string());
            self
        }

        pub fn with_quota(mut self, bytes: usize) -> Self {
            self.store = self.store.with_quota(bytes);
            self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_get_remove() {
        let store = MemKeyValueStore::new();
        store.set_item("a", "1").unwrap();
        assert_eq!(store.get_item("a").unwrap().as_deref(), Some("1"));
        assert_eq!(store.len().unwrap(), 1);
        store.remove_item("a").unwrap();
        store.remove_item("a").unwrap();
        assert!(store.is_empty().unwrap());
    }

    #[test]
    fn quota_counts_replaced_value_once() {
        let store = MemKeyValueStore::new().with_quota(4);
        store.set_item("k", "1234").unwrap();
        store.set_item("k", "abcd").unwrap();
        assert!(matches!(
            store.set_item("other", "x"),
            Err(ShelfError::QuotaExceeded { key }) if key == "other"
        ));
        assert_eq!(store.get_item("k").unwrap().as_deref(), Some("abcd"));
    }
}
