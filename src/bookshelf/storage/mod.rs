//! # Storage Layer
//!
//! Persistence is split in two, the same way a browser app sits on top of
//! `localStorage`:
//!
//! - [`KeyValueStore`]: the raw blob store. String keys, string values, may fail.
//!   [`fs::FsKeyValueStore`] keeps one file per key; [`memory::MemKeyValueStore`]
//!   keeps everything in memory and can simulate a full or broken store.
//! - [`AppStorage`]: the adapter the controller talks to. It knows the snapshot key
//!   and the snapshot format, and it decides once, at construction, whether the
//!   store is usable at all.
//!
//! ## Availability
//!
//! Availability is probed by writing and removing a throwaway key. A store that
//! fails the probe, including one that is merely full, is [`Availability::Unavailable`]
//! for the rest of the session: every adapter operation degrades to a no-op and the
//! app keeps working without persistence.
//!
//! ## Snapshot Format
//!
//! One key, [`SNAPSHOT_KEY`], holds a JSON array of book objects in display order:
//!
//! ```json
//! [{"title": "The Hobbit", "author": "J.R.R. Tolkien", "pageCount": 295, "isRead": false}]
//! ```
//!
//! Every save overwrites the whole snapshot.
//!
//! A snapshot that is present but cannot be decoded is never overwritten in place.
//! The controller first copies it to [`UNREADABLE_KEY`]; if even that fails, it
//! calls [`AppStorage::suspend`] and the session runs without persistence.

use crate::error::{Result, ShelfError};
use crate::model::{Book, BookProps};
use std::cell::Cell;
use tracing::{debug, info, warn};

pub mod fs;
pub mod memory;

pub const SNAPSHOT_KEY: &str = "libraryBooks";
/// Where an undecodable snapshot is kept before the library is reseeded.
pub const UNREADABLE_KEY: &str = "libraryBooks_unreadable";
const PROBE_KEY: &str = "__storage_test__";

/// Abstract interface for a string key-value store.
pub trait KeyValueStore {
    fn get_item(&self, key: &str) -> Result<Option<String>>;

    /// Write `value` under `key`, replacing what was there.
    /// Fails with [`ShelfError::QuotaExceeded`] when the store is full.
    fn set_item(&self, key: &str, value: &str) -> Result<()>;

    /// Removing a missing key is not an error.
    fn remove_item(&self, key: &str) -> Result<()>;

    /// Number of keys currently stored.
    fn len(&self) -> Result<usize>;

    fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnavailableReason {
    /// No store was provided at all.
    Unsupported,
    QuotaExceeded,
    /// The probe write or cleanup failed for any other reason.
    Failed,
    /// A stored snapshot could not be read or kept aside; writing would lose it.
    Unreadable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Availability {
    Available,
    Unavailable(UnavailableReason),
}

/// What [`AppStorage::read_snapshot`] found under [`SNAPSHOT_KEY`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Snapshot {
    /// Unavailable storage or no snapshot key.
    Missing,
    Loaded(Vec<BookProps>),
    /// Present but not a valid snapshot; holds the raw value.
    Undecodable(String),
    /// The store failed while reading the key.
    ReadFailed,
}

pub struct AppStorage<K: KeyValueStore> {
    store: Option<K>,
    availability: Cell<Availability>,
}

impl<K: KeyValueStore> AppStorage<K> {
    pub fn new(store: K) -> Self {
        let availability = probe(&store);
        match availability {
            Availability::Available => debug!("storage available"),
            Availability::Unavailable(reason) => {
                warn!(?reason, "storage unavailable, changes will not persist")
            }
        }
        Self {
            store: Some(store),
            availability: Cell::new(availability),
        }
    }

    /// An adapter with no backing store, permanently unavailable.
    pub fn detached() -> Self {
        Self {
            store: None,
            availability: Cell::new(Availability::Unavailable(UnavailableReason::Unsupported)),
        }
    }

    pub fn availability(&self) -> Availability {
        self.availability.get()
    }

    pub fn is_available(&self) -> bool {
        self.availability() == Availability::Available
    }

    /// Stops all further reads and writes for this session.
    pub fn suspend(&self, reason: UnavailableReason) {
        warn!(?reason, "storage suspended, changes will not persist");
        self.availability.set(Availability::Unavailable(reason));
    }

    pub fn store(&self) -> Option<&K> {
        self.store.as_ref()
    }

    pub fn has_initial_data(&self) -> bool {
        let Some(store) = self.usable() else {
            return false;
        };
        match store.len() {
            Ok(len) => len > 0,
            Err(e) => {
                warn!(error = %e, "could not inspect storage");
                false
            }
        }
    }

    /// The stored snapshot, or `None` when unavailable, missing or undecodable.
    pub fn load(&self) -> Option<Vec<BookProps>> {
        match self.read_snapshot() {
            Snapshot::Loaded(books) => Some(books),
            _ => None,
        }
    }

    pub fn read_snapshot(&self) -> Snapshot {
        let Some(store) = self.usable() else {
            return Snapshot::Missing;
        };
        let raw = match store.get_item(SNAPSHOT_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Snapshot::Missing,
            Err(e) => {
                warn!(error = %e, "could not read snapshot");
                return Snapshot::ReadFailed;
            }
        };
        match serde_json::from_str::<Vec<BookProps>>(&raw) {
            Ok(books) => {
                info!(count = books.len(), "loaded snapshot");
                Snapshot::Loaded(books)
            }
            Err(e) => {
                warn!(error = %e, "snapshot is not decodable");
                Snapshot::Undecodable(raw)
            }
        }
    }

    /// Copies an undecodable snapshot to [`UNREADABLE_KEY`].
    pub fn set_aside(&self, raw: &str) -> Result<()> {
        let Some(store) = self.usable() else {
            return Err(ShelfError::Store("storage is unavailable".to_string()));
        };
        store.set_item(UNREADABLE_KEY, raw)?;
        info!(key = UNREADABLE_KEY, "kept a copy of the unreadable snapshot");
        Ok(())
    }

    /// Overwrites the snapshot with `books`. No-op when unavailable.
    pub fn save(&self, books: &[Book]) -> Result<()> {
        let Some(store) = self.usable() else {
            return Ok(());
        };
        let json = serde_json::to_string(books).map_err(ShelfError::Serialization)?;
        store.set_item(SNAPSHOT_KEY, &json)?;
        debug!(count = books.len(), "saved snapshot");
        Ok(())
    }

    fn usable(&self) -> Option<&K> {
        if self.is_available() {
            self.store.as_ref()
        } else {
            None
        }
    }
}

fn probe<K: KeyValueStore>(store: &K) -> Availability {
    let result = store
        .set_item(PROBE_KEY, PROBE_KEY)
        .and_then(|_| store.remove_item(PROBE_KEY));
    match result {
        Ok(()) => Availability::Available,
        Err(ShelfError::QuotaExceeded { .. }) => {
            Availability::Unavailable(UnavailableReason::QuotaExceeded)
        }
        Err(e) => {
            debug!(error = %e, "storage probe failed");
            Availability::Unavailable(UnavailableReason::Failed)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::memory::fixtures::StoreFixture;
    use super::memory::MemKeyValueStore;
    use super::*;
    use crate::model::{sample_books, Library};

    #[test]
    fn fresh_store_is_available_without_data() {
        let storage = AppStorage::new(MemKeyValueStore::new());
        assert!(storage.is_available());
        assert!(!storage.has_initial_data());
        assert_eq!(storage.load(), None);
    }

    #[test]
    fn probe_leaves_no_trace() {
        let storage = AppStorage::new(MemKeyValueStore::new());
        assert_eq!(storage.store().unwrap().len().unwrap(), 0);
    }

    #[test]
    fn save_then_load_round_trips_in_order() {
        let storage = AppStorage::new(MemKeyValueStore::new());
        let library = Library::with_sample_books("Test");
        storage.save(library.books()).unwrap();

        assert!(storage.has_initial_data());
        assert_eq!(storage.load().unwrap(), sample_books());
    }

    #[test]
    fn snapshot_is_the_flat_camel_case_array() {
        let storage = AppStorage::new(MemKeyValueStore::new());
        let library = Library::with_books("Test", vec![BookProps::new("Emma", "Jane Austen", 474, true)]);
        storage.save(library.books()).unwrap();

        let raw = storage.store().unwrap().get_item(SNAPSHOT_KEY).unwrap().unwrap();
        assert_eq!(
            raw,
            r#"[{"title":"Emma","author":"Jane Austen","pageCount":474,"isRead":true}]"#
        );
    }

    #[test]
    fn detached_storage_degrades_to_no_ops() {
        let storage: AppStorage<MemKeyValueStore> = AppStorage::detached();
        assert_eq!(
            storage.availability(),
            Availability::Unavailable(UnavailableReason::Unsupported)
        );
        assert!(!storage.has_initial_data());
        assert!(storage.save(Library::with_sample_books("Test").books()).is_ok());
        assert_eq!(storage.load(), None);
    }

    #[test]
    fn full_store_is_classified_unavailable() {
        let fixture = StoreFixture::new()
            .with_snapshot(&sample_books())
            .with_quota(0);
        let storage = AppStorage::new(fixture.store);

        assert_eq!(
            storage.availability(),
            Availability::Unavailable(UnavailableReason::QuotaExceeded)
        );
        assert!(!storage.has_initial_data());
        assert_eq!(storage.load(), None);
        assert!(storage.save(&[]).is_ok());
    }

    #[test]
    fn failing_store_is_classified_unavailable() {
        let store = MemKeyValueStore::new();
        store.set_simulate_write_error(true);
        let storage = AppStorage::new(store);
        assert_eq!(
            storage.availability(),
            Availability::Unavailable(UnavailableReason::Failed)
        );
    }

    #[test]
    fn write_failure_after_probe_is_reported() {
        let storage = AppStorage::new(MemKeyValueStore::new());
        storage.store().unwrap().set_simulate_write_error(true);
        let library = Library::with_sample_books("Test");
        assert!(matches!(
            storage.save(library.books()),
            Err(ShelfError::Store(_))
        ));
    }

    #[test]
    fn corrupt_snapshot_loads_as_absent() {
        let fixture = StoreFixture::new().with_raw(SNAPSHOT_KEY, "{not json");
        let storage = AppStorage::new(fixture.store);
        assert!(storage.has_initial_data());
        assert_eq!(storage.load(), None);
        assert_eq!(
            storage.read_snapshot(),
            Snapshot::Undecodable("{not json".to_string())
        );
    }

    #[test]
    fn null_page_count_is_undecodable() {
        let raw = r#"[{"title":"Mine","author":"Me","pageCount":null,"isRead":false}]"#;
        let storage = AppStorage::new(StoreFixture::new().with_raw(SNAPSHOT_KEY, raw).store);
        assert_eq!(storage.read_snapshot(), Snapshot::Undecodable(raw.to_string()));
    }

    #[test]
    fn set_aside_copies_without_touching_the_snapshot() {
        let storage = AppStorage::new(StoreFixture::new().with_raw(SNAPSHOT_KEY, "[{oops").store);
        storage.set_aside("[{oops").unwrap();

        let store = storage.store().unwrap();
        assert_eq!(store.get_item(UNREADABLE_KEY).unwrap().as_deref(), Some("[{oops"));
        assert_eq!(store.get_item(SNAPSHOT_KEY).unwrap().as_deref(), Some("[{oops"));
    }

    #[test]
    fn suspended_storage_stops_writing() {
        let storage = AppStorage::new(StoreFixture::new().with_raw(SNAPSHOT_KEY, "[{oops").store);
        storage.suspend(UnavailableReason::Unreadable);

        assert_eq!(
            storage.availability(),
            Availability::Unavailable(UnavailableReason::Unreadable)
        );
        assert!(storage.save(Library::with_sample_books("Test").books()).is_ok());
        assert!(storage.set_aside("x").is_err());
        let raw = storage.store().unwrap().get_item(SNAPSHOT_KEY).unwrap();
        assert_eq!(raw.as_deref(), Some("[{oops"));
    }
}
