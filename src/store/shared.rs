//! Thread-shareable store handle
//!
//! The engine itself is single-actor. `SharedStore` puts one behind an
//! `RwLock` for hosts that hand it to several threads. Each call holds the
//! lock for that call only; there is no grouping across calls.

use std::sync::{Arc, RwLock};

use serde_json::Value;

use super::engine::{Categories, Store};
use super::errors::{StoreError, StoreResult};
use super::record::Record;

/// A cloneable, lock-guarded handle to one store
#[derive(Debug, Clone, Default)]
pub struct SharedStore {
    inner: Arc<RwLock<Store>>,
}

impl SharedStore {
    /// Wrap an existing store
    pub fn new(store: Store) -> Self {
        Self {
            inner: Arc::new(RwLock::new(store)),
        }
    }

    /// Run `f` with shared access
    pub fn read<T>(&self, f: impl FnOnce(&Store) -> T) -> StoreResult<T> {
        let store = self
            .inner
            .read()
            .map_err(|_| StoreError::Internal("store lock poisoned".into()))?;
        Ok(f(&store))
    }

    /// Run `f` with exclusive access
    pub fn write<T>(&self, f: impl FnOnce(&mut Store) -> T) -> StoreResult<T> {
        let mut store = self
            .inner
            .write()
            .map_err(|_| StoreError::Internal("store lock poisoned".into()))?;
        Ok(f(&mut store))
    }

    pub fn create_one(&self, category: &str, item: Value) -> StoreResult<Record> {
        self.write(|store| store.create_one(category, item))?
    }

    pub fn create_many(&self, category: &str, items: Vec<Value>) -> StoreResult<Vec<Record>> {
        self.write(|store| store.create_many(category, items))?
    }

    pub fn update(&self, category: &str, item: Value) -> StoreResult<bool> {
        self.write(|store| store.update(category, item))?
    }

    /// Owned copy of the record, if present
    pub fn get(&self, category: &str, id: &str) -> StoreResult<Option<Record>> {
        self.read(|store| store.get(category, id).cloned())
    }

    pub fn remove_one(&self, category: &str, id: &str) -> StoreResult<bool> {
        self.write(|store| store.remove_one(category, id))
    }

    pub fn remove_many<S: AsRef<str>>(&self, category: &str, ids: &[S]) -> StoreResult<bool> {
        self.write(|store| store.remove_many(category, ids))
    }

    /// `Ok(true)` if the category existed and was emptied
    pub fn clean(&self, category: &str) -> StoreResult<bool> {
        self.write(|store| store.clean(category).is_some())
    }

    /// Owned copy of one category's records
    pub fn get_all_by_category(&self, category: &str) -> StoreResult<Option<Vec<Record>>> {
        self.read(|store| store.get_all_by_category(category).map(<[Record]>::to_vec))
    }

    /// Owned copy of the whole mapping
    pub fn get_all(&self) -> StoreResult<Categories> {
        self.read(|store| store.get_all().clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StoreConfig;
    use serde_json::json;
    use std::thread;

    fn shared() -> SharedStore {
        SharedStore::new(Store::new(StoreConfig::default().with_log_level(None)))
    }

    #[test]
    fn test_shared_round_trip() {
        let store = shared();
        let record = store.create_one("users", json!({"name": "Ada"})).unwrap();

        let fetched = store.get("users", &record.id).unwrap().unwrap();
        assert_eq!(fetched, record);

        assert!(store.clean("users").unwrap());
        assert!(!store.clean("nobody").unwrap());
        assert_eq!(store.get_all_by_category("users").unwrap(), Some(vec![]));
    }

    #[test]
    fn test_concurrent_creates() {
        let store = shared();
        let handles: Vec<_> = (0..4)
            .map(|t| {
                let store = store.clone();
                thread::spawn(move || {
                    for i in 0..50 {
                        store
                            .create_one("events", json!({"id": format!("{}-{}", t, i)}))
                            .unwrap();
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        let records = store.get_all_by_category("events").unwrap().unwrap();
        assert_eq!(records.len(), 200);
        let mut indexes: Vec<usize> = records.iter().map(|r| r.index).collect();
        indexes.sort_unstable();
        assert_eq!(indexes, (0..200).collect::<Vec<_>>());
    }

    #[test]
    fn test_poisoned_lock_is_internal_error() {
        let store = shared();
        let poisoner = store.clone();
        let _ = thread::spawn(move || {
            let _ = poisoner.write(|_store| {
                panic!("poison the lock");
            });
        })
        .join();

        let err = store.get("users", "x").unwrap_err();
        assert!(err.is_fatal());
        assert_eq!(err.code(), "POCKET_INTERNAL");
    }
}
