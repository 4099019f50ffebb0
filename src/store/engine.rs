//! The store engine
//!
//! Owns the category -> records mapping. Every operation is synchronous and
//! runs to completion; mutations take `&mut self`.
//!
//! # Semantics
//!
//! - Categories are created on first `create` and survive `clean`
//! - `create` with an id already in the category merges instead of appending
//! - `update` never creates; an unknown category is an error, an unknown id is `false`
//! - `remove` skips unknown ids silently and always reports `true`
//! - Batches are applied item by item; a failure leaves earlier items applied
//!
//! Lookups stop at the first match, since ids are unique per category.
//! `index` is insertion-time metadata only: writes locate their target by id,
//! so an index left stale by removals never redirects an update.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde_json::{Map, Value};

use super::errors::{StoreError, StoreResult};
use super::ids::IdGenerator;
use super::merge::MergeStrategy;
use super::record::{Draft, Record, ID_FIELD, INDEX_FIELD};
use crate::config::StoreConfig;
use crate::observability::{Event, MetricsRegistry, Observer};

/// Category name -> records in insertion order
pub type Categories = BTreeMap<String, Vec<Record>>;

/// An in-process, category-partitioned record store
pub struct Store {
    categories: Categories,
    merge: Arc<dyn MergeStrategy>,
    ids: Arc<dyn IdGenerator>,
    observer: Observer,
}

impl Default for Store {
    fn default() -> Self {
        Self::new(StoreConfig::default())
    }
}

impl fmt::Debug for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("categories", &self.categories)
            .finish_non_exhaustive()
    }
}

impl Store {
    /// Create an empty store with the given capabilities
    pub fn new(config: StoreConfig) -> Self {
        let observer = Observer::new(config.logger);
        observer.emit(Event::StoreOpened, &[]);

        Self {
            categories: Categories::new(),
            merge: config.merge,
            ids: config.ids,
            observer,
        }
    }

    /// Register `category` if it does not exist yet.
    ///
    /// Returns `true` if the category was created, `false` if it already existed.
    pub fn create_category(&mut self, category: &str) -> bool {
        if self.categories.contains_key(category) {
            return false;
        }

        self.categories.insert(category.to_string(), Vec::new());
        self.observer.metrics().increment_categories_created();
        self.observer
            .emit(Event::CategoryCreated, &[("category", category)]);
        true
    }

    /// Store one item in `category`, creating the category if needed.
    ///
    /// The item must be a JSON object. Without an `id` one is generated. If
    /// the id already exists in the category the item is merged into that
    /// record instead of appended. Returns the record as stored.
    pub fn create_one(&mut self, category: &str, item: Value) -> StoreResult<Record> {
        self.create_category(category);
        self.insert(category, item)
    }

    /// Store a batch of items in order. See [`Store::create_one`].
    ///
    /// Not atomic: if an item is rejected, the items before it stay stored.
    pub fn create_many(&mut self, category: &str, items: Vec<Value>) -> StoreResult<Vec<Record>> {
        self.create_category(category);
        items
            .into_iter()
            .map(|item| self.insert(category, item))
            .collect()
    }

    fn insert(&mut self, category: &str, item: Value) -> StoreResult<Record> {
        let draft = Draft::from_value(item).map_err(|e| self.reject(e))?;
        let id = match draft.id {
            Some(id) => id,
            None => self.ids.generate(),
        };

        if let Some(record) = self.apply_patch(category, &id, &draft.fields) {
            self.observer.metrics().increment_records_merged();
            self.observer
                .emit(Event::RecordMerged, &[("category", category), ("id", id.as_str())]);
            return Ok(record);
        }

        let records = self.categories.entry(category.to_string()).or_default();
        let record = Record::new(id, records.len(), draft.fields);
        records.push(record.clone());

        self.observer.metrics().increment_records_created();
        let index = record.index.to_string();
        self.observer.emit(
            Event::RecordCreated,
            &[("category", category), ("id", record.id.as_str()), ("index", index.as_str())],
        );
        Ok(record)
    }

    /// Merge `item` into the record with the same `id`.
    ///
    /// Returns `Ok(false)` when no record matches (nothing is created) and
    /// fails if `category` does not exist or `item` is not an object with a
    /// string `id`.
    pub fn update(&mut self, category: &str, item: Value) -> StoreResult<bool> {
        let draft = Draft::from_value(item).map_err(|e| self.reject(e))?;

        if !self.categories.contains_key(category) {
            self.observer
                .emit(Event::CategoryMissing, &[("category", category)]);
            return Err(StoreError::CategoryNotFound(category.to_string()));
        }

        let Some(id) = draft.id else {
            self.missed_update(category, "");
            return Ok(false);
        };

        match self.apply_patch(category, &id, &draft.fields) {
            Some(_) => {
                self.observer.metrics().increment_records_updated();
                self.observer
                    .emit(Event::RecordUpdated, &[("category", category), ("id", id.as_str())]);
                Ok(true)
            }
            None => {
                self.missed_update(category, &id);
                Ok(false)
            }
        }
    }

    /// Merge `patch` into the record `id` in place; `None` if there is no such record
    fn apply_patch(
        &mut self,
        category: &str,
        id: &str,
        patch: &Map<String, Value>,
    ) -> Option<Record> {
        let slot = self
            .categories
            .get_mut(category)?
            .iter_mut()
            .find(|record| record.id == id)?;

        let mut fields = self.merge.merge(&slot.mergeable(), patch);
        fields.remove(ID_FIELD);
        fields.remove(INDEX_FIELD);
        slot.fields = fields;

        Some(slot.clone())
    }

    fn missed_update(&self, category: &str, id: &str) {
        self.observer.metrics().increment_update_misses();
        self.observer
            .emit(Event::UpdateMissed, &[("category", category), ("id", id)]);
    }

    /// Look up a record by id. `None` if the category or id is unknown.
    pub fn get(&self, category: &str, id: &str) -> Option<&Record> {
        let found = self
            .categories
            .get(category)
            .and_then(|records| records.iter().find(|record| record.id == id));
        self.observer.metrics().record_lookup(found.is_some());
        found
    }

    /// Look up a record with JSON-typed arguments.
    ///
    /// Fails with a type error unless both `category` and `id` are strings.
    pub fn get_by_value(&self, category: &Value, id: &Value) -> StoreResult<Option<&Record>> {
        let category = category
            .as_str()
            .ok_or_else(|| self.reject(StoreError::not_a_string("category", category)))?;
        let id = id
            .as_str()
            .ok_or_else(|| self.reject(StoreError::not_a_string(ID_FIELD, id)))?;
        Ok(self.get(category, id))
    }

    /// Remove the record `id` from `category`. Always returns `true`.
    pub fn remove_one(&mut self, category: &str, id: &str) -> bool {
        self.remove_many(category, &[id])
    }

    /// Remove every record whose id is in `ids`. Unknown ids are skipped.
    /// Always returns `true`.
    pub fn remove_many<S: AsRef<str>>(&mut self, category: &str, ids: &[S]) -> bool {
        for id in ids {
            let id = id.as_ref();
            let removed = match self.categories.get_mut(category) {
                Some(records) => {
                    let before = records.len();
                    records.retain(|record| record.id != id);
                    before - records.len()
                }
                None => 0,
            };

            if removed == 0 {
                self.observer
                    .emit(Event::RemoveSkipped, &[("category", category), ("id", id)]);
                continue;
            }

            self.observer.metrics().add_records_removed(removed as u64);
            self.observer
                .emit(Event::RecordRemoved, &[("category", category), ("id", id)]);
        }
        true
    }

    /// Drop every record in `category`, keeping the category registered.
    ///
    /// Returns the (now empty) records, or `None` if the category is unknown.
    pub fn clean(&mut self, category: &str) -> Option<&[Record]> {
        let records = self.categories.get_mut(category)?;
        let dropped = records.len().to_string();
        records.clear();

        self.observer.metrics().increment_categories_cleaned();
        self.observer.emit(
            Event::CategoryCleaned,
            &[("category", category), ("dropped", dropped.as_str())],
        );
        self.categories.get(category).map(Vec::as_slice)
    }

    /// The whole category -> records mapping
    pub fn get_all(&self) -> &Categories {
        &self.categories
    }

    /// The whole mapping, mutably.
    ///
    /// Bypasses every engine invariant: callers writing through this must
    /// keep ids unique per category themselves.
    pub fn get_all_mut(&mut self) -> &mut Categories {
        &mut self.categories
    }

    /// Records of one category in insertion order, or `None` if unknown
    pub fn get_all_by_category(&self, category: &str) -> Option<&[Record]> {
        self.categories.get(category).map(Vec::as_slice)
    }

    /// Records of one category, mutably. Same caveats as [`Store::get_all_mut`].
    pub fn get_all_by_category_mut(&mut self, category: &str) -> Option<&mut Vec<Record>> {
        self.categories.get_mut(category)
    }

    /// Whether `category` is registered
    pub fn has_category(&self, category: &str) -> bool {
        self.categories.contains_key(category)
    }

    /// Operational counters
    pub fn metrics(&self) -> &MetricsRegistry {
        self.observer.metrics()
    }

    fn reject(&self, err: StoreError) -> StoreError {
        self.observer.metrics().increment_type_rejections();
        self.observer
            .emit(Event::TypeRejected, &[("code", err.code()), ("reason", err.to_string().as_str())]);
        err
    }
}
