//! Metrics registry
//!
//! - Counters only, monotonic
//! - Reset only when the store is constructed
//! - Atomic, so a store read through `&self` can still count lookups

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Operational counters for one store
#[derive(Debug, Default)]
pub struct MetricsRegistry {
    /// Records appended
    records_created: AtomicU64,
    /// Records merged by `update`
    records_updated: AtomicU64,
    /// `create` calls routed to the update path
    records_merged: AtomicU64,
    /// Records removed
    records_removed: AtomicU64,
    /// `update` calls that matched nothing
    update_misses: AtomicU64,
    /// Categories registered
    categories_created: AtomicU64,
    /// `clean` calls on existing categories
    categories_cleaned: AtomicU64,
    /// `get` calls
    lookups: AtomicU64,
    /// `get` calls that matched nothing
    lookup_misses: AtomicU64,
    /// Type errors raised
    type_rejections: AtomicU64,
}

impl MetricsRegistry {
    /// Create a new metrics registry with all counters at zero
    pub fn new() -> Self {
        Self::default()
    }

    fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_records_created(&self) {
        Self::bump(&self.records_created);
    }

    pub fn increment_records_updated(&self) {
        Self::bump(&self.records_updated);
    }

    pub fn increment_records_merged(&self) {
        Self::bump(&self.records_merged);
    }

    /// Add `count` removed records
    pub fn add_records_removed(&self, count: u64) {
        self.records_removed.fetch_add(count, Ordering::Relaxed);
    }

    pub fn increment_update_misses(&self) {
        Self::bump(&self.update_misses);
    }

    pub fn increment_categories_created(&self) {
        Self::bump(&self.categories_created);
    }

    pub fn increment_categories_cleaned(&self) {
        Self::bump(&self.categories_cleaned);
    }

    /// Count one lookup and whether it found a record
    pub fn record_lookup(&self, found: bool) {
        Self::bump(&self.lookups);
        if !found {
            Self::bump(&self.lookup_misses);
        }
    }

    pub fn increment_type_rejections(&self) {
        Self::bump(&self.type_rejections);
    }

    /// Get all metrics as a snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            records_created: self.records_created.load(Ordering::Relaxed),
            records_updated: self.records_updated.load(Ordering::Relaxed),
            records_merged: self.records_merged.load(Ordering::Relaxed),
            records_removed: self.records_removed.load(Ordering::Relaxed),
            update_misses: self.update_misses.load(Ordering::Relaxed),
            categories_created: self.categories_created.load(Ordering::Relaxed),
            categories_cleaned: self.categories_cleaned.load(Ordering::Relaxed),
            lookups: self.lookups.load(Ordering::Relaxed),
            lookup_misses: self.lookup_misses.load(Ordering::Relaxed),
            type_rejections: self.type_rejections.load(Ordering::Relaxed),
        }
    }

    /// Current snapshot as a JSON object
    pub fn to_json(&self) -> String {
        serde_json::to_string(&self.snapshot()).unwrap_or_else(|_| "{}".to_string())
    }
}

/// A point-in-time snapshot of all metrics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub records_created: u64,
    pub records_updated: u64,
    pub records_merged: u64,
    pub records_removed: u64,
    pub update_misses: u64,
    pub categories_created: u64,
    pub categories_cleaned: u64,
    pub lookups: u64,
    pub lookup_misses: u64,
    pub type_rejections: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_registry_has_zero_values() {
        assert_eq!(MetricsRegistry::new().snapshot(), MetricsSnapshot::default());
    }

    #[test]
    fn test_lookup_counts_misses() {
        let registry = MetricsRegistry::new();
        registry.record_lookup(true);
        registry.record_lookup(false);
        registry.record_lookup(false);

        let snapshot = registry.snapshot();
        assert_eq!(snapshot.lookups, 3);
        assert_eq!(snapshot.lookup_misses, 2);
    }

    #[test]
    fn test_to_json() {
        let registry = MetricsRegistry::new();
        registry.increment_records_created();
        registry.add_records_removed(4);

        let parsed: serde_json::Value = serde_json::from_str(&registry.to_json()).unwrap();
        assert_eq!(parsed["records_created"], 1);
        assert_eq!(parsed["records_removed"], 4);
        assert_eq!(parsed["type_rejections"], 0);
    }

    #[test]
    fn test_thread_safety() {
        use std::sync::Arc;
        use std::thread;

        let registry = Arc::new(MetricsRegistry::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let reg = Arc::clone(&registry);
                thread::spawn(move || {
                    for _ in 0..100 {
                        reg.record_lookup(true);
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(registry.snapshot().lookups, 800);
    }
}
