//! pocketdb - a minimal, process-local, category-partitioned record store
//!
//! ```
//! use pocketdb::{Store, StoreConfig};
//! use serde_json::json;
//!
//! let mut store = Store::new(StoreConfig::default());
//! let ada = store.create_one("users", json!({"name": "Ada"})).unwrap();
//! assert_eq!(ada.index, 0);
//!
//! assert!(store.update("users", json!({"id": ada.id.clone(), "name": "Ada L."})).unwrap());
//! assert_eq!(store.get("users", &ada.id).unwrap().get("name"), Some(&json!("Ada L.")));
//!
//! store.remove_one("users", &ada.id);
//! assert!(store.get("users", &ada.id).is_none());
//! ```

pub mod config;
pub mod observability;
pub mod store;

pub use config::{IdKind, MergeKind, StoreConfig, StoreSettings};
pub use store::{
    Categories, DeepMerge, HexSegmentIds, IdGenerator, MergeStrategy, Record, SequentialIds,
    ShallowMerge, SharedStore, Store, StoreError, StoreResult,
};
