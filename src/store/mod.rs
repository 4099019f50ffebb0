//! Store engine for pocketdb
//!
//! A store maps category names to ordered sequences of records. Records
//! are JSON objects with two engine-managed fields, `id` and `index`.
//!
//! # Invariants
//!
//! - Ids are unique within a category (the raw `get_all_mut` escape hatch aside)
//! - `index` is assigned once, at insertion, and never renormalized
//! - Categories exist from first use until the store is dropped
//! - Missing data is reported through return values; only type errors,
//!   unknown categories on `update`, and poisoned locks are errors

mod engine;
mod errors;
mod ids;
mod merge;
mod record;
mod shared;

pub use engine::{Categories, Store};
pub use errors::{StoreError, StoreResult};
pub use ids::{HexSegmentIds, IdGenerator, SequentialIds};
pub use merge::{DeepMerge, MergeStrategy, ShallowMerge};
pub use record::{Record, ID_FIELD, INDEX_FIELD};
pub use shared::SharedStore;
