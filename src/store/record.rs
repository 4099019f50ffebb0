//! Record types
//!
//! A record is an open map of caller fields plus two engine-managed fields:
//!
//! - `id`: unique within the owning category
//! - `index`: the category length at insertion time, never renormalized
//!
//! Records serialize flat, so `{"name": "Ada"}` stored in an empty category
//! reads back as `{"id": "...", "index": 0, "name": "Ada"}`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::errors::{StoreError, StoreResult};

/// Reserved field holding the record identifier
pub const ID_FIELD: &str = "id";

/// Reserved field holding the insertion-time position
pub const INDEX_FIELD: &str = "index";

/// A stored record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Identifier, unique within the category
    pub id: String,
    /// Position in the category at insertion time
    pub index: usize,
    /// Caller-defined fields
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Record {
    /// Create a record from its parts
    pub fn new(id: impl Into<String>, index: usize, fields: Map<String, Value>) -> Self {
        Self {
            id: id.into(),
            index,
            fields,
        }
    }

    /// Get a caller field by name
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Render the record as a flat JSON object including `id` and `index`
    pub fn to_value(&self) -> Value {
        let mut object = self.fields.clone();
        object.insert(ID_FIELD.to_string(), Value::String(self.id.clone()));
        object.insert(INDEX_FIELD.to_string(), Value::from(self.index));
        Value::Object(object)
    }

    /// Caller fields plus `id`, the shape handed to merge strategies
    pub(crate) fn mergeable(&self) -> Map<String, Value> {
        let mut object = self.fields.clone();
        object.insert(ID_FIELD.to_string(), Value::String(self.id.clone()));
        object
    }
}

/// An incoming item before the engine has assigned `id`/`index`
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Draft {
    pub id: Option<String>,
    pub fields: Map<String, Value>,
}

impl Draft {
    /// Split a JSON object into its optional id and caller fields.
    ///
    /// A missing or null `id` counts as absent. Any incoming `index` is
    /// dropped since the engine owns that field.
    pub fn from_value(item: Value) -> StoreResult<Self> {
        let mut fields = match item {
            Value::Object(fields) => fields,
            other => return Err(StoreError::not_an_object(&other)),
        };

        let id = match fields.remove(ID_FIELD) {
            None | Some(Value::Null) => None,
            Some(Value::String(id)) => Some(id),
            Some(other) => return Err(StoreError::not_a_string(ID_FIELD, &other)),
        };
        fields.remove(INDEX_FIELD);

        Ok(Self { id, fields })
    }
}
