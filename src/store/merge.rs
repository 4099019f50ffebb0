//! Merge strategies used by `update`
//!
//! A strategy combines the stored record (`base`) with an incoming partial
//! record (`patch`). Fields absent from the patch are kept.

use serde_json::{Map, Value};

/// Combines a stored record with a partial update
pub trait MergeStrategy: Send + Sync {
    /// Merge `patch` into `base`, returning the combined mapping
    fn merge(&self, base: &Map<String, Value>, patch: &Map<String, Value>) -> Map<String, Value>;
}

impl<F> MergeStrategy for F
where
    F: Fn(&Map<String, Value>, &Map<String, Value>) -> Map<String, Value> + Send + Sync,
{
    fn merge(&self, base: &Map<String, Value>, patch: &Map<String, Value>) -> Map<String, Value> {
        self(base, patch)
    }
}

/// Recursive merge: nested objects merge key by key, everything else
/// (scalars, arrays, null) is replaced by the patch value.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeepMerge;

impl DeepMerge {
    fn merge_into(target: &mut Map<String, Value>, patch: &Map<String, Value>) {
        for (key, incoming) in patch {
            if let (Some(Value::Object(existing)), Value::Object(nested)) =
                (target.get_mut(key), incoming)
            {
                Self::merge_into(existing, nested);
                continue;
            }
            target.insert(key.clone(), incoming.clone());
        }
    }
}

impl MergeStrategy for DeepMerge {
    fn merge(&self, base: &Map<String, Value>, patch: &Map<String, Value>) -> Map<String, Value> {
        let mut merged = base.clone();
        Self::merge_into(&mut merged, patch);
        merged
    }
}

/// Top-level merge: each patch key replaces the stored value wholesale
#[derive(Debug, Clone, Copy, Default)]
pub struct ShallowMerge;

impl MergeStrategy for ShallowMerge {
    fn merge(&self, base: &Map<String, Value>, patch: &Map<String, Value>) -> Map<String, Value> {
        let mut merged = base.clone();
        for (k, v) in patch {
            merged.insert(k.clone(), v.clone());
        }
        merged
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn obj(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("fixture must be an object"),
        }
    }

    #[test]
    fn test_deep_merge_keeps_untouched_fields() {
        let base = obj(json!({"name": "Ada", "age": 36}));
        let patch = obj(json!({"name": "Ada L."}));

        let merged = DeepMerge.merge(&base, &patch);
        assert_eq!(Value::Object(merged), json!({"name": "Ada L.", "age": 36}));
    }

    #[test]
    fn test_deep_merge_recurses_into_objects() {
        let base = obj(json!({"profile": {"city": "London", "langs": ["en"]}, "v": 1}));
        let patch = obj(json!({"profile": {"langs": ["en", "fr"], "zip": "N1"}}));

        let merged = DeepMerge.merge(&base, &patch);
        assert_eq!(
            Value::Object(merged),
            json!({"profile": {"city": "London", "langs": ["en", "fr"], "zip": "N1"}, "v": 1})
        );
    }

    #[test]
    fn test_deep_merge_object_replaces_scalar() {
        let base = obj(json!({"a": 1}));
        let patch = obj(json!({"a": {"b": 2}}));
        assert_eq!(Value::Object(DeepMerge.merge(&base, &patch)), json!({"a": {"b": 2}}));
    }

    #[test]
    fn test_shallow_merge_replaces_nested_objects() {
        let base = obj(json!({"profile": {"city": "London"}, "v": 1}));
        let patch = obj(json!({"profile": {"zip": "N1"}}));

        let merged = ShallowMerge.merge(&base, &patch);
        assert_eq!(Value::Object(merged), json!({"profile": {"zip": "N1"}, "v": 1}));
    }

    #[test]
    fn test_closure_strategy() {
        let patch_wins = |_: &Map<String, Value>, patch: &Map<String, Value>| patch.clone();
        let merged = patch_wins.merge(&obj(json!({"a": 1})), &obj(json!({"b": 2})));
        assert_eq!(Value::Object(merged), json!({"b": 2}));
    }
}
