use std::collections::HashSet;

use serde_json::{Map, Value};
use weblog_model::MetadataSnapshot;

use crate::error::CoreError;

/// Key under which the engine nests workflow metadata.
pub const WORKFLOW_KEY: &str = "workflow";

/// Strips noisy keys from nested JSON.
#[derive(Debug, Clone)]
pub struct MetadataFilter {
    keys: HashSet<String>,
    max_depth: usize,
}

impl MetadataFilter {
    pub fn new<I, S>(keys: I, max_depth: usize) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            keys: keys.into_iter().map(Into::into).collect(),
            max_depth,
        }
    }

    pub fn is_noisy(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    /// Return a copy of `value` with every noisy key removed, at any depth.
    ///
    /// Objects drop noisy entries before their remaining values are visited,
    /// arrays are visited element by element, scalars are copied as is.
    /// Nesting beyond `max_depth` fails with [`CoreError::InvalidMetadataShape`].
    pub fn apply(&self, value: &Value) -> Result<Value, CoreError> {
        self.walk(value, 0)
    }

    fn walk(&self, value: &Value, depth: usize) -> Result<Value, CoreError> {
        if depth > self.max_depth {
            return Err(CoreError::InvalidMetadataShape(format!(
                "nesting exceeds {} levels",
                self.max_depth
            )));
        }

        match value {
            Value::Object(map) => self.walk_object(map, depth).map(Value::Object),
            Value::Array(items) => items
                .iter()
                .map(|item| self.walk(item, depth + 1))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array),
            scalar => Ok(scalar.clone()),
        }
    }

    fn walk_object(&self, map: &Map<String, Value>, depth: usize) -> Result<Map<String, Value>, CoreError> {
        let mut out = Map::new();
        for (k, v) in map.iter().filter(|(k, _)| !self.is_noisy(k)) {
            out.insert(k.clone(), self.walk(v, depth + 1)?);
        }
        Ok(out)
    }
}

/// Latest merged workflow metadata.
#[derive(Debug, Clone)]
pub struct MetadataStore {
    filter: MetadataFilter,
    current: Map<String, Value>,
}

impl MetadataStore {
    pub fn new(filter: MetadataFilter) -> Self {
        Self {
            filter,
            current: Map::new(),
        }
    }

    pub fn filter(&self) -> &MetadataFilter {
        &self.filter
    }

    /// Merge the `workflow` block of an event's metadata over the stored snapshot.
    ///
    /// Top-level keys are replaced wholesale (no deep merge). The block is filtered
    /// completely before anything is written, so a rejected block leaves the store
    /// untouched. Returns the number of keys written.
    pub fn merge(&mut self, metadata: &Value) -> Result<usize, CoreError> {
        let Value::Object(outer) = metadata else {
            return Err(CoreError::InvalidMetadataShape(format!(
                "metadata must be an object, got {}",
                type_name(metadata)
            )));
        };

        let workflow = match outer.get(WORKFLOW_KEY) {
            None | Some(Value::Null) => return Ok(0),
            Some(Value::Object(w)) => w,
            Some(other) => {
                return Err(CoreError::InvalidMetadataShape(format!(
                    "metadata.workflow must be an object, got {}",
                    type_name(other)
                )));
            }
        };

        let filtered = self.filter.walk_object(workflow, 0)?;

        let written = filtered.len();
        for (k, v) in filtered {
            self.current.insert(k, v);
        }
        Ok(written)
    }

    pub fn snapshot(&self) -> MetadataSnapshot {
        MetadataSnapshot(self.current.clone())
    }

    pub fn len(&self) -> usize {
        self.current.len()
    }

    pub fn is_empty(&self) -> bool {
        self.current.is_empty()
    }
}

fn type_name(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn filter() -> MetadataFilter {
        MetadataFilter::new(["availableZoneIds"], 64)
    }

    fn contains_key(v: &Value, key: &str) -> bool {
        match v {
            Value::Object(m) => m.contains_key(key) || m.values().any(|v| contains_key(v, key)),
            Value::Array(a) => a.iter().any(|v| contains_key(v, key)),
            _ => false,
        }
    }

    #[test]
    fn removes_key_at_every_depth() {
        let input = json!({
            "availableZoneIds": ["a"],
            "sessionId": "abc",
            "nested": {
                "availableZoneIds": 1,
                "deeper": [{"availableZoneIds": true, "keep": 1}, [{"availableZoneIds": null}]]
            }
        });
        let out = filter().apply(&input).unwrap();
        assert!(!contains_key(&out, "availableZoneIds"));
        assert_eq!(out["sessionId"], "abc");
        assert_eq!(out["nested"]["deeper"][0]["keep"], 1);
        assert_eq!(out["nested"]["deeper"][1][0], json!({}));
    }

    #[test]
    fn filter_is_idempotent() {
        let input = json!({
            "a": [{"availableZoneIds": 1, "b": {"availableZoneIds": 2, "c": 3}}],
            "d": "x"
        });
        let f = filter();
        let once = f.apply(&input).unwrap();
        let twice = f.apply(&once).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn scalars_pass_through() {
        for v in [json!(1), json!("s"), json!(null), json!(true), json!(1.5)] {
            assert_eq!(filter().apply(&v).unwrap(), v);
        }
    }

    #[test]
    fn excessive_depth_is_rejected() {
        let mut v = json!("leaf");
        for _ in 0..10 {
            v = json!([v]);
        }
        let shallow = MetadataFilter::new(["x"], 5);
        let err = shallow.apply(&v).unwrap_err();
        assert!(matches!(err, CoreError::InvalidMetadataShape(_)));

        let deep_enough = MetadataFilter::new(["x"], 10);
        assert!(deep_enough.apply(&v).is_ok());
    }

    #[test]
    fn merge_keeps_session_and_drops_noisy_key() {
        let mut store = MetadataStore::new(filter());
        let written = store
            .merge(&json!({"workflow": {"sessionId": "abc", "availableZoneIds": ["UTC"]}}))
            .unwrap();
        assert_eq!(written, 1);

        let snap = store.snapshot();
        assert_eq!(snap.get("sessionId"), Some(&json!("abc")));
        assert!(snap.get("availableZoneIds").is_none());
    }

    #[test]
    fn merge_is_shallow_last_write_wins() {
        let mut store = MetadataStore::new(filter());
        store
            .merge(&json!({"workflow": {"stats": {"a": 1, "b": 2}, "runName": "x"}}))
            .unwrap();
        store
            .merge(&json!({"workflow": {"stats": {"c": 3}}}))
            .unwrap();

        let snap = store.snapshot();
        assert_eq!(snap.get("stats"), Some(&json!({"c": 3})));
        assert_eq!(snap.get("runName"), Some(&json!("x")));
    }

    #[test]
    fn missing_workflow_is_a_noop() {
        let mut store = MetadataStore::new(filter());
        assert_eq!(store.merge(&json!({"parameters": {"x": 1}})).unwrap(), 0);
        assert!(store.is_empty());
    }

    #[test]
    fn non_object_shapes_are_rejected() {
        let mut store = MetadataStore::new(filter());
        assert!(matches!(
            store.merge(&json!("text")),
            Err(CoreError::InvalidMetadataShape(_))
        ));
        assert!(matches!(
            store.merge(&json!({"workflow": [1, 2]})),
            Err(CoreError::InvalidMetadataShape(_))
        ));
    }

    #[test]
    fn rejected_block_leaves_store_untouched() {
        let mut store = MetadataStore::new(MetadataFilter::new(["x"], 3));
        store.merge(&json!({"workflow": {"keep": 1}})).unwrap();

        let err = store.merge(&json!({"workflow": {"keep": 2, "deep": [[[["too deep"]]]]}}));
        assert!(err.is_err());
        assert_eq!(store.snapshot().get("keep"), Some(&json!(1)));
        assert!(store.snapshot().get("deep").is_none());
    }
}
