//! Concurrent storage for compiled models.
//!
//! Backed by [`DashMap`]: striped internal locking, so submissions for
//! different keys never contend and lookups never block behind unrelated
//! writes. A model is fully compiled before it is installed, and `put`
//! replaces the stored `Arc` in one shot, so a concurrent reader observes
//! either the prior model or the new one, never a mix of sections from
//! both.

use std::sync::Arc;

use dashmap::DashMap;

use crate::schema::CompiledModel;
use crate::types::RouteKey;

/// Process-wide map from (path, method) to the most recently compiled model.
///
/// Last write wins; there is no merging and no history. Entries live for
/// the process lifetime — there is no deletion API.
#[derive(Debug, Default)]
pub struct ModelStore {
    models: DashMap<RouteKey, Arc<CompiledModel>>,
}

impl ModelStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs a model under its key, replacing any prior model whole.
    pub fn put(&self, key: RouteKey, model: CompiledModel) {
        self.models.insert(key, Arc::new(model));
    }

    /// Looks up the model for a key.
    ///
    /// `None` means no model was ever learned for this (path, method) —
    /// distinct from a stored model whose sections are all empty.
    #[must_use]
    pub fn get(&self, path: &str, method: &str) -> Option<Arc<CompiledModel>> {
        let key = RouteKey::new(path, method);
        self.models.get(&key).map(|entry| Arc::clone(entry.value()))
    }

    /// Number of learned models.
    #[must_use]
    pub fn len(&self) -> usize {
        self.models.len()
    }

    /// Whether no model has been learned yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::compile_model;
    use crate::types::{SectionName, Value};
    use crate::validators::ValidatorRegistry;

    fn model_for(path: &str, method: &str, required_query_field: &str) -> (RouteKey, CompiledModel) {
        let description: Value = serde_json::from_value(serde_json::json!({
            "path": path,
            "method": method,
            "query_params": [
                {"name": required_query_field, "required": true, "types": ["String"]},
            ],
            "headers": [],
            "body": [],
        }))
        .unwrap();
        compile_model(&ValidatorRegistry::new(), &description).unwrap()
    }

    #[test]
    fn put_then_get_returns_the_model() {
        let store = ModelStore::new();
        let (key, model) = model_for("/users", "GET", "id");
        store.put(key, model);

        let found = store.get("/users", "GET").unwrap();
        assert_eq!(
            found.section(SectionName::QueryParams).required_fields(),
            ["id"]
        );
    }

    #[test]
    fn get_distinguishes_absent_from_empty() {
        let store = ModelStore::new();
        assert!(store.get("/missing", "GET").is_none());

        // A model with all-empty sections is present, not NotFound.
        let description: Value = serde_json::from_value(serde_json::json!({
            "path": "/empty", "method": "GET",
            "query_params": [], "headers": [], "body": [],
        }))
        .unwrap();
        let (key, model) = compile_model(&ValidatorRegistry::new(), &description).unwrap();
        store.put(key, model);

        let found = store.get("/empty", "GET").unwrap();
        assert_eq!(found.section(SectionName::QueryParams).field_count(), 0);
    }

    #[test]
    fn put_overwrites_the_whole_model() {
        let store = ModelStore::new();
        let (key_a, model_a) = model_for("/x", "GET", "old_field");
        store.put(key_a, model_a);

        let (key_b, model_b) = model_for("/x", "GET", "new_field");
        store.put(key_b, model_b);

        assert_eq!(store.len(), 1);
        let found = store.get("/x", "GET").unwrap();
        let query = found.section(SectionName::QueryParams);
        assert_eq!(query.required_fields(), ["new_field"]);
        assert!(query.predicates_for("old_field").is_none());
    }

    #[test]
    fn methods_on_one_path_are_distinct_keys() {
        let store = ModelStore::new();
        let (get_key, get_model) = model_for("/x", "GET", "a");
        let (post_key, post_model) = model_for("/x", "POST", "b");
        store.put(get_key, get_model);
        store.put(post_key, post_model);

        assert_eq!(store.len(), 2);
        assert_eq!(
            store
                .get("/x", "GET")
                .unwrap()
                .section(SectionName::QueryParams)
                .required_fields(),
            ["a"]
        );
        assert_eq!(
            store
                .get("/x", "POST")
                .unwrap()
                .section(SectionName::QueryParams)
                .required_fields(),
            ["b"]
        );
    }

    #[test]
    fn concurrent_puts_and_gets_on_disjoint_keys() {
        let store = Arc::new(ModelStore::new());

        let writers: Vec<_> = (0..8)
            .map(|i| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || {
                    for round in 0..50 {
                        let path = format!("/route/{i}");
                        let field = format!("field{round}");
                        let (key, model) = model_for(&path, "GET", &field);
                        store.put(key, model);
                        // A reader sees a whole model: exactly one required field.
                        let found = store.get(&path, "GET").unwrap();
                        assert_eq!(
                            found.section(SectionName::QueryParams).required_fields().len(),
                            1
                        );
                    }
                })
            })
            .collect();

        for writer in writers {
            writer.join().unwrap();
        }
        assert_eq!(store.len(), 8);
    }
}
