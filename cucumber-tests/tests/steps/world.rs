use cucumber::World;
use cucumber_tests::{blog_store, FlakyStore};
use serde_json::Value;
use std::sync::Arc;
use vellum_core::document::{values_at, Document};
use vellum_core::prelude::*;

/// Slug of the collection built from a scenario's field schema
pub const SCENARIO_COLLECTION: &str = "scenario";

#[derive(Debug, Default, World)]
pub struct VellumWorld {
    pub collections: Vec<CollectionSchema>,
    pub fields: Vec<FieldDefinition>,
    pub document: Document,
    pub tasks: Vec<HydrationTask>,
    pub repeated_tasks: Vec<HydrationTask>,
    pub failing_id: Option<String>,
    pub output: Option<Document>,
    pub error: Option<ResolveError>,
}

impl VellumWorld {
    /// Registered collections plus one built from the scenario field schema
    pub fn registry(&self) -> Arc<CollectionRegistry> {
        let registry = CollectionRegistry::builder()
            .collections(self.collections.iter().cloned())
            .collection(CollectionSchema::new(SCENARIO_COLLECTION, self.fields.clone()))
            .build()
            .expect("scenario schema is valid");
        Arc::new(registry)
    }

    pub fn store(&self) -> Arc<dyn DocumentStore> {
        let store = blog_store().expect("fixture rows are objects");
        match &self.failing_id {
            Some(id) => Arc::new(FlakyStore::new(store, id.as_str())),
            None => Arc::new(store),
        }
    }

    pub fn scenario_schema(&self, registry: &CollectionRegistry) -> Arc<CollectionSchema> {
        registry.get_schema(SCENARIO_COLLECTION).expect("scenario collection registered")
    }

    /// First value at a dotted path of the hydrated or resolved document
    pub fn output_value(&self, path: &str) -> Option<Value> {
        let output = Value::Object(self.output.clone()?);
        values_at(&output, path).into_iter().next().cloned()
    }
}
