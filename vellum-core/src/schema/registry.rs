//! Collection registry
//!
//! Holds the sanitized schema of every collection. Built once, then shared
//! through an `Arc` with the resolver and the population pipeline.

use crate::schema::sanitize::{sanitize_fields, SanitizeContext};
use crate::schema::{CollectionSchema, SchemaError};
use anyhow::Context;
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::Arc;

/// Registry of sanitized collection schemas
#[derive(Debug, Clone, Default)]
pub struct CollectionRegistry {
    collections: HashMap<String, Arc<CollectionSchema>>,
    table_names: HashMap<String, String>,
    order: Vec<String>,
}

impl CollectionRegistry {
    pub fn builder() -> CollectionRegistryBuilder {
        CollectionRegistryBuilder::default()
    }

    /// Sanitize and register the given schemas
    pub fn new(schemas: Vec<CollectionSchema>) -> Result<Self, SchemaError> {
        let mut seen = HashSet::with_capacity(schemas.len());
        for schema in &schemas {
            if schema.slug.trim().is_empty() {
                return Err(SchemaError::MissingCollectionSlug);
            }
            if !seen.insert(schema.slug.clone()) {
                return Err(SchemaError::DuplicateCollection(schema.slug.clone()));
            }
        }

        let upload_collections: HashSet<String> =
            schemas.iter().filter(|s| s.upload).map(|s| s.slug.clone()).collect();
        let ctx = SanitizeContext { valid_relationships: &seen, upload_collections: &upload_collections };

        let mut registry = Self::default();
        let mut tables: HashMap<String, String> = HashMap::with_capacity(schemas.len());

        for mut schema in schemas {
            let fields = std::mem::take(&mut schema.fields);
            schema.fields = sanitize_fields(fields, ctx).map_err(|source| {
                SchemaError::InCollection { collection: schema.slug.clone(), source: Box::new(source) }
            })?;

            let table = schema.table_name();
            if let Some(first) = tables.get(&table) {
                return Err(SchemaError::DuplicateTableName {
                    first: first.clone(),
                    second: schema.slug.clone(),
                    table,
                });
            }
            tables.insert(table.clone(), schema.slug.clone());

            log::debug!(
                "registered collection '{}' -> table '{}' ({} fields)",
                schema.slug,
                table,
                schema.fields.len()
            );
            registry.table_names.insert(schema.slug.clone(), table);
            registry.order.push(schema.slug.clone());
            registry.collections.insert(schema.slug.clone(), Arc::new(schema));
        }

        Ok(registry)
    }

    /// Load a JSON array of collection schemas
    pub fn from_json_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read schema file: {}", path.display()))?;
        let schemas: Vec<CollectionSchema> = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse schema file: {}", path.display()))?;
        Self::new(schemas).with_context(|| format!("Invalid schema in {}", path.display()))
    }

    /// Sanitized schema of a collection
    pub fn get_schema(&self, slug: &str) -> Option<Arc<CollectionSchema>> {
        self.collections.get(slug).cloned()
    }

    /// Physical table name of a collection
    pub fn table_name(&self, slug: &str) -> Option<&str> {
        self.table_names.get(slug).map(String::as_str)
    }

    pub fn contains(&self, slug: &str) -> bool {
        self.collections.contains_key(slug)
    }

    /// Registered slugs, in registration order
    pub fn slugs(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// Builder collecting schemas before sanitization
#[derive(Debug, Default)]
pub struct CollectionRegistryBuilder {
    schemas: Vec<CollectionSchema>,
}

impl CollectionRegistryBuilder {
    pub fn collection(mut self, schema: CollectionSchema) -> Self {
        self.schemas.push(schema);
        self
    }

    pub fn collections(mut self, schemas: impl IntoIterator<Item = CollectionSchema>) -> Self {
        self.schemas.extend(schemas);
        self
    }

    pub fn build(self) -> Result<CollectionRegistry, SchemaError> {
        CollectionRegistry::new(self.schemas)
    }
}
