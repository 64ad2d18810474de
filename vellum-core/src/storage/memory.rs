//! In-memory document storage
//!
//! Tables are kept in insertion order, which is the natural storage order
//! used when a query has no explicit sort. Suitable for development, tests and
//! small read-mostly datasets loaded from JSON files.

use super::{DocumentStore, StorageError};
use crate::document::{document_values, id_of, Document};
use crate::query::filter::compare_values;
use crate::query::{PaginatedDocs, QueryOptions, SortDirection, Where};
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::{Arc, RwLock};

/// Read counters
#[derive(Debug, Default)]
pub struct MemoryStoreStats {
    /// Calls to `query`
    pub queries: AtomicU64,
    /// Calls to `find_by_id`
    pub lookups: AtomicU64,
}

/// In-memory store
///
/// Thread-safe table storage using RwLock<HashMap>. Cloning shares the data.
///
/// # Example
///
/// ```
/// use vellum_core::storage::MemoryStore;
///
/// let store = MemoryStore::new();
/// store.insert("users", serde_json::json!({ "id": "u1", "name": "Ada" })).unwrap();
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<HashMap<String, Vec<Document>>>>,
    stats: Arc<MemoryStoreStats>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty table (no-op if it already exists)
    pub fn create_table(&self, table: &str) -> Result<(), StorageError> {
        let mut tables = self.tables.write().map_err(|_| StorageError::Poisoned)?;
        tables.entry(table.to_string()).or_default();
        Ok(())
    }

    /// Append a document, creating the table if needed.
    ///
    /// Documents without an `id` receive a UUID v4. Returns the id.
    pub fn insert(&self, table: &str, doc: Value) -> Result<String, StorageError> {
        let mut doc = match doc {
            Value::Object(map) => map,
            other => {
                return Err(StorageError::InvalidDocument {
                    table: table.to_string(),
                    reason: format!("expected an object, got {}", other),
                })
            }
        };

        let id = match doc.get("id").and_then(id_of) {
            Some(id) => id,
            None => {
                let id = uuid::Uuid::new_v4().to_string();
                doc.insert("id".to_string(), Value::String(id.clone()));
                id
            }
        };

        let mut tables = self.tables.write().map_err(|_| StorageError::Poisoned)?;
        tables.entry(table.to_string()).or_default().push(doc);
        Ok(id)
    }

    /// Load every `<table>.json` file (a JSON array of objects) from a directory
    pub fn load_dir(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let store = Self::new();
        let mut entries: Vec<_> = std::fs::read_dir(path.as_ref())?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
            .collect();
        entries.sort();

        for file in entries {
            let Some(table) = file.file_stem().and_then(|s| s.to_str()).map(str::to_string) else {
                continue;
            };
            let content = std::fs::read_to_string(&file)?;
            let rows: Vec<Value> = serde_json::from_str(&content)?;
            store.create_table(&table)?;
            let count = rows.len();
            for row in rows {
                store.insert(&table, row)?;
            }
            log::debug!("loaded {} rows into table '{}' from {}", count, table, file.display());
        }

        Ok(store)
    }

    /// Number of rows in a table
    pub fn count(&self, table: &str) -> Result<usize, StorageError> {
        let tables = self.tables.read().map_err(|_| StorageError::Poisoned)?;
        tables.get(table).map(Vec::len).ok_or_else(|| StorageError::UnknownTable(table.to_string()))
    }

    pub fn stats(&self) -> &MemoryStoreStats {
        &self.stats
    }

    fn run_query(
        &self,
        table: &str,
        filter: &Where,
        options: &QueryOptions,
    ) -> Result<PaginatedDocs, StorageError> {
        let tables = self.tables.read().map_err(|_| StorageError::Poisoned)?;
        let rows = tables.get(table).ok_or_else(|| StorageError::UnknownTable(table.to_string()))?;

        let mut matched: Vec<&Document> =
            rows.iter().filter(|doc| filter.matches_document(doc)).collect();

        if let Some(sort) = &options.sort {
            matched.sort_by(|a, b| {
                let ord = compare_field(a, b, &sort.field);
                match sort.direction {
                    SortDirection::Asc => ord,
                    SortDirection::Desc => ord.reverse(),
                }
            });
        }

        let total = matched.len();
        let page: Vec<Document> = match options.limit {
            Some(limit) => {
                matched.into_iter().skip(options.offset()).take(limit).cloned().collect()
            }
            None => matched.into_iter().cloned().collect(),
        };

        Ok(PaginatedDocs::from_page(page, total, options))
    }
}

fn compare_field(a: &Document, b: &Document, field: &str) -> Ordering {
    let left = document_values(a, field).into_iter().next();
    let right = document_values(b, field).into_iter().next();
    match (left, right) {
        (Some(l), Some(r)) => compare_values(l, r).unwrap_or(Ordering::Equal),
        // Missing values sort last
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[async_trait::async_trait]
impl DocumentStore for MemoryStore {
    async fn query(
        &self,
        table: &str,
        filter: &Where,
        options: &QueryOptions,
    ) -> Result<PaginatedDocs, StorageError> {
        self.stats.queries.fetch_add(1, AtomicOrdering::Relaxed);
        self.run_query(table, filter, options)
    }

    async fn find_by_id(&self, table: &str, id: &str) -> Result<Option<Document>, StorageError> {
        self.stats.lookups.fetch_add(1, AtomicOrdering::Relaxed);
        let tables = self.tables.read().map_err(|_| StorageError::Poisoned)?;
        let rows = tables.get(table).ok_or_else(|| StorageError::UnknownTable(table.to_string()))?;
        Ok(rows
            .iter()
            .find(|doc| doc.get("id").and_then(id_of).as_deref() == Some(id))
            .cloned())
    }
}
