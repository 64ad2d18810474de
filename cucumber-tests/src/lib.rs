//! Shared fixtures for the Vellum behaviour suite

use async_trait::async_trait;
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use vellum_core::document::Document;
use vellum_core::query::{PaginatedDocs, QueryOptions, Where};
use vellum_core::schema::{BlockDefinition, CollectionSchema, FieldDefinition};
use vellum_core::storage::{DocumentStore, MemoryStore, StorageError};

/// users, media and posts
pub fn blog_collections() -> Vec<CollectionSchema> {
    vec![
        CollectionSchema::new(
            "users",
            vec![
                FieldDefinition::scalar("name"),
                FieldDefinition::relationship("bestFriend", "users"),
            ],
        ),
        CollectionSchema::new("media", vec![FieldDefinition::scalar("alt")]).as_upload(),
        CollectionSchema::new(
            "posts",
            vec![
                FieldDefinition::scalar("title"),
                FieldDefinition::relationship("author", "users"),
                FieldDefinition::upload("heroImage", "media"),
                FieldDefinition::blocks(
                    "layout",
                    vec![BlockDefinition::new(
                        "mediaBlock",
                        vec![FieldDefinition::upload("media", "media")],
                    )],
                ),
            ],
        ),
    ]
}

pub fn blog_store() -> Result<MemoryStore, StorageError> {
    let store = MemoryStore::new();
    store.insert("users", json!({ "id": "user-42", "name": "Ada Lovelace", "bestFriend": "user-7" }))?;
    store.insert("users", json!({ "id": "user-7", "name": "Grace Hopper", "bestFriend": "user-42" }))?;
    store.insert("media", json!({ "id": "m1", "alt": "Cover" }))?;
    store.insert(
        "posts",
        json!({ "id": "p1", "title": "Hello World", "author": "user-42", "heroImage": "m1" }),
    )?;
    store.insert(
        "posts",
        json!({ "id": "p2", "title": "Second Post", "author": "user-7",
                "layout": [{ "blockType": "mediaBlock", "media": "m1" }] }),
    )?;
    Ok(store)
}

/// Store whose lookups of one id always fail
#[derive(Debug)]
pub struct FlakyStore {
    inner: MemoryStore,
    failing_id: String,
    lookups: AtomicUsize,
}

impl FlakyStore {
    pub fn new(inner: MemoryStore, failing_id: impl Into<String>) -> Self {
        Self { inner, failing_id: failing_id.into(), lookups: AtomicUsize::new(0) }
    }

    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DocumentStore for FlakyStore {
    async fn query(
        &self,
        table: &str,
        filter: &Where,
        options: &QueryOptions,
    ) -> Result<PaginatedDocs, StorageError> {
        self.inner.query(table, filter, options).await
    }

    async fn find_by_id(&self, table: &str, id: &str) -> Result<Option<Document>, StorageError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        if id == self.failing_id {
            return Err(StorageError::Backend(format!("lookup of {} timed out", id)));
        }
        self.inner.find_by_id(table, id).await
    }
}
