use crate::document::Document;
use crate::query::{PaginatedDocs, QueryOptions, Where};
use crate::schema::{BlockDefinition, CollectionRegistry, CollectionSchema, FieldDefinition};
use crate::storage::{DocumentStore, MemoryStore, StorageError};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};

// --- Blog fixture ---

/// users, media, categories and posts, with every field kind represented
pub fn blog_registry() -> CollectionRegistry {
    CollectionRegistry::builder()
        .collection(CollectionSchema::new(
            "users",
            vec![
                FieldDefinition::scalar("name"),
                FieldDefinition::scalar("email"),
                FieldDefinition::scalar("passwordHash").hidden(),
                FieldDefinition::relationship("bestFriend", "users"),
                FieldDefinition::upload("avatar", "media"),
            ],
        ))
        .collection(
            CollectionSchema::new(
                "media",
                vec![FieldDefinition::scalar("alt"), FieldDefinition::scalar("url")],
            )
            .as_upload(),
        )
        .collection(CollectionSchema::new("categories", vec![FieldDefinition::scalar("name")]))
        .collection(CollectionSchema::new(
            "posts",
            vec![
                FieldDefinition::scalar("title"),
                FieldDefinition::relationship("author", "users"),
                FieldDefinition::relationship("reviewer", "users").read_roles(["editor"]),
                FieldDefinition::upload("heroImage", "media"),
                FieldDefinition::relationship("categories", "categories").has_many(),
                FieldDefinition::polymorphic("related", ["posts", "media"]).has_many(),
                FieldDefinition::blocks(
                    "layout",
                    vec![
                        BlockDefinition::new(
                            "cta",
                            vec![
                                FieldDefinition::scalar("label"),
                                FieldDefinition::relationship("link", "posts"),
                            ],
                        ),
                        BlockDefinition::new(
                            "mediaBlock",
                            vec![FieldDefinition::upload("media", "media")],
                        ),
                        BlockDefinition::new("content", vec![FieldDefinition::scalar("body")]),
                    ],
                ),
                FieldDefinition::group(
                    "meta",
                    vec![
                        FieldDefinition::scalar("description"),
                        FieldDefinition::upload("image", "media"),
                    ],
                ),
                FieldDefinition::array(
                    "links",
                    vec![
                        FieldDefinition::scalar("label"),
                        FieldDefinition::relationship("page", "posts"),
                    ],
                ),
            ],
        ))
        .build()
        .expect("blog fixture schema is valid")
}

/// Rows for [`blog_registry`]
pub fn blog_store() -> MemoryStore {
    let store = MemoryStore::new();
    let rows = [
        (
            "users",
            json!({ "id": "user-42", "name": "Ada Lovelace", "email": "ada@example.com",
                    "passwordHash": "x", "bestFriend": "user-7" }),
        ),
        (
            "users",
            json!({ "id": "user-7", "name": "Grace Hopper", "email": "grace@example.com",
                    "passwordHash": "y", "bestFriend": "user-42" }),
        ),
        ("media", json!({ "id": "m1", "alt": "Cover", "url": "/media/cover.png" })),
        ("media", json!({ "id": "m2", "alt": "Thumbnail", "url": "/media/thumb.png" })),
        ("categories", json!({ "id": "c1", "name": "News" })),
        ("categories", json!({ "id": "c2", "name": "Guides" })),
        (
            "posts",
            json!({ "id": "p1", "title": "Hello World", "status": "published",
                    "author": "user-42", "heroImage": "m1", "categories": ["c1"] }),
        ),
        (
            "posts",
            json!({ "id": "p2", "title": "Second Post", "status": "draft", "author": "user-7",
                    "layout": [{ "blockType": "cta", "label": "Read more", "link": "p1" }] }),
        ),
    ];
    for (table, row) in rows {
        store.insert(table, row).expect("fixture row is an object");
    }
    store
}

/// Unwrap a JSON object literal into a document
pub fn doc(value: Value) -> Document {
    match value {
        Value::Object(map) => map,
        other => panic!("expected a JSON object, got {}", other),
    }
}

pub fn init_test_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

// --- Failure injection ---

/// Store wrapper whose lookups fail for one id
pub struct FailingStore {
    inner: MemoryStore,
    failing_id: String,
    attempts: AtomicUsize,
}

impl FailingStore {
    pub fn new(inner: MemoryStore, failing_id: &str) -> Self {
        Self { inner, failing_id: failing_id.to_string(), attempts: AtomicUsize::new(0) }
    }

    /// Number of `find_by_id` calls seen, failed ones included
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl DocumentStore for FailingStore {
    async fn query(
        &self,
        table: &str,
        filter: &Where,
        options: &QueryOptions,
    ) -> Result<PaginatedDocs, StorageError> {
        self.inner.query(table, filter, options).await
    }

    async fn find_by_id(&self, table: &str, id: &str) -> Result<Option<Document>, StorageError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        if id == self.failing_id {
            return Err(StorageError::Backend(format!("connection reset while reading {}", id)));
        }
        self.inner.find_by_id(table, id).await
    }
}
