//! Storage collaborator
//!
//! The resolver only needs a narrow "table query" capability. Backends
//! (in-memory, SQL, document stores) implement [`DocumentStore`].

use crate::document::Document;
use crate::query::{PaginatedDocs, QueryOptions, Where};

pub mod memory;

pub use memory::{MemoryStore, MemoryStoreStats};

/// Storage backend errors, propagated unmodified by the resolver
#[derive(thiserror::Error, Debug)]
pub enum StorageError {
    #[error("Unknown table '{0}'")]
    UnknownTable(String),
    #[error("Invalid document in table '{table}': {reason}")]
    InvalidDocument { table: String, reason: String },
    #[error("Storage lock poisoned")]
    Poisoned,
    #[error("Storage backend error: {0}")]
    Backend(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Query capability required from a storage backend
///
/// Implement this trait to plug in a database adapter.
#[async_trait::async_trait]
pub trait DocumentStore: Send + Sync {
    /// Run a filtered, paginated query against a physical table
    async fn query(
        &self,
        table: &str,
        filter: &Where,
        options: &QueryOptions,
    ) -> Result<PaginatedDocs, StorageError>;

    /// Fetch a single row by id
    async fn find_by_id(&self, table: &str, id: &str) -> Result<Option<Document>, StorageError> {
        let result = self.query(table, &Where::equals("id", id), &QueryOptions::first()).await?;
        Ok(result.docs.into_iter().next())
    }
}

// Implement DocumentStore for Arc<S> to allow sharing a concrete store
#[async_trait::async_trait]
impl<S: DocumentStore + ?Sized> DocumentStore for std::sync::Arc<S> {
    async fn query(
        &self,
        table: &str,
        filter: &Where,
        options: &QueryOptions,
    ) -> Result<PaginatedDocs, StorageError> {
        (**self).query(table, filter, options).await
    }

    async fn find_by_id(&self, table: &str, id: &str) -> Result<Option<Document>, StorageError> {
        (**self).find_by_id(table, id).await
    }
}
