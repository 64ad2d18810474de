//! Vellum - Core
//!
//! Document resolution and depth-bounded field population for a headless
//! content framework.
//!
//! # Overview
//!
//! Content is organised in collections, each described by an ordered list of
//! field definitions. Reading a document goes through two components:
//!
//! - the [`DocumentResolver`] maps a collection slug to its physical table and
//!   asks the storage backend for the first matching row;
//! - the [`Populator`] walks the field schema of that row, collects one
//!   hydration task per relationship or upload reference, runs them
//!   concurrently and splices the fetched documents into a new tree, up to the
//!   requested depth.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use vellum_core::prelude::*;
//! use std::sync::Arc;
//!
//! let registry = CollectionRegistry::builder()
//!     .collection(CollectionSchema::new("users", vec![FieldDefinition::scalar("name")]))
//!     .collection(CollectionSchema::new(
//!         "posts",
//!         vec![FieldDefinition::scalar("title"), FieldDefinition::relationship("author", "users")],
//!     ))
//!     .build()?;
//!
//! let store = MemoryStore::load_dir("./data")?;
//! let resolver = DocumentResolver::new(Arc::new(registry), Arc::new(store));
//!
//! let post = resolver
//!     .resolve_one("posts", &Where::equals("title", "Hello"), &RequestContext::new().with_depth(1))
//!     .await?;
//! ```
//!
//! # Architecture
//!
//! - [`schema`] - Collection schemas, block definitions, sanitization and the registry
//! - [`query`] - `where` filters and pagination options
//! - [`storage`] - The storage collaborator trait and an in-memory backend
//! - [`populate`] - Traversal, projection and hydration
//! - [`resolver`] - `resolve_one` and friends
//! - [`config`] / [`logging`] - Ambient configuration and the log backend

pub mod config; // TOML + environment configuration
pub mod context;
pub mod document;
pub mod logging; // log::Log backend with human/json/logfmt output
pub mod populate;
pub mod query;
pub mod resolver;
pub mod schema;
pub mod storage;

pub mod prelude;

#[cfg(test)]
pub mod testing;

pub use context::{PopulateContext, RequestContext, RequestUser};
pub use document::{Document, FieldPath};
pub use populate::{HydrationTask, PopulateError, Populator};
pub use resolver::{DocumentResolver, ResolveError};

/// Main result type for Vellum
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for Vellum
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Schema error: {0}")]
    Schema(#[from] schema::SchemaError),
    #[error("Filter error: {0}")]
    Filter(#[from] query::FilterError),
    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),
    #[error("Population error: {0}")]
    Populate(#[from] PopulateError),
    #[error("Resolve error: {0}")]
    Resolve(#[from] ResolveError),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
