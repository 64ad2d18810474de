//! Prelude module for convenient imports.
//!
//! ```rust,ignore
//! use vellum_core::prelude::*;
//! ```

// === Configuration ===
pub use crate::config::{PopulationConfig, VellumConfig};
pub use crate::logging::init_logging;

// === Schemas ===
pub use crate::schema::{
    BlockDefinition, CollectionRegistry, CollectionSchema, FieldDefinition, FieldKind, RelationTo,
};

// === Queries and storage ===
pub use crate::query::{Operator, PaginatedDocs, QueryOptions, Sort, Where};
pub use crate::storage::{DocumentStore, MemoryStore, StorageError};

// === Resolution and population ===
pub use crate::context::{RequestContext, RequestUser};
pub use crate::document::Document;
pub use crate::populate::{HydrationTask, PopulateError, Populator};
pub use crate::resolver::{DocumentResolver, ResolveError};

// === Errors ===
pub use crate::Error;
