//! Collection schemas
//!
//! A collection is a named set of documents described by an ordered list of
//! field definitions. Schemas are declared in code or loaded from JSON, then
//! sanitized once by the [`CollectionRegistry`].

use serde::{Deserialize, Serialize};

pub mod blocks;
pub mod fields;
pub mod registry;
pub mod sanitize;

pub use blocks::{BlockDefinition, BlockSet, BLOCK_TYPE_KEY};
pub use fields::{FieldDefinition, FieldKind, RelationTo};
pub use registry::{CollectionRegistry, CollectionRegistryBuilder};
pub use sanitize::{sanitize_fields, SanitizeContext};

/// Schema definition errors, raised while building the registry
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    #[error("Field without a name")]
    MissingFieldName,
    #[error("Duplicate field name '{0}'")]
    DuplicateFieldName(String),
    #[error("Block without a slug")]
    MissingBlockSlug,
    #[error("Duplicate block slug '{0}'")]
    DuplicateBlockSlug(String),
    #[error("Field '{field}' references unknown collection '{target}'")]
    InvalidRelationship { field: String, target: String },
    #[error("Upload field '{field}' targets '{target}', which is not an upload collection")]
    NotAnUploadCollection { field: String, target: String },
    #[error("Polymorphic relationship '{0}' has no target collections")]
    EmptyRelationTo(String),
    #[error("Collection without a slug")]
    MissingCollectionSlug,
    #[error("Duplicate collection slug '{0}'")]
    DuplicateCollection(String),
    #[error("Collections '{first}' and '{second}' map to the same table '{table}'")]
    DuplicateTableName { first: String, second: String, table: String },
    #[error("Collection '{collection}': {source}")]
    InCollection {
        collection: String,
        #[source]
        source: Box<SchemaError>,
    },
}

/// A registered collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionSchema {
    /// Unique collection name
    pub slug: String,
    /// Explicit physical table name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub db_name: Option<String>,
    #[serde(default)]
    pub fields: Vec<FieldDefinition>,
    /// Upload-enabled collection (valid target for upload fields)
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub upload: bool,
    /// Roles allowed to read this collection (empty = public)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub read_roles: Vec<String>,
}

impl CollectionSchema {
    pub fn new(slug: impl Into<String>, fields: Vec<FieldDefinition>) -> Self {
        Self { slug: slug.into(), db_name: None, fields, upload: false, read_roles: Vec::new() }
    }

    pub fn with_db_name(mut self, db_name: impl Into<String>) -> Self {
        self.db_name = Some(db_name.into());
        self
    }

    pub fn as_upload(mut self) -> Self {
        self.upload = true;
        self
    }

    pub fn with_read_roles<I, S>(mut self, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.read_roles = roles.into_iter().map(Into::into).collect();
        self
    }

    /// Physical table name: `dbName` when set, otherwise the snake_case slug
    pub fn table_name(&self) -> String {
        match &self.db_name {
            Some(name) => name.clone(),
            None => to_snake_case(&self.slug),
        }
    }
}

/// `blogPosts`, `blog-posts` and `Blog Posts` all become `blog_posts`
pub fn to_snake_case(input: &str) -> String {
    let mut out = String::with_capacity(input.len() + 4);
    let mut prev_lower_or_digit = false;

    for ch in input.chars() {
        if ch.is_ascii_alphanumeric() {
            if ch.is_ascii_uppercase() {
                if prev_lower_or_digit {
                    out.push('_');
                }
                out.push(ch.to_ascii_lowercase());
                prev_lower_or_digit = false;
            } else {
                out.push(ch);
                prev_lower_or_digit = true;
            }
        } else if !out.is_empty() && !out.ends_with('_') {
            out.push('_');
            prev_lower_or_digit = false;
        }
    }

    while out.ends_with('_') {
        out.pop();
    }
    out
}
