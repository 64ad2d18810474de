//! Schema sanitization
//!
//! Runs once, when the registry is built. Population never sanitizes a schema
//! per document: it only reads the sanitized definitions kept by the registry.

use crate::schema::blocks::{BlockDefinition, BlockSet};
use crate::schema::fields::{FieldDefinition, FieldKind, RelationTo};
use crate::schema::SchemaError;
use std::collections::HashSet;

/// Field added to every array row and block
pub const ROW_ID_FIELD: &str = "id";
/// Field added to every block for editor labels
pub const BLOCK_NAME_FIELD: &str = "blockName";

/// Live view of the registered collections used to validate relationship targets
#[derive(Debug, Clone, Copy)]
pub struct SanitizeContext<'a> {
    /// Every registered collection slug
    pub valid_relationships: &'a HashSet<String>,
    /// Slugs of upload-enabled collections
    pub upload_collections: &'a HashSet<String>,
}

/// Validate a field list and apply defaults
pub fn sanitize_fields(
    fields: Vec<FieldDefinition>,
    ctx: SanitizeContext<'_>,
) -> Result<Vec<FieldDefinition>, SchemaError> {
    let mut seen = HashSet::with_capacity(fields.len());
    let mut sanitized = Vec::with_capacity(fields.len());

    for field in fields {
        if field.name.trim().is_empty() {
            return Err(SchemaError::MissingFieldName);
        }
        if !seen.insert(field.name.clone()) {
            return Err(SchemaError::DuplicateFieldName(field.name));
        }
        sanitized.push(sanitize_field(field, ctx)?);
    }

    Ok(sanitized)
}

fn sanitize_field(
    mut field: FieldDefinition,
    ctx: SanitizeContext<'_>,
) -> Result<FieldDefinition, SchemaError> {
    field.kind = match field.kind {
        FieldKind::Scalar => FieldKind::Scalar,
        FieldKind::Relationship { relation_to, has_many, max_depth } => {
            if let RelationTo::Polymorphic(targets) = &relation_to {
                if targets.is_empty() {
                    return Err(SchemaError::EmptyRelationTo(field.name));
                }
            }
            for target in relation_to.targets() {
                if !ctx.valid_relationships.contains(target) {
                    return Err(SchemaError::InvalidRelationship {
                        field: field.name,
                        target: target.to_string(),
                    });
                }
            }
            FieldKind::Relationship { relation_to, has_many, max_depth }
        }
        FieldKind::Upload { relation_to, max_depth } => {
            if !ctx.valid_relationships.contains(&relation_to) {
                return Err(SchemaError::InvalidRelationship {
                    field: field.name,
                    target: relation_to,
                });
            }
            if !ctx.upload_collections.contains(&relation_to) {
                return Err(SchemaError::NotAnUploadCollection {
                    field: field.name,
                    target: relation_to,
                });
            }
            FieldKind::Upload { relation_to, max_depth }
        }
        FieldKind::Array { fields } => {
            let fields = with_default(fields, ROW_ID_FIELD);
            FieldKind::Array { fields: sanitize_fields(fields, ctx)? }
        }
        FieldKind::Group { fields } => FieldKind::Group { fields: sanitize_fields(fields, ctx)? },
        FieldKind::Block { blocks } => FieldKind::Block { blocks: sanitize_blocks(blocks, ctx)? },
    };
    Ok(field)
}

/// Sanitize every block definition of a block field
pub fn sanitize_blocks(blocks: BlockSet, ctx: SanitizeContext<'_>) -> Result<BlockSet, SchemaError> {
    let mut slugs = HashSet::with_capacity(blocks.len());
    let mut sanitized = Vec::with_capacity(blocks.len());

    for block in blocks.into_vec() {
        if block.slug.trim().is_empty() {
            return Err(SchemaError::MissingBlockSlug);
        }
        if !slugs.insert(block.slug.clone()) {
            return Err(SchemaError::DuplicateBlockSlug(block.slug));
        }

        let fields = with_default(block.fields, ROW_ID_FIELD);
        let fields = with_default(fields, BLOCK_NAME_FIELD);
        let fields = sanitize_fields(fields, ctx)?;
        log::debug!("sanitized block '{}' ({} fields)", block.slug, fields.len());
        sanitized.push(BlockDefinition { slug: block.slug, fields });
    }

    Ok(BlockSet::new(sanitized))
}

fn with_default(mut fields: Vec<FieldDefinition>, name: &str) -> Vec<FieldDefinition> {
    if !fields.iter().any(|f| f.name == name) {
        fields.push(FieldDefinition::scalar(name));
    }
    fields
}
