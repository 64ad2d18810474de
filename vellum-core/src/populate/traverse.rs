//! Synchronous depth-first traversal producing hydration tasks

use super::task::HydrationTask;
use crate::context::PopulateContext;
use crate::document::{id_of, FieldPath};
use crate::schema::{BlockSet, FieldDefinition, FieldKind, RelationTo};
use serde_json::Value;

/// Key holding the target collection of a polymorphic reference
pub const RELATION_TO_KEY: &str = "relationTo";
/// Key holding the id of a polymorphic reference
pub const RELATION_VALUE_KEY: &str = "value";

pub(crate) fn visit_fields<'a>(
    fields: &[FieldDefinition],
    base: &FieldPath,
    ctx: &PopulateContext<'a>,
    tasks: &mut Vec<HydrationTask>,
) {
    let doc = ctx.sibling_doc;

    for field in fields {
        if let Some(condition) = &field.visible_when {
            if !condition.matches_document(doc) {
                continue;
            }
        }
        let Some(value) = doc.get(&field.name) else {
            continue;
        };
        let path = base.key(&field.name);

        match &field.kind {
            FieldKind::Scalar => {}
            FieldKind::Relationship { relation_to, max_depth, .. } => {
                if ctx.can_populate(*max_depth) {
                    visit_relationship(value, relation_to, &path, tasks);
                }
            }
            FieldKind::Upload { relation_to, max_depth } => {
                if ctx.can_populate(*max_depth) {
                    if let Some(id) = id_of(value) {
                        tasks.push(HydrationTask::new(path, relation_to.as_str(), id));
                    }
                }
            }
            FieldKind::Block { blocks } => match value {
                Value::Array(items) => {
                    for (idx, item) in items.iter().enumerate() {
                        visit_block(item, blocks, &path.index(idx), ctx, tasks);
                    }
                }
                item => visit_block(item, blocks, &path, ctx, tasks),
            },
            FieldKind::Array { fields } => {
                if let Value::Array(rows) = value {
                    for (idx, row) in rows.iter().enumerate() {
                        if let Value::Object(row) = row {
                            visit_fields(fields, &path.index(idx), &ctx.with_sibling(row), tasks);
                        }
                    }
                }
            }
            FieldKind::Group { fields } => {
                if let Value::Object(group) = value {
                    visit_fields(fields, &path, &ctx.with_sibling(group), tasks);
                }
            }
        }
    }
}

fn visit_block<'a>(
    value: &'a Value,
    blocks: &BlockSet,
    path: &FieldPath,
    ctx: &PopulateContext<'a>,
    tasks: &mut Vec<HydrationTask>,
) {
    let Some(item) = value.as_object() else {
        return;
    };
    let Some(block) = blocks.resolve_object(item) else {
        log::debug!("skipping block at '{}': no block matches its blockType", path);
        return;
    };
    if block.fields.is_empty() {
        return;
    }
    visit_fields(&block.fields, path, &ctx.with_sibling(item), tasks);
}

fn visit_relationship(
    value: &Value,
    relation_to: &RelationTo,
    path: &FieldPath,
    tasks: &mut Vec<HydrationTask>,
) {
    match value {
        Value::Array(items) => {
            for (idx, item) in items.iter().enumerate() {
                push_reference(item, relation_to, path.index(idx), tasks);
            }
        }
        item => push_reference(item, relation_to, path.clone(), tasks),
    }
}

fn push_reference(
    value: &Value,
    relation_to: &RelationTo,
    path: FieldPath,
    tasks: &mut Vec<HydrationTask>,
) {
    match relation_to {
        RelationTo::Single(collection) => {
            // Objects are already populated
            if let Some(id) = id_of(value) {
                tasks.push(HydrationTask::new(path, collection.as_str(), id));
            }
        }
        RelationTo::Polymorphic(_) => {
            let Some(reference) = value.as_object() else {
                return;
            };
            let Some(collection) = reference.get(RELATION_TO_KEY).and_then(Value::as_str) else {
                return;
            };
            if !relation_to.allows(collection) {
                log::debug!("skipping reference at '{}' to unexpected collection '{}'", path, collection);
                return;
            }
            if let Some(id) = reference.get(RELATION_VALUE_KEY).and_then(id_of) {
                tasks.push(HydrationTask::new(path.key(RELATION_VALUE_KEY), collection, id));
            }
        }
    }
}
