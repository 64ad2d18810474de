//! Read projection
//!
//! Applied to every document before traversal: hidden fields and fields the
//! user may not read are dropped, localized values are flattened to a single
//! locale. References are left alone; fetched documents are projected with
//! their own collection schema.

use crate::context::{RequestContext, ALL_LOCALES};
use crate::document::Document;
use crate::schema::{FieldDefinition, FieldKind};
use serde_json::Value;

/// Locale resolution for one request
#[derive(Debug, Clone, Copy)]
pub(crate) struct LocaleChain<'a> {
    locale: Option<&'a str>,
    fallback: Option<&'a str>,
    default: Option<&'a str>,
}

impl<'a> LocaleChain<'a> {
    pub(crate) fn new(request: &'a RequestContext, default: Option<&'a str>) -> Self {
        Self {
            locale: request.locale.as_deref().or(default),
            fallback: request.fallback_locale.as_deref(),
            default,
        }
    }

    fn keeps_all(&self) -> bool {
        matches!(self.locale, None | Some(ALL_LOCALES))
    }

    /// Pick the value for the requested locale, then the fallback, then the default
    fn pick(&self, value: Value) -> Value {
        let Value::Object(mut by_locale) = value else {
            return value;
        };
        [self.locale, self.fallback, self.default]
            .into_iter()
            .flatten()
            .find_map(|locale| match by_locale.remove(locale) {
                Some(Value::Null) | None => None,
                Some(found) => Some(found),
            })
            .unwrap_or(Value::Null)
    }
}

/// Project a document for the given request
pub(crate) fn project_document(
    mut doc: Document,
    fields: &[FieldDefinition],
    request: &RequestContext,
    locales: LocaleChain<'_>,
) -> Document {
    for field in fields {
        if field.hidden && !request.show_hidden_fields {
            doc.remove(&field.name);
            continue;
        }
        if !request.can_read(&field.read_roles) {
            doc.remove(&field.name);
            continue;
        }
        let Some(mut value) = doc.remove(&field.name) else {
            continue;
        };
        if field.localized && !locales.keeps_all() {
            value = locales.pick(value);
        }
        doc.insert(field.name.clone(), project_nested(value, &field.kind, request, locales));
    }
    doc
}

fn project_nested(
    value: Value,
    kind: &FieldKind,
    request: &RequestContext,
    locales: LocaleChain<'_>,
) -> Value {
    match (kind, value) {
        (FieldKind::Group { fields }, Value::Object(group)) => {
            Value::Object(project_document(group, fields, request, locales))
        }
        (FieldKind::Array { fields }, Value::Array(rows)) => Value::Array(
            rows.into_iter()
                .map(|row| match row {
                    Value::Object(row) => {
                        Value::Object(project_document(row, fields, request, locales))
                    }
                    other => other,
                })
                .collect(),
        ),
        (FieldKind::Block { .. }, Value::Array(items)) => Value::Array(
            items
                .into_iter()
                .map(|item| project_nested(item, kind, request, locales))
                .collect(),
        ),
        (FieldKind::Block { blocks }, Value::Object(item)) => {
            let Some(block) = blocks.resolve_object(&item) else {
                return Value::Object(item);
            };
            Value::Object(project_document(item, &block.fields, request, locales))
        }
        (_, value) => value,
    }
}
