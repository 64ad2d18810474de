//! Field population pipeline
//!
//! Population runs in two phases:
//!
//! 1. **Traversal** ([`Populator::populate`]) walks the field schema
//!    depth-first and returns a flat list of [`HydrationTask`]s. It never
//!    suspends and never fetches anything.
//! 2. **Hydration** ([`Populator::hydrate`]) runs the tasks concurrently,
//!    recursively populates every fetched document one level deeper, and
//!    splices the results into a new document tree.
//!
//! Depth bounds recursion: a reference found at `current_depth` is only
//! dereferenced while `current_depth < depth`, so cyclic document graphs
//! always terminate with bare ids at the deepest level.

use crate::context::{PopulateContext, RequestContext};
use crate::document::{Document, FieldPath};
use crate::schema::{CollectionRegistry, CollectionSchema, FieldDefinition};
use crate::storage::{DocumentStore, StorageError};
use futures::future::{join_all, BoxFuture, FutureExt};
use std::sync::Arc;

mod project;
pub mod task;
mod traverse;

use project::{project_document, LocaleChain};
pub use task::HydrationTask;
pub use traverse::{RELATION_TO_KEY, RELATION_VALUE_KEY};

/// Population errors
#[derive(thiserror::Error, Debug)]
pub enum PopulateError {
    #[error("Failed to hydrate {collection}/{id}: {source}")]
    Hydration {
        collection: String,
        id: String,
        #[source]
        source: StorageError,
    },
    #[error("Unknown collection '{0}'")]
    UnknownCollection(String),
}

/// Populates documents against a registry and a storage backend
#[derive(Clone)]
pub struct Populator {
    registry: Arc<CollectionRegistry>,
    store: Arc<dyn DocumentStore>,
    default_locale: Option<String>,
}

impl Populator {
    pub fn new(registry: Arc<CollectionRegistry>, store: Arc<dyn DocumentStore>) -> Self {
        Self { registry, store, default_locale: None }
    }

    /// Locale used for localized fields when the request names none
    pub fn with_default_locale(mut self, locale: impl Into<String>) -> Self {
        self.default_locale = Some(locale.into());
        self
    }

    pub fn registry(&self) -> &Arc<CollectionRegistry> {
        &self.registry
    }

    /// Apply hidden-field, field-access and locale rules to a document
    pub fn project(
        &self,
        doc: Document,
        fields: &[FieldDefinition],
        request: &RequestContext,
    ) -> Document {
        let locales = LocaleChain::new(request, self.default_locale.as_deref());
        project_document(doc, fields, request, locales)
    }

    /// Collect the hydration tasks of a document without running them
    pub fn populate<'a>(
        &self,
        doc: &'a Document,
        fields: &[FieldDefinition],
        ctx: &PopulateContext<'a>,
    ) -> Vec<HydrationTask> {
        let mut tasks = Vec::new();
        traverse::visit_fields(fields, &FieldPath::root(), &ctx.with_sibling(doc), &mut tasks);
        tasks
    }

    /// Project, traverse and hydrate a raw document of the given collection
    ///
    /// Every task is awaited even when one fails; the first failure in task
    /// order is then returned and the partially hydrated tree is discarded.
    pub fn hydrate<'a>(
        &'a self,
        doc: Document,
        schema: &'a CollectionSchema,
        current_depth: u32,
        depth: u32,
        request: &'a RequestContext,
    ) -> BoxFuture<'a, Result<Document, PopulateError>> {
        async move {
            let mut doc = self.project(doc, &schema.fields, request);
            let tasks = {
                let ctx = PopulateContext::new(current_depth, depth, request, &doc);
                self.populate(&doc, &schema.fields, &ctx)
            };
            if tasks.is_empty() {
                return Ok(doc);
            }

            log::debug!(
                "hydrating {} reference(s) of '{}' at depth {}/{}",
                tasks.len(),
                schema.slug,
                current_depth,
                depth
            );

            let results =
                join_all(tasks.iter().map(|task| self.run_task(task, current_depth, depth, request)))
                    .await;
            let resolved = results.into_iter().collect::<Result<Vec<_>, _>>()?;

            for (task, value) in tasks.iter().zip(resolved) {
                let Some(value) = value else {
                    continue;
                };
                if !task.path.splice_document(&mut doc, value.into()) {
                    log::warn!("hydration slot '{}' vanished before splicing", task.path);
                }
            }
            Ok(doc)
        }
        .boxed()
    }

    /// Fetch one reference and populate it one level deeper.
    ///
    /// Returns None when the target is missing or not readable; the bare id stays.
    async fn run_task(
        &self,
        task: &HydrationTask,
        current_depth: u32,
        depth: u32,
        request: &RequestContext,
    ) -> Result<Option<Document>, PopulateError> {
        let schema = self
            .registry
            .get_schema(&task.collection)
            .ok_or_else(|| PopulateError::UnknownCollection(task.collection.clone()))?;

        if !request.can_read(&schema.read_roles) {
            log::debug!("not populating {}: collection not readable", task);
            return Ok(None);
        }

        let table = schema.table_name();
        let fetched = self.store.find_by_id(&table, &task.id).await.map_err(|source| {
            PopulateError::Hydration {
                collection: task.collection.clone(),
                id: task.id.clone(),
                source,
            }
        })?;

        let Some(fetched) = fetched else {
            log::debug!("not populating {}: document not found", task);
            return Ok(None);
        };

        let populated = self.hydrate(fetched, &schema, current_depth + 1, depth, request).await?;
        Ok(Some(populated))
    }
}
