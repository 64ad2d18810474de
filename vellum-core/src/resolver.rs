//! Document resolution
//!
//! [`DocumentResolver::resolve_one`] turns a collection slug and a filter into
//! at most one fully populated document: the slug is mapped to its physical
//! table, the storage backend is asked for the first match (limit 1, page 1,
//! no totals, no sort) and that row is handed to the population pipeline.

use crate::config::{PopulationConfig, VellumConfig};
use crate::context::RequestContext;
use crate::document::Document;
use crate::populate::{PopulateError, Populator};
use crate::query::{PaginatedDocs, QueryOptions, Where};
use crate::schema::{CollectionRegistry, CollectionSchema};
use crate::storage::{DocumentStore, StorageError};
use futures::future::join_all;
use std::sync::Arc;

/// Resolution errors
///
/// "No matching document" is not an error: it is `Ok(None)`.
#[derive(thiserror::Error, Debug)]
pub enum ResolveError {
    #[error("Unknown collection '{0}'")]
    UnknownCollection(String),
    #[error("Read access to collection '{0}' denied")]
    Forbidden(String),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Populate(#[from] PopulateError),
}

/// Resolves documents from storage and populates them
#[derive(Clone)]
pub struct DocumentResolver {
    registry: Arc<CollectionRegistry>,
    store: Arc<dyn DocumentStore>,
    populator: Populator,
    config: PopulationConfig,
}

impl DocumentResolver {
    pub fn new(registry: Arc<CollectionRegistry>, store: Arc<dyn DocumentStore>) -> Self {
        let populator = Populator::new(registry.clone(), store.clone());
        Self { registry, store, populator, config: PopulationConfig::default() }
    }

    /// Resolver using the population and localization sections of a config
    pub fn from_config(
        config: &VellumConfig,
        registry: Arc<CollectionRegistry>,
        store: Arc<dyn DocumentStore>,
    ) -> Self {
        let resolver = Self::new(registry, store).with_population(config.population.clone());
        match &config.localization.default_locale {
            Some(locale) => resolver.with_default_locale(locale.clone()),
            None => resolver,
        }
    }

    pub fn with_population(mut self, config: PopulationConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_default_locale(mut self, locale: impl Into<String>) -> Self {
        self.populator = self.populator.with_default_locale(locale);
        self
    }

    pub fn registry(&self) -> &Arc<CollectionRegistry> {
        &self.registry
    }

    /// First document matching `filter`, populated, or None
    pub async fn resolve_one(
        &self,
        slug: &str,
        filter: &Where,
        request: &RequestContext,
    ) -> Result<Option<Document>, ResolveError> {
        let schema = self.readable_collection(slug, request)?;
        let table = schema.table_name();

        let result = self.store.query(&table, filter, &QueryOptions::first()).await?;
        let Some(row) = result.docs.into_iter().next() else {
            log::info!("resolve {}: no match for {}", slug, filter);
            return Ok(None);
        };

        let depth = self.config.effective_depth(request.depth);
        let doc = self.populator.hydrate(row, &schema, 0, depth, request).await?;
        log::info!("resolve {}: found document at depth {}", slug, depth);
        Ok(Some(doc))
    }

    /// Document with the given id, populated, or None
    pub async fn resolve_by_id(
        &self,
        slug: &str,
        id: &str,
        request: &RequestContext,
    ) -> Result<Option<Document>, ResolveError> {
        self.resolve_one(slug, &Where::equals("id", id), request).await
    }

    /// One page of matching documents, each populated
    ///
    /// Documents are populated concurrently; the first failure in page order wins.
    pub async fn resolve_many(
        &self,
        slug: &str,
        filter: &Where,
        options: &QueryOptions,
        request: &RequestContext,
    ) -> Result<PaginatedDocs, ResolveError> {
        let schema = self.readable_collection(slug, request)?;
        let table = schema.table_name();

        let mut page = self.store.query(&table, filter, options).await?;
        let depth = self.config.effective_depth(request.depth);
        let rows = std::mem::take(&mut page.docs);

        let populated = join_all(
            rows.into_iter().map(|row| self.populator.hydrate(row, &schema, 0, depth, request)),
        )
        .await;
        page.docs = populated.into_iter().collect::<Result<Vec<_>, _>>()?;

        log::info!("resolve {}: {} document(s) on page {}", slug, page.docs.len(), page.page);
        Ok(page)
    }

    fn readable_collection(
        &self,
        slug: &str,
        request: &RequestContext,
    ) -> Result<Arc<CollectionSchema>, ResolveError> {
        let schema = self
            .registry
            .get_schema(slug)
            .ok_or_else(|| ResolveError::UnknownCollection(slug.to_string()))?;
        if !request.can_read(&schema.read_roles) {
            return Err(ResolveError::Forbidden(slug.to_string()));
        }
        Ok(schema)
    }
}
