use anyhow::Context;
use clap::Args;
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;
use vellum_core::config::VellumConfig;
use vellum_core::prelude::*;

#[derive(Args, Debug, Default)]
pub struct FindArgs {
    /// Collection slug
    #[arg(long)]
    pub collection: String,

    /// Filter as a `where` JSON object
    #[arg(long = "where")]
    pub filter: Option<String>,

    /// Shorthand for `{"id":{"equals":ID}}`
    #[arg(long)]
    pub id: Option<String>,

    /// Population depth (configured default when omitted)
    #[arg(long)]
    pub depth: Option<u32>,

    #[arg(long)]
    pub locale: Option<String>,

    #[arg(long)]
    pub fallback_locale: Option<String>,

    /// Include fields marked hidden
    #[arg(long)]
    pub show_hidden: bool,

    /// Skip collection and field access checks
    #[arg(long)]
    pub override_access: bool,

    /// Acting user id
    #[arg(long)]
    pub user: Option<String>,

    /// Role of the acting user (repeatable)
    #[arg(long = "role")]
    pub roles: Vec<String>,

    /// Return a page of documents instead of the first match
    #[arg(long)]
    pub limit: Option<usize>,

    #[arg(long)]
    pub page: Option<usize>,

    /// Sort field, `-field` for descending
    #[arg(long)]
    pub sort: Option<String>,

    /// Schema file (defaults to storage.schema_path)
    #[arg(long)]
    pub schema: Option<PathBuf>,

    /// Data directory (defaults to storage.data_dir)
    #[arg(long)]
    pub data: Option<PathBuf>,
}

impl FindArgs {
    fn filter(&self) -> anyhow::Result<Where> {
        let mut clauses = Vec::new();
        if let Some(raw) = &self.filter {
            let json: Value = serde_json::from_str(raw).context("--where is not valid JSON")?;
            clauses.push(Where::from_json(&json)?);
        }
        if let Some(id) = &self.id {
            clauses.push(Where::equals("id", id.as_str()));
        }
        Ok(match clauses.len() {
            0 => Where::all(),
            1 => clauses.remove(0),
            _ => Where::and(clauses),
        })
    }

    fn request(&self) -> RequestContext {
        let mut request = RequestContext::new();
        request.depth = self.depth;
        request.locale = self.locale.clone();
        request.fallback_locale = self.fallback_locale.clone();
        request.show_hidden_fields = self.show_hidden;
        request.override_access = self.override_access;
        if let Some(user) = &self.user {
            request = request.with_user(RequestUser::new(user.as_str(), self.roles.iter().cloned()));
        }
        request
    }

    fn paginated(&self) -> bool {
        self.limit.is_some() || self.page.is_some()
    }

    fn options(&self) -> anyhow::Result<QueryOptions> {
        let mut options = QueryOptions::default();
        if let Some(limit) = self.limit {
            options = options.with_limit(limit);
        }
        if let Some(page) = self.page {
            options = options.with_page(page);
        }
        if let Some(sort) = &self.sort {
            let sort = Sort::parse(sort).with_context(|| format!("invalid --sort '{}'", sort))?;
            options = options.with_sort(sort);
        }
        Ok(options)
    }
}

/// Resolve documents and render them as pretty JSON
pub async fn run(config: &VellumConfig, args: &FindArgs) -> anyhow::Result<String> {
    let schema_path = args.schema.clone().unwrap_or_else(|| PathBuf::from(&config.storage.schema_path));
    let data_dir = args.data.clone().unwrap_or_else(|| PathBuf::from(&config.storage.data_dir));

    let registry = CollectionRegistry::from_json_file(&schema_path)?;
    let store = MemoryStore::load_dir(&data_dir)
        .with_context(|| format!("Failed to load data from {}", data_dir.display()))?;
    let resolver = DocumentResolver::from_config(config, Arc::new(registry), Arc::new(store));

    let filter = args.filter()?;
    let request = args.request();

    let output = if args.paginated() {
        let page = resolver.resolve_many(&args.collection, &filter, &args.options()?, &request).await?;
        serde_json::to_value(page)?
    } else {
        match resolver.resolve_one(&args.collection, &filter, &request).await? {
            Some(doc) => Value::Object(doc),
            None => Value::Null,
        }
    };
    Ok(serde_json::to_string_pretty(&output)?)
}
