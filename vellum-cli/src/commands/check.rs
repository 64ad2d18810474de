use std::path::Path;
use vellum_core::schema::CollectionRegistry;

/// Load and sanitize a schema file, returning a short report
pub fn run(schema: &Path) -> anyhow::Result<String> {
    let registry = CollectionRegistry::from_json_file(schema)?;
    log::info!("schema {} is valid", schema.display());

    let mut report = format!("{} collection(s) in {}", registry.len(), schema.display());
    for slug in registry.slugs() {
        let table = registry.table_name(slug).unwrap_or(slug);
        report.push_str(&format!("\n  {} -> {}", slug, table));
    }
    Ok(report)
}
