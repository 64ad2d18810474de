//! End-to-end resolution over a JSON schema file and a directory-backed store

use serde_json::json;
use std::path::Path;
use std::sync::Arc;
use vellum_core::config::VellumConfig;
use vellum_core::prelude::*;

const SCHEMA: &str = r#"[
  {
    "slug": "users",
    "fields": [
      { "name": "name", "type": "text" },
      { "name": "role", "type": "select" },
      { "name": "apiKey", "type": "text", "hidden": true }
    ]
  },
  {
    "slug": "media",
    "upload": true,
    "fields": [{ "name": "alt", "type": "text", "localized": true }]
  },
  {
    "slug": "blogPosts",
    "fields": [
      { "name": "title", "type": "text", "localized": true },
      { "name": "author", "type": "relationship", "relationTo": "users" },
      { "name": "editors", "type": "relationship", "relationTo": "users", "hasMany": true, "maxDepth": 0 },
      { "name": "featured", "type": "relationship", "relationTo": ["blogPosts", "media"] },
      {
        "name": "layout",
        "type": "blocks",
        "blocks": [
          { "slug": "mediaBlock", "fields": [{ "name": "media", "type": "upload", "relationTo": "media" }] },
          { "slug": "quote", "fields": [{ "name": "text", "type": "textarea" }] }
        ]
      },
      {
        "name": "seo",
        "type": "group",
        "fields": [
          { "name": "kind", "type": "select" },
          {
            "name": "image",
            "type": "upload",
            "relationTo": "media",
            "visibleWhen": { "kind": { "equals": "image" } }
          }
        ]
      }
    ]
  }
]"#;

fn write_fixture(dir: &Path) {
    std::fs::write(dir.join("schema.json"), SCHEMA).unwrap();

    let data = dir.join("data");
    std::fs::create_dir(&data).unwrap();
    std::fs::write(
        data.join("users.json"),
        json!([
            { "id": "user-42", "name": "Ada", "role": "admin", "apiKey": "k-1" },
            { "id": "user-7", "name": "Grace", "role": "editor", "apiKey": "k-2" }
        ])
        .to_string(),
    )
    .unwrap();
    std::fs::write(
        data.join("media.json"),
        json!([{ "id": 1, "alt": { "en": "Harbour", "fr": "Port" } }]).to_string(),
    )
    .unwrap();
    std::fs::write(
        data.join("blog_posts.json"),
        json!([
            {
                "id": "p1",
                "title": { "en": "Hello", "fr": "Bonjour" },
                "author": "user-42",
                "editors": ["user-7"],
                "featured": { "relationTo": "media", "value": 1 },
                "layout": [
                    { "blockType": "quote", "text": "Less is more" },
                    { "blockType": "retired", "media": 1 },
                    { "blockType": "mediaBlock", "media": 1 }
                ],
                "seo": { "kind": "text", "image": 1 }
            },
            { "id": "p2", "title": { "en": "Second" }, "author": "ghost" }
        ])
        .to_string(),
    )
    .unwrap();
}

fn resolver(dir: &Path) -> DocumentResolver {
    let registry = CollectionRegistry::from_json_file(dir.join("schema.json")).unwrap();
    let store = MemoryStore::load_dir(dir.join("data")).unwrap();
    let mut config = VellumConfig::default();
    config.localization.default_locale = Some("en".to_string());
    DocumentResolver::from_config(&config, Arc::new(registry), Arc::new(store))
}

#[tokio::test]
async fn resolves_and_populates_a_document() {
    let dir = tempfile::tempdir().unwrap();
    write_fixture(dir.path());
    let resolver = resolver(dir.path());

    let post = resolver
        .resolve_one("blogPosts", &Where::equals("id", "p1"), &RequestContext::new())
        .await
        .unwrap()
        .expect("p1 exists");

    assert_eq!(post["title"], "Hello");
    assert_eq!(post["author"]["name"], "Ada");
    assert!(post["author"].get("apiKey").is_none());
    // maxDepth 0 keeps editors as ids
    assert_eq!(post["editors"], json!(["user-7"]));
    assert_eq!(post["featured"]["relationTo"], "media");
    assert_eq!(post["featured"]["value"]["alt"], "Harbour");
    // Known blocks populated, unknown ones untouched
    assert_eq!(post["layout"][0]["text"], "Less is more");
    assert_eq!(post["layout"][1]["media"], 1);
    assert_eq!(post["layout"][2]["media"]["alt"], "Harbour");
    // visibleWhen fails for this group
    assert_eq!(post["seo"]["image"], 1);
}

#[tokio::test]
async fn request_locale_and_flags_flow_through_population() {
    let dir = tempfile::tempdir().unwrap();
    write_fixture(dir.path());
    let resolver = resolver(dir.path());

    let request = RequestContext::new().with_locale("fr").with_hidden_fields();
    let post = resolver.resolve_by_id("blogPosts", "p1", &request).await.unwrap().unwrap();

    assert_eq!(post["title"], "Bonjour");
    assert_eq!(post["featured"]["value"]["alt"], "Port");
    assert_eq!(post["author"]["apiKey"], "k-1");

    let second = resolver.resolve_by_id("blogPosts", "p2", &request).await.unwrap().unwrap();
    // Missing in fr, falls back to the configured default
    assert_eq!(second["title"], "Second");
    // Dangling reference stays a bare id
    assert_eq!(second["author"], "ghost");
}

#[tokio::test]
async fn filters_from_json_select_the_first_match() {
    let dir = tempfile::tempdir().unwrap();
    write_fixture(dir.path());
    let resolver = resolver(dir.path());

    let filter = Where::from_json(&json!({ "author": { "in": ["ghost", "user-42"] } })).unwrap();
    let post = resolver
        .resolve_one("blogPosts", &filter, &RequestContext::new().with_depth(0))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(post["id"], "p1");
    assert_eq!(post["author"], "user-42");

    let filter = Where::from_json(&json!({ "author": { "equals": "nobody" } })).unwrap();
    assert!(resolver.resolve_one("blogPosts", &filter, &RequestContext::new()).await.unwrap().is_none());
}

#[test]
fn invalid_schema_files_are_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("schema.json");
    std::fs::write(
        &path,
        r#"[{ "slug": "posts", "fields": [{ "name": "author", "type": "relationship", "relationTo": "people" }] }]"#,
    )
    .unwrap();

    let err = CollectionRegistry::from_json_file(&path).unwrap_err();
    assert!(format!("{:#}", err).contains("people"));
}
