use super::world::VellumWorld;
use cucumber::{given, then, when};
use vellum_core::prelude::*;

async fn resolve(world: &mut VellumWorld, collection: &str, filter: Where) {
    let resolver = DocumentResolver::new(world.registry(), world.store());
    match resolver.resolve_one(collection, &filter, &RequestContext::new()).await {
        Ok(found) => world.output = found,
        Err(err) => world.error = Some(err),
    }
}

#[given(expr = "lookups of {string} fail")]
async fn given_failing_lookup(world: &mut VellumWorld, id: String) {
    world.failing_id = Some(id);
}

#[when(expr = "I resolve {string} where {string} equals {string}")]
async fn when_resolve_equals(world: &mut VellumWorld, collection: String, field: String, value: String) {
    resolve(world, &collection, Where::equals(field, value)).await;
}

#[when(expr = "I resolve {string} where {string} exists")]
async fn when_resolve_exists(world: &mut VellumWorld, collection: String, field: String) {
    resolve(world, &collection, Where::field(field, Operator::Exists, true)).await;
}

#[then(expr = "no document is returned")]
async fn then_no_document(world: &mut VellumWorld) {
    assert!(world.error.is_none(), "unexpected error: {:?}", world.error);
    assert!(world.output.is_none());
}

#[then(expr = "the resolved document has id {string}")]
async fn then_resolved_id(world: &mut VellumWorld, id: String) {
    assert!(world.error.is_none(), "unexpected error: {:?}", world.error);
    assert_eq!(world.output_value("id").and_then(|v| v.as_str().map(str::to_string)), Some(id));
}

#[then(expr = "resolution fails for {string} document {string}")]
async fn then_resolution_fails(world: &mut VellumWorld, collection: String, id: String) {
    match &world.error {
        Some(ResolveError::Populate(PopulateError::Hydration { collection: c, id: i, .. })) => {
            assert_eq!(c, &collection);
            assert_eq!(i, &id);
        }
        other => panic!("expected a hydration failure, got {:?}", other),
    }
}
