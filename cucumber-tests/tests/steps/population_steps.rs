use super::world::VellumWorld;
use cucumber::gherkin::Step;
use cucumber::{given, then, when};
use cucumber_tests::blog_collections;
use vellum_core::prelude::*;
use vellum_core::PopulateContext;

// ==================== BACKGROUND ====================

#[given(expr = "the blog collections are registered")]
async fn given_blog_collections(world: &mut VellumWorld) {
    world.collections = blog_collections();
}

#[given(expr = "the field schema:")]
async fn given_field_schema(world: &mut VellumWorld, step: &Step) {
    let json = step.docstring.as_deref().expect("field schema docstring");
    world.fields = serde_json::from_str(json).expect("valid field schema");
}

#[given(expr = "the document:")]
async fn given_document(world: &mut VellumWorld, step: &Step) {
    let json = step.docstring.as_deref().expect("document docstring");
    world.document = serde_json::from_str(json).expect("valid document");
}

// ==================== TRAVERSAL ====================

fn collect(world: &VellumWorld, current_depth: u32, depth: u32) -> Vec<HydrationTask> {
    let registry = world.registry();
    let schema = world.scenario_schema(&registry);
    let populator = Populator::new(registry, world.store());
    let request = RequestContext::new();
    let ctx = PopulateContext::new(current_depth, depth, &request, &world.document);
    populator.populate(&world.document, &schema.fields, &ctx)
}

#[when(expr = "hydration tasks are collected at depth {int} of {int}")]
async fn when_tasks_collected(world: &mut VellumWorld, current_depth: u32, depth: u32) {
    world.tasks = collect(world, current_depth, depth);
}

#[when(expr = "hydration tasks are collected twice at depth {int} of {int}")]
async fn when_tasks_collected_twice(world: &mut VellumWorld, current_depth: u32, depth: u32) {
    world.tasks = collect(world, current_depth, depth);
    world.repeated_tasks = collect(world, current_depth, depth);
}

#[then(expr = "{int} hydration task(s) is/are produced")]
async fn then_task_count(world: &mut VellumWorld, count: usize) {
    assert_eq!(world.tasks.len(), count, "tasks: {:?}", world.tasks);
}

#[then(expr = "task {int} targets {string} document {string}")]
async fn then_task_targets(world: &mut VellumWorld, position: usize, collection: String, id: String) {
    let task = &world.tasks[position - 1];
    assert_eq!(task.collection, collection);
    assert_eq!(task.id, id);
}

#[then(expr = "both collections hold {int} equal tasks")]
async fn then_equal_collections(world: &mut VellumWorld, count: usize) {
    assert_eq!(world.tasks.len(), count);
    assert_eq!(world.tasks, world.repeated_tasks);
}

// ==================== HYDRATION ====================

#[when(expr = "the document is hydrated at depth {int} of {int}")]
async fn when_document_hydrated(world: &mut VellumWorld, current_depth: u32, depth: u32) {
    let registry = world.registry();
    let schema = world.scenario_schema(&registry);
    let populator = Populator::new(registry, world.store());
    let request = RequestContext::new();

    let hydrated = populator
        .hydrate(world.document.clone(), &schema, current_depth, depth, &request)
        .await
        .expect("hydration succeeds");
    world.output = Some(hydrated);
}

#[then(expr = "the value at {string} is {string}")]
async fn then_value_at(world: &mut VellumWorld, path: String, expected: String) {
    let value = world.output_value(&path);
    assert_eq!(value.as_ref().and_then(|v| v.as_str()), Some(expected.as_str()), "at {}", path);
}
