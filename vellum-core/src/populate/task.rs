use crate::document::FieldPath;
use serde::Serialize;
use std::fmt;

/// A pending hydration: fetch `collection/id` and splice it at `path`
///
/// Tasks are plain data. Traversal only describes the work; nothing is
/// fetched until the task list is handed to [`Populator::hydrate`](super::Populator::hydrate).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct HydrationTask {
    /// Slot holding the bare reference
    pub path: FieldPath,
    /// Target collection slug
    pub collection: String,
    /// Referenced document id
    pub id: String,
}

impl HydrationTask {
    pub fn new(path: FieldPath, collection: impl Into<String>, id: impl Into<String>) -> Self {
        Self { path, collection: collection.into(), id: id.into() }
    }
}

impl fmt::Display for HydrationTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}/{}", self.path, self.collection, self.id)
    }
}
