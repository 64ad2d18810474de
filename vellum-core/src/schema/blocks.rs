//! Block definitions and discriminator dispatch
//!
//! A block field stores polymorphic content: every value carries a
//! `blockType` discriminator naming the [`BlockDefinition`] that describes it.

use crate::schema::fields::FieldDefinition;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Key holding the block discriminator in stored data
pub const BLOCK_TYPE_KEY: &str = "blockType";

/// A named sub-schema for one variant of block content
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockDefinition {
    pub slug: String,
    #[serde(default)]
    pub fields: Vec<FieldDefinition>,
}

impl BlockDefinition {
    pub fn new(slug: impl Into<String>, fields: Vec<FieldDefinition>) -> Self {
        Self { slug: slug.into(), fields }
    }
}

/// Block definitions of one field, indexed by slug
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "Vec<BlockDefinition>", into = "Vec<BlockDefinition>")]
pub struct BlockSet {
    blocks: Vec<BlockDefinition>,
    index: HashMap<String, usize>,
}

impl BlockSet {
    pub fn new(blocks: Vec<BlockDefinition>) -> Self {
        let mut index = HashMap::with_capacity(blocks.len());
        for (position, block) in blocks.iter().enumerate() {
            // First definition wins; duplicates are reported by sanitization
            index.entry(block.slug.clone()).or_insert(position);
        }
        Self { blocks, index }
    }

    /// Look up a block by its slug
    pub fn find(&self, slug: &str) -> Option<&BlockDefinition> {
        self.index.get(slug).and_then(|&position| self.blocks.get(position))
    }

    /// Resolve the block describing a stored value via its `blockType`.
    ///
    /// Returns None when the value is not an object, has no string
    /// discriminator, or names a block this set does not define.
    pub fn resolve(&self, value: &Value) -> Option<&BlockDefinition> {
        self.resolve_object(value.as_object()?)
    }

    /// Same as [`resolve`](Self::resolve) for an already unwrapped object
    pub fn resolve_object(&self, item: &Map<String, Value>) -> Option<&BlockDefinition> {
        let block_type = item.get(BLOCK_TYPE_KEY)?.as_str()?;
        self.find(block_type)
    }

    pub fn iter(&self) -> impl Iterator<Item = &BlockDefinition> {
        self.blocks.iter()
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn into_vec(self) -> Vec<BlockDefinition> {
        self.blocks
    }
}

impl PartialEq for BlockSet {
    fn eq(&self, other: &Self) -> bool {
        self.blocks == other.blocks
    }
}

impl From<Vec<BlockDefinition>> for BlockSet {
    fn from(blocks: Vec<BlockDefinition>) -> Self {
        BlockSet::new(blocks)
    }
}

impl From<BlockSet> for Vec<BlockDefinition> {
    fn from(set: BlockSet) -> Self {
        set.blocks
    }
}
