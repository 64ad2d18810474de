//! Document values and slot addressing
//!
//! Documents are plain JSON objects. Population never mutates a document while
//! hydration is in flight: tasks name their target slot with a [`FieldPath`]
//! and the resolved values are spliced into a fresh tree once every task has
//! completed.

use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;

/// A stored or populated document (field name -> value)
pub type Document = Map<String, Value>;

/// One step into a document tree
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum PathSegment {
    /// Object key
    Key(String),
    /// Array index
    Index(usize),
}

/// Location of a value slot inside a document
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
pub struct FieldPath(Vec<PathSegment>);

impl FieldPath {
    /// The document root
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Path to the given key below this one
    pub fn key(&self, key: impl Into<String>) -> Self {
        let mut segments = self.0.clone();
        segments.push(PathSegment::Key(key.into()));
        Self(segments)
    }

    /// Path to the given array index below this one
    pub fn index(&self, index: usize) -> Self {
        let mut segments = self.0.clone();
        segments.push(PathSegment::Index(index));
        Self(segments)
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Read the value at this path
    pub fn get<'a>(&self, root: &'a Value) -> Option<&'a Value> {
        let mut current = root;
        for segment in &self.0 {
            current = match (segment, current) {
                (PathSegment::Key(key), Value::Object(map)) => map.get(key)?,
                (PathSegment::Index(idx), Value::Array(items)) => items.get(*idx)?,
                _ => return None,
            };
        }
        Some(current)
    }

    /// Replace the value at this path. Returns false if the slot does not exist.
    pub fn splice(&self, root: &mut Value, value: Value) -> bool {
        let Some((last, parents)) = self.0.split_last() else {
            *root = value;
            return true;
        };

        let mut current = root;
        for segment in parents {
            current = match (segment, current) {
                (PathSegment::Key(key), Value::Object(map)) => match map.get_mut(key) {
                    Some(next) => next,
                    None => return false,
                },
                (PathSegment::Index(idx), Value::Array(items)) => match items.get_mut(*idx) {
                    Some(next) => next,
                    None => return false,
                },
                _ => return false,
            };
        }

        match (last, current) {
            (PathSegment::Key(key), Value::Object(map)) if map.contains_key(key) => {
                map.insert(key.clone(), value);
                true
            }
            (PathSegment::Index(idx), Value::Array(items)) if *idx < items.len() => {
                items[*idx] = value;
                true
            }
            _ => false,
        }
    }

    /// [`splice`](Self::splice) starting from a document map
    pub fn splice_document(&self, doc: &mut Document, value: Value) -> bool {
        let Some((PathSegment::Key(head), rest)) = self.0.split_first() else {
            return false;
        };
        let Some(slot) = doc.get_mut(head) else {
            return false;
        };
        FieldPath(rest.to_vec()).splice(slot, value)
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .0
            .iter()
            .map(|segment| match segment {
                PathSegment::Key(key) => key.clone(),
                PathSegment::Index(idx) => idx.to_string(),
            })
            .collect();
        write!(f, "{}", parts.join("."))
    }
}

/// Collect every value reachable through a dotted path.
///
/// Arrays met along the way fan out: `"layout.blockType"` yields the
/// `blockType` of every layout item.
pub fn values_at<'a>(value: &'a Value, dotted: &str) -> Vec<&'a Value> {
    let mut current = vec![value];
    for part in dotted.split('.').filter(|p| !p.is_empty()) {
        let mut next = Vec::new();
        for candidate in current {
            collect_key(candidate, part, &mut next);
        }
        current = next;
    }
    current
}

/// Like [`values_at`], starting from a document map
pub fn document_values<'a>(doc: &'a Document, dotted: &str) -> Vec<&'a Value> {
    let (head, rest) = match dotted.split_once('.') {
        Some((head, rest)) => (head, Some(rest)),
        None => (dotted, None),
    };
    match (doc.get(head), rest) {
        (Some(value), Some(rest)) => values_at(value, rest),
        (Some(value), None) => vec![value],
        (None, _) => Vec::new(),
    }
}

fn collect_key<'a>(value: &'a Value, key: &str, out: &mut Vec<&'a Value>) {
    match value {
        Value::Object(map) => {
            if let Some(found) = map.get(key) {
                out.push(found);
            }
        }
        Value::Array(items) => {
            if let Ok(idx) = key.parse::<usize>() {
                if let Some(found) = items.get(idx) {
                    out.push(found);
                    return;
                }
            }
            for item in items {
                collect_key(item, key, out);
            }
        }
        _ => {}
    }
}

/// Render a scalar reference (string or number) as a document id
pub fn id_of(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
