//! Expand/collapse state for the JSON tree

use serde_json::Value;
use std::collections::HashSet;

use super::path::{JsonPath, PathSegment};

/// Set of expanded node paths
///
/// Membership is the only thing that decides whether a branch shows its
/// children. Collapsing a branch leaves its descendants' entries alone, so
/// re-expanding it restores whatever was open underneath.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpansionState {
    expanded: HashSet<JsonPath>,
}

impl ExpansionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip membership of `path`; returns whether it is now expanded
    pub fn toggle(&mut self, path: &JsonPath) -> bool {
        if self.expanded.remove(path) {
            false
        } else {
            self.expanded.insert(path.clone());
            true
        }
    }

    pub fn is_expanded(&self, path: &JsonPath) -> bool {
        self.expanded.contains(path)
    }

    pub fn expand(&mut self, path: JsonPath) {
        self.expanded.insert(path);
    }

    pub fn collapse(&mut self, path: &JsonPath) {
        self.expanded.remove(path);
    }

    /// Collapse everything
    pub fn clear(&mut self) {
        self.expanded.clear();
    }

    pub fn len(&self) -> usize {
        self.expanded.len()
    }

    pub fn is_empty(&self) -> bool {
        self.expanded.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &JsonPath> {
        self.expanded.iter()
    }

    /// Expand every non-empty branch of `document` shallower than `depth`
    ///
    /// Top-level entries sit at depth 0, so `depth == 1` opens just them.
    /// Uses an explicit work list rather than recursion.
    pub fn expand_to_depth(&mut self, document: &Value, depth: usize) {
        let mut pending: Vec<(JsonPath, &Value)> = Vec::new();
        push_children(&mut pending, &JsonPath::root(), document);

        while let Some((path, value)) = pending.pop() {
            // Paths one segment long are top-level entries at depth 0
            if path.len() > depth || !has_children(value) {
                continue;
            }
            push_children(&mut pending, &path, value);
            self.expanded.insert(path);
        }
    }
}

fn has_children(value: &Value) -> bool {
    match value {
        Value::Object(map) => !map.is_empty(),
        Value::Array(items) => !items.is_empty(),
        _ => false,
    }
}

fn push_children<'a>(pending: &mut Vec<(JsonPath, &'a Value)>, parent: &JsonPath, value: &'a Value) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                pending.push((parent.child(PathSegment::Key(key.clone())), child));
            }
        }
        Value::Array(items) => {
            for (index, child) in items.iter().enumerate() {
                pending.push((parent.child(PathSegment::Index(index)), child));
            }
        }
        _ => {}
    }
}
