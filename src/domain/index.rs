//! Child reference index and root resolution.

use std::collections::HashMap;

use tracing::{debug, trace};

use crate::domain::entities::WorkItem;

/// Mapping from child id to the id of the item listing it as a child.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChildIndex {
    parents: HashMap<String, String>,
}

impl ChildIndex {
    /// Index every `child_ids` entry of every item.
    ///
    /// An id listed under several items maps to the last one in iteration order.
    pub fn build(items: &[WorkItem]) -> Self {
        let mut parents = HashMap::new();
        for item in items.iter().filter(|i| !i.child_ids.is_empty()) {
            for child in &item.child_ids {
                if let Some(previous) = parents.insert(child.clone(), item.id.clone()) {
                    if previous != item.id {
                        trace!(child = %child, previous = %previous, parent = %item.id, "child listed under several parents");
                    }
                }
            }
        }
        debug!("indexed {} child references", parents.len());
        Self { parents }
    }

    pub fn parent_of(&self, child: &str) -> Option<&str> {
        self.parents.get(child).map(String::as_str)
    }

    pub fn is_child(&self, id: &str) -> bool {
        self.parents.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.parents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parents.is_empty()
    }
}

/// Items never referenced as a child, in input order.
pub fn root_items<'a>(items: &'a [WorkItem], index: &ChildIndex) -> Vec<&'a WorkItem> {
    items.iter().filter(|item| !index.is_child(&item.id)).collect()
}

/// Ids of the hierarchy roots, in input order.
pub fn resolve_roots<'a>(items: &'a [WorkItem], index: &ChildIndex) -> Vec<&'a str> {
    root_items(items, index)
        .into_iter()
        .map(|item| item.id.as_str())
        .collect()
}
