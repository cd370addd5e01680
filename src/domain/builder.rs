//! Tree builder: turns a flat item set into one arena tree per root.

use std::collections::{HashMap, HashSet};

use generational_arena::Index;
use tracing::{debug, instrument, trace};

use crate::domain::arena::{NodeData, TreeArena};
use crate::domain::entities::{TreeNode, WorkItem};
use crate::domain::error::DomainError;
use crate::domain::index::{resolve_roots, root_items, ChildIndex};
use crate::domain::normalize::normalize;

/// Result type for tree operations.
pub type TreeResult<T> = Result<T, DomainError>;

/// Constructs hierarchy trees from a flat item set.
///
/// Ids placed in any tree built so far are remembered. A child reference to an
/// already placed id is not expanded again, which covers both cycles (every
/// ancestor on the current path is placed) and items listed under several
/// parents.
pub struct HierarchyBuilder<'a> {
    items: &'a [WorkItem],
    by_id: HashMap<&'a str, &'a WorkItem>,
    index: ChildIndex,
    placed: HashSet<&'a str>,
}

impl<'a> HierarchyBuilder<'a> {
    pub fn new(items: &'a [WorkItem]) -> Self {
        let by_id = items.iter().map(|item| (item.id.as_str(), item)).collect();
        Self {
            items,
            by_id,
            index: ChildIndex::build(items),
            placed: HashSet::new(),
        }
    }

    pub fn index(&self) -> &ChildIndex {
        &self.index
    }

    /// Root ids in input order.
    pub fn roots(&self) -> Vec<&'a str> {
        resolve_roots(self.items, &self.index)
    }

    /// Build one tree per root, in root order.
    #[instrument(level = "debug", skip(self), fields(items = self.items.len()))]
    pub fn build_forest(&mut self) -> Vec<TreeArena> {
        let roots = root_items(self.items, &self.index);
        debug!("building {} trees", roots.len());
        roots.into_iter().map(|root| self.build_from(root)).collect()
    }

    /// Build the tree rooted at `root_id`.
    ///
    /// `root_id` must belong to the item set this builder was created with.
    pub fn build_tree(&mut self, root_id: &str) -> TreeResult<TreeArena> {
        let root = self
            .by_id
            .get(root_id)
            .copied()
            .ok_or_else(|| DomainError::UnknownRoot(root_id.to_string()))?;
        Ok(self.build_from(root))
    }

    /// Items not placed in any tree built so far.
    pub fn unplaced(&self) -> Vec<&'a str> {
        self.items
            .iter()
            .map(|item| item.id.as_str())
            .filter(|id| !self.placed.contains(id))
            .collect()
    }

    #[instrument(level = "trace", skip(self, root), fields(root = %root.id))]
    fn build_from(&mut self, root: &'a WorkItem) -> TreeArena {
        let mut tree = TreeArena::new();
        self.placed.insert(root.id.as_str());
        let mut stack: Vec<(&'a WorkItem, Option<Index>, usize)> = vec![(root, None, 0)];

        while let Some((item, parent_idx, level)) = stack.pop() {
            let current_idx = tree.insert_node(NodeData::item(item.id.as_str(), level), parent_idx);

            let mut children = Vec::with_capacity(item.child_ids.len());
            for child_id in &item.child_ids {
                let Some(child) = self.by_id.get(child_id.as_str()).copied() else {
                    trace!(parent = %item.id, child = %child_id, "skipping dangling child reference");
                    continue;
                };
                if !self.placed.insert(child.id.as_str()) {
                    trace!(parent = %item.id, child = %child_id, "child already placed, not expanding");
                    continue;
                }
                children.push(child);
            }

            // Reverse so the first child is popped (and inserted) first
            for child in children.into_iter().rev() {
                stack.push((child, Some(current_idx), level + 1));
            }
        }

        tree
    }
}

/// Build and normalize one tree per root.
///
/// This is the whole hierarchy pipeline: index, roots, trees, padding.
pub fn build_work_paths(items: &[WorkItem]) -> Vec<TreeNode> {
    let mut builder = HierarchyBuilder::new(items);
    builder
        .build_forest()
        .into_iter()
        .filter_map(|mut tree| {
            normalize(&mut tree);
            tree.to_tree_node()
        })
        .collect()
}
