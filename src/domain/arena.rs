//! Arena-backed work tree used while building and padding a hierarchy.

use std::collections::HashMap;
use std::fmt;

use generational_arena::{Arena, Index};
use tracing::instrument;

use crate::domain::entities::TreeNode;

/// Data payload for tree nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeData {
    /// Source item id, or synthesized id for placeholders
    pub external_id: String,
    /// Zero-based depth from the root
    pub level: usize,
    /// True for padding nodes that carry no source data
    pub placeholder: bool,
}

impl NodeData {
    pub fn item(external_id: impl Into<String>, level: usize) -> Self {
        Self {
            external_id: external_id.into(),
            level,
            placeholder: false,
        }
    }

    pub fn placeholder(external_id: impl Into<String>, level: usize) -> Self {
        Self {
            external_id: external_id.into(),
            level,
            placeholder: true,
        }
    }
}

impl fmt::Display for NodeData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.external_id)
    }
}

/// Node in the arena-based hierarchy.
#[derive(Debug)]
pub struct ArenaNode {
    pub data: NodeData,
    /// Index of parent node in the arena, None for the root
    pub parent: Option<Index>,
    /// Indices of child nodes, in insertion order
    pub children: Vec<Index>,
}

/// Arena-based tree holding one work item hierarchy.
///
/// Nodes are addressed by generational index, so building and padding never
/// need back-pointers beyond the parent index.
#[derive(Debug)]
pub struct TreeArena {
    arena: Arena<ArenaNode>,
    root: Option<Index>,
}

impl Default for TreeArena {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeArena {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            root: None,
        }
    }

    /// Insert a node under `parent`, or as root when `parent` is None.
    #[instrument(level = "trace", skip(self))]
    pub fn insert_node(&mut self, data: NodeData, parent: Option<Index>) -> Index {
        let node = ArenaNode {
            data,
            parent,
            children: Vec::new(),
        };
        let node_idx = self.arena.insert(node);

        if let Some(parent_idx) = parent {
            if let Some(parent) = self.arena.get_mut(parent_idx) {
                parent.children.push(node_idx);
            }
        } else {
            self.root = Some(node_idx);
        }

        node_idx
    }

    pub fn get_node(&self, idx: Index) -> Option<&ArenaNode> {
        self.arena.get(idx)
    }

    pub fn root(&self) -> Option<Index> {
        self.root
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Pre-order, left-to-right traversal.
    pub fn iter(&self) -> TreeIterator<'_> {
        TreeIterator::new(self)
    }

    pub fn iter_postorder(&self) -> PostOrderIterator<'_> {
        PostOrderIterator::new(self)
    }

    /// Indices of all nodes without children, in pre-order.
    pub fn leaves(&self) -> Vec<Index> {
        self.iter()
            .filter(|(_, node)| node.children.is_empty())
            .map(|(idx, _)| idx)
            .collect()
    }

    /// External ids in pre-order.
    pub fn external_ids(&self) -> Vec<&str> {
        self.iter()
            .map(|(_, node)| node.data.external_id.as_str())
            .collect()
    }

    /// Materialize the arena into an owned, nested `TreeNode`.
    ///
    /// Walks post-order so every child is complete before its parent claims it,
    /// keeping the conversion free of recursion.
    #[instrument(level = "debug", skip(self))]
    pub fn to_tree_node(&self) -> Option<TreeNode> {
        let root = self.root?;
        let mut built: HashMap<Index, TreeNode> = HashMap::with_capacity(self.len());

        for (idx, node) in self.iter_postorder() {
            let parent_id = node
                .parent
                .and_then(|p| self.get_node(p))
                .map(|p| p.data.external_id.clone());
            let children = node
                .children
                .iter()
                .filter_map(|child| built.remove(child))
                .collect();
            built.insert(
                idx,
                TreeNode {
                    external_id: node.data.external_id.clone(),
                    parent_id,
                    level: node.data.level,
                    children,
                    is_placeholder: node.data.placeholder,
                },
            );
        }

        built.remove(&root)
    }
}

pub struct TreeIterator<'a> {
    arena: &'a TreeArena,
    stack: Vec<Index>,
}

impl<'a> TreeIterator<'a> {
    fn new(arena: &'a TreeArena) -> Self {
        let mut stack = Vec::new();
        if let Some(root) = arena.root() {
            stack.push(root);
        }
        Self { arena, stack }
    }
}

impl<'a> Iterator for TreeIterator<'a> {
    type Item = (Index, &'a ArenaNode);

    fn next(&mut self) -> Option<Self::Item> {
        let current_idx = self.stack.pop()?;
        let node = self.arena.get_node(current_idx)?;
        // Push children in reverse order for left-to-right traversal
        self.stack.extend(node.children.iter().rev());
        Some((current_idx, node))
    }
}

pub struct PostOrderIterator<'a> {
    arena: &'a TreeArena,
    stack: Vec<(Index, bool)>,
}

impl<'a> PostOrderIterator<'a> {
    fn new(arena: &'a TreeArena) -> Self {
        let mut stack = Vec::new();
        if let Some(root) = arena.root() {
            stack.push((root, false));
        }
        Self { arena, stack }
    }
}

impl<'a> Iterator for PostOrderIterator<'a> {
    type Item = (Index, &'a ArenaNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((current_idx, visited)) = self.stack.pop() {
            if let Some(node) = self.arena.get_node(current_idx) {
                if !visited {
                    self.stack.push((current_idx, true));
                    for &child in node.children.iter().rev() {
                        self.stack.push((child, false));
                    }
                } else {
                    return Some((current_idx, node));
                }
            }
        }
        None
    }
}
