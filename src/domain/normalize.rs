//! Depth normalization: pad short branches so all leaves share the deepest level.

use tracing::{debug, instrument};

use crate::domain::arena::{NodeData, TreeArena};

/// Identifier of the placeholder at `level` in the chain hanging from `anchor`.
pub fn placeholder_id(anchor: &str, level: usize) -> String {
    format!("P{}-L{}", anchor, level)
}

/// Deepest level found in the tree; 0 for an empty tree.
pub fn max_depth(tree: &TreeArena) -> usize {
    tree.iter()
        .map(|(_, node)| node.data.level)
        .max()
        .unwrap_or(0)
}

/// Extend every leaf above `target` with a chain of placeholders down to `target`.
///
/// Leaves are collected before anything is inserted, so freshly added
/// placeholders are never revisited. Returns the number of placeholders added.
#[instrument(level = "debug", skip(tree))]
pub fn pad_tree(tree: &mut TreeArena, target: usize) -> usize {
    let short_leaves: Vec<_> = tree
        .leaves()
        .into_iter()
        .filter_map(|idx| {
            let node = tree.get_node(idx)?;
            (node.data.level < target).then(|| (idx, node.data.external_id.clone(), node.data.level))
        })
        .collect();

    let mut added = 0;
    for (leaf_idx, anchor, leaf_level) in short_leaves {
        let mut parent = leaf_idx;
        for level in leaf_level + 1..=target {
            parent = tree.insert_node(
                NodeData::placeholder(placeholder_id(&anchor, level), level),
                Some(parent),
            );
            added += 1;
        }
    }

    debug!("padded tree to level {} with {} placeholders", target, added);
    added
}

/// Pad the tree to its own maximum depth and return that depth.
pub fn normalize(tree: &mut TreeArena) -> usize {
    let depth = max_depth(tree);
    pad_tree(tree, depth);
    depth
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uneven() -> TreeArena {
        // A -> (B -> D), C
        let mut tree = TreeArena::new();
        let a = tree.insert_node(NodeData::item("A", 0), None);
        let b = tree.insert_node(NodeData::item("B", 1), Some(a));
        tree.insert_node(NodeData::item("C", 1), Some(a));
        tree.insert_node(NodeData::item("D", 2), Some(b));
        tree
    }

    fn leaf_levels(tree: &TreeArena) -> Vec<usize> {
        tree.leaves()
            .into_iter()
            .filter_map(|idx| tree.get_node(idx))
            .map(|n| n.data.level)
            .collect()
    }

    #[test]
    fn given_uneven_tree_when_computing_depth_then_returns_deepest_level() {
        assert_eq!(max_depth(&uneven()), 2);
    }

    #[test]
    fn given_empty_tree_when_computing_depth_then_returns_zero() {
        assert_eq!(max_depth(&TreeArena::new()), 0);
    }

    #[test]
    fn given_short_leaf_when_normalizing_then_adds_placeholder_at_max_level() {
        let mut tree = uneven();

        let depth = normalize(&mut tree);

        assert_eq!(depth, 2);
        assert_eq!(tree.external_ids(), vec!["A", "B", "D", "C", "PC-L2"]);
        assert!(leaf_levels(&tree).iter().all(|&l| l == 2));
    }

    #[test]
    fn given_leaf_two_levels_short_when_padding_then_chains_placeholders() {
        let mut tree = TreeArena::new();
        let root = tree.insert_node(NodeData::item("R", 0), None);
        tree.insert_node(NodeData::item("X", 1), Some(root));

        let added = pad_tree(&mut tree, 3);

        assert_eq!(added, 2);
        let node = tree.to_tree_node().unwrap();
        let first = &node.children[0].children[0];
        assert_eq!(first.external_id, "PX-L2");
        assert_eq!(first.parent_id.as_deref(), Some("X"));
        assert!(first.is_placeholder);
        let second = &first.children[0];
        assert_eq!(second.external_id, "PX-L3");
        assert_eq!(second.parent_id.as_deref(), Some("PX-L2"));
        assert_eq!(second.level, 3);
        assert!(second.children.is_empty());
    }

    #[test]
    fn given_normalized_tree_when_normalizing_again_then_nothing_changes() {
        let mut tree = uneven();
        normalize(&mut tree);
        let before = tree.to_tree_node();

        let depth = max_depth(&tree);
        let added = pad_tree(&mut tree, depth);

        assert_eq!(added, 0);
        assert_eq!(tree.to_tree_node(), before);
    }

    #[test]
    fn given_single_node_when_normalizing_then_stays_unpadded() {
        let mut tree = TreeArena::new();
        tree.insert_node(NodeData::item("solo", 0), None);

        assert_eq!(normalize(&mut tree), 0);
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn given_anchor_and_level_when_formatting_then_is_stable() {
        assert_eq!(placeholder_id("C", 2), "PC-L2");
        assert_eq!(placeholder_id("20124", 5), "P20124-L5");
    }
}
