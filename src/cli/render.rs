//! Tree rendering for terminal display.

use colored::Colorize;
use termtree::Tree;

use crate::domain::TreeNode;

pub trait TreeRender {
    fn to_tree_string(&self) -> Tree<String>;
}

impl TreeRender for TreeNode {
    fn to_tree_string(&self) -> Tree<String> {
        let label = if self.is_placeholder {
            self.external_id.dimmed().to_string()
        } else {
            self.external_id.clone()
        };

        let leaves: Vec<_> = self.children.iter().map(|c| c.to_tree_string()).collect();

        Tree::new(label).with_leaves(leaves)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{build_work_paths, WorkItem};

    #[test]
    fn given_forest_when_rendering_then_lists_every_node() {
        colored::control::set_override(false);
        let items = vec![
            WorkItem::new("A", &["B", "C"]),
            WorkItem::new("B", &["D"]),
            WorkItem::new("C", &[]),
            WorkItem::new("D", &[]),
        ];

        let rendered = build_work_paths(&items)[0].to_tree_string().to_string();

        for id in ["A", "B", "C", "D", "PC-L2"] {
            assert!(rendered.contains(id), "missing {} in\n{}", id, rendered);
        }
        assert!(rendered.starts_with("A\n"));
    }
}
