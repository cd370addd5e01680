//! Hierarchy service
//!
//! Fetches items from a source and turns them into normalized work paths.

use std::sync::Arc;

use itertools::Itertools;
use tracing::{debug, info, warn};

use crate::application::ApplicationResult;
use crate::config::Settings;
use crate::domain::{max_depth, pad_tree, HierarchyBuilder, TreeNode, WorkItem, WorkItemResults};
use crate::infrastructure::traits::WorkItemSource;

/// Shape of one built tree, measured before padding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForestSummary {
    pub root: String,
    pub depth: usize,
    pub items: usize,
    pub placeholders: usize,
}

/// Service for rebuilding work item hierarchies.
pub struct HierarchyService {
    settings: Arc<Settings>,
}

impl HierarchyService {
    pub fn new(settings: Arc<Settings>) -> Self {
        Self { settings }
    }

    /// Items plus their hierarchy, as served to the node-map client.
    pub fn results(&self, source: &dyn WorkItemSource) -> ApplicationResult<WorkItemResults> {
        let work_items = source.fetch()?;
        let work_paths = self.assemble(&work_items).into_iter().map(|(node, _)| node).collect();
        Ok(WorkItemResults {
            work_items,
            work_paths,
        })
    }

    /// One tree per root, padded unless `pad_trees` is off.
    pub fn forest(&self, source: &dyn WorkItemSource) -> ApplicationResult<Vec<TreeNode>> {
        let items = source.fetch()?;
        Ok(self.assemble(&items).into_iter().map(|(node, _)| node).collect())
    }

    /// Root ids in input order.
    pub fn roots(&self, source: &dyn WorkItemSource) -> ApplicationResult<Vec<String>> {
        let items = source.fetch()?;
        let builder = HierarchyBuilder::new(&items);
        Ok(builder.roots().into_iter().map(String::from).collect())
    }

    /// Per-tree depth and size.
    pub fn summary(&self, source: &dyn WorkItemSource) -> ApplicationResult<Vec<ForestSummary>> {
        let items = source.fetch()?;
        Ok(self
            .assemble(&items)
            .into_iter()
            .map(|(node, depth)| {
                let total = node.node_count();
                let placeholders = count_placeholders(&node);
                ForestSummary {
                    root: node.external_id,
                    depth,
                    items: total - placeholders,
                    placeholders,
                }
            })
            .collect())
    }

    /// Build every tree and pair it with its pre-padding depth.
    fn assemble(&self, items: &[WorkItem]) -> Vec<(TreeNode, usize)> {
        if items.is_empty() {
            debug!("no items, empty forest");
            return Vec::new();
        }

        let mut builder = HierarchyBuilder::new(items);
        let trees = builder.build_forest();
        info!("built {} trees from {} items", trees.len(), items.len());

        let unplaced = builder.unplaced();
        if !unplaced.is_empty() {
            warn!(
                "{} items not reachable from any root: {}",
                unplaced.len(),
                unplaced.iter().join(", ")
            );
        }

        trees
            .into_iter()
            .filter_map(|mut tree| {
                let depth = max_depth(&tree);
                if self.settings.pad_trees {
                    pad_tree(&mut tree, depth);
                }
                tree.to_tree_node().map(|node| (node, depth))
            })
            .collect()
    }
}

fn count_placeholders(node: &TreeNode) -> usize {
    let own = usize::from(node.is_placeholder);
    own + node.children.iter().map(count_placeholders).sum::<usize>()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ApplicationError;

    struct StaticSource(Vec<WorkItem>);

    impl WorkItemSource for StaticSource {
        fn fetch(&self) -> ApplicationResult<Vec<WorkItem>> {
            Ok(self.0.clone())
        }
    }

    struct FailingSource;

    impl WorkItemSource for FailingSource {
        fn fetch(&self) -> ApplicationResult<Vec<WorkItem>> {
            Err(ApplicationError::OperationFailed {
                context: "fetch".into(),
                source: Box::new(std::io::Error::new(std::io::ErrorKind::Other, "upstream unavailable")),
            })
        }
    }

    fn sample() -> StaticSource {
        StaticSource(vec![
            WorkItem::new("A", &["B", "C"]),
            WorkItem::new("B", &["D"]),
            WorkItem::new("C", &[]),
            WorkItem::new("D", &[]),
            WorkItem::new("E", &[]),
        ])
    }

    fn service(pad_trees: bool) -> HierarchyService {
        HierarchyService::new(Arc::new(Settings {
            pad_trees,
            ..Settings::default()
        }))
    }

    #[test]
    fn given_items_when_building_results_then_pairs_items_with_paths() {
        let results = service(true).results(&sample()).unwrap();

        assert_eq!(results.work_items.len(), 5);
        assert_eq!(results.work_paths.len(), 2);
        assert_eq!(results.work_paths[0].external_id, "A");
        assert_eq!(results.work_paths[1].external_id, "E");
    }

    #[test]
    fn given_padding_disabled_when_building_forest_then_no_placeholders() {
        let forest = service(false).forest(&sample()).unwrap();

        assert_eq!(count_placeholders(&forest[0]), 0);
        assert!(forest[0].children[1].children.is_empty());
    }

    #[test]
    fn given_items_when_summarizing_then_reports_depth_and_sizes() {
        let summary = service(true).summary(&sample()).unwrap();

        assert_eq!(
            summary[0],
            ForestSummary {
                root: "A".into(),
                depth: 2,
                items: 4,
                placeholders: 1,
            }
        );
        assert_eq!(summary[1].depth, 0);
    }

    #[test]
    fn given_items_when_listing_roots_then_returns_input_order() {
        assert_eq!(service(true).roots(&sample()).unwrap(), vec!["A", "E"]);
    }

    #[test]
    fn given_empty_source_when_building_results_then_empty() {
        let results = service(true).results(&StaticSource(vec![])).unwrap();
        assert_eq!(results, WorkItemResults::default());
    }

    #[test]
    fn given_failing_source_when_building_forest_then_propagates_error() {
        let result = service(true).forest(&FailingSource);
        assert!(matches!(result, Err(ApplicationError::OperationFailed { .. })));
    }
}
