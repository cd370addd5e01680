//! Domain entities: core data structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind of work item, normalized across trackers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkItemType {
    #[default]
    Epic,
    Feature,
    Story,
    Issue,
    Task,
    Bug,
}

/// Workflow state, normalized across trackers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkItemState {
    #[default]
    Backlog,
    InProgress,
    Completed,
    Removed,
}

/// A unit of work from the tracker, with identity and child links.
///
/// Only `id` and `child_ids` drive the hierarchy. `parent_id` is carried for
/// display and never consulted when building trees.
///
/// On the wire the links are `parent` and `children`, as read by the node-map
/// client; `parentId` and `childIds` are accepted on input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WorkItem {
    pub id: String,
    #[serde(rename = "parent", alias = "parentId")]
    pub parent_id: Option<String>,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: WorkItemType,
    pub remote_ref: Option<String>,
    pub state: WorkItemState,
    #[serde(rename = "children", alias = "childIds", deserialize_with = "null_as_empty")]
    pub child_ids: Vec<String>,
    pub iteration: String,
}

impl WorkItem {
    /// Bare item with the given children; convenient for hierarchy-only callers.
    pub fn new(id: impl Into<String>, child_ids: &[&str]) -> Self {
        Self {
            id: id.into(),
            child_ids: child_ids.iter().map(|c| c.to_string()).collect(),
            ..Self::default()
        }
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

/// A planned iteration (sprint).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Iteration {
    pub name: String,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

/// Output hierarchy node, real or placeholder.
///
/// Serializes to the shape the node-map client reads: `externalId`, `parentId`,
/// `level`, `children`. `isPlaceholder` only appears on padding nodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeNode {
    pub external_id: String,
    pub parent_id: Option<String>,
    pub level: usize,
    pub children: Vec<TreeNode>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_placeholder: bool,
}

fn is_false(b: &bool) -> bool {
    !*b
}

impl TreeNode {
    /// Number of nodes in this subtree, placeholders included.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(TreeNode::node_count).sum::<usize>()
    }

    /// Leaves of this subtree in left-to-right order.
    pub fn leaves(&self) -> Vec<&TreeNode> {
        let mut leaves = Vec::new();
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            if node.children.is_empty() {
                leaves.push(node);
            } else {
                stack.extend(node.children.iter().rev());
            }
        }
        leaves
    }
}

/// Flat items together with their normalized hierarchy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkItemResults {
    pub work_items: Vec<WorkItem>,
    pub work_paths: Vec<TreeNode>,
}
