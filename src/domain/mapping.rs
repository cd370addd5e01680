//! Tracker record mapping: raw tracker work items into domain `WorkItem`s.
//!
//! Records follow the Azure DevOps work item shape: a numeric `id`, a `fields`
//! object keyed by reference name, and `relations` whose attribute name marks
//! `Parent` / `Child` links.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::domain::entities::{WorkItem, WorkItemState, WorkItemType};

static TRAILING_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)\D*$").expect("trailing id pattern"));

/// Raw work item as exported by the tracker.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TrackerRecord {
    pub id: u64,
    pub fields: TrackerFields,
    pub relations: Vec<TrackerRelation>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TrackerFields {
    #[serde(rename = "System.Title")]
    pub title: String,
    #[serde(rename = "System.WorkItemType")]
    pub work_item_type: String,
    #[serde(rename = "System.State")]
    pub state: String,
    #[serde(rename = "System.TeamProject")]
    pub team_project: Option<String>,
    #[serde(rename = "System.IterationPath")]
    pub iteration_path: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TrackerRelation {
    pub rel: String,
    pub url: String,
    pub attributes: RelationAttributes,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RelationAttributes {
    pub name: String,
}

/// Tracker vocabulary for types and states, with configurable overrides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackerMapping {
    pub types: BTreeMap<String, WorkItemType>,
    pub states: BTreeMap<String, WorkItemState>,
}

impl Default for TrackerMapping {
    fn default() -> Self {
        let types = [
            ("Feature", WorkItemType::Feature),
            ("User Story", WorkItemType::Story),
            ("Issue", WorkItemType::Issue),
            ("Task", WorkItemType::Task),
            ("Bug", WorkItemType::Bug),
        ];
        let states = [
            ("Active", WorkItemState::InProgress),
            ("Resolved", WorkItemState::Completed),
            ("Closed", WorkItemState::Completed),
            ("Removed", WorkItemState::Removed),
        ];
        Self {
            types: types.into_iter().map(|(k, v)| (k.to_string(), v)).collect(),
            states: states.into_iter().map(|(k, v)| (k.to_string(), v)).collect(),
        }
    }
}

impl TrackerMapping {
    /// Overlay entries on top of this mapping; overlay keys win.
    pub fn merge(&self, types: &BTreeMap<String, WorkItemType>, states: &BTreeMap<String, WorkItemState>) -> Self {
        let mut merged = self.clone();
        merged.types.extend(types.iter().map(|(k, v)| (k.clone(), *v)));
        merged.states.extend(states.iter().map(|(k, v)| (k.clone(), *v)));
        merged
    }

    /// Unlisted tracker types, the empty type included, map to `Epic`.
    pub fn work_item_type(&self, tracker_type: &str) -> WorkItemType {
        self.types.get(tracker_type).copied().unwrap_or(WorkItemType::Epic)
    }

    /// Unlisted tracker states map to `Backlog`.
    pub fn state(&self, tracker_state: &str) -> WorkItemState {
        self.states.get(tracker_state).copied().unwrap_or(WorkItemState::Backlog)
    }

    /// Convert a tracker record into a domain item.
    ///
    /// `project` is used for the remote link when the record has no team project.
    pub fn to_work_item(
        &self,
        record: &TrackerRecord,
        organization: &str,
        project: &str,
    ) -> WorkItem {
        let id = record.id.to_string();
        let team_project = record.fields.team_project.as_deref().unwrap_or(project);
        WorkItem {
            parent_id: related_ids(&record.relations, "Parent").pop(),
            name: record.fields.title.clone(),
            kind: self.work_item_type(&record.fields.work_item_type),
            remote_ref: Some(remote_ref(organization, team_project, &id)),
            state: self.state(&record.fields.state),
            child_ids: related_ids(&record.relations, "Child"),
            iteration: iteration_name(&record.fields.iteration_path),
            id,
        }
    }
}

/// Work item id at the end of a relation URL: the last run of digits.
pub fn extract_work_item_id(url: &str) -> Option<String> {
    TRAILING_ID
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Ids of relations named `name` (case-insensitive), in relation order.
pub fn related_ids(relations: &[TrackerRelation], name: &str) -> Vec<String> {
    relations
        .iter()
        .filter(|rel| rel.attributes.name.eq_ignore_ascii_case(name))
        .filter_map(|rel| extract_work_item_id(&rel.url))
        .collect()
}

/// Iteration name from an iteration path: the segment after the project.
///
/// `Project\Sprint 3` → `Sprint 3`; a path without `\` yields an empty name.
pub fn iteration_name(path: &str) -> String {
    path.split('\\').nth(1).unwrap_or_default().to_string()
}

/// Direct link to the work item's edit page.
pub fn remote_ref(organization: &str, project: &str, id: &str) -> String {
    format!(
        "https://dev.azure.com/{}/{}/_workitems/edit/{}/",
        organization, project, id
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn relation(name: &str, url: &str) -> TrackerRelation {
        TrackerRelation {
            rel: format!("System.LinkTypes.Hierarchy-{}", name),
            url: url.to_string(),
            attributes: RelationAttributes {
                name: name.to_string(),
            },
        }
    }

    #[rstest]
    #[case("Feature", WorkItemType::Feature)]
    #[case("User Story", WorkItemType::Story)]
    #[case("Issue", WorkItemType::Issue)]
    #[case("Task", WorkItemType::Task)]
    #[case("Bug", WorkItemType::Bug)]
    #[case("Epic", WorkItemType::Epic)]
    #[case("Something Else", WorkItemType::Epic)]
    fn test_work_item_type(#[case] input: &str, #[case] expected: WorkItemType) {
        assert_eq!(TrackerMapping::default().work_item_type(input), expected);
    }

    #[rstest]
    #[case("Active", WorkItemState::InProgress)]
    #[case("Resolved", WorkItemState::Completed)]
    #[case("Closed", WorkItemState::Completed)]
    #[case("Removed", WorkItemState::Removed)]
    #[case("New", WorkItemState::Backlog)]
    fn test_state(#[case] input: &str, #[case] expected: WorkItemState) {
        assert_eq!(TrackerMapping::default().state(input), expected);
    }

    #[rstest]
    #[case("https://dev.azure.com/org/_apis/wit/workItems/20124", Some("20124"))]
    #[case("https://dev.azure.com/org2/_apis/wit/workItems/77/", Some("77"))]
    #[case("https://example.com/items/none", None)]
    fn test_extract_work_item_id(#[case] url: &str, #[case] expected: Option<&str>) {
        assert_eq!(extract_work_item_id(url).as_deref(), expected);
    }

    #[rstest]
    #[case("Project\\Sprint 3", "Sprint 3")]
    #[case("Project\\Release 1\\Sprint 2", "Release 1")]
    #[case("Project", "")]
    fn test_iteration_name(#[case] path: &str, #[case] expected: &str) {
        assert_eq!(iteration_name(path), expected);
    }

    #[test]
    fn given_overrides_when_merging_then_overlay_wins() {
        let types = BTreeMap::from([("Epic".to_string(), WorkItemType::Epic), ("Bug".to_string(), WorkItemType::Issue)]);
        let states = BTreeMap::from([("New".to_string(), WorkItemState::InProgress)]);

        let mapping = TrackerMapping::default().merge(&types, &states);

        assert_eq!(mapping.work_item_type("Bug"), WorkItemType::Issue);
        assert_eq!(mapping.work_item_type("Task"), WorkItemType::Task);
        assert_eq!(mapping.state("New"), WorkItemState::InProgress);
    }

    #[test]
    fn given_record_when_mapping_then_resolves_relations_and_fields() {
        let record = TrackerRecord {
            id: 42,
            fields: TrackerFields {
                title: "Develop Front End Framework".into(),
                work_item_type: "User Story".into(),
                state: "Active".into(),
                team_project: Some("Noda".into()),
                iteration_path: "Noda\\Iteration 1".into(),
            },
            relations: vec![
                relation("Parent", "https://dev.azure.com/acme/_apis/wit/workItems/7"),
                relation("Child", "https://dev.azure.com/acme/_apis/wit/workItems/43"),
                relation("child", "https://dev.azure.com/acme/_apis/wit/workItems/44"),
                relation("Related", "https://dev.azure.com/acme/_apis/wit/workItems/99"),
            ],
        };

        let item = TrackerMapping::default()
            .to_work_item(&record, "acme", "Fallback");

        assert_eq!(item.id, "42");
        assert_eq!(item.parent_id.as_deref(), Some("7"));
        assert_eq!(item.child_ids, vec!["43", "44"]);
        assert_eq!(item.kind, WorkItemType::Story);
        assert_eq!(item.state, WorkItemState::InProgress);
        assert_eq!(item.iteration, "Iteration 1");
        assert_eq!(
            item.remote_ref.as_deref(),
            Some("https://dev.azure.com/acme/Noda/_workitems/edit/42/")
        );
    }

    #[test]
    fn given_record_without_type_when_mapping_then_defaults_to_epic() {
        let record = TrackerRecord {
            id: 5,
            ..TrackerRecord::default()
        };

        let item = TrackerMapping::default().to_work_item(&record, "acme", "Noda");

        assert_eq!(item.id, "5");
        assert_eq!(item.kind, WorkItemType::Epic);
        assert_eq!(item.state, WorkItemState::Backlog);
    }
}
