//! File-backed item sources.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Deserialize;
use tracing::{debug, instrument};

use crate::application::{ApplicationError, ApplicationResult, ResultExt};
use crate::domain::{TrackerMapping, TrackerRecord, WorkItem};
use crate::infrastructure::traits::{FileSystem, WorkItemSource};

fn read_input(fs: &dyn FileSystem, path: &Path) -> ApplicationResult<String> {
    if !fs.is_file(path) {
        return Err(ApplicationError::OperationFailed {
            context: format!("input not found: {}", path.display()),
            source: Box::new(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "file does not exist",
            )),
        });
    }
    fs.read_to_string(path).with_path_context("read items", path)
}

/// JSON array of `WorkItem`s with relations already resolved.
pub struct JsonItemSource {
    fs: Arc<dyn FileSystem>,
    path: PathBuf,
}

impl JsonItemSource {
    pub fn new(fs: Arc<dyn FileSystem>, path: impl Into<PathBuf>) -> Self {
        Self {
            fs,
            path: path.into(),
        }
    }
}

impl WorkItemSource for JsonItemSource {
    #[instrument(level = "debug", skip(self), fields(path = %self.path.display()))]
    fn fetch(&self) -> ApplicationResult<Vec<WorkItem>> {
        let content = read_input(self.fs.as_ref(), &self.path)?;
        let items: Vec<WorkItem> =
            serde_json::from_str(&content).with_path_context("parse items", &self.path)?;
        debug!("loaded {} items", items.len());
        Ok(items)
    }
}

/// Tracker export: either `{"value": [...]}` as returned by the work items
/// endpoint, or a bare array of records.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TrackerExport {
    Envelope { value: Vec<TrackerRecord> },
    Records(Vec<TrackerRecord>),
}

impl TrackerExport {
    fn into_records(self) -> Vec<TrackerRecord> {
        match self {
            TrackerExport::Envelope { value } => value,
            TrackerExport::Records(records) => records,
        }
    }
}

/// Raw tracker export mapped through a `TrackerMapping`.
pub struct TrackerExportSource {
    fs: Arc<dyn FileSystem>,
    path: PathBuf,
    mapping: TrackerMapping,
    organization: String,
    project: String,
}

impl TrackerExportSource {
    pub fn new(
        fs: Arc<dyn FileSystem>,
        path: impl Into<PathBuf>,
        mapping: TrackerMapping,
        organization: impl Into<String>,
        project: impl Into<String>,
    ) -> Self {
        Self {
            fs,
            path: path.into(),
            mapping,
            organization: organization.into(),
            project: project.into(),
        }
    }
}

impl WorkItemSource for TrackerExportSource {
    #[instrument(level = "debug", skip(self), fields(path = %self.path.display()))]
    fn fetch(&self) -> ApplicationResult<Vec<WorkItem>> {
        let content = read_input(self.fs.as_ref(), &self.path)?;
        let export: TrackerExport =
            serde_json::from_str(&content).with_path_context("parse tracker export", &self.path)?;

        let items: Vec<WorkItem> = export
            .into_records()
            .iter()
            .map(|record| self.mapping.to_work_item(record, &self.organization, &self.project))
            .collect();
        debug!("mapped {} tracker records", items.len());
        Ok(items)
    }
}
