//! Service container for dependency injection
//!
//! Wires up all services with their dependencies.

use std::path::Path;
use std::sync::Arc;

use crate::application::services::HierarchyService;
use crate::config::Settings;
use crate::domain::TrackerMapping;
use crate::infrastructure::sources::{JsonItemSource, TrackerExportSource};
use crate::infrastructure::traits::{FileSystem, RealFileSystem, WorkItemSource};

/// Container holding all application services.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Filesystem abstraction
    pub fs: Arc<dyn FileSystem>,

    pub hierarchy: HierarchyService,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings) -> Self {
        Self::with_deps(settings, Arc::new(RealFileSystem))
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(settings: Settings, fs: Arc<dyn FileSystem>) -> Self {
        let settings = Arc::new(settings);
        let hierarchy = HierarchyService::new(Arc::clone(&settings));

        Self {
            settings,
            fs,
            hierarchy,
        }
    }

    /// Item source for `path`: a tracker export when `raw`, otherwise plain items.
    pub fn source(&self, path: &Path, raw: bool) -> Box<dyn WorkItemSource> {
        if raw {
            let mapping = TrackerMapping::default()
                .merge(&self.settings.mapping.types, &self.settings.mapping.states);
            Box::new(TrackerExportSource::new(
                Arc::clone(&self.fs),
                path,
                mapping,
                self.settings.organization.clone(),
                self.settings.project.clone(),
            ))
        } else {
            Box::new(JsonItemSource::new(Arc::clone(&self.fs), path))
        }
    }
}
