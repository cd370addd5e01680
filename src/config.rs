//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/workpaths/workpaths.toml`
//! 3. Local config: `<dir>/.workpaths.toml`
//! 4. Environment variables: `WORKPATHS_*` prefix

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;
use crate::domain::{WorkItemState, WorkItemType};

/// How the forest is printed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Indented tree
    #[default]
    Tree,
    /// JSON, the shape served to the node-map client
    Json,
}

/// Tracker vocabulary overrides, layered over the built-in mapping.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct MappingConfig {
    /// Tracker type name → work item type
    pub types: BTreeMap<String, WorkItemType>,
    /// Tracker state name → work item state
    pub states: BTreeMap<String, WorkItemState>,
}

impl MappingConfig {
    /// Key-wise merge: overlay entries replace base entries with the same key.
    pub fn merge(&self, overlay: &MappingConfig) -> Self {
        let mut merged = self.clone();
        merged.types.extend(overlay.types.clone());
        merged.states.extend(overlay.states.clone());
        merged
    }
}

/// Raw settings for intermediate parsing (`None` → not specified, inherit).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub input: Option<PathBuf>,
    pub format: Option<OutputFormat>,
    pub pretty: Option<bool>,
    pub pad_trees: Option<bool>,
    pub organization: Option<String>,
    pub project: Option<String>,
    pub mapping: MappingConfig,
}

/// Unified configuration for workpaths.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Default items file when none is given on the command line
    pub input: Option<PathBuf>,
    /// Output format for the forest
    pub format: OutputFormat,
    /// Pretty-print JSON output
    pub pretty: bool,
    /// Pad short branches with placeholders
    pub pad_trees: bool,
    /// Tracker organization (used for remote links)
    pub organization: String,
    /// Tracker project (fallback for remote links)
    pub project: String,
    /// Tracker vocabulary overrides
    pub mapping: MappingConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            input: None,
            format: OutputFormat::default(),
            pretty: true,
            pad_trees: true,
            organization: String::new(),
            project: String::new(),
            mapping: MappingConfig::default(),
        }
    }
}

/// Get the XDG config directory for workpaths.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "workpaths").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("workpaths.toml"))
}

/// Get the path to the local config file in a directory.
pub fn local_config_path(dir: &Path) -> PathBuf {
    dir.join(".workpaths.toml")
}

/// Expand `~`, `$VAR` and `${VAR}` in a path-like string.
pub fn expand_env_vars(path: &str) -> String {
    shellexpand::full(path)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| path.to_string())
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    /// Overlay raw settings: scalars replace when specified, mappings merge key-wise.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            input: overlay.input.clone().or_else(|| self.input.clone()),
            format: overlay.format.unwrap_or(self.format),
            pretty: overlay.pretty.unwrap_or(self.pretty),
            pad_trees: overlay.pad_trees.unwrap_or(self.pad_trees),
            organization: overlay
                .organization
                .clone()
                .unwrap_or_else(|| self.organization.clone()),
            project: overlay
                .project
                .clone()
                .unwrap_or_else(|| self.project.clone()),
            mapping: self.mapping.merge(&overlay.mapping),
        }
    }

    fn expand_paths(&mut self) {
        if let Some(input) = &self.input {
            self.input = Some(PathBuf::from(expand_env_vars(
                input.to_string_lossy().as_ref(),
            )));
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `local_dir` - Optional directory holding a `.workpaths.toml`
    pub fn load(local_dir: Option<&Path>) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                let raw = load_raw_settings(&global_path)?;
                current = current.merge_with(&raw);
            }
        }

        if let Some(dir) = local_dir {
            let local_path = local_config_path(dir);
            if local_path.exists() {
                let raw = load_raw_settings(&local_path)?;
                current = current.merge_with(&raw);
            }
        }

        current = Self::apply_env_overrides(current)?;
        current.expand_paths();

        Ok(current)
    }

    /// Apply WORKPATHS_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(Environment::with_prefix("WORKPATHS").separator("__"))
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("input") {
            settings.input = Some(PathBuf::from(val));
        }
        if let Ok(val) = config.get::<OutputFormat>("format") {
            settings.format = val;
        }
        if let Ok(val) = config.get_bool("pretty") {
            settings.pretty = val;
        }
        if let Ok(val) = config.get_bool("pad_trees") {
            settings.pad_trees = val;
        }
        if let Ok(val) = config.get_string("organization") {
            settings.organization = val;
        }
        if let Ok(val) = config.get_string("project") {
            settings.project = val;
        }

        Ok(settings)
    }

    /// Serialize settings to TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize settings: {}", e),
        })
    }

    /// Annotated config template.
    pub fn template() -> String {
        r#"# workpaths configuration
# Global: ~/.config/workpaths/workpaths.toml
# Local:  <dir>/.workpaths.toml

# Default items file
# input = "~/exports/sprint.json"

# Output format: "tree" or "json"
format = "tree"

# Pretty-print JSON output
pretty = true

# Pad short branches with placeholder nodes
pad_trees = true

# Tracker coordinates for remote links
organization = ""
project = ""

# Tracker vocabulary overrides (merged over the built-in table)
[mapping.types]
# "Product Backlog Item" = "STORY"

[mapping.states]
# "Committed" = "IN_PROGRESS"
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
