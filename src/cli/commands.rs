//! Command dispatch

use std::io;
use std::path::{Path, PathBuf};

use clap::CommandFactory;
use clap_complete::generate;
use serde::Serialize;
use tracing::{debug, instrument};

use crate::cli::args::{Cli, Commands, ConfigCommands, InputArgs};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::cli::render::TreeRender;
use crate::config::{global_config_path, local_config_path, OutputFormat, Settings};
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::InfraError;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    if let Some(dir) = &cli.config_dir {
        if !dir.is_dir() {
            return Err(CliError::InvalidArgs(format!(
                "not a directory: {}",
                dir.display()
            )));
        }
    }
    let config_dir = cli
        .config_dir
        .clone()
        .or_else(|| std::env::current_dir().ok());
    let mut settings = Settings::load(config_dir.as_deref())?;

    match &cli.command {
        Some(Commands::Tree {
            input,
            format,
            no_pad,
        }) => {
            if *no_pad {
                settings.pad_trees = false;
            }
            let format = format.unwrap_or(settings.format);
            cmd_tree(&ServiceContainer::new(settings), input, format)
        }
        Some(Commands::Roots { input }) => cmd_roots(&ServiceContainer::new(settings), input),
        Some(Commands::Depth { input }) => cmd_depth(&ServiceContainer::new(settings), input),
        Some(Commands::Results { input }) => cmd_results(&ServiceContainer::new(settings), input),
        Some(Commands::Config { command }) => cmd_config(&settings, config_dir.as_deref(), command),
        Some(Commands::Completion { shell }) => {
            let mut cmd = Cli::command();
            generate(*shell, &mut cmd, "workpaths", &mut io::stdout());
            Ok(())
        }
        None => Ok(()),
    }
}

/// Input file from the command line, falling back to the configured default.
fn resolve_input(container: &ServiceContainer, input: &InputArgs) -> CliResult<PathBuf> {
    input
        .file
        .clone()
        .or_else(|| container.settings.input.clone())
        .ok_or_else(|| CliError::Usage("no items file given and no `input` configured".into()))
}

fn to_json<T: Serialize>(value: &T, pretty: bool) -> CliResult<String> {
    let json = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    json.map_err(|e| InfraError::serialize("encode output", e).into())
}

#[instrument(skip(container))]
fn cmd_tree(container: &ServiceContainer, input: &InputArgs, format: OutputFormat) -> CliResult<()> {
    let path = resolve_input(container, input)?;
    let source = container.source(&path, input.raw);
    let forest = container.hierarchy.forest(source.as_ref())?;
    debug!("rendering {} trees as {:?}", forest.len(), format);

    match format {
        OutputFormat::Json => output::info(&to_json(&forest, container.settings.pretty)?),
        OutputFormat::Tree => {
            if forest.is_empty() {
                output::warning("no work items found");
            }
            for tree in &forest {
                output::info(&tree.to_tree_string());
            }
        }
    }
    Ok(())
}

#[instrument(skip(container))]
fn cmd_roots(container: &ServiceContainer, input: &InputArgs) -> CliResult<()> {
    let path = resolve_input(container, input)?;
    let source = container.source(&path, input.raw);
    for root in container.hierarchy.roots(source.as_ref())? {
        output::info(&root);
    }
    Ok(())
}

#[instrument(skip(container))]
fn cmd_depth(container: &ServiceContainer, input: &InputArgs) -> CliResult<()> {
    let path = resolve_input(container, input)?;
    let source = container.source(&path, input.raw);
    let summary = container.hierarchy.summary(source.as_ref())?;

    output::header(&format!("{} trees", summary.len()));
    for tree in &summary {
        output::action(
            &tree.root,
            &format!(
                "depth {}, {} items, {} placeholders",
                tree.depth, tree.items, tree.placeholders
            ),
        );
    }
    Ok(())
}

#[instrument(skip(container))]
fn cmd_results(container: &ServiceContainer, input: &InputArgs) -> CliResult<()> {
    let path = resolve_input(container, input)?;
    let source = container.source(&path, input.raw);
    let results = container.hierarchy.results(source.as_ref())?;
    output::info(&to_json(&results, container.settings.pretty)?);
    Ok(())
}

fn cmd_config(settings: &Settings, config_dir: Option<&Path>, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => output::info(&settings.to_toml()?),
        ConfigCommands::Path => {
            let paths = [
                global_config_path().map(|p| ("global", p)),
                config_dir.map(|d| ("local", local_config_path(d))),
            ];
            for (label, path) in paths.into_iter().flatten() {
                let state = if path.exists() { "" } else { " (missing)" };
                output::action(label, &format!("{}{}", path.display(), state));
            }
        }
        ConfigCommands::Template => output::info(&Settings::template()),
    }
    Ok(())
}

