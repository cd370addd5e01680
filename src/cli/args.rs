//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueHint};

use crate::config::OutputFormat;

/// Rebuild work item hierarchies from flat tracker exports and normalize tree depth
#[derive(Parser, Debug)]
#[command(name = "workpaths")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Debug output, repeat for more (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub debug: u8,

    /// Directory holding a local .workpaths.toml (default: cwd)
    #[arg(short = 'C', long, global = true, value_hint = ValueHint::DirPath)]
    pub config_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Input selection shared by the hierarchy commands.
#[derive(clap::Args, Debug, Clone)]
pub struct InputArgs {
    /// Items file (default: `input` from config)
    #[arg(value_hint = ValueHint::FilePath)]
    pub file: Option<PathBuf>,

    /// Read a raw tracker export instead of a plain item list
    #[arg(long)]
    pub raw: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the normalized hierarchy
    Tree {
        #[command(flatten)]
        input: InputArgs,
        /// Output format
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,
        /// Skip placeholder padding
        #[arg(long)]
        no_pad: bool,
    },

    /// List hierarchy roots in input order
    Roots {
        #[command(flatten)]
        input: InputArgs,
    },

    /// Show depth and size of each tree
    Depth {
        #[command(flatten)]
        input: InputArgs,
    },

    /// Print items and hierarchy as JSON
    Results {
        #[command(flatten)]
        input: InputArgs,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show effective settings
    Show,
    /// Show config file locations
    Path,
    /// Print an annotated config template
    Template,
}
