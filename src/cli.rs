use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::layout::DEFAULT_LAYOUT;

/// Top-level CLI definition. With no subcommand the layout is applied.
#[derive(Parser, Debug)]
#[command(name = "skelly", version, about = "Create missing folders and placeholder files")]
pub struct Cli {
    /// Scaffold root; defaults to the current directory.
    #[arg(short = 'C', long = "chdir", global = true)]
    pub chdir: Option<PathBuf>,
    /// Custom layout file (TOML) used instead of a built-in layout.
    #[arg(short = 'f', long = "file", global = true, conflicts_with = "layout")]
    pub file: Option<PathBuf>,
    /// Built-in layout name.
    #[arg(short = 'l', long = "layout", global = true)]
    pub layout: Option<String>,
    /// Folder whose prior existence marks an incremental scaffold.
    #[arg(short = 'm', long = "main", default_value = "lib", global = true)]
    pub main_folder: String,
    #[arg(short = 'n', long = "dry-run", global = true)]
    pub dry_run: bool,
    /// Print the report as JSON.
    #[arg(long = "json", global = true)]
    pub json: bool,
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Cli {
    pub fn layout_name(&self) -> &str {
        self.layout.as_deref().unwrap_or(DEFAULT_LAYOUT)
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create whatever the layout describes that is missing (default).
    Apply,
    /// Print the selected layout as an indented tree.
    Show,
    /// List built-in layouts.
    Layouts,
    /// Write a built-in layout to a TOML file for customisation.
    Export(ExportArgs),
}

#[derive(Args, Debug)]
pub struct ExportArgs {
    #[arg()]
    pub path: Option<PathBuf>,
    #[arg(long = "force", default_value_t = false)]
    pub force: bool,
}

/// Helper entry point so `main` can stay minimal.
pub fn parse() -> Cli {
    Cli::parse()
}
