use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result, anyhow};
use camino::{Utf8Path, Utf8PathBuf};
use tracing::info;

use crate::cli::{Cli, Command, ExportArgs};
use crate::scaffold::Scaffolder;
use crate::tree::Tree;
use crate::{layout, report};

const EXPORT_DEFAULT: &str = "layout.toml";

pub fn run(cli: Cli) -> Result<()> {
    match &cli.command {
        None | Some(Command::Apply) => handle_apply(&cli),
        Some(Command::Show) => handle_show(&cli),
        Some(Command::Layouts) => handle_layouts(),
        Some(Command::Export(args)) => handle_export(&cli, args),
    }
}

fn handle_apply(cli: &Cli) -> Result<()> {
    print!("{}", apply_output(cli)?);
    Ok(())
}

/// Scaffold per `cli` and return the text destined for stdout.
fn apply_output(cli: &Cli) -> Result<String> {
    let root = resolve_root(cli.chdir.as_deref())?;
    let tree = load_tree(cli)?;

    let started = Instant::now();
    let outcome = Scaffolder::new(root)
        .dry_run(cli.dry_run)
        .run(&tree, &cli.main_folder)?;
    let counts = report::counts(&outcome.decisions);
    info!(
        created = counts.created,
        existing = counts.existed,
        dry_run = cli.dry_run,
        elapsed = ?started.elapsed(),
        "scaffold finished"
    );

    report::render_output(&outcome, cli.json)
}

fn handle_show(cli: &Cli) -> Result<()> {
    let tree = load_tree(cli)?;
    print!("{}", tree.render());
    Ok(())
}

fn handle_layouts() -> Result<()> {
    for name in layout::available() {
        let marker = if name == layout::DEFAULT_LAYOUT {
            " (default)"
        } else {
            ""
        };
        println!("{name}{marker}");
    }
    Ok(())
}

fn handle_export(cli: &Cli, args: &ExportArgs) -> Result<()> {
    let base = resolve_root(cli.chdir.as_deref())?;
    let target = match &args.path {
        Some(path) => base.join(utf8(path)?),
        None => base.join(EXPORT_DEFAULT),
    };
    layout::export(cli.layout_name(), &target, args.force)?;
    println!("Wrote layout `{}` to {}", cli.layout_name(), target);
    Ok(())
}

fn load_tree(cli: &Cli) -> Result<Tree> {
    match &cli.file {
        Some(path) => {
            let path = utf8(path)?;
            info!(path = %path, "loading layout file");
            layout::load(path)
        }
        None => {
            info!(layout = cli.layout_name(), "using built-in layout");
            layout::builtin(cli.layout_name())
        }
    }
}

/// The scaffold root: `--chdir` resolved against the current directory, or
/// the current directory itself.
fn resolve_root(chdir: Option<&Path>) -> Result<Utf8PathBuf> {
    let cwd = std::env::current_dir().context("determining current directory")?;
    let root = match chdir {
        Some(dir) => cwd.join(dir),
        None => cwd,
    };
    Utf8PathBuf::from_path_buf(root).map_err(|p| anyhow!("path {} is not valid UTF-8", p.display()))
}

fn utf8(path: &Path) -> Result<&Utf8Path> {
    Utf8Path::from_path(path).ok_or_else(|| anyhow!("path {} is not valid UTF-8", path.display()))
}
