use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use serde::Serialize;
use tracing::debug;

use crate::tree::{Node, Tree, validate_name};
use crate::util::fs::{ensure_dir, touch_new};

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    File,
    Folder,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Created,
    Existed,
    /// Dry run: the entry is missing and would be created.
    WouldCreate,
}

/// One create-or-skip decision taken during traversal.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Decision {
    pub kind: EntryKind,
    pub path: Utf8PathBuf,
    pub outcome: Outcome,
}

/// State of the main folder, judged before traversal starts.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MainStatus {
    Existed,
    Created,
    WouldCreate,
    /// The layout has no top-level directory with this name.
    NotInLayout,
}

/// Result of a full scaffold, including the pre-traversal main folder check.
#[derive(Debug, Serialize)]
pub struct Run {
    pub root: Utf8PathBuf,
    pub decisions: Vec<Decision>,
    pub main_folder: String,
    pub main_status: MainStatus,
}

/// Reconciles a [`Tree`] against the filesystem below `root`.
pub struct Scaffolder {
    root: Utf8PathBuf,
    dry_run: bool,
}

impl Scaffolder {
    pub fn new(root: impl Into<Utf8PathBuf>) -> Self {
        Self {
            root: root.into(),
            dry_run: false,
        }
    }

    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Apply `tree`, reporting whether `<root>/<main_folder>` existed before any change.
    pub fn run(&self, tree: &Tree, main_folder: &str) -> Result<Run> {
        validate_name(main_folder).context("invalid main folder")?;
        let main_status = if !tree.has_dir(main_folder) {
            MainStatus::NotInLayout
        } else if self.root.join(main_folder).exists() {
            MainStatus::Existed
        } else if self.dry_run {
            MainStatus::WouldCreate
        } else {
            MainStatus::Created
        };
        let decisions = self.apply(tree)?;
        Ok(Run {
            root: self.root.clone(),
            decisions,
            main_folder: main_folder.to_owned(),
            main_status,
        })
    }

    pub fn apply(&self, tree: &Tree) -> Result<Vec<Decision>> {
        let mut decisions = Vec::new();
        self.apply_at(&self.root, tree, &mut decisions)?;
        Ok(decisions)
    }

    fn apply_at(&self, base: &Utf8Path, tree: &Tree, out: &mut Vec<Decision>) -> Result<()> {
        for (name, node) in tree.iter() {
            let path = base.join(name);
            match node {
                Node::File => out.push(self.file(path)?),
                Node::DirWithFiles(files) => {
                    out.push(self.folder(path.clone())?);
                    for file in files {
                        out.push(self.file(path.join(file))?);
                    }
                }
                Node::DirWithTree(subtree) => {
                    out.push(self.folder(path.clone())?);
                    self.apply_at(&path, subtree, out)?;
                }
            }
        }
        Ok(())
    }

    fn file(&self, path: Utf8PathBuf) -> Result<Decision> {
        let outcome = if self.dry_run {
            missing_outcome(path.exists())
        } else {
            let created = touch_new(path.as_std_path())
                .with_context(|| format!("creating file {}", path))?;
            applied_outcome(created)
        };
        debug!(path = %path, ?outcome, "file");
        Ok(Decision {
            kind: EntryKind::File,
            path,
            outcome,
        })
    }

    fn folder(&self, path: Utf8PathBuf) -> Result<Decision> {
        let outcome = if self.dry_run {
            missing_outcome(path.exists())
        } else {
            let created = ensure_dir(path.as_std_path())
                .with_context(|| format!("creating directory {}", path))?;
            applied_outcome(created)
        };
        debug!(path = %path, ?outcome, "folder");
        Ok(Decision {
            kind: EntryKind::Folder,
            path,
            outcome,
        })
    }
}

fn applied_outcome(created: bool) -> Outcome {
    if created {
        Outcome::Created
    } else {
        Outcome::Existed
    }
}

fn missing_outcome(exists: bool) -> Outcome {
    if exists {
        Outcome::Existed
    } else {
        Outcome::WouldCreate
    }
}
