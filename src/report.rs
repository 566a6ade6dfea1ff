use std::fmt::Write as _;

use anyhow::{Context, Result};

use crate::scaffold::{Decision, EntryKind, MainStatus, Outcome, Run};

pub const START_BANNER: &str = "Creating folder structure...";
pub const DONE_BANNER: &str = "Folder structure creation completed!";

/// Tally of decisions by outcome.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Counts {
    pub created: usize,
    pub existed: usize,
}

pub fn counts(decisions: &[Decision]) -> Counts {
    decisions
        .iter()
        .fold(Counts::default(), |mut acc, decision| {
            match decision.outcome {
                Outcome::Created | Outcome::WouldCreate => acc.created += 1,
                Outcome::Existed => acc.existed += 1,
            }
            acc
        })
}

pub fn decision_line(decision: &Decision) -> String {
    let path = &decision.path;
    match (decision.kind, decision.outcome) {
        (EntryKind::File, Outcome::Created) => format!("Created file: {path}"),
        (EntryKind::File, Outcome::Existed) => format!("File already exists: {path}"),
        (EntryKind::File, Outcome::WouldCreate) => format!("Would create file: {path}"),
        (EntryKind::Folder, Outcome::Created) => format!("Created folder: {path}"),
        (EntryKind::Folder, Outcome::Existed) => format!("Folder already exists: {path}"),
        (EntryKind::Folder, Outcome::WouldCreate) => format!("Would create folder: {path}"),
    }
}

/// Fresh-vs-incremental note; `None` when the layout has no such folder.
pub fn main_folder_note(run: &Run) -> Option<String> {
    let main = &run.main_folder;
    match run.main_status {
        MainStatus::Existed => Some(format!(
            "Note: {main} folder already existed - only missing files and folders were added"
        )),
        MainStatus::Created => Some(format!(
            "Note: {main} folder was created as part of the structure"
        )),
        MainStatus::WouldCreate => Some(format!(
            "Note: {main} folder would be created as part of the structure"
        )),
        MainStatus::NotInLayout => None,
    }
}

/// Everything printed after the start banner.
pub fn format_run(run: &Run) -> String {
    let mut out = String::new();
    for decision in &run.decisions {
        let _ = writeln!(out, "{}", decision_line(decision));
    }
    let _ = writeln!(out, "\n{DONE_BANNER}");
    if let Some(note) = main_folder_note(run) {
        let _ = writeln!(out, "\n{note}");
    }
    out
}

pub fn format_json(run: &Run) -> Result<String> {
    serde_json::to_string_pretty(run).context("serializing scaffold report")
}

/// Complete stdout text of an apply: banners and lines, or a JSON document.
pub fn render_output(run: &Run, json: bool) -> Result<String> {
    if json {
        let mut out = format_json(run)?;
        out.push('\n');
        return Ok(out);
    }
    Ok(format!("{START_BANNER}\n{}", format_run(run)))
}
