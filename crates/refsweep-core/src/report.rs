use crate::config::RunConfig;
use crate::dedupe::{DedupeMetrics, ExactDupRow, SuspiciousFinding};
use crate::error::Error;
use crate::notes::{self, NoteCandidate, NoteMetrics, NoteSuspicious};
use crate::store::models::{DeletionOutcome, NoteDeletionOutcome};
use chrono::Local;
use std::fs;
use std::path::Path;
use tracing::debug;

pub const EXACT_HEADERS: [&str; 13] = [
    "parentItemID",
    "parentKey",
    "parentTitle",
    "digest",
    "attachmentItemID",
    "attachmentKey",
    "attachmentTitle",
    "attachmentDBPath",
    "resolvedFilePath",
    "sizeBytes",
    "dateAdded",
    "action",
    "reason",
];

pub const SUSPICIOUS_HEADERS: [&str; 5] =
    ["type", "parentItemID", "parentKey", "parentTitle", "details"];

pub const DELETED_HEADERS: [&str; 6] = [
    "attachmentItemID",
    "attachmentKey",
    "parentItemID",
    "dbDelete",
    "storageDelete",
    "error",
];

pub const NOTE_CANDIDATE_HEADERS: [&str; 9] = [
    "noteItemID",
    "noteKey",
    "parentItemID",
    "parentKey",
    "parentTitle",
    "noteText",
    "dateAdded",
    "dateModified",
    "reason",
];

pub const NOTE_SUSPICIOUS_HEADERS: [&str; 8] = [
    "type",
    "noteItemID",
    "noteKey",
    "parentItemID",
    "parentKey",
    "parentTitle",
    "noteTextPreview",
    "dateAdded",
];

pub const NOTE_DELETED_HEADERS: [&str; 4] = ["noteItemID", "noteKey", "dbDelete", "error"];

/// `YYYY-MM-DD_HH-MM-SS`, used to stamp every log file of one run.
pub fn now_stamp() -> String {
    Local::now().format("%Y-%m-%d_%H-%M-%S").to_string()
}

/// Open a CSV writer and emit the header row up front, so even an
/// empty evidence file names its columns.
fn open_writer(path: &Path, headers: &[&str]) -> Result<csv::Writer<fs::File>, Error> {
    let mut wtr = csv::Writer::from_path(path)?;
    wtr.write_record(headers)?;
    Ok(wtr)
}

pub fn write_exact_rows(path: &Path, rows: &[ExactDupRow]) -> Result<(), Error> {
    let mut wtr = open_writer(path, &EXACT_HEADERS)?;
    for row in rows {
        wtr.write_record([
            row.parent_item_id.to_string(),
            row.parent_key.clone(),
            row.parent_title.clone(),
            row.digest.clone(),
            row.att_item_id.to_string(),
            row.att_key.clone(),
            row.att_title.clone(),
            row.stored_path.clone(),
            row.resolved_path.clone(),
            row.size_bytes.map(|s| s.to_string()).unwrap_or_default(),
            row.date_added.clone(),
            row.action.as_str().to_string(),
            row.reason.clone(),
        ])?;
    }
    wtr.flush()?;
    debug!("Wrote {} exact-duplicate rows to {}", rows.len(), path.display());
    Ok(())
}

pub fn write_suspicious_rows(path: &Path, rows: &[SuspiciousFinding]) -> Result<(), Error> {
    let mut wtr = open_writer(path, &SUSPICIOUS_HEADERS)?;
    for row in rows {
        wtr.write_record([
            row.kind.as_str().to_string(),
            row.parent_item_id.to_string(),
            row.parent_key.clone(),
            row.parent_title.clone(),
            row.details.clone(),
        ])?;
    }
    wtr.flush()?;
    debug!("Wrote {} suspicious rows to {}", rows.len(), path.display());
    Ok(())
}

pub fn write_deletion_outcomes(path: &Path, outcomes: &[DeletionOutcome]) -> Result<(), Error> {
    let mut wtr = open_writer(path, &DELETED_HEADERS)?;
    for outcome in outcomes {
        wtr.write_record([
            outcome.att_item_id.to_string(),
            outcome.att_key.clone(),
            outcome.parent_item_id.to_string(),
            outcome.db_delete.as_str().to_string(),
            outcome.storage_delete.as_str().to_string(),
            outcome.error.clone(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_note_candidates(path: &Path, rows: &[NoteCandidate]) -> Result<(), Error> {
    let mut wtr = open_writer(path, &NOTE_CANDIDATE_HEADERS)?;
    for row in rows {
        wtr.write_record([
            row.note_item_id.to_string(),
            row.note_key.clone(),
            row.parent_item_id.to_string(),
            row.parent_key.clone(),
            row.parent_title.clone(),
            row.note_text.clone(),
            row.date_added.clone(),
            row.date_modified.clone(),
            notes::classify::PLACEHOLDER_REASON.to_string(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_note_suspicious(path: &Path, rows: &[NoteSuspicious]) -> Result<(), Error> {
    let mut wtr = open_writer(path, &NOTE_SUSPICIOUS_HEADERS)?;
    for row in rows {
        wtr.write_record([
            notes::classify::SUSPICIOUS_KIND.to_string(),
            row.note_item_id.to_string(),
            row.note_key.clone(),
            row.parent_item_id.map(|id| id.to_string()).unwrap_or_default(),
            row.parent_key.clone(),
            row.parent_title.clone(),
            row.text_preview.clone(),
            row.date_added.clone(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_note_deletion_outcomes(
    path: &Path,
    outcomes: &[NoteDeletionOutcome],
) -> Result<(), Error> {
    let mut wtr = open_writer(path, &NOTE_DELETED_HEADERS)?;
    for outcome in outcomes {
        wtr.write_record([
            outcome.note_item_id.to_string(),
            outcome.note_key.clone(),
            outcome.db_delete.as_str().to_string(),
            outcome.error.clone(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_dedupe_summary(
    path: &Path,
    cfg: &RunConfig,
    metrics: &DedupeMetrics,
    exact_csv: &Path,
    suspicious_csv: &Path,
    deleted_csv: Option<&Path>,
) -> Result<(), Error> {
    let mut lines = vec![
        "# PDF Attachment Dedupe Report".to_string(),
        String::new(),
        format!("- Time: {}", Local::now().format("%Y-%m-%dT%H:%M:%S")),
        format!("- Mode: {}", mode_label(cfg.apply)),
        format!("- Database: `{}`", cfg.db_path.display()),
        format!("- Storage: `{}`", cfg.storage_path.display()),
        String::new(),
        "## Metrics".to_string(),
        String::new(),
        format!("- PDF attachments scanned: `{}`", metrics.pdf_attachments_total),
        format!("- Parent items with PDFs: `{}`", metrics.parents_with_pdf),
        format!("- Exact duplicate rows: `{}`", metrics.exact_duplicate_rows),
        format!(
            "- Exact duplicate delete candidates: `{}`",
            metrics.exact_delete_candidates
        ),
        format!("- Suspicious rows: `{}`", metrics.suspicious_rows),
        String::new(),
        "## Log Files".to_string(),
        String::new(),
        format!("- Exact duplicates: `{}`", exact_csv.display()),
        format!("- Suspicious cases: `{}`", suspicious_csv.display()),
    ];
    if let Some(deleted) = deleted_csv {
        lines.push(format!("- Deletion log: `{}`", deleted.display()));
    }
    fs::write(path, lines.join("\n") + "\n")?;
    Ok(())
}

pub fn write_notes_summary(
    path: &Path,
    cfg: &RunConfig,
    metrics: &NoteMetrics,
    candidates_csv: &Path,
    suspicious_csv: &Path,
    deleted_csv: Option<&Path>,
) -> Result<(), Error> {
    let mut lines = vec![
        "# XML Placeholder Note Cleanup Report".to_string(),
        String::new(),
        format!("- Time: {}", Local::now().format("%Y-%m-%dT%H:%M:%S")),
        format!("- Mode: {}", mode_label(cfg.apply)),
        format!("- Database: `{}`", cfg.db_path.display()),
        String::new(),
        "## Metrics".to_string(),
        String::new(),
        format!("- Total notes scanned: `{}`", metrics.notes_total),
        format!(
            "- Placeholder delete candidates: `{}`",
            metrics.candidate_placeholder_notes
        ),
        format!("- Suspicious notes: `{}`", metrics.suspicious_notes),
        String::new(),
        "## Log Files".to_string(),
        String::new(),
        format!("- Candidates: `{}`", candidates_csv.display()),
        format!("- Suspicious: `{}`", suspicious_csv.display()),
    ];
    if let Some(deleted) = deleted_csv {
        lines.push(format!("- Deletion log: `{}`", deleted.display()));
    }
    fs::write(path, lines.join("\n") + "\n")?;
    Ok(())
}

fn mode_label(apply: bool) -> &'static str {
    if apply {
        "APPLY"
    } else {
        "DRY_RUN"
    }
}
