use crate::config::RunConfig;
use crate::dedupe::{self, DedupeMetrics};
use crate::error::Error;
use crate::notes::{self, NoteMetrics};
use crate::report;
use crate::store::Library;
use std::fs;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{debug, info};

/// Everything a dedupe run produced: the counts plus where the
/// evidence landed.
#[derive(Debug)]
pub struct DedupeRunReport {
    pub metrics: DedupeMetrics,
    pub exact_csv: PathBuf,
    pub suspicious_csv: PathBuf,
    pub deleted_csv: Option<PathBuf>,
    pub summary_md: PathBuf,
}

#[derive(Debug)]
pub struct NoteRunReport {
    pub metrics: NoteMetrics,
    pub candidates_csv: PathBuf,
    pub suspicious_csv: PathBuf,
    pub deleted_csv: Option<PathBuf>,
    pub summary_md: PathBuf,
}

/// Run the full attachment-dedupe pipeline:
/// 1. read attachment rows (read-only connection, then dropped)
/// 2. resolve + hash each one
/// 3. classify into keep/delete/suspicious
/// 4. write evidence CSVs
/// 5. in apply mode, delete candidates and log per-item outcomes
pub fn run_pdf_dedupe(cfg: &RunConfig) -> Result<DedupeRunReport, Error> {
    fs::create_dir_all(&cfg.log_dir)?;
    let stamp = report::now_stamp();
    let exact_csv = cfg.log_dir.join(format!("pdf_dedupe_exact_{stamp}.csv"));
    let suspicious_csv = cfg
        .log_dir
        .join(format!("pdf_dedupe_suspicious_{stamp}.csv"));
    let deleted_csv_path = cfg.log_dir.join(format!("pdf_dedupe_deleted_{stamp}.csv"));
    let summary_md = cfg.log_dir.join(format!("pdf_dedupe_summary_{stamp}.md"));

    info!("Scanning PDF attachments...");
    let scan_start = Instant::now();
    let lib = Library::open_readonly(&cfg.db_path)?;
    let rows = lib.pdf_attachments()?;
    // The write connection must never coexist with this one.
    drop(lib);
    let records = dedupe::build_records(rows, &cfg.storage_path);
    debug!(
        "Scanned {} attachments in {:.2}s",
        records.len(),
        scan_start.elapsed().as_secs_f64()
    );

    info!("Classifying duplicates...");
    let classification = dedupe::classify(&records);

    report::write_exact_rows(&exact_csv, &classification.exact_rows)?;
    report::write_suspicious_rows(&suspicious_csv, &classification.suspicious)?;

    let mut deleted_csv = None;
    if cfg.apply {
        info!(
            "Deleting {} duplicate attachments...",
            classification.delete_candidates.len()
        );
        let outcomes = dedupe::delete_candidates(
            &cfg.db_path,
            &cfg.storage_path,
            &classification.delete_candidates,
        )?;
        report::write_deletion_outcomes(&deleted_csv_path, &outcomes)?;
        deleted_csv = Some(deleted_csv_path);
    }

    report::write_dedupe_summary(
        &summary_md,
        cfg,
        &classification.metrics,
        &exact_csv,
        &suspicious_csv,
        deleted_csv.as_deref(),
    )?;

    Ok(DedupeRunReport {
        metrics: classification.metrics,
        exact_csv,
        suspicious_csv,
        deleted_csv,
        summary_md,
    })
}

/// Run the placeholder-note cleanup pipeline. Same shape as the dedupe
/// run, minus the filesystem work.
pub fn run_note_cleanup(cfg: &RunConfig) -> Result<NoteRunReport, Error> {
    fs::create_dir_all(&cfg.log_dir)?;
    let stamp = report::now_stamp();
    let candidates_csv = cfg
        .log_dir
        .join(format!("xml_note_cleanup_candidates_{stamp}.csv"));
    let suspicious_csv = cfg
        .log_dir
        .join(format!("xml_note_cleanup_suspicious_{stamp}.csv"));
    let deleted_csv_path = cfg
        .log_dir
        .join(format!("xml_note_cleanup_deleted_{stamp}.csv"));
    let summary_md = cfg
        .log_dir
        .join(format!("xml_note_cleanup_summary_{stamp}.md"));

    info!("Scanning child notes...");
    let lib = Library::open_readonly(&cfg.db_path)?;
    let records = lib.child_notes()?;
    drop(lib);

    let classification = notes::classify(&records);

    report::write_note_candidates(&candidates_csv, &classification.candidates)?;
    report::write_note_suspicious(&suspicious_csv, &classification.suspicious)?;

    let mut deleted_csv = None;
    if cfg.apply {
        info!(
            "Deleting {} placeholder notes...",
            classification.candidates.len()
        );
        let outcomes = notes::delete_candidates(&cfg.db_path, &classification.candidates)?;
        report::write_note_deletion_outcomes(&deleted_csv_path, &outcomes)?;
        deleted_csv = Some(deleted_csv_path);
    }

    report::write_notes_summary(
        &summary_md,
        cfg,
        &classification.metrics,
        &candidates_csv,
        &suspicious_csv,
        deleted_csv.as_deref(),
    )?;

    Ok(NoteRunReport {
        metrics: classification.metrics,
        candidates_csv,
        suspicious_csv,
        deleted_csv,
        summary_md,
    })
}
