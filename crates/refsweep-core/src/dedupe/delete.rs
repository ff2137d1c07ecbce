use crate::error::Error;
use crate::store::models::{AttachmentRecord, DeletionOutcome, PhaseStatus};
use crate::store::Library;
use rusqlite::params;
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

/// Delete confirmed duplicates: database rows first, in one
/// all-or-nothing transaction, then best-effort storage cleanup.
/// A storage folder is only touched once its row's delete committed;
/// the database stays the source of truth for what exists.
pub fn delete_candidates(
    db_path: &Path,
    storage_dir: &Path,
    candidates: &[AttachmentRecord],
) -> Result<Vec<DeletionOutcome>, Error> {
    let mut outcomes = delete_rows(db_path, candidates)?;
    remove_storage_folders(storage_dir, &mut outcomes);
    Ok(outcomes)
}

/// Phase 1: one IMMEDIATE transaction over all candidates. Rows that
/// vanished since the scan are skipped; any real failure rolls the
/// whole batch back.
fn delete_rows(
    db_path: &Path,
    candidates: &[AttachmentRecord],
) -> Result<Vec<DeletionOutcome>, Error> {
    let mut lib = Library::open_writable(db_path)?;
    let tx = lib.immediate_transaction()?;
    let mut outcomes = Vec::with_capacity(candidates.len());

    for cand in candidates {
        let exists = match tx.query_row(
            "SELECT key FROM items WHERE itemID = ?1",
            params![cand.att_item_id],
            |row| row.get::<_, String>(0),
        ) {
            Ok(_) => true,
            Err(rusqlite::Error::QueryReturnedNoRows) => false,
            Err(e) => return Err(Error::DeleteTransaction { source: e }),
        };

        if !exists {
            warn!(
                "Attachment {} vanished before deletion, skipping",
                cand.att_item_id
            );
            outcomes.push(DeletionOutcome {
                att_item_id: cand.att_item_id,
                att_key: cand.att_key.clone(),
                parent_item_id: cand.parent_item_id,
                db_delete: PhaseStatus::SkipNotFound,
                storage_delete: PhaseStatus::Skipped,
                error: String::new(),
            });
            continue;
        }

        tx.execute(
            "DELETE FROM items WHERE itemID = ?1",
            params![cand.att_item_id],
        )
        .map_err(|e| Error::DeleteTransaction { source: e })?;
        debug!("Deleted item row {}", cand.att_item_id);
        outcomes.push(DeletionOutcome {
            att_item_id: cand.att_item_id,
            att_key: cand.att_key.clone(),
            parent_item_id: cand.parent_item_id,
            db_delete: PhaseStatus::Deleted,
            storage_delete: PhaseStatus::Skipped,
            error: String::new(),
        });
    }

    tx.commit().map_err(|e| Error::DeleteTransaction { source: e })?;
    info!(
        "Committed {} row deletions ({} skipped as missing)",
        outcomes
            .iter()
            .filter(|o| o.db_delete == PhaseStatus::Deleted)
            .count(),
        outcomes
            .iter()
            .filter(|o| o.db_delete == PhaseStatus::SkipNotFound)
            .count(),
    );
    Ok(outcomes)
}

/// Phase 2: per-row folder removal after the commit. Failures here are
/// recorded on the row and never affect the committed database state
/// or the other rows.
fn remove_storage_folders(storage_dir: &Path, outcomes: &mut [DeletionOutcome]) {
    for outcome in outcomes
        .iter_mut()
        .filter(|o| o.db_delete == PhaseStatus::Deleted)
    {
        let folder = storage_dir.join(&outcome.att_key);
        if !folder.is_dir() {
            outcome.storage_delete = PhaseStatus::SkipNotFound;
            continue;
        }
        match fs::remove_dir_all(&folder) {
            Ok(()) => {
                debug!("Removed storage folder {}", folder.display());
                outcome.storage_delete = PhaseStatus::Deleted;
            }
            Err(e) => {
                warn!("Failed to remove {}: {}", folder.display(), e);
                outcome.storage_delete = PhaseStatus::Error;
                outcome.error = e.to_string();
            }
        }
    }
}
