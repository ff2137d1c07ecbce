use super::classify::NoteCandidate;
use crate::error::Error;
use crate::store::models::{NoteDeletionOutcome, PhaseStatus};
use crate::store::Library;
use rusqlite::params;
use std::path::Path;
use tracing::{debug, info, warn};

/// Delete placeholder notes in one all-or-nothing transaction. Same
/// workflow as the attachment deleter minus the storage phase — notes
/// have no folder on disk.
pub fn delete_candidates(
    db_path: &Path,
    candidates: &[NoteCandidate],
) -> Result<Vec<NoteDeletionOutcome>, Error> {
    let mut lib = Library::open_writable(db_path)?;
    let tx = lib.immediate_transaction()?;
    let mut outcomes = Vec::with_capacity(candidates.len());

    for cand in candidates {
        match tx.query_row(
            "SELECT key FROM items WHERE itemID = ?1",
            params![cand.note_item_id],
            |row| row.get::<_, String>(0),
        ) {
            Ok(key) => {
                tx.execute(
                    "DELETE FROM items WHERE itemID = ?1",
                    params![cand.note_item_id],
                )
                .map_err(|e| Error::DeleteTransaction { source: e })?;
                debug!("Deleted note row {}", cand.note_item_id);
                outcomes.push(NoteDeletionOutcome {
                    note_item_id: cand.note_item_id,
                    note_key: key,
                    db_delete: PhaseStatus::Deleted,
                    error: String::new(),
                });
            }
            Err(rusqlite::Error::QueryReturnedNoRows) => {
                warn!(
                    "Note {} vanished before deletion, skipping",
                    cand.note_item_id
                );
                outcomes.push(NoteDeletionOutcome {
                    note_item_id: cand.note_item_id,
                    note_key: String::new(),
                    db_delete: PhaseStatus::SkipNotFound,
                    error: String::new(),
                });
            }
            Err(e) => return Err(Error::DeleteTransaction { source: e }),
        }
    }

    tx.commit().map_err(|e| Error::DeleteTransaction { source: e })?;
    info!(
        "Committed {} note deletions",
        outcomes
            .iter()
            .filter(|o| o.db_delete == PhaseStatus::Deleted)
            .count()
    );
    Ok(outcomes)
}
