use crate::hash;
use crate::resolve;
use crate::store::models::{AttachmentRecord, AttachmentRow, FileEvidence};
use std::path::Path;
use tracing::trace;

/// Error recorded when no on-disk file could be located at all.
pub const FILE_NOT_FOUND: &str = "file_not_found";

/// Resolve and hash every attachment row. Per-record failures become
/// evidence on the record, never errors; a half-missing storage tree
/// still produces a complete scan.
pub fn build_records(rows: Vec<AttachmentRow>, storage_dir: &Path) -> Vec<AttachmentRecord> {
    rows.into_iter()
        .map(|row| build_record(row, storage_dir))
        .collect()
}

fn build_record(row: AttachmentRow, storage_dir: &Path) -> AttachmentRecord {
    let evidence =
        match resolve::resolve_attachment_file(storage_dir, &row.att_key, &row.stored_path) {
            None => FileEvidence::Missing {
                error: FILE_NOT_FOUND.to_string(),
            },
            Some(path) => {
                let filename = path
                    .file_name()
                    .map(|f| f.to_string_lossy().into_owned())
                    .unwrap_or_default();
                match hash::hash_file(&path) {
                    Ok((digest, size_bytes)) => {
                        trace!("Hashed {} ({} bytes)", path.display(), size_bytes);
                        FileEvidence::Hashed {
                            path,
                            filename,
                            digest,
                            size_bytes,
                        }
                    }
                    Err(error) => FileEvidence::Unreadable {
                        path,
                        filename,
                        error,
                    },
                }
            }
        };

    AttachmentRecord {
        parent_item_id: row.parent_item_id,
        parent_key: row.parent_key,
        parent_title: row.parent_title,
        att_item_id: row.att_item_id,
        att_key: row.att_key,
        att_title: row.att_title,
        stored_path: row.stored_path,
        date_added: row.date_added,
        evidence,
    }
}
