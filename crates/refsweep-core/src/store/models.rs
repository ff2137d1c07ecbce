use std::path::{Path, PathBuf};

/// One PDF attachment row joined to its parent item, straight from the
/// database and before any filesystem work.
#[derive(Debug, Clone)]
pub struct AttachmentRow {
    pub parent_item_id: i64,
    pub att_item_id: i64,
    /// Raw stored-path string, e.g. `storage:paper.pdf` or an absolute path.
    pub stored_path: String,
    pub att_key: String,
    pub date_added: String,
    pub parent_key: String,
    pub parent_title: String,
    pub att_title: String,
}

/// What the resolver and hasher learned about an attachment's file.
///
/// Either the file was hashed (digest and size both present) or it was
/// not (an error string is present) — the variants make a partial mix
/// unrepresentable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileEvidence {
    Hashed {
        path: PathBuf,
        filename: String,
        digest: String,
        size_bytes: u64,
    },
    /// No on-disk file could be located at all.
    Missing { error: String },
    /// A file was located but could not be read to the end.
    Unreadable {
        path: PathBuf,
        filename: String,
        error: String,
    },
}

impl FileEvidence {
    pub fn digest(&self) -> Option<&str> {
        match self {
            FileEvidence::Hashed { digest, .. } => Some(digest),
            _ => None,
        }
    }

    pub fn filename(&self) -> Option<&str> {
        match self {
            FileEvidence::Hashed { filename, .. }
            | FileEvidence::Unreadable { filename, .. } => Some(filename),
            FileEvidence::Missing { .. } => None,
        }
    }

    pub fn resolved_path(&self) -> Option<&Path> {
        match self {
            FileEvidence::Hashed { path, .. } | FileEvidence::Unreadable { path, .. } => {
                Some(path)
            }
            FileEvidence::Missing { .. } => None,
        }
    }

    pub fn size_bytes(&self) -> Option<u64> {
        match self {
            FileEvidence::Hashed { size_bytes, .. } => Some(*size_bytes),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            FileEvidence::Missing { error } | FileEvidence::Unreadable { error, .. } => {
                Some(error)
            }
            FileEvidence::Hashed { .. } => None,
        }
    }
}

/// A fully scanned attachment: database identity plus file evidence.
/// Built once per run and read-only afterward.
#[derive(Debug, Clone)]
pub struct AttachmentRecord {
    pub parent_item_id: i64,
    pub parent_key: String,
    pub parent_title: String,
    pub att_item_id: i64,
    pub att_key: String,
    pub att_title: String,
    pub stored_path: String,
    pub date_added: String,
    pub evidence: FileEvidence,
}

/// One child note with its rich-text body and the stripped plain text.
#[derive(Debug, Clone)]
pub struct NoteRecord {
    pub note_item_id: i64,
    pub note_key: String,
    pub parent_item_id: Option<i64>,
    pub parent_key: String,
    pub parent_title: String,
    pub note_html: String,
    pub note_text: String,
    pub date_added: String,
    pub date_modified: String,
}

/// Outcome of one phase of a two-phase delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseStatus {
    Deleted,
    SkipNotFound,
    Skipped,
    Error,
}

impl PhaseStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            PhaseStatus::Deleted => "DELETED",
            PhaseStatus::SkipNotFound => "SKIP_NOT_FOUND",
            PhaseStatus::Skipped => "SKIP",
            PhaseStatus::Error => "ERROR",
        }
    }
}

/// Per-candidate result of an attachment deletion run. The database
/// and storage phases fail independently; the error text belongs to
/// whichever phase set `Error`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletionOutcome {
    pub att_item_id: i64,
    pub att_key: String,
    pub parent_item_id: i64,
    pub db_delete: PhaseStatus,
    pub storage_delete: PhaseStatus,
    pub error: String,
}

/// Per-candidate result of a note deletion run. Notes have no storage
/// folder, so there is only the database phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteDeletionOutcome {
    pub note_item_id: i64,
    pub note_key: String,
    pub db_delete: PhaseStatus,
    pub error: String,
}
