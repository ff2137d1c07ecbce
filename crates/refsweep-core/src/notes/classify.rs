use crate::store::models::NoteRecord;
use crate::text;
use serde::Serialize;
use tracing::debug;

/// Reason recorded for every placeholder delete candidate.
pub const PLACEHOLDER_REASON: &str = "pure_placeholder_imported_xml_child_note";

/// Category tag for notes that mention the import phrase without being
/// a pure placeholder.
pub const SUSPICIOUS_KIND: &str = "HAS_XML_IMPORT_PHRASE_BUT_NOT_STRICT_PLACEHOLDER";

/// Characters of note text carried into the suspicious evidence row.
const PREVIEW_CHARS: usize = 200;

/// A child note that is nothing but a legacy-import placeholder.
#[derive(Debug, Clone, PartialEq)]
pub struct NoteCandidate {
    pub note_item_id: i64,
    pub note_key: String,
    pub parent_item_id: i64,
    pub parent_key: String,
    pub parent_title: String,
    pub note_text: String,
    pub date_added: String,
    pub date_modified: String,
}

/// A note that mentions an XML import but carries other content too.
/// Surfaced for review, never deleted.
#[derive(Debug, Clone, PartialEq)]
pub struct NoteSuspicious {
    pub note_item_id: i64,
    pub note_key: String,
    pub parent_item_id: Option<i64>,
    pub parent_key: String,
    pub parent_title: String,
    pub text_preview: String,
    pub date_added: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NoteMetrics {
    pub notes_total: usize,
    pub candidate_placeholder_notes: usize,
    pub suspicious_notes: usize,
}

#[derive(Debug)]
pub struct NoteClassification {
    pub candidates: Vec<NoteCandidate>,
    pub suspicious: Vec<NoteSuspicious>,
    pub metrics: NoteMetrics,
}

/// A note is a delete candidate only when its stripped text is exactly
/// the placeholder phrase and it hangs under a parent. Anything looser
/// — trailing text, a missing parent — is suspicious at most.
pub fn classify(notes: &[NoteRecord]) -> NoteClassification {
    let mut candidates = Vec::new();
    let mut suspicious = Vec::new();

    for note in notes {
        match (
            text::is_import_placeholder(&note.note_text),
            note.parent_item_id,
        ) {
            (true, Some(parent_item_id)) => candidates.push(NoteCandidate {
                note_item_id: note.note_item_id,
                note_key: note.note_key.clone(),
                parent_item_id,
                parent_key: note.parent_key.clone(),
                parent_title: note.parent_title.clone(),
                note_text: note.note_text.clone(),
                date_added: note.date_added.clone(),
                date_modified: note.date_modified.clone(),
            }),
            _ if text::mentions_xml_import(&note.note_text) => {
                suspicious.push(NoteSuspicious {
                    note_item_id: note.note_item_id,
                    note_key: note.note_key.clone(),
                    parent_item_id: note.parent_item_id,
                    parent_key: note.parent_key.clone(),
                    parent_title: note.parent_title.clone(),
                    text_preview: note.note_text.chars().take(PREVIEW_CHARS).collect(),
                    date_added: note.date_added.clone(),
                })
            }
            _ => {}
        }
    }

    let metrics = NoteMetrics {
        notes_total: notes.len(),
        candidate_placeholder_notes: candidates.len(),
        suspicious_notes: suspicious.len(),
    };
    debug!(
        "Classified {} notes: {} placeholder candidates, {} suspicious",
        metrics.notes_total, metrics.candidate_placeholder_notes, metrics.suspicious_notes
    );

    NoteClassification {
        candidates,
        suspicious,
        metrics,
    }
}
