use crate::store::models::AttachmentRecord;
use crate::text;
use serde::Serialize;
use serde_json::json;
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// Whether an evidence row is the copy being kept or an extra.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DupAction {
    Keep,
    DeleteCandidate,
}

impl DupAction {
    pub fn as_str(self) -> &'static str {
        match self {
            DupAction::Keep => "KEEP",
            DupAction::DeleteCandidate => "DELETE_CANDIDATE",
        }
    }
}

/// One evidence row for a member of an exact-duplicate group. Every
/// member is emitted, the kept one included.
#[derive(Debug, Clone, PartialEq)]
pub struct ExactDupRow {
    pub parent_item_id: i64,
    pub parent_key: String,
    pub parent_title: String,
    pub digest: String,
    pub att_item_id: i64,
    pub att_key: String,
    pub att_title: String,
    pub stored_path: String,
    pub resolved_path: String,
    pub size_bytes: Option<u64>,
    pub date_added: String,
    pub action: DupAction,
    pub reason: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuspiciousKind {
    MissingOrUnhashableFile,
    SameFilenameDifferentContent,
    MultiplePdfsDifferentContent,
}

impl SuspiciousKind {
    pub fn as_str(self) -> &'static str {
        match self {
            SuspiciousKind::MissingOrUnhashableFile => "MISSING_OR_UNHASHABLE_FILE",
            SuspiciousKind::SameFilenameDifferentContent => "SAME_FILENAME_DIFFERENT_CONTENT",
            SuspiciousKind::MultiplePdfsDifferentContent => "MULTIPLE_PDFS_DIFFERENT_CONTENT",
        }
    }
}

/// An anomaly that needs a human decision. Findings are evidence only;
/// nothing here ever reaches the deleter.
#[derive(Debug, Clone, PartialEq)]
pub struct SuspiciousFinding {
    pub kind: SuspiciousKind,
    pub parent_item_id: i64,
    pub parent_key: String,
    pub parent_title: String,
    /// Compact JSON payload describing the involved attachments.
    pub details: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DedupeMetrics {
    pub pdf_attachments_total: usize,
    pub parents_with_pdf: usize,
    pub exact_duplicate_rows: usize,
    pub exact_delete_candidates: usize,
    pub suspicious_rows: usize,
}

#[derive(Debug)]
pub struct Classification {
    pub exact_rows: Vec<ExactDupRow>,
    pub suspicious: Vec<SuspiciousFinding>,
    /// Sorted by attachment id for deterministic deletion order.
    pub delete_candidates: Vec<AttachmentRecord>,
    pub metrics: DedupeMetrics,
}

/// Partition records by parent and decide keep/delete/suspicious per
/// partition. Duplicate detection is strictly same-parent and
/// byte-identical; everything weaker is surfaced for review only.
pub fn classify(records: &[AttachmentRecord]) -> Classification {
    let mut by_parent: BTreeMap<i64, Vec<&AttachmentRecord>> = BTreeMap::new();
    for rec in records {
        by_parent.entry(rec.parent_item_id).or_default().push(rec);
    }

    let mut exact_rows = Vec::new();
    let mut suspicious = Vec::new();
    let mut delete_candidates: Vec<AttachmentRecord> = Vec::new();

    for (&parent_id, group) in &by_parent {
        classify_parent(
            parent_id,
            group,
            &mut exact_rows,
            &mut suspicious,
            &mut delete_candidates,
        );
    }

    delete_candidates.sort_by_key(|rec| rec.att_item_id);

    let metrics = DedupeMetrics {
        pdf_attachments_total: records.len(),
        parents_with_pdf: by_parent.len(),
        exact_duplicate_rows: exact_rows.len(),
        exact_delete_candidates: delete_candidates.len(),
        suspicious_rows: suspicious.len(),
    };
    debug!(
        "Classified {} attachments: {} delete candidates, {} suspicious",
        metrics.pdf_attachments_total, metrics.exact_delete_candidates, metrics.suspicious_rows
    );

    Classification {
        exact_rows,
        suspicious,
        delete_candidates,
        metrics,
    }
}

fn classify_parent(
    parent_id: i64,
    group: &[&AttachmentRecord],
    exact_rows: &mut Vec<ExactDupRow>,
    suspicious: &mut Vec<SuspiciousFinding>,
    delete_candidates: &mut Vec<AttachmentRecord>,
) {
    // Records without a digest can't join any duplicate group; each one
    // is its own finding.
    let mut by_digest: BTreeMap<&str, Vec<&AttachmentRecord>> = BTreeMap::new();
    for rec in group {
        match rec.evidence.digest() {
            Some(digest) => by_digest.entry(digest).or_default().push(rec),
            None => suspicious.push(unhashable_finding(parent_id, rec)),
        }
    }

    // Exact duplicates: byte-identical files under the same parent.
    for (digest, dup_group) in &by_digest {
        if dup_group.len() < 2 {
            continue;
        }
        let mut members = dup_group.clone();
        members.sort_by(|a, b| {
            a.date_added
                .cmp(&b.date_added)
                .then(a.att_item_id.cmp(&b.att_item_id))
        });
        let keep_id = members[0].att_item_id;
        let reason = format!("same parent + identical bytes; keep={keep_id}");

        for (idx, rec) in members.iter().enumerate() {
            let action = if idx == 0 {
                DupAction::Keep
            } else {
                DupAction::DeleteCandidate
            };
            if action == DupAction::DeleteCandidate {
                delete_candidates.push((*rec).clone());
            }
            exact_rows.push(ExactDupRow {
                parent_item_id: rec.parent_item_id,
                parent_key: rec.parent_key.clone(),
                parent_title: rec.parent_title.clone(),
                digest: (*digest).to_string(),
                att_item_id: rec.att_item_id,
                att_key: rec.att_key.clone(),
                att_title: rec.att_title.clone(),
                stored_path: rec.stored_path.clone(),
                resolved_path: rec
                    .evidence
                    .resolved_path()
                    .map(|p| p.display().to_string())
                    .unwrap_or_default(),
                size_bytes: rec.evidence.size_bytes(),
                date_added: rec.date_added.clone(),
                action,
                reason: reason.clone(),
            });
        }
    }

    // Same normalized filename, more than one distinct digest: a human
    // has to look at these.
    let mut by_name: BTreeMap<String, Vec<&AttachmentRecord>> = BTreeMap::new();
    for rec in group {
        if let Some(name) = rec.evidence.filename() {
            by_name
                .entry(text::normalize_filename(name))
                .or_default()
                .push(rec);
        }
    }
    for name_group in by_name.values() {
        if name_group.len() < 2 {
            continue;
        }
        let distinct: BTreeSet<&str> = name_group
            .iter()
            .filter_map(|rec| rec.evidence.digest())
            .collect();
        if distinct.len() > 1 {
            let mut members = name_group.clone();
            members.sort_by_key(|rec| rec.att_item_id);
            suspicious.push(SuspiciousFinding {
                kind: SuspiciousKind::SameFilenameDifferentContent,
                parent_item_id: parent_id,
                parent_key: name_group[0].parent_key.clone(),
                parent_title: name_group[0].parent_title.clone(),
                details: member_details(&members),
            });
        }
    }

    // Several PDFs, all pairwise distinct: likely legitimate
    // supplementary files, flagged rather than touched. Deliberately
    // does not fire when the parent also holds an exact-duplicate pair.
    if group.len() >= 2 {
        let digests: Vec<&str> = group
            .iter()
            .filter_map(|rec| rec.evidence.digest())
            .collect();
        let distinct: BTreeSet<&str> = digests.iter().copied().collect();
        if digests.len() >= 2 && distinct.len() == digests.len() {
            let mut members = group.to_vec();
            members.sort_by_key(|rec| rec.att_item_id);
            suspicious.push(SuspiciousFinding {
                kind: SuspiciousKind::MultiplePdfsDifferentContent,
                parent_item_id: parent_id,
                parent_key: group[0].parent_key.clone(),
                parent_title: group[0].parent_title.clone(),
                details: member_details(&members),
            });
        }
    }
}

fn unhashable_finding(parent_id: i64, rec: &AttachmentRecord) -> SuspiciousFinding {
    SuspiciousFinding {
        kind: SuspiciousKind::MissingOrUnhashableFile,
        parent_item_id: parent_id,
        parent_key: rec.parent_key.clone(),
        parent_title: rec.parent_title.clone(),
        details: json!({
            "attItemID": rec.att_item_id,
            "attKey": rec.att_key,
            "dbPath": rec.stored_path,
            "error": rec.evidence.error(),
        })
        .to_string(),
    }
}

fn member_details(records: &[&AttachmentRecord]) -> String {
    let items: Vec<serde_json::Value> = records
        .iter()
        .map(|rec| {
            json!({
                "attItemID": rec.att_item_id,
                "attKey": rec.att_key,
                "filename": rec.evidence.filename(),
                "sizeBytes": rec.evidence.size_bytes(),
                "digest": rec.evidence.digest(),
            })
        })
        .collect();
    serde_json::Value::Array(items).to_string()
}
