use refsweep_core::dedupe::{classify, DupAction, SuspiciousKind};
use refsweep_core::store::models::{AttachmentRecord, FileEvidence};
use std::path::PathBuf;

fn hashed(
    parent_id: i64,
    att_id: i64,
    date_added: &str,
    filename: &str,
    digest: &str,
) -> AttachmentRecord {
    AttachmentRecord {
        parent_item_id: parent_id,
        parent_key: format!("P{parent_id}"),
        parent_title: format!("Parent {parent_id}"),
        att_item_id: att_id,
        att_key: format!("A{att_id}"),
        att_title: format!("Attachment {att_id}"),
        stored_path: format!("storage:{filename}"),
        date_added: date_added.to_string(),
        evidence: FileEvidence::Hashed {
            path: PathBuf::from(format!("/store/A{att_id}/{filename}")),
            filename: filename.to_string(),
            digest: digest.to_string(),
            size_bytes: 1000,
        },
    }
}

fn missing(parent_id: i64, att_id: i64, date_added: &str) -> AttachmentRecord {
    AttachmentRecord {
        parent_item_id: parent_id,
        parent_key: format!("P{parent_id}"),
        parent_title: format!("Parent {parent_id}"),
        att_item_id: att_id,
        att_key: format!("A{att_id}"),
        att_title: format!("Attachment {att_id}"),
        stored_path: "storage:gone.pdf".to_string(),
        date_added: date_added.to_string(),
        evidence: FileEvidence::Missing {
            error: "file_not_found".to_string(),
        },
    }
}

#[test]
fn test_identical_pair_keeps_earliest() {
    // Scenario A: identical bytes, dates a month apart.
    let records = vec![
        hashed(1, 11, "2023-02-01 00:00:00", "paper.pdf", "d1"),
        hashed(1, 10, "2023-01-01 00:00:00", "paper.pdf", "d1"),
    ];
    let result = classify(&records);

    assert_eq!(result.delete_candidates.len(), 1);
    assert_eq!(result.delete_candidates[0].att_item_id, 11);

    assert_eq!(result.exact_rows.len(), 2);
    let keep_row = result
        .exact_rows
        .iter()
        .find(|r| r.action == DupAction::Keep)
        .unwrap();
    assert_eq!(keep_row.att_item_id, 10);
    assert!(keep_row.reason.contains("keep=10"));

    let delete_row = result
        .exact_rows
        .iter()
        .find(|r| r.action == DupAction::DeleteCandidate)
        .unwrap();
    assert_eq!(delete_row.att_item_id, 11);
    assert_eq!(result.metrics.exact_delete_candidates, 1);
}

#[test]
fn test_timestamp_tie_broken_by_lowest_id() {
    let records = vec![
        hashed(1, 22, "2023-01-01 00:00:00", "paper.pdf", "d1"),
        hashed(1, 21, "2023-01-01 00:00:00", "paper.pdf", "d1"),
    ];
    let result = classify(&records);

    let keep_row = result
        .exact_rows
        .iter()
        .find(|r| r.action == DupAction::Keep)
        .unwrap();
    assert_eq!(keep_row.att_item_id, 21);
    assert_eq!(result.delete_candidates[0].att_item_id, 22);
}

#[test]
fn test_same_filename_different_bytes_is_suspicious_only() {
    // Scenario B: same normalized name "manuscript", different content.
    let records = vec![
        hashed(2, 30, "2023-01-01 00:00:00", "Manuscript.pdf", "d1"),
        hashed(2, 31, "2023-01-05 00:00:00", "manuscript.PDF", "d2"),
    ];
    let result = classify(&records);

    assert!(result.delete_candidates.is_empty());
    assert!(result.exact_rows.is_empty());
    assert!(result
        .suspicious
        .iter()
        .any(|s| s.kind == SuspiciousKind::SameFilenameDifferentContent));
    // Two distinct PDFs under one parent also trip the multiple-PDFs flag.
    assert!(result
        .suspicious
        .iter()
        .any(|s| s.kind == SuspiciousKind::MultiplePdfsDifferentContent));
}

#[test]
fn test_missing_file_is_suspicious_and_never_a_candidate() {
    // Scenario C: the stored path references a folder that is gone.
    let records = vec![missing(3, 40, "2023-01-01 00:00:00")];
    let result = classify(&records);

    assert!(result.delete_candidates.is_empty());
    assert!(result.exact_rows.is_empty());
    assert_eq!(result.suspicious.len(), 1);
    assert_eq!(
        result.suspicious[0].kind,
        SuspiciousKind::MissingOrUnhashableFile
    );
    assert!(result.suspicious[0].details.contains("file_not_found"));
}

#[test]
fn test_unhashable_record_excluded_from_duplicate_grouping() {
    // Only one hashed copy — no group forms even though the missing
    // record shares the parent.
    let records = vec![
        hashed(4, 50, "2023-01-01 00:00:00", "paper.pdf", "d1"),
        missing(4, 51, "2023-01-02 00:00:00"),
    ];
    let result = classify(&records);

    assert!(result.delete_candidates.is_empty());
    assert!(result.exact_rows.is_empty());
    assert_eq!(result.metrics.suspicious_rows, 1);
}

#[test]
fn test_all_distinct_digests_flag_multiple_pdfs() {
    let records = vec![
        hashed(5, 60, "2023-01-01 00:00:00", "main.pdf", "d1"),
        hashed(5, 61, "2023-01-02 00:00:00", "supplement.pdf", "d2"),
        hashed(5, 62, "2023-01-03 00:00:00", "data.pdf", "d3"),
    ];
    let result = classify(&records);

    assert!(result.delete_candidates.is_empty());
    let flags: Vec<_> = result
        .suspicious
        .iter()
        .filter(|s| s.kind == SuspiciousKind::MultiplePdfsDifferentContent)
        .collect();
    assert_eq!(flags.len(), 1);
    assert!(flags[0].details.contains("main.pdf"));
}

#[test]
fn test_exact_pair_plus_distinct_file_does_not_flag_multiple_pdfs() {
    // One exact pair and one distinct file: digests are not pairwise
    // distinct, so the multiple-PDFs heuristic stays quiet.
    let records = vec![
        hashed(6, 70, "2023-01-01 00:00:00", "paper.pdf", "d1"),
        hashed(6, 71, "2023-01-02 00:00:00", "paper.pdf", "d1"),
        hashed(6, 72, "2023-01-03 00:00:00", "extra.pdf", "d2"),
    ];
    let result = classify(&records);

    assert_eq!(result.delete_candidates.len(), 1);
    assert_eq!(result.delete_candidates[0].att_item_id, 71);
    assert!(!result
        .suspicious
        .iter()
        .any(|s| s.kind == SuspiciousKind::MultiplePdfsDifferentContent));
}

#[test]
fn test_cross_parent_duplicates_are_not_grouped() {
    // Identical bytes under different parents stay untouched.
    let records = vec![
        hashed(7, 80, "2023-01-01 00:00:00", "shared.pdf", "d1"),
        hashed(8, 81, "2023-01-02 00:00:00", "shared.pdf", "d1"),
    ];
    let result = classify(&records);

    assert!(result.delete_candidates.is_empty());
    assert!(result.exact_rows.is_empty());
}

#[test]
fn test_candidates_sorted_by_attachment_id() {
    let records = vec![
        hashed(10, 95, "2023-02-01 00:00:00", "b.pdf", "db"),
        hashed(10, 94, "2023-01-01 00:00:00", "b.pdf", "db"),
        hashed(9, 91, "2023-02-01 00:00:00", "a.pdf", "da"),
        hashed(9, 90, "2023-01-01 00:00:00", "a.pdf", "da"),
    ];
    let result = classify(&records);

    let ids: Vec<i64> = result
        .delete_candidates
        .iter()
        .map(|c| c.att_item_id)
        .collect();
    assert_eq!(ids, vec![91, 95]);
}

#[test]
fn test_classification_is_idempotent() {
    let records = vec![
        hashed(1, 10, "2023-01-01 00:00:00", "paper.pdf", "d1"),
        hashed(1, 11, "2023-02-01 00:00:00", "paper.pdf", "d1"),
        hashed(2, 20, "2023-01-01 00:00:00", "Manuscript.pdf", "x1"),
        hashed(2, 21, "2023-01-05 00:00:00", "manuscript.pdf", "x2"),
        missing(3, 30, "2023-01-01 00:00:00"),
    ];

    let first = classify(&records);
    let second = classify(&records);

    assert_eq!(first.exact_rows, second.exact_rows);
    assert_eq!(first.suspicious, second.suspicious);
    assert_eq!(first.metrics, second.metrics);
    let first_ids: Vec<i64> = first.delete_candidates.iter().map(|c| c.att_item_id).collect();
    let second_ids: Vec<i64> = second.delete_candidates.iter().map(|c| c.att_item_id).collect();
    assert_eq!(first_ids, second_ids);
}
