use super::models::{AttachmentRow, NoteRecord};
use super::sqlite::Library;
use crate::text;
use rusqlite::Result;

/// Field id of the `title` entry in the item metadata table.
const TITLE_FIELD_ID: i64 = 1;

impl Library {
    /// All PDF attachments that have a parent item, joined to both
    /// items' keys and to the title metadata of both ends. Ordered by
    /// (parent id, attachment id) so grouping is deterministic.
    pub fn pdf_attachments(&self) -> Result<Vec<AttachmentRow>> {
        let mut stmt = self.connection().prepare(
            "SELECT ia.parentItemID, \
                    ia.itemID, \
                    COALESCE(ia.path, ''), \
                    COALESCE(iAtt.key, ''), \
                    COALESCE(iAtt.dateAdded, ''), \
                    COALESCE(iParent.key, ''), \
                    COALESCE(ptv.value, ''), \
                    COALESCE(atv.value, '') \
             FROM itemAttachments ia \
             JOIN items iAtt ON iAtt.itemID = ia.itemID \
             JOIN items iParent ON iParent.itemID = ia.parentItemID \
             LEFT JOIN itemData idp ON idp.itemID = iParent.itemID AND idp.fieldID = ?1 \
             LEFT JOIN itemDataValues ptv ON ptv.valueID = idp.valueID \
             LEFT JOIN itemData ida ON ida.itemID = iAtt.itemID AND ida.fieldID = ?1 \
             LEFT JOIN itemDataValues atv ON atv.valueID = ida.valueID \
             WHERE ia.parentItemID IS NOT NULL \
               AND lower(COALESCE(ia.contentType, '')) = 'application/pdf' \
             ORDER BY ia.parentItemID, ia.itemID",
        )?;
        let rows = stmt
            .query_map([TITLE_FIELD_ID], |row| {
                Ok(AttachmentRow {
                    parent_item_id: row.get(0)?,
                    att_item_id: row.get(1)?,
                    stored_path: row.get(2)?,
                    att_key: row.get(3)?,
                    date_added: row.get(4)?,
                    parent_key: row.get(5)?,
                    parent_title: row.get(6)?,
                    att_title: row.get(7)?,
                })
            })?
            .collect::<Result<Vec<_>>>()?;
        Ok(rows)
    }

    /// Every note in the library, with the parent item joined in when
    /// one exists. The rich-text body is stripped to plain text here so
    /// classification never sees raw HTML.
    pub fn child_notes(&self) -> Result<Vec<NoteRecord>> {
        let mut stmt = self.connection().prepare(
            "SELECT i.itemID, \
                    COALESCE(i.key, ''), \
                    n.parentItemID, \
                    COALESCE(ip.key, ''), \
                    COALESCE(ptv.value, ''), \
                    COALESCE(n.note, ''), \
                    COALESCE(i.dateAdded, ''), \
                    COALESCE(i.dateModified, '') \
             FROM itemNotes n \
             JOIN items i ON i.itemID = n.itemID \
             LEFT JOIN items ip ON ip.itemID = n.parentItemID \
             LEFT JOIN itemData idp ON idp.itemID = ip.itemID AND idp.fieldID = ?1 \
             LEFT JOIN itemDataValues ptv ON ptv.valueID = idp.valueID \
             ORDER BY i.itemID",
        )?;
        let notes = stmt
            .query_map([TITLE_FIELD_ID], |row| {
                let note_html: String = row.get(5)?;
                Ok(NoteRecord {
                    note_item_id: row.get(0)?,
                    note_key: row.get(1)?,
                    parent_item_id: row.get(2)?,
                    parent_key: row.get(3)?,
                    parent_title: row.get(4)?,
                    note_text: text::strip_html(&note_html),
                    note_html,
                    date_added: row.get(6)?,
                    date_modified: row.get(7)?,
                })
            })?
            .collect::<Result<Vec<_>>>()?;
        Ok(notes)
    }
}
