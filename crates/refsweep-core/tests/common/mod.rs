#![allow(dead_code)]

use rusqlite::{params, Connection};
use std::fs;
use std::path::{Path, PathBuf};

/// Minimal slice of the reference-library schema the maintenance tasks
/// touch. Child rows cascade so deleting an item removes its
/// attachment or note row too, like the real schema.
const TEST_SCHEMA: &str = "
CREATE TABLE items (
    itemID INTEGER PRIMARY KEY,
    key TEXT NOT NULL UNIQUE,
    dateAdded TEXT,
    dateModified TEXT
);
CREATE TABLE itemAttachments (
    itemID INTEGER PRIMARY KEY REFERENCES items(itemID) ON DELETE CASCADE,
    parentItemID INTEGER,
    contentType TEXT,
    path TEXT
);
CREATE TABLE itemNotes (
    itemID INTEGER PRIMARY KEY REFERENCES items(itemID) ON DELETE CASCADE,
    parentItemID INTEGER,
    note TEXT
);
CREATE TABLE itemData (
    itemID INTEGER,
    fieldID INTEGER,
    valueID INTEGER
);
CREATE TABLE itemDataValues (
    valueID INTEGER PRIMARY KEY,
    value TEXT
);
";

/// A throwaway library: one SQLite file plus a storage tree, both
/// under a caller-owned temp directory.
pub struct TestLibrary {
    pub db_path: PathBuf,
    pub storage_dir: PathBuf,
    pub log_dir: PathBuf,
}

impl TestLibrary {
    pub fn create(root: &Path) -> Self {
        let db_path = root.join("library.sqlite");
        let storage_dir = root.join("storage");
        let log_dir = root.join("logs");
        fs::create_dir_all(&storage_dir).unwrap();

        let conn = Connection::open(&db_path).unwrap();
        conn.execute_batch(TEST_SCHEMA).unwrap();

        TestLibrary {
            db_path,
            storage_dir,
            log_dir,
        }
    }

    pub fn conn(&self) -> Connection {
        let conn = Connection::open(&self.db_path).unwrap();
        conn.execute_batch("PRAGMA foreign_keys = ON;").unwrap();
        conn
    }

    /// Insert an item row, optionally with a title metadata entry.
    /// The item id doubles as the metadata value id.
    pub fn add_item(&self, item_id: i64, key: &str, title: Option<&str>, date_added: &str) {
        let conn = self.conn();
        conn.execute(
            "INSERT INTO items (itemID, key, dateAdded, dateModified) VALUES (?1, ?2, ?3, ?3)",
            params![item_id, key, date_added],
        )
        .unwrap();
        if let Some(title) = title {
            conn.execute(
                "INSERT INTO itemDataValues (valueID, value) VALUES (?1, ?2)",
                params![item_id, title],
            )
            .unwrap();
            conn.execute(
                "INSERT INTO itemData (itemID, fieldID, valueID) VALUES (?1, 1, ?1)",
                params![item_id],
            )
            .unwrap();
        }
    }

    pub fn add_attachment(
        &self,
        att_id: i64,
        key: &str,
        parent_id: i64,
        stored_path: &str,
        date_added: &str,
    ) {
        self.add_typed_attachment(att_id, key, parent_id, stored_path, date_added, "application/pdf");
    }

    pub fn add_typed_attachment(
        &self,
        att_id: i64,
        key: &str,
        parent_id: i64,
        stored_path: &str,
        date_added: &str,
        content_type: &str,
    ) {
        self.add_item(att_id, key, None, date_added);
        self.conn()
            .execute(
                "INSERT INTO itemAttachments (itemID, parentItemID, contentType, path) \
                 VALUES (?1, ?2, ?3, ?4)",
                params![att_id, parent_id, content_type, stored_path],
            )
            .unwrap();
    }

    pub fn add_note(
        &self,
        note_id: i64,
        key: &str,
        parent_id: Option<i64>,
        note_html: &str,
        date_added: &str,
    ) {
        self.add_item(note_id, key, None, date_added);
        self.conn()
            .execute(
                "INSERT INTO itemNotes (itemID, parentItemID, note) VALUES (?1, ?2, ?3)",
                params![note_id, parent_id, note_html],
            )
            .unwrap();
    }

    /// Drop a file into an attachment's storage folder.
    pub fn write_storage_file(&self, att_key: &str, filename: &str, contents: &[u8]) -> PathBuf {
        let folder = self.storage_dir.join(att_key);
        fs::create_dir_all(&folder).unwrap();
        let path = folder.join(filename);
        fs::write(&path, contents).unwrap();
        path
    }

    pub fn item_exists(&self, item_id: i64) -> bool {
        let count: i64 = self
            .conn()
            .query_row(
                "SELECT COUNT(*) FROM items WHERE itemID = ?1",
                params![item_id],
                |row| row.get(0),
            )
            .unwrap();
        count > 0
    }

    pub fn delete_item(&self, item_id: i64) {
        self.conn()
            .execute("DELETE FROM items WHERE itemID = ?1", params![item_id])
            .unwrap();
    }

    /// Install a trigger that makes deleting one specific item fail,
    /// to exercise transaction rollback.
    pub fn block_item_delete(&self, item_id: i64) {
        self.conn()
            .execute_batch(&format!(
                "CREATE TRIGGER block_delete BEFORE DELETE ON items \
                 WHEN OLD.itemID = {item_id} \
                 BEGIN SELECT RAISE(ABORT, 'delete blocked by test trigger'); END;"
            ))
            .unwrap();
    }
}
