use rusqlite::{Connection, OpenFlags, Result, Transaction, TransactionBehavior};
use std::path::Path;
use std::time::Duration;
use tracing::debug;

/// Bounded wait for the database lock before giving up.
const BUSY_TIMEOUT: Duration = Duration::from_secs(30);

/// One connection to the reference-library database. Analysis uses a
/// read-only immutable connection; deletion opens a separate writable
/// one. The two are never held at the same time.
pub struct Library {
    conn: Connection,
}

impl Library {
    /// Open for analysis. The connection is read-only and declared
    /// immutable, so a reference manager holding the file open cannot
    /// block the scan.
    pub fn open_readonly(path: &Path) -> Result<Self> {
        let uri = format!("file:{}?mode=ro&immutable=1", path.display());
        let conn = Connection::open_with_flags(
            uri,
            OpenFlags::SQLITE_OPEN_READ_ONLY
                | OpenFlags::SQLITE_OPEN_URI
                | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        debug!("Opened library read-only: {}", path.display());
        Ok(Library { conn })
    }

    /// Open for deletion. Read-write without create, with foreign keys
    /// on so attachment and note child rows cascade with their items.
    pub fn open_writable(path: &Path) -> Result<Self> {
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        debug!("Opened library read-write: {}", path.display());
        Ok(Library { conn })
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Begin the single IMMEDIATE transaction a deletion run uses.
    /// Dropping the returned transaction without committing rolls the
    /// whole batch back.
    pub fn immediate_transaction(&mut self) -> Result<Transaction<'_>> {
        self.conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
    }
}
