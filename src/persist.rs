//! TaskStore ↔ redb persistence.
//!
//! redb is a save file: loaded on boot, written through on every mutation.
//! Never queried at runtime — TaskStore is the runtime truth.

use crate::store::{Task, TaskStore};
use redb::{Database, ReadableTable, TableDefinition};
use std::sync::Arc;
use uuid::Uuid;

const TASKS_TABLE: TableDefinition<&[u8], &[u8]> = TableDefinition::new("tasks");

/// Thin handle to the redb file. Cloneable (Arc inside).
#[derive(Clone)]
pub struct SaveFile {
    db: Arc<Database>,
}

impl SaveFile {
    /// Open (or create) the save file at the given path.
    /// Creates the table if it doesn't exist.
    pub fn open(path: &str) -> Result<Self, SaveFileError> {
        let db = Database::create(path)?;

        let txn = db.begin_write()?;
        {
            let _ = txn.open_table(TASKS_TABLE)?;
        }
        txn.commit()?;

        Ok(SaveFile { db: Arc::new(db) })
    }

    /// Load the entire store from disk. Called once at boot.
    pub fn load_store(&self) -> Result<TaskStore, SaveFileError> {
        let mut store = TaskStore::new();
        let txn = self.db.begin_read()?;

        let table = txn.open_table(TASKS_TABLE)?;
        for entry in table.iter()? {
            let (_, value) = entry?;
            let task: Task = postcard::from_bytes(value.value())
                .map_err(|e| SaveFileError::Decode(e.to_string()))?;
            store.tasks.insert(task.id, task);
        }

        Ok(store)
    }

    /// Write one task to disk. Called after create and after a status
    /// update — the whole entity is rewritten either way.
    pub fn save_task(&self, task: &Task) -> Result<(), SaveFileError> {
        let txn = self.db.begin_write()?;
        {
            let mut table = txn.open_table(TASKS_TABLE)?;
            let bytes = postcard::to_allocvec(task)
                .map_err(|e| SaveFileError::Encode(e.to_string()))?;
            table.insert(task.id.as_bytes().as_slice(), bytes.as_slice())?;
        }
        txn.commit()?;
        Ok(())
    }

    /// Remove one task from disk. Called after a delete.
    pub fn remove_task(&self, id: Uuid) -> Result<(), SaveFileError> {
        let txn = self.db.begin_write()?;
        {
            let mut table = txn.open_table(TASKS_TABLE)?;
            table.remove(id.as_bytes().as_slice())?;
        }
        txn.commit()?;
        Ok(())
    }
}

// ── Errors ─────────────────────────────────────────────────────

#[derive(Debug)]
pub enum SaveFileError {
    Redb(String),
    Decode(String),
    Encode(String),
}

// redb 2.x has many error types. Blanket them all into SaveFileError::Redb.
macro_rules! from_redb {
    ($($t:ty),*) => {
        $(impl From<$t> for SaveFileError {
            fn from(e: $t) -> Self { SaveFileError::Redb(e.to_string()) }
        })*
    };
}

from_redb!(
    redb::Error,
    redb::DatabaseError,
    redb::TableError,
    redb::TransactionError,
    redb::StorageError,
    redb::CommitError
);

impl std::fmt::Display for SaveFileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SaveFileError::Redb(e) => write!(f, "redb: {e}"),
            SaveFileError::Decode(e) => write!(f, "decode: {e}"),
            SaveFileError::Encode(e) => write!(f, "encode: {e}"),
        }
    }
}

impl std::error::Error for SaveFileError {}

// ── Tests ──────────────────────────────────────────────────────
