//! SQLite-backed note store shared by both windows.
//!
//! Each window context holds its own [`Storage`] opened against the same
//! [`StoreDescriptor`]. Nothing is shared in memory; the database file is the
//! only meeting point, and SQLite's file locking keeps individual statements
//! atomic.

use crate::{Note, PopnotesError, Result, StoreDescriptor};
use rusqlite::{Connection, OpenFlags};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// How long a statement waits on the other window's write lock before failing.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

pub struct Storage {
    conn: Connection,
    descriptor: StoreDescriptor,
}

impl Storage {
    /// Opens the database named by `descriptor`, creating the file and the
    /// `notes` table if they are absent. Safe to call on an existing store.
    ///
    /// # Errors
    ///
    /// Returns [`PopnotesError::StoreUnavailable`] if the directory, file, or
    /// schema cannot be created.
    pub fn init(descriptor: &StoreDescriptor, base_dir: &Path) -> Result<Self> {
        let path = descriptor.resolve(base_dir);
        if !descriptor.is_in_memory() {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).map_err(|e| {
                    PopnotesError::StoreUnavailable(format!(
                        "cannot create {}: {e}",
                        parent.display()
                    ))
                })?;
            }
        }

        let conn = Connection::open(&path).map_err(unavailable)?;
        conn.busy_timeout(BUSY_TIMEOUT).map_err(unavailable)?;
        conn.execute_batch(include_str!("schema.sql"))
            .map_err(unavailable)?;

        log::info!("note store ready at {}", path.display());
        Ok(Self {
            conn,
            descriptor: descriptor.clone(),
        })
    }

    /// Opens an additional handle to a store that some other context has
    /// already initialized. Neither the file nor the schema is created.
    ///
    /// # Errors
    ///
    /// Returns [`PopnotesError::StoreUnavailable`] if the file does not exist
    /// or does not contain a `notes` table.
    pub fn open(descriptor: &StoreDescriptor, base_dir: &Path) -> Result<Self> {
        let path = descriptor.resolve(base_dir);
        let conn = Connection::open_with_flags(
            &path,
            OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_URI
                | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(unavailable)?;
        conn.busy_timeout(BUSY_TIMEOUT).map_err(unavailable)?;

        let table_count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name='notes'",
                [],
                |row| row.get(0),
            )
            .map_err(unavailable)?;

        if table_count != 1 {
            return Err(PopnotesError::StoreUnavailable(format!(
                "{descriptor} has no notes table"
            )));
        }

        Ok(Self {
            conn,
            descriptor: descriptor.clone(),
        })
    }

    pub fn descriptor(&self) -> &StoreDescriptor {
        &self.descriptor
    }

    /// Returns every note, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`PopnotesError::QueryFailed`] if the query cannot run.
    pub fn list_notes(&self) -> Result<Vec<Note>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, title, body, created_at FROM notes ORDER BY id DESC")
            .map_err(PopnotesError::QueryFailed)?;
        let notes = stmt
            .query_map([], |row| {
                Ok(Note {
                    id: row.get(0)?,
                    title: row.get(1)?,
                    body: row.get(2)?,
                    created_at: row.get(3)?,
                })
            })
            .map_err(PopnotesError::QueryFailed)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(PopnotesError::QueryFailed)?;
        Ok(notes)
    }

    /// Appends a note and returns the id the database assigned to it.
    ///
    /// The title is stored as given; validate it with
    /// [`validate_title`](crate::validate_title) first.
    ///
    /// # Errors
    ///
    /// Returns [`PopnotesError::WriteFailed`] on constraint violation or I/O error.
    pub fn insert_note(&self, title: &str, body: &str) -> Result<i64> {
        self.conn
            .execute(
                "INSERT INTO notes (title, body) VALUES (?1, ?2)",
                rusqlite::params![title, body],
            )
            .map_err(PopnotesError::WriteFailed)?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Removes the note with `id`. A missing id is not an error: the other
    /// window may already have deleted it.
    ///
    /// # Errors
    ///
    /// Returns [`PopnotesError::WriteFailed`] if the statement cannot run.
    pub fn delete_note(&self, id: i64) -> Result<()> {
        let removed = self
            .conn
            .execute("DELETE FROM notes WHERE id = ?1", [id])
            .map_err(PopnotesError::WriteFailed)?;
        if removed == 0 {
            log::debug!("delete of note {id} matched nothing");
        }
        Ok(())
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

fn unavailable(e: rusqlite::Error) -> PopnotesError {
    PopnotesError::StoreUnavailable(e.to_string())
}
