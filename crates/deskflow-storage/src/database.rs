// SPDX-FileCopyrightText: 2026 Deskflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Database connection management with PRAGMA setup, WAL mode, and lifecycle.
//!
//! All writes are serialized through tokio-rusqlite's single background
//! thread. The `Database` struct is the single writer: query modules accept
//! `&Database` and go through [`Database::connection`]. Do NOT create
//! additional Connection instances for writes.

use std::path::Path;

use deskflow_core::DeskflowError;
use tracing::{debug, info};

use crate::migrations;

/// Convert a tokio-rusqlite error into `DeskflowError::Storage`.
pub(crate) fn map_tr_err(e: tokio_rusqlite::Error<rusqlite::Error>) -> DeskflowError {
    DeskflowError::Storage {
        source: Box::new(e),
    }
}

/// Handle to the SQLite database.
pub struct Database {
    conn: tokio_rusqlite::Connection,
}

impl Database {
    /// Open (or create) the database at `path`, apply connection PRAGMAs,
    /// and run pending migrations.
    ///
    /// Parent directories are created as needed. `:memory:` opens a private
    /// in-memory database.
    pub async fn open(path: &str, wal_mode: bool) -> Result<Self, DeskflowError> {
        if path != ":memory:"
            && let Some(parent) = Path::new(path).parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| DeskflowError::Storage {
                source: Box::new(e),
            })?;
        }

        let conn = tokio_rusqlite::Connection::open(path)
            .await
            .map_err(|e| DeskflowError::Storage {
                source: Box::new(e),
            })?;

        let applied = conn
            .call(move |conn| -> Result<Result<usize, DeskflowError>, rusqlite::Error> {
                apply_pragmas(conn, wal_mode)?;
                Ok(migrations::run_migrations(conn))
            })
            .await
            .map_err(map_tr_err)??;

        if applied > 0 {
            info!(path, applied, "database migrations applied");
        }
        debug!(path, wal_mode, "database opened");
        Ok(Self { conn })
    }

    /// The underlying single-writer connection.
    pub fn connection(&self) -> &tokio_rusqlite::Connection {
        &self.conn
    }

    /// Checkpoint the WAL so the main database file is self-contained.
    pub async fn checkpoint(&self) -> Result<(), DeskflowError> {
        self.conn
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;
        debug!("WAL checkpoint complete");
        Ok(())
    }
}

fn apply_pragmas(conn: &rusqlite::Connection, wal_mode: bool) -> Result<(), rusqlite::Error> {
    if wal_mode {
        // journal_mode returns the resulting mode as a row.
        conn.query_row("PRAGMA journal_mode = WAL;", [], |_| Ok(()))?;
    }
    conn.execute_batch(
        "PRAGMA foreign_keys = ON;
         PRAGMA busy_timeout = 5000;
         PRAGMA synchronous = NORMAL;",
    )?;
    Ok(())
}
