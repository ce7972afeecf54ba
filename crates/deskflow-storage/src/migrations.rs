// SPDX-FileCopyrightText: 2026 Deskflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Embedded database migrations using refinery.
//!
//! SQL migration files are compiled into the binary at build time via
//! `embed_migrations!`. Migrations run automatically on database open.

use deskflow_core::DeskflowError;

mod embedded {
    use refinery::embed_migrations;
    embed_migrations!("migrations");
}

/// Run all pending migrations against the given connection.
///
/// Refinery tracks applied migrations in its own `refinery_schema_history` table.
/// Returns the number of migrations applied by this call.
pub fn run_migrations(conn: &mut rusqlite::Connection) -> Result<usize, DeskflowError> {
    let report = embedded::migrations::runner()
        .run(conn)
        .map_err(|e| DeskflowError::Storage {
            source: e.to_string().into(),
        })?;
    Ok(report.applied_migrations().len())
}
