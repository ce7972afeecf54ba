// SPDX-FileCopyrightText: 2026 Deskflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Named sequence counters.
//!
//! Increment-and-read happens in one UPSERT ... RETURNING statement, so two
//! callers can never observe the same value even across connections.

use chrono::Utc;
use deskflow_core::DeskflowError;
use rusqlite::params;

use super::encode_ts;
use crate::database::{Database, map_tr_err};

/// Increment the named counter (creating it at 1) and return the new value.
pub async fn next_value(db: &Database, model: &str) -> Result<i64, DeskflowError> {
    let model = model.to_string();
    let now = encode_ts(&Utc::now());
    db.connection()
        .call(move |conn| {
            conn.query_row(
                "INSERT INTO counters (model, sequence_value, created_at, updated_at)
                 VALUES (?1, 1, ?2, ?2)
                 ON CONFLICT(model) DO UPDATE SET
                    sequence_value = sequence_value + 1,
                    updated_at = excluded.updated_at
                 RETURNING sequence_value",
                params![model, now],
                |row| row.get(0),
            )
        })
        .await
        .map_err(map_tr_err)
}

/// Current value of the named counter, or `None` if it was never incremented.
pub async fn current_value(db: &Database, model: &str) -> Result<Option<i64>, DeskflowError> {
    let model = model.to_string();
    db.connection()
        .call(move |conn| {
            match conn.query_row(
                "SELECT sequence_value FROM counters WHERE model = ?1",
                params![model],
                |row| row.get(0),
            ) {
                Ok(value) => Ok(Some(value)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(map_tr_err)
}
