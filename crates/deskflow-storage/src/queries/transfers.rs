// SPDX-FileCopyrightText: 2026 Deskflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Transfer record CRUD operations.

use deskflow_core::{
    DepartmentId, DeskflowError, HelpTopicId, TicketId, TransferId, TransferRecord, UserId,
};
use rusqlite::params;

use super::{decode_ts, encode_ts};
use crate::database::{Database, map_tr_err};

const COLUMNS: &str = "id, ticket, pre_department, next_department, pre_assigned, next_assigned, \
     pre_help_topic, next_help_topic, created_at, updated_at";

fn record_from_row(row: &rusqlite::Row<'_>) -> Result<TransferRecord, rusqlite::Error> {
    Ok(TransferRecord {
        id: TransferId(row.get(0)?),
        ticket: TicketId(row.get(1)?),
        pre_department: row.get::<_, Option<String>>(2)?.map(DepartmentId),
        next_department: row.get::<_, Option<String>>(3)?.map(DepartmentId),
        pre_assigned: row.get::<_, Option<String>>(4)?.map(UserId),
        next_assigned: row.get::<_, Option<String>>(5)?.map(UserId),
        pre_help_topic: row.get::<_, Option<String>>(6)?.map(HelpTopicId),
        next_help_topic: row.get::<_, Option<String>>(7)?.map(HelpTopicId),
        created_at: decode_ts(8, row.get(8)?)?,
        updated_at: decode_ts(9, row.get(9)?)?,
    })
}

fn opt(value: &Option<impl AsRef<str>>) -> Option<String> {
    value.as_ref().map(|v| v.as_ref().to_string())
}

/// Insert a new transfer record.
pub async fn insert_transfer(db: &Database, record: &TransferRecord) -> Result<(), DeskflowError> {
    let id = record.id.0.clone();
    let ticket = record.ticket.0.clone();
    let pre_department = opt(&record.pre_department);
    let next_department = opt(&record.next_department);
    let pre_assigned = opt(&record.pre_assigned);
    let next_assigned = opt(&record.next_assigned);
    let pre_help_topic = opt(&record.pre_help_topic);
    let next_help_topic = opt(&record.next_help_topic);
    let created_at = encode_ts(&record.created_at);
    let updated_at = encode_ts(&record.updated_at);
    db.connection()
        .call(move |conn| {
            conn.execute(
                &format!(
                    "INSERT INTO transfers ({COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)"
                ),
                params![
                    id,
                    ticket,
                    pre_department,
                    next_department,
                    pre_assigned,
                    next_assigned,
                    pre_help_topic,
                    next_help_topic,
                    created_at,
                    updated_at,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// Rewrite the routing fields of an existing record. Returns false when the id is unknown.
pub async fn update_transfer(db: &Database, record: &TransferRecord) -> Result<bool, DeskflowError> {
    let id = record.id.0.clone();
    let ticket = record.ticket.0.clone();
    let pre_department = opt(&record.pre_department);
    let next_department = opt(&record.next_department);
    let pre_assigned = opt(&record.pre_assigned);
    let next_assigned = opt(&record.next_assigned);
    let pre_help_topic = opt(&record.pre_help_topic);
    let next_help_topic = opt(&record.next_help_topic);
    let updated_at = encode_ts(&record.updated_at);
    db.connection()
        .call(move |conn| {
            let changed = conn.execute(
                "UPDATE transfers SET ticket = ?2, pre_department = ?3, next_department = ?4,
                    pre_assigned = ?5, next_assigned = ?6, pre_help_topic = ?7,
                    next_help_topic = ?8, updated_at = ?9
                 WHERE id = ?1",
                params![
                    id,
                    ticket,
                    pre_department,
                    next_department,
                    pre_assigned,
                    next_assigned,
                    pre_help_topic,
                    next_help_topic,
                    updated_at,
                ],
            )?;
            Ok(changed > 0)
        })
        .await
        .map_err(map_tr_err)
}

/// Get a transfer record by ID.
pub async fn get_transfer(
    db: &Database,
    id: &TransferId,
) -> Result<Option<TransferRecord>, DeskflowError> {
    let id = id.0.clone();
    db.connection()
        .call(move |conn| {
            let mut stmt =
                conn.prepare(&format!("SELECT {COLUMNS} FROM transfers WHERE id = ?1"))?;
            match stmt.query_row(params![id], record_from_row) {
                Ok(record) => Ok(Some(record)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(map_tr_err)
}

/// All records of one ticket in creation order.
pub async fn get_transfers_for_ticket(
    db: &Database,
    ticket: &TicketId,
) -> Result<Vec<TransferRecord>, DeskflowError> {
    let ticket = ticket.0.clone();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {COLUMNS} FROM transfers WHERE ticket = ?1 ORDER BY created_at ASC, rowid ASC"
            ))?;
            let rows = stmt.query_map(params![ticket], record_from_row)?;
            rows.collect()
        })
        .await
        .map_err(map_tr_err)
}

/// Delete a transfer record. Returns false when nothing was deleted.
pub async fn delete_transfer(db: &Database, id: &TransferId) -> Result<bool, DeskflowError> {
    let id = id.0.clone();
    db.connection()
        .call(move |conn| {
            let changed = conn.execute("DELETE FROM transfers WHERE id = ?1", params![id])?;
            Ok(changed > 0)
        })
        .await
        .map_err(map_tr_err)
}
