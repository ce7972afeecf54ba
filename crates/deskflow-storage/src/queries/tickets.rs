// SPDX-FileCopyrightText: 2026 Deskflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ticket CRUD operations.

use std::str::FromStr;

use deskflow_core::{
    DepartmentId, DeskflowError, HelpTopicId, Ticket, TicketFilter, TicketId, TicketStatus,
    UserId,
};
use rusqlite::params;
use rusqlite::types::Type;

use super::{decode_json, decode_opt_ts, decode_ts, encode_json, encode_ts};
use crate::database::{Database, map_tr_err};

const COLUMNS: &str = "id, number, title, description, status, rating, comment, justification, \
     owner, assigned_to, department, help_topic, messages, files, transfers, \
     assigned_at, answered_at, completed_at, created_at, updated_at";

/// Ticket columns flattened to SQL values.
struct TicketColumns {
    id: String,
    number: i64,
    title: String,
    description: String,
    status: String,
    rating: Option<u8>,
    comment: String,
    justification: String,
    owner: String,
    assigned_to: Option<String>,
    department: String,
    help_topic: String,
    messages: String,
    files: String,
    transfers: String,
    assigned_at: Option<String>,
    answered_at: Option<String>,
    completed_at: Option<String>,
    created_at: String,
    updated_at: String,
}

impl TicketColumns {
    fn encode(ticket: &Ticket) -> Result<Self, DeskflowError> {
        Ok(Self {
            id: ticket.id.0.clone(),
            number: ticket.number,
            title: ticket.title.clone(),
            description: ticket.description.clone(),
            status: ticket.status.to_string(),
            rating: ticket.rating,
            comment: ticket.comment.clone(),
            justification: ticket.justification.clone(),
            owner: ticket.owner.0.clone(),
            assigned_to: ticket.assigned_to.as_ref().map(|u| u.0.clone()),
            department: ticket.department.0.clone(),
            help_topic: ticket.help_topic.0.clone(),
            messages: encode_json(&ticket.messages)?,
            files: encode_json(&ticket.files)?,
            transfers: encode_json(&ticket.transfers)?,
            assigned_at: ticket.assigned_at.as_ref().map(encode_ts),
            answered_at: ticket.answered_at.as_ref().map(encode_ts),
            completed_at: ticket.completed_at.as_ref().map(encode_ts),
            created_at: encode_ts(&ticket.created_at),
            updated_at: encode_ts(&ticket.updated_at),
        })
    }
}

fn ticket_from_row(row: &rusqlite::Row<'_>) -> Result<Ticket, rusqlite::Error> {
    let status: String = row.get(4)?;
    let status = TicketStatus::from_str(&status)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(4, Type::Text, Box::new(e)))?;
    Ok(Ticket {
        id: TicketId(row.get(0)?),
        number: row.get(1)?,
        title: row.get(2)?,
        description: row.get(3)?,
        status,
        rating: row.get(5)?,
        comment: row.get(6)?,
        justification: row.get(7)?,
        owner: UserId(row.get(8)?),
        assigned_to: row.get::<_, Option<String>>(9)?.map(UserId),
        department: DepartmentId(row.get(10)?),
        help_topic: HelpTopicId(row.get(11)?),
        messages: decode_json(12, row.get(12)?)?,
        files: decode_json(13, row.get(13)?)?,
        transfers: decode_json(14, row.get(14)?)?,
        assigned_at: decode_opt_ts(15, row.get(15)?)?,
        answered_at: decode_opt_ts(16, row.get(16)?)?,
        completed_at: decode_opt_ts(17, row.get(17)?)?,
        created_at: decode_ts(18, row.get(18)?)?,
        updated_at: decode_ts(19, row.get(19)?)?,
    })
}

/// Insert a new ticket.
pub async fn insert_ticket(db: &Database, ticket: &Ticket) -> Result<(), DeskflowError> {
    let r = TicketColumns::encode(ticket)?;
    db.connection()
        .call(move |conn| {
            conn.execute(
                &format!(
                    "INSERT INTO tickets ({COLUMNS}) VALUES \
                     (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19, ?20)"
                ),
                params![
                    r.id,
                    r.number,
                    r.title,
                    r.description,
                    r.status,
                    r.rating,
                    r.comment,
                    r.justification,
                    r.owner,
                    r.assigned_to,
                    r.department,
                    r.help_topic,
                    r.messages,
                    r.files,
                    r.transfers,
                    r.assigned_at,
                    r.answered_at,
                    r.completed_at,
                    r.created_at,
                    r.updated_at,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// Overwrite every mutable column of an existing ticket.
///
/// `number` and `created_at` are never rewritten. Returns false when no row
/// carries the ticket's id.
pub async fn update_ticket(db: &Database, ticket: &Ticket) -> Result<bool, DeskflowError> {
    let r = TicketColumns::encode(ticket)?;
    db.connection()
        .call(move |conn| {
            let changed = conn.execute(
                "UPDATE tickets SET title = ?2, description = ?3, status = ?4, rating = ?5,
                    comment = ?6, justification = ?7, owner = ?8, assigned_to = ?9,
                    department = ?10, help_topic = ?11, messages = ?12, files = ?13,
                    transfers = ?14, assigned_at = ?15, answered_at = ?16,
                    completed_at = ?17, updated_at = ?18
                 WHERE id = ?1",
                params![
                    r.id,
                    r.title,
                    r.description,
                    r.status,
                    r.rating,
                    r.comment,
                    r.justification,
                    r.owner,
                    r.assigned_to,
                    r.department,
                    r.help_topic,
                    r.messages,
                    r.files,
                    r.transfers,
                    r.assigned_at,
                    r.answered_at,
                    r.completed_at,
                    r.updated_at,
                ],
            )?;
            Ok(changed > 0)
        })
        .await
        .map_err(map_tr_err)
}

/// Get a ticket by ID.
pub async fn get_ticket(db: &Database, id: &TicketId) -> Result<Option<Ticket>, DeskflowError> {
    let id = id.0.clone();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!("SELECT {COLUMNS} FROM tickets WHERE id = ?1"))?;
            match stmt.query_row(params![id], ticket_from_row) {
                Ok(ticket) => Ok(Some(ticket)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(map_tr_err)
}

/// List tickets matching every populated field of `filter`, oldest number first.
pub async fn find_tickets(
    db: &Database,
    filter: &TicketFilter,
) -> Result<Vec<Ticket>, DeskflowError> {
    let status = filter.status.map(|s| s.to_string());
    let owner = filter.owner.as_ref().map(|u| u.0.clone());
    let assigned_to = filter.assigned_to.as_ref().map(|u| u.0.clone());
    let department = filter.department.as_ref().map(|d| d.0.clone());
    let help_topic = filter.help_topic.as_ref().map(|h| h.0.clone());
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {COLUMNS} FROM tickets
                 WHERE (?1 IS NULL OR status = ?1)
                   AND (?2 IS NULL OR owner = ?2)
                   AND (?3 IS NULL OR assigned_to = ?3)
                   AND (?4 IS NULL OR department = ?4)
                   AND (?5 IS NULL OR help_topic = ?5)
                 ORDER BY number ASC"
            ))?;
            let rows = stmt.query_map(
                params![status, owner, assigned_to, department, help_topic],
                ticket_from_row,
            )?;
            rows.collect()
        })
        .await
        .map_err(map_tr_err)
}

/// Delete a ticket. Returns false when nothing was deleted.
pub async fn delete_ticket(db: &Database, id: &TicketId) -> Result<bool, DeskflowError> {
    let id = id.0.clone();
    db.connection()
        .call(move |conn| {
            let changed = conn.execute("DELETE FROM tickets WHERE id = ?1", params![id])?;
            Ok(changed > 0)
        })
        .await
        .map_err(map_tr_err)
}
