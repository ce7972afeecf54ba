// SPDX-FileCopyrightText: 2026 Deskflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The ticket aggregate and the inputs that create and mutate it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{
    DepartmentId, FileId, HelpTopicId, MessageId, TicketId, TicketStatus, TransferId, UserId,
};

/// A user-reported issue routed through departments and help topics to an agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ticket {
    pub id: TicketId,
    /// Human-facing number, issued once from the `Ticket` sequence.
    pub number: i64,
    pub title: String,
    pub description: String,
    pub status: TicketStatus,
    pub rating: Option<u8>,
    pub comment: String,
    pub justification: String,
    pub owner: UserId,
    pub assigned_to: Option<UserId>,
    pub department: DepartmentId,
    pub help_topic: HelpTopicId,
    pub messages: Vec<MessageId>,
    pub files: Vec<FileId>,
    pub transfers: Vec<TransferId>,
    pub assigned_at: Option<DateTime<Utc>>,
    pub answered_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Caller-supplied data for a new ticket.
///
/// `department` and `help_topic` are accepted for validation only; the
/// classifier decides the final routing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewTicket {
    pub title: String,
    pub description: String,
    pub owner: UserId,
    #[serde(default)]
    pub status: Option<TicketStatus>,
    #[serde(default)]
    pub assigned_to: Option<UserId>,
    #[serde(default)]
    pub department: Option<DepartmentId>,
    #[serde(default)]
    pub help_topic: Option<HelpTopicId>,
    #[serde(default)]
    pub messages: Vec<MessageId>,
    #[serde(default)]
    pub files: Vec<FileId>,
    #[serde(default)]
    pub transfers: Vec<TransferId>,
}

/// Partial edit of a ticket's free-text fields and status.
/// Absent or empty fields leave the ticket untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TicketPatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Option<TicketStatus>,
    #[serde(default)]
    pub justification: Option<String>,
}

impl TicketPatch {
    /// Merges the non-empty fields of this patch into `ticket`.
    pub fn merge_into(&self, ticket: &mut Ticket) {
        if let Some(title) = non_empty(&self.title) {
            ticket.title = title.to_string();
        }
        if let Some(description) = non_empty(&self.description) {
            ticket.description = description.to_string();
        }
        if let Some(status) = self.status {
            ticket.status = status;
        }
        if let Some(justification) = non_empty(&self.justification) {
            ticket.justification = justification.to_string();
        }
    }

    /// True when the patch moves the ticket into CLOSED or CANCELED.
    pub fn closes(&self) -> bool {
        self.status.is_some_and(TicketStatus::is_terminal)
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// Author feedback recorded once a ticket is finished.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RatingInput {
    #[serde(default)]
    pub rating: Option<u8>,
    #[serde(default)]
    pub comment: Option<String>,
}

/// Equality filter for ticket lookups. `None` fields match everything.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TicketFilter {
    #[serde(default)]
    pub status: Option<TicketStatus>,
    #[serde(default)]
    pub owner: Option<UserId>,
    #[serde(default)]
    pub assigned_to: Option<UserId>,
    #[serde(default)]
    pub department: Option<DepartmentId>,
    #[serde(default)]
    pub help_topic: Option<HelpTopicId>,
}

impl TicketFilter {
    pub fn matches(&self, ticket: &Ticket) -> bool {
        self.status.is_none_or(|s| s == ticket.status)
            && self.owner.as_ref().is_none_or(|o| *o == ticket.owner)
            && self
                .assigned_to
                .as_ref()
                .is_none_or(|a| ticket.assigned_to.as_ref() == Some(a))
            && self
                .department
                .as_ref()
                .is_none_or(|d| *d == ticket.department)
            && self
                .help_topic
                .as_ref()
                .is_none_or(|h| *h == ticket.help_topic)
    }
}
