// SPDX-FileCopyrightText: 2026 Deskflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Transfer records: the audit trail of routing changes on a ticket.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{DepartmentId, HelpTopicId, TicketId, TransferId, UserId};

/// Immutable before/after snapshot of one routing change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferRecord {
    pub id: TransferId,
    pub ticket: TicketId,
    pub pre_department: Option<DepartmentId>,
    pub next_department: Option<DepartmentId>,
    pub pre_assigned: Option<UserId>,
    pub next_assigned: Option<UserId>,
    pub pre_help_topic: Option<HelpTopicId>,
    pub next_help_topic: Option<HelpTopicId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The fields of a transfer record before it is written.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TransferDraft {
    pub ticket: Option<TicketId>,
    #[serde(default)]
    pub pre_department: Option<DepartmentId>,
    #[serde(default)]
    pub next_department: Option<DepartmentId>,
    #[serde(default)]
    pub pre_assigned: Option<UserId>,
    #[serde(default)]
    pub next_assigned: Option<UserId>,
    #[serde(default)]
    pub pre_help_topic: Option<HelpTopicId>,
    #[serde(default)]
    pub next_help_topic: Option<HelpTopicId>,
}

impl TransferDraft {
    pub fn for_ticket(ticket: TicketId) -> Self {
        Self {
            ticket: Some(ticket),
            ..Self::default()
        }
    }

    /// Reassignment from `previous` (if any) to `next`.
    pub fn assignment(mut self, previous: Option<UserId>, next: UserId) -> Self {
        self.pre_assigned = previous;
        self.next_assigned = Some(next);
        self
    }

    pub fn department(mut self, previous: DepartmentId, next: DepartmentId) -> Self {
        self.pre_department = Some(previous);
        self.next_department = Some(next);
        self
    }

    pub fn help_topic(mut self, previous: HelpTopicId, next: HelpTopicId) -> Self {
        self.pre_help_topic = Some(previous);
        self.next_help_topic = Some(next);
        self
    }

    /// Builds the stored record, or `None` when the draft names no ticket.
    pub fn into_record(self, id: TransferId, now: DateTime<Utc>) -> Option<TransferRecord> {
        Some(TransferRecord {
            id,
            ticket: self.ticket?,
            pre_department: self.pre_department,
            next_department: self.next_department,
            pre_assigned: self.pre_assigned,
            next_assigned: self.next_assigned,
            pre_help_topic: self.pre_help_topic,
            next_help_topic: self.next_help_topic,
            created_at: now,
            updated_at: now,
        })
    }
}
