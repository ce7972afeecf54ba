// SPDX-FileCopyrightText: 2026 Deskflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Keeps a ticket's assignee consistent with its department.

use std::sync::Arc;

use deskflow_core::{DepartmentId, DeskflowError, Ticket, TicketStatus, UserDirectory, UserId};
use tracing::info;

/// What [`AgentCoverageValidator::ensure_coverage`] did to the ticket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoverageOutcome {
    /// Ticket had no assignee.
    Unassigned,
    /// The assignee covers every department.
    Covered,
    /// The assignee did not cover the departments and was removed.
    Released { agent: UserId },
}

pub struct AgentCoverageValidator {
    users: Arc<dyn UserDirectory>,
}

impl AgentCoverageValidator {
    pub fn new(users: Arc<dyn UserDirectory>) -> Self {
        Self { users }
    }

    /// Returns the ticket to the unassigned pool (no assignee, OPEN, no
    /// `assigned_at`) when its agent does not cover all of `departments`.
    /// Only mutates `ticket`; persisting it is up to the caller.
    pub async fn ensure_coverage(
        &self,
        ticket: &mut Ticket,
        departments: &[DepartmentId],
    ) -> Result<CoverageOutcome, DeskflowError> {
        let Some(agent) = ticket.assigned_to.clone() else {
            return Ok(CoverageOutcome::Unassigned);
        };

        if self.users.covers_departments(&agent, departments).await? {
            return Ok(CoverageOutcome::Covered);
        }

        ticket.assigned_to = None;
        ticket.status = TicketStatus::Open;
        ticket.assigned_at = None;
        info!(
            ticket_id = %ticket.id,
            agent = %agent,
            department = %ticket.department,
            "assignee does not cover department, ticket returned to pool"
        );
        Ok(CoverageOutcome::Released { agent })
    }
}
