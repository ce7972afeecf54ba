// SPDX-FileCopyrightText: 2026 Deskflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Linking and unlinking items: one handler per [`TicketItem`] variant.

use chrono::Utc;
use deskflow_core::{
    DepartmentId, DeskflowError, HelpTopicId, Ticket, TicketId, TicketStatus, TransferDraft,
    UserId,
};
use tracing::{debug, info};

use super::{ASSIGNMENT, CREATION, TicketWorkflowEngine};
use crate::coverage::CoverageOutcome;
use crate::item::{ItemKind, ItemPayload, TicketItem, insert_unique, remove_first};

/// What must happen once the ticket has been saved.
enum FollowUp {
    Nothing,
    Assigned,
    ReturnedToPool,
}

impl TicketWorkflowEngine {
    /// Links the item of `kind` found in `payload` to the ticket.
    ///
    /// A payload without that key leaves the ticket untouched. Assignment,
    /// department and help-topic changes each append one transfer record.
    pub async fn add_item(
        &self,
        id: &TicketId,
        payload: &ItemPayload,
        kind: ItemKind,
    ) -> Result<Ticket, DeskflowError> {
        let mut ticket = self.find_by_id(id).await?;
        let Some(item) = TicketItem::from_payload(kind, payload) else {
            debug!(ticket_id = %id, kind = %kind, "payload has no item of this kind");
            return Ok(ticket);
        };
        self.validator.verify(&[item.reference()]).await?;

        let follow_up = match item {
            TicketItem::Message(message) => {
                insert_unique(&mut ticket.messages, message);
                FollowUp::Nothing
            }
            TicketItem::File(file) => {
                insert_unique(&mut ticket.files, file);
                FollowUp::Nothing
            }
            TicketItem::Transfer(transfer) => {
                insert_unique(&mut ticket.transfers, transfer);
                FollowUp::Nothing
            }
            TicketItem::AssignedTo(agent) => self.assign(&mut ticket, agent).await?,
            TicketItem::Department(department) => {
                self.move_to_department(&mut ticket, department).await?
            }
            TicketItem::HelpTopic(help_topic) => {
                self.move_to_help_topic(&mut ticket, help_topic).await?
            }
        };

        ticket.updated_at = Utc::now();
        self.tickets.save(&ticket).await?;
        info!(ticket_id = %ticket.id, kind = %kind, "item added");

        match follow_up {
            FollowUp::Nothing => {}
            FollowUp::Assigned => self.notify_later(&ticket.id, ASSIGNMENT),
            FollowUp::ReturnedToPool => self.notify_later(&ticket.id, CREATION),
        }
        Ok(ticket)
    }

    /// Unlinks the first matching message, file or transfer reference.
    /// Department, assignee and help topic cannot be unlinked.
    pub async fn remove_item(
        &self,
        id: &TicketId,
        payload: &ItemPayload,
        kind: ItemKind,
    ) -> Result<Ticket, DeskflowError> {
        let mut ticket = self.find_by_id(id).await?;
        let Some(item) = TicketItem::from_payload(kind, payload) else {
            debug!(ticket_id = %id, kind = %kind, "payload has no item of this kind");
            return Ok(ticket);
        };
        self.validator.verify(&[item.reference()]).await?;

        let removed = match &item {
            TicketItem::Message(message) => remove_first(&mut ticket.messages, message),
            TicketItem::File(file) => remove_first(&mut ticket.files, file),
            TicketItem::Transfer(transfer) => remove_first(&mut ticket.transfers, transfer),
            TicketItem::Department(_) | TicketItem::AssignedTo(_) | TicketItem::HelpTopic(_) => {
                debug!(ticket_id = %id, kind = %kind, "item kind cannot be removed");
                return Ok(ticket);
            }
        };

        if removed {
            ticket.updated_at = Utc::now();
        }
        self.tickets.save(&ticket).await?;
        info!(ticket_id = %ticket.id, kind = %kind, removed, "item removed");
        Ok(ticket)
    }

    async fn assign(&self, ticket: &mut Ticket, agent: UserId) -> Result<FollowUp, DeskflowError> {
        let draft = TransferDraft::for_ticket(ticket.id.clone())
            .assignment(ticket.assigned_to.clone(), agent.clone());
        let record = self.ledger.record(draft).await?;

        ticket.assigned_to = Some(agent);
        ticket.status = TicketStatus::Assigned;
        if ticket.assigned_at.is_none() {
            ticket.assigned_at = Some(record.created_at);
        }
        ticket.transfers.push(record.id);
        Ok(FollowUp::Assigned)
    }

    async fn move_to_department(
        &self,
        ticket: &mut Ticket,
        department: DepartmentId,
    ) -> Result<FollowUp, DeskflowError> {
        let draft = TransferDraft::for_ticket(ticket.id.clone())
            .department(ticket.department.clone(), department.clone());
        let record = self.ledger.record(draft).await?;

        ticket.department = department.clone();
        ticket.transfers.push(record.id);
        self.recheck_coverage(ticket, department).await
    }

    async fn move_to_help_topic(
        &self,
        ticket: &mut Ticket,
        help_topic: HelpTopicId,
    ) -> Result<FollowUp, DeskflowError> {
        let topic = self
            .help_topics
            .find_by_id(&help_topic)
            .await?
            .ok_or_else(|| DeskflowError::not_found("help topic", &help_topic))?;

        let draft = TransferDraft::for_ticket(ticket.id.clone())
            .department(ticket.department.clone(), topic.department.clone())
            .help_topic(ticket.help_topic.clone(), topic.id.clone());
        let record = self.ledger.record(draft).await?;

        ticket.help_topic = topic.id;
        ticket.department = topic.department.clone();
        ticket.transfers.push(record.id);
        self.recheck_coverage(ticket, topic.department).await
    }

    async fn recheck_coverage(
        &self,
        ticket: &mut Ticket,
        department: DepartmentId,
    ) -> Result<FollowUp, DeskflowError> {
        match self.coverage.ensure_coverage(ticket, &[department]).await? {
            CoverageOutcome::Released { .. } => Ok(FollowUp::ReturnedToPool),
            CoverageOutcome::Unassigned | CoverageOutcome::Covered => Ok(FollowUp::Nothing),
        }
    }
}
