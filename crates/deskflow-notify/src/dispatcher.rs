// SPDX-FileCopyrightText: 2026 Deskflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Workflow event notifications.
//!
//! [`NotificationDispatcher::notify`] loads a ticket with its owner,
//! assignee, department, and help topic, renders the template for the event
//! kind, and sends exactly one email.

use std::sync::Arc;

use deskflow_config::model::NotificationConfig;
use deskflow_core::{
    DepartmentCatalog, DeskflowError, EmailSender, HelpTopicCatalog, NotificationKind,
    OutgoingEmail, Ticket, TicketId, TicketRepository, User, UserDirectory, UserId,
};
use tracing::{debug, info};

use crate::templates::{EmailTemplate, TemplateFields, ticket_url};

/// Result of one notification attempt that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationOutcome {
    /// One email went out to this many recipients.
    Sent { recipients: usize },
    /// Nobody covers the ticket's department.
    NoRecipients,
    /// Notifications are switched off.
    Disabled,
}

/// Collaborators the dispatcher reads from.
#[derive(Clone)]
pub struct NotificationSources {
    pub tickets: Arc<dyn TicketRepository>,
    pub users: Arc<dyn UserDirectory>,
    pub departments: Arc<dyn DepartmentCatalog>,
    pub help_topics: Arc<dyn HelpTopicCatalog>,
}

pub struct NotificationDispatcher {
    sources: NotificationSources,
    sender: Arc<dyn EmailSender>,
    config: NotificationConfig,
    subject_suffix: String,
}

impl NotificationDispatcher {
    pub fn new(
        sources: NotificationSources,
        sender: Arc<dyn EmailSender>,
        config: NotificationConfig,
    ) -> Self {
        Self {
            sources,
            sender,
            config,
            subject_suffix: "Tickets".to_string(),
        }
    }

    /// Text appended to every subject line (default `Tickets`).
    pub fn with_subject_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.subject_suffix = suffix.into();
        self
    }

    pub async fn notify(
        &self,
        ticket_id: &TicketId,
        kind: NotificationKind,
    ) -> Result<NotificationOutcome, DeskflowError> {
        if !self.config.enabled {
            debug!(ticket_id = %ticket_id, kind = %kind, "notifications disabled");
            return Ok(NotificationOutcome::Disabled);
        }

        let ticket = self
            .sources
            .tickets
            .find_by_id(ticket_id)
            .await?
            .ok_or_else(|| DeskflowError::not_found("ticket", ticket_id))?;

        let owner = self.require_user(&ticket.owner).await?;
        let assignee = match &ticket.assigned_to {
            Some(agent) => Some(self.require_user(agent).await?),
            None => None,
        };

        let recipients = match kind {
            NotificationKind::Creation => self
                .sources
                .users
                .users_covering_department(&ticket.department)
                .await?
                .into_iter()
                .map(|user| user.email)
                .collect(),
            NotificationKind::AssignmentForAgent => {
                vec![require_assignee(&ticket, assignee.as_ref())?.email.clone()]
            }
            NotificationKind::AssignmentForAuthor | NotificationKind::Closing => {
                require_assignee(&ticket, assignee.as_ref())?;
                vec![owner.email.clone()]
            }
        };

        if recipients.is_empty() {
            info!(
                ticket_id = %ticket.id,
                department = %ticket.department,
                kind = %kind,
                "no recipients for notification"
            );
            return Ok(NotificationOutcome::NoRecipients);
        }

        let fields = self.fields(&ticket, &owner, assignee.as_ref()).await?;
        let template = EmailTemplate::for_kind(kind);
        let email = OutgoingEmail {
            to: recipients,
            subject: template.subject_line(&fields, &self.subject_suffix),
            html: template.render(&fields),
        };

        self.sender.send(&email).await?;
        info!(
            ticket_id = %ticket.id,
            number = ticket.number,
            kind = %kind,
            recipients = email.to.len(),
            "notification sent"
        );
        Ok(NotificationOutcome::Sent {
            recipients: email.to.len(),
        })
    }

    async fn require_user(&self, id: &UserId) -> Result<User, DeskflowError> {
        self.sources
            .users
            .find_by_id(id)
            .await?
            .ok_or_else(|| DeskflowError::not_found("user", id))
    }

    async fn fields(
        &self,
        ticket: &Ticket,
        owner: &User,
        assignee: Option<&User>,
    ) -> Result<TemplateFields, DeskflowError> {
        let department = self
            .sources
            .departments
            .find_by_id(&ticket.department)
            .await?
            .ok_or_else(|| DeskflowError::not_found("department", &ticket.department))?;
        let help_topic = self
            .sources
            .help_topics
            .find_by_id(&ticket.help_topic)
            .await?
            .ok_or_else(|| DeskflowError::not_found("help topic", &ticket.help_topic))?;

        Ok(TemplateFields {
            ticket_number: ticket.number.to_string(),
            ticket_title: ticket.title.clone(),
            help_topic: help_topic.name,
            department: department.name,
            description: ticket.description.clone(),
            url: ticket_url(&self.config.frontend_url, ticket.id.as_str()),
            author: Some(owner.full_name()),
            agent: assignee.map(User::full_name),
        })
    }
}

fn require_assignee<'a>(
    ticket: &Ticket,
    assignee: Option<&'a User>,
) -> Result<&'a User, DeskflowError> {
    assignee.ok_or_else(|| DeskflowError::NotFound {
        entity: "assignee",
        id: format!("no user assigned to ticket {}", ticket.id),
    })
}
