// SPDX-FileCopyrightText: 2026 Deskflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The ticket workflow engine.
//!
//! Every public operation runs to completion for one caller. Reference
//! validation finishes before the ticket is touched, the ticket is written
//! once, and notifications or rating recalculation are handed to
//! [`SideEffects`] afterwards so their failures never reach the caller.

mod items;

use std::sync::{Arc, OnceLock};

use chrono::Utc;
use deskflow_classifier::{
    HelpTopicExamples, RetrainHandle, RetrainRequest, RetrainScheduler, TrainingEvent,
    TrainingSet, TrainingSource,
};
use deskflow_config::DeskflowConfig;
use deskflow_config::model::{RetrainConfig, TicketConfig};
use deskflow_core::{
    Actor, Classifier, DepartmentCatalog, DeskflowError, EmailSender, FileStore,
    HelpTopicCatalog, MessageStore, NewTicket, NotificationKind, RatingInput, SequenceGenerator,
    TICKET_SEQUENCE, Ticket, TicketFilter, TicketId, TicketPatch, TicketRepository,
    TrainingExample, TransferRepository, UserDirectory,
};
use deskflow_notify::{NotificationDispatcher, NotificationSources};
use futures::future::join_all;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::coverage::AgentCoverageValidator;
use crate::item::insert_unique;
use crate::ledger::TransferLedger;
use crate::side_effects::SideEffects;
use crate::training::ClosedTicketExamples;
use crate::validation::{Reference, ReferenceValidator};

const CREATION: &[NotificationKind] = &[NotificationKind::Creation];
const ASSIGNMENT: &[NotificationKind] = &[
    NotificationKind::AssignmentForAgent,
    NotificationKind::AssignmentForAuthor,
];
const CLOSING: &[NotificationKind] = &[NotificationKind::Closing];

/// Everything the engine talks to.
#[derive(Clone)]
pub struct Collaborators {
    pub tickets: Arc<dyn TicketRepository>,
    pub transfers: Arc<dyn TransferRepository>,
    pub sequence: Arc<dyn SequenceGenerator>,
    pub users: Arc<dyn UserDirectory>,
    pub departments: Arc<dyn DepartmentCatalog>,
    pub help_topics: Arc<dyn HelpTopicCatalog>,
    pub messages: Arc<dyn MessageStore>,
    pub files: Arc<dyn FileStore>,
    pub classifier: Arc<dyn Classifier>,
    pub email: Arc<dyn EmailSender>,
}

pub struct TicketWorkflowEngine {
    tickets: Arc<dyn TicketRepository>,
    sequence: Arc<dyn SequenceGenerator>,
    users: Arc<dyn UserDirectory>,
    help_topics: Arc<dyn HelpTopicCatalog>,
    messages: Arc<dyn MessageStore>,
    files: Arc<dyn FileStore>,
    classifier: Arc<dyn Classifier>,
    validator: Arc<ReferenceValidator>,
    ledger: TransferLedger,
    coverage: AgentCoverageValidator,
    notifier: Arc<NotificationDispatcher>,
    effects: SideEffects,
    rules: TicketConfig,
    closed_examples: Arc<ClosedTicketExamples>,
    retrain_config: RetrainConfig,
    retrain: OnceLock<RetrainHandle>,
}

impl TicketWorkflowEngine {
    pub fn new(collaborators: Collaborators, config: &DeskflowConfig) -> Self {
        let Collaborators {
            tickets,
            transfers,
            sequence,
            users,
            departments,
            help_topics,
            messages,
            files,
            classifier,
            email,
        } = collaborators;

        let validator = Arc::new(ReferenceValidator {
            users: users.clone(),
            departments: departments.clone(),
            help_topics: help_topics.clone(),
            messages: messages.clone(),
            files: files.clone(),
            transfers: transfers.clone(),
            tickets: tickets.clone(),
        });
        let notifier = NotificationDispatcher::new(
            NotificationSources {
                tickets: tickets.clone(),
                users: users.clone(),
                departments,
                help_topics: help_topics.clone(),
            },
            email,
            config.notifications.clone(),
        );

        Self {
            ledger: TransferLedger::new(transfers, validator.clone()),
            coverage: AgentCoverageValidator::new(users.clone()),
            notifier: Arc::new(notifier),
            effects: SideEffects::new(),
            rules: config.tickets.clone(),
            closed_examples: Arc::new(ClosedTicketExamples::new(
                tickets.clone(),
                help_topics.clone(),
            )),
            retrain_config: config.retrain.clone(),
            retrain: OnceLock::new(),
            tickets,
            sequence,
            users,
            help_topics,
            messages,
            files,
            classifier,
            validator,
        }
    }

    pub fn ledger(&self) -> &TransferLedger {
        &self.ledger
    }

    /// Background work spawned by engine operations.
    pub fn side_effects(&self) -> &SideEffects {
        &self.effects
    }

    /// Creates a ticket routed by classifying its description.
    ///
    /// The help topic the classifier picks, and its department, replace any
    /// routing the caller supplied.
    pub async fn create(&self, input: NewTicket) -> Result<Ticket, DeskflowError> {
        if input.description.trim().is_empty() {
            return Err(DeskflowError::BadRequest(
                "ticket description is required".into(),
            ));
        }
        self.validator.verify(&creation_references(&input)).await?;

        let classification = self.classifier.classify(&input.description).await?;
        let label = classification.label()?;
        let topic = self
            .help_topics
            .find_by_classification_label(label)
            .await?
            .ok_or_else(|| {
                DeskflowError::not_found("help topic", format!("classification {label}"))
            })?;
        if input.help_topic.as_ref().is_some_and(|h| *h != topic.id) {
            debug!(
                requested = ?input.help_topic,
                classified = %topic.id,
                "classification overrides requested help topic"
            );
        }

        let number = self.sequence.next(TICKET_SEQUENCE).await?;
        let now = Utc::now();
        let NewTicket {
            title,
            description,
            owner,
            status,
            assigned_to,
            messages,
            files,
            transfers,
            ..
        } = input;

        let ticket = Ticket {
            id: TicketId::generate(),
            number,
            title,
            description,
            status: status.unwrap_or_default(),
            rating: None,
            comment: String::new(),
            justification: String::new(),
            owner,
            assigned_at: assigned_to.as_ref().map(|_| now),
            assigned_to,
            department: topic.department,
            help_topic: topic.id,
            messages: dedup(messages),
            files: dedup(files),
            transfers: dedup(transfers),
            answered_at: None,
            completed_at: None,
            created_at: now,
            updated_at: now,
        };
        self.tickets.insert(&ticket).await?;
        info!(
            ticket_id = %ticket.id,
            number = ticket.number,
            department = %ticket.department,
            help_topic = %ticket.help_topic,
            label,
            "ticket created"
        );

        self.notify_later(&ticket.id, CREATION);
        Ok(ticket)
    }

    /// Creates each ticket independently. Results are in input order.
    pub async fn create_in_bulk(
        &self,
        inputs: Vec<NewTicket>,
    ) -> Vec<Result<Ticket, DeskflowError>> {
        join_all(inputs.into_iter().map(|input| self.create(input))).await
    }

    pub async fn find_by_id(&self, id: &TicketId) -> Result<Ticket, DeskflowError> {
        self.tickets
            .find_by_id(id)
            .await?
            .ok_or_else(|| DeskflowError::not_found("ticket", id))
    }

    /// Tickets matching `filter`, ordered by number. An empty result is `NotFound`.
    pub async fn find(&self, filter: &TicketFilter) -> Result<Vec<Ticket>, DeskflowError> {
        let tickets = self.tickets.find(filter).await?;
        if tickets.is_empty() {
            return Err(DeskflowError::not_found(
                "ticket",
                "no ticket matches the filter",
            ));
        }
        Ok(tickets)
    }

    /// Edits title, description, status or justification.
    ///
    /// Only the assigned agent or an administrator may edit, and closed or
    /// canceled tickets are frozen for everyone but administrators. Moving
    /// to a terminal status stamps `completed_at`, bumps the agent's
    /// closed-ticket counter and notifies the author.
    pub async fn update(
        &self,
        id: &TicketId,
        patch: TicketPatch,
        actor: &Actor,
    ) -> Result<Ticket, DeskflowError> {
        let mut ticket = self.find_by_id(id).await?;

        if ticket.status.is_terminal() && !actor.is_admin() {
            return Err(DeskflowError::Conflict(format!(
                "ticket {} is {} and can only be edited by an administrator",
                ticket.number, ticket.status
            )));
        }
        let Some(agent) = ticket.assigned_to.clone() else {
            return Err(DeskflowError::Unauthorized(format!(
                "ticket {} has no assigned agent",
                ticket.number
            )));
        };
        if agent != actor.id && !actor.is_admin() {
            return Err(DeskflowError::Unauthorized(
                "only the assigned agent or an administrator can edit this ticket".into(),
            ));
        }

        let closes = patch.closes();
        patch.merge_into(&mut ticket);
        let now = Utc::now();
        ticket.updated_at = now;

        if !closes {
            self.tickets.save(&ticket).await?;
            info!(ticket_id = %ticket.id, status = %ticket.status, "ticket updated");
            return Ok(ticket);
        }

        ticket.completed_at = Some(now);
        let (saved, counted) = futures::join!(
            self.tickets.save(&ticket),
            self.users.increment_closed_ticket_count(&agent)
        );
        if let Err(e) = counted {
            warn!(
                ticket_id = %ticket.id,
                agent = %agent,
                error = %e,
                "closed-ticket counter not incremented (non-fatal)"
            );
        }
        saved?;
        info!(ticket_id = %ticket.id, status = %ticket.status, "ticket finished");

        self.notify_later(&ticket.id, CLOSING);
        Ok(ticket)
    }

    /// Records the author's one-time rating of a finished ticket.
    pub async fn rate_ticket(
        &self,
        id: &TicketId,
        input: RatingInput,
        actor: &Actor,
    ) -> Result<Ticket, DeskflowError> {
        let mut ticket = self.find_by_id(id).await?;

        if !ticket.status.is_terminal() {
            return Err(DeskflowError::Conflict(format!(
                "ticket {} must be closed or canceled before it can be rated",
                ticket.number
            )));
        }
        if ticket.rating.is_some() {
            return Err(DeskflowError::Locked(format!(
                "ticket {} has already been rated",
                ticket.number
            )));
        }
        if actor.id != ticket.owner && !actor.is_admin() {
            return Err(DeskflowError::Unauthorized(
                "only the ticket author or an administrator can rate this ticket".into(),
            ));
        }

        let rating = input.rating.unwrap_or(self.rules.min_rating);
        if !(self.rules.min_rating..=self.rules.max_rating).contains(&rating) {
            return Err(DeskflowError::BadRequest(format!(
                "rating must be between {} and {}",
                self.rules.min_rating, self.rules.max_rating
            )));
        }

        ticket.rating = Some(rating);
        if let Some(comment) = input.comment {
            ticket.comment = comment;
        }
        ticket.updated_at = Utc::now();
        self.tickets.save(&ticket).await?;
        info!(ticket_id = %ticket.id, rating, "ticket rated");

        if let Some(agent) = ticket.assigned_to.clone() {
            let users = self.users.clone();
            self.effects.spawn("rating average", async move {
                users.recalculate_rating_average(&agent).await
            });
        }
        Ok(ticket)
    }

    /// Deletes a ticket and, best effort, everything linked to it.
    ///
    /// Linked messages, files and transfer records are deleted concurrently;
    /// a failure on any of them is logged and skipped. Returns the ticket as
    /// it was before deletion.
    pub async fn delete(&self, id: &TicketId) -> Result<Ticket, DeskflowError> {
        let ticket = self.find_by_id(id).await?;
        let ticket_id = &ticket.id;

        let messages = join_all(ticket.messages.iter().map(|message| async move {
            if let Err(e) = self.messages.delete_by_id(message).await {
                warn!(ticket_id = %ticket_id, message_id = %message, error = %e, "linked message not deleted (non-fatal)");
            }
        }));
        let files = join_all(ticket.files.iter().map(|file| async move {
            if let Err(e) = self.files.delete_by_id(file).await {
                warn!(ticket_id = %ticket_id, file_id = %file, error = %e, "linked file not deleted (non-fatal)");
            }
        }));
        let transfers = join_all(ticket.transfers.iter().map(|transfer| async move {
            match self.ledger.purge(transfer).await {
                Ok(true) => {}
                Ok(false) => debug!(ticket_id = %ticket_id, transfer_id = %transfer, "linked transfer already gone"),
                Err(e) => warn!(ticket_id = %ticket_id, transfer_id = %transfer, error = %e, "linked transfer not deleted (non-fatal)"),
            }
        }));
        futures::join!(messages, files, transfers);

        if !self.tickets.delete(ticket_id).await? {
            return Err(DeskflowError::not_found("ticket", ticket_id));
        }
        info!(ticket_id = %ticket_id, number = ticket.number, "ticket deleted");
        Ok(ticket)
    }

    /// Descriptions of closed tickets, labelled with their help topic's
    /// classification.
    pub async fn training_examples(&self) -> Result<Vec<TrainingExample>, DeskflowError> {
        self.closed_examples.training_examples().await
    }

    /// Everything the classifier is retrained on: help-topic samples plus
    /// closed tickets.
    pub fn training_source(&self) -> TrainingSet {
        TrainingSet::new()
            .with_source(Arc::new(HelpTopicExamples::new(self.help_topics.clone())))
            .with_source(self.closed_examples.clone())
    }

    /// Starts background retraining over [`training_source`](Self::training_source)
    /// when `retrain.enabled` is set.
    ///
    /// Must be called within a Tokio runtime. The returned scheduler
    /// belongs to the caller, who shuts it down.
    /// Returns `None` when retraining is disabled or already running.
    pub fn start_retraining(&self, cancel: CancellationToken) -> Option<RetrainScheduler> {
        if self.retrain.get().is_some() {
            warn!("retraining already started");
            return None;
        }
        let token = cancel.child_token();
        let scheduler = RetrainScheduler::from_config(
            self.classifier.clone(),
            Arc::new(self.training_source()),
            &self.retrain_config,
            token.clone(),
        )?;
        if self.retrain.set(scheduler.handle()).is_err() {
            warn!("retraining already started");
            token.cancel();
            return None;
        }
        Some(scheduler)
    }

    /// Records a help-topic write. Creating, editing or removing a topic
    /// changes the training data, so a retraining run is queued.
    pub fn help_topic_changed(&self, event: TrainingEvent) -> RetrainRequest {
        match self.retrain.get() {
            Some(handle) => handle.notify(&event),
            None => {
                debug!(?event, "retraining not running, event ignored");
                RetrainRequest::Disabled
            }
        }
    }

    /// Sends `kinds` for a ticket in the background, as one batch.
    fn notify_later(&self, ticket_id: &TicketId, kinds: &'static [NotificationKind]) {
        let notifier = self.notifier.clone();
        let ticket_id = ticket_id.clone();
        self.effects.spawn("notification", async move {
            let results = join_all(kinds.iter().map(|kind| notifier.notify(&ticket_id, *kind))).await;
            let mut failure = None;
            for (kind, result) in kinds.iter().zip(results) {
                match result {
                    Ok(outcome) => {
                        debug!(ticket_id = %ticket_id, kind = %kind, ?outcome, "notification dispatched")
                    }
                    Err(e) => {
                        if let Some(earlier) = &failure {
                            warn!(ticket_id = %ticket_id, kind = %kind, error = %e, earlier = %earlier, "notification failed (non-fatal)");
                        } else {
                            failure = Some(e);
                        }
                    }
                }
            }
            failure.map_or(Ok(()), Err)
        });
    }
}

fn creation_references(input: &NewTicket) -> Vec<Reference> {
    let mut references = vec![Reference::User(input.owner.clone())];
    references.extend(input.assigned_to.clone().map(Reference::User));
    references.extend(input.department.clone().map(Reference::Department));
    references.extend(input.help_topic.clone().map(Reference::HelpTopic));
    references.extend(input.messages.iter().cloned().map(Reference::Message));
    references.extend(input.files.iter().cloned().map(Reference::File));
    references.extend(input.transfers.iter().cloned().map(Reference::Transfer));
    references
}

fn dedup<T: PartialEq>(items: Vec<T>) -> Vec<T> {
    let mut unique = Vec::with_capacity(items.len());
    for item in items {
        insert_unique(&mut unique, item);
    }
    unique
}
