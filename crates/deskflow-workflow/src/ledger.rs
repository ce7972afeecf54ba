// SPDX-FileCopyrightText: 2026 Deskflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Audit trail of routing changes.
//!
//! The workflow engine only appends through [`TransferLedger::record`].
//! [`TransferLedger::amend`] is the correction path for operators and
//! [`TransferLedger::purge`] is reserved for the ticket delete cascade.

use std::sync::Arc;

use chrono::Utc;
use deskflow_core::{
    DeskflowError, TicketId, TransferDraft, TransferId, TransferRecord, TransferRepository,
};
use tracing::{debug, info};

use crate::validation::{Reference, ReferenceValidator};

pub struct TransferLedger {
    transfers: Arc<dyn TransferRepository>,
    validator: Arc<ReferenceValidator>,
}

impl TransferLedger {
    pub fn new(transfers: Arc<dyn TransferRepository>, validator: Arc<ReferenceValidator>) -> Self {
        Self {
            transfers,
            validator,
        }
    }

    /// Validates every populated reference and writes a new record.
    pub async fn record(&self, draft: TransferDraft) -> Result<TransferRecord, DeskflowError> {
        if draft.ticket.is_none() {
            return Err(DeskflowError::BadRequest(
                "transfer record requires a ticket".into(),
            ));
        }
        self.validator.verify(&draft_references(&draft)).await?;

        let record = draft
            .into_record(TransferId::generate(), Utc::now())
            .ok_or_else(|| DeskflowError::Internal("transfer draft lost its ticket".into()))?;
        self.transfers.insert(&record).await?;
        info!(
            transfer_id = %record.id,
            ticket_id = %record.ticket,
            "transfer recorded"
        );
        Ok(record)
    }

    /// Overwrites the populated fields of an existing record.
    pub async fn amend(
        &self,
        id: &TransferId,
        draft: TransferDraft,
    ) -> Result<TransferRecord, DeskflowError> {
        let mut record = self.find_by_id(id).await?;
        self.validator.verify(&draft_references(&draft)).await?;

        let TransferDraft {
            ticket,
            pre_department,
            next_department,
            pre_assigned,
            next_assigned,
            pre_help_topic,
            next_help_topic,
        } = draft;
        if let Some(ticket) = ticket {
            record.ticket = ticket;
        }
        overwrite(&mut record.pre_department, pre_department);
        overwrite(&mut record.next_department, next_department);
        overwrite(&mut record.pre_assigned, pre_assigned);
        overwrite(&mut record.next_assigned, next_assigned);
        overwrite(&mut record.pre_help_topic, pre_help_topic);
        overwrite(&mut record.next_help_topic, next_help_topic);
        record.updated_at = Utc::now();

        self.transfers.update(&record).await?;
        info!(transfer_id = %record.id, "transfer amended");
        Ok(record)
    }

    pub async fn find_by_id(&self, id: &TransferId) -> Result<TransferRecord, DeskflowError> {
        self.transfers
            .find_by_id(id)
            .await?
            .ok_or_else(|| DeskflowError::not_found("transfer", id))
    }

    /// All records for a ticket, oldest first.
    pub async fn for_ticket(&self, ticket: &TicketId) -> Result<Vec<TransferRecord>, DeskflowError> {
        self.transfers.find_by_ticket(ticket).await
    }

    /// Deletes a record. Returns false when it did not exist.
    pub(crate) async fn purge(&self, id: &TransferId) -> Result<bool, DeskflowError> {
        let deleted = self.transfers.delete(id).await?;
        debug!(transfer_id = %id, deleted, "transfer purged");
        Ok(deleted)
    }
}

fn overwrite<T>(slot: &mut Option<T>, value: Option<T>) {
    if value.is_some() {
        *slot = value;
    }
}

fn draft_references(draft: &TransferDraft) -> Vec<Reference> {
    let mut references = Vec::new();
    references.extend(draft.ticket.clone().map(Reference::Ticket));
    references.extend(
        [&draft.pre_department, &draft.next_department]
            .into_iter()
            .flatten()
            .cloned()
            .map(Reference::Department),
    );
    references.extend(
        [&draft.pre_assigned, &draft.next_assigned]
            .into_iter()
            .flatten()
            .cloned()
            .map(Reference::User),
    );
    references.extend(
        [&draft.pre_help_topic, &draft.next_help_topic]
            .into_iter()
            .flatten()
            .cloned()
            .map(Reference::HelpTopic),
    );
    references
}
