// SPDX-FileCopyrightText: 2026 Deskflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Existence checks for entities a ticket or transfer record points at.
//!
//! Every check in a batch runs concurrently; the first failure aborts the
//! batch and is returned as-is, so callers see the missing entity's
//! `NotFound` (or the collaborator's own error).

use std::fmt;
use std::sync::Arc;

use deskflow_core::{
    DepartmentCatalog, DepartmentId, DeskflowError, FileId, FileStore, HelpTopicCatalog,
    HelpTopicId, MessageId, MessageStore, TicketId, TicketRepository, TransferId,
    TransferRepository, UserDirectory, UserId,
};
use futures::future::try_join_all;

/// A reference to one external entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reference {
    User(UserId),
    Department(DepartmentId),
    HelpTopic(HelpTopicId),
    Message(MessageId),
    File(FileId),
    Transfer(TransferId),
    Ticket(TicketId),
}

impl Reference {
    /// Entity name used in `NotFound` errors.
    pub fn entity(&self) -> &'static str {
        match self {
            Reference::User(_) => "user",
            Reference::Department(_) => "department",
            Reference::HelpTopic(_) => "help topic",
            Reference::Message(_) => "message",
            Reference::File(_) => "file",
            Reference::Transfer(_) => "transfer",
            Reference::Ticket(_) => "ticket",
        }
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reference::User(id) => id.fmt(f),
            Reference::Department(id) => id.fmt(f),
            Reference::HelpTopic(id) => id.fmt(f),
            Reference::Message(id) => id.fmt(f),
            Reference::File(id) => id.fmt(f),
            Reference::Transfer(id) => id.fmt(f),
            Reference::Ticket(id) => id.fmt(f),
        }
    }
}

pub struct ReferenceValidator {
    pub(crate) users: Arc<dyn UserDirectory>,
    pub(crate) departments: Arc<dyn DepartmentCatalog>,
    pub(crate) help_topics: Arc<dyn HelpTopicCatalog>,
    pub(crate) messages: Arc<dyn MessageStore>,
    pub(crate) files: Arc<dyn FileStore>,
    pub(crate) transfers: Arc<dyn TransferRepository>,
    pub(crate) tickets: Arc<dyn TicketRepository>,
}

impl ReferenceValidator {
    /// Checks every reference concurrently. Succeeds only if all exist.
    pub async fn verify(&self, references: &[Reference]) -> Result<(), DeskflowError> {
        try_join_all(references.iter().map(|reference| self.verify_one(reference))).await?;
        Ok(())
    }

    async fn verify_one(&self, reference: &Reference) -> Result<(), DeskflowError> {
        let exists = match reference {
            Reference::User(id) => self.users.exists_by_id(id).await?,
            Reference::Department(id) => self.departments.exists_by_id(id).await?,
            Reference::HelpTopic(id) => self.help_topics.exists_by_id(id).await?,
            Reference::Message(id) => self.messages.exists_by_id(id).await?,
            Reference::File(id) => self.files.exists_by_id(id).await?,
            Reference::Transfer(id) => self.transfers.find_by_id(id).await?.is_some(),
            Reference::Ticket(id) => self.tickets.find_by_id(id).await?.is_some(),
        };
        if exists {
            Ok(())
        } else {
            Err(DeskflowError::not_found(reference.entity(), reference))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_displays_its_id() {
        let reference = Reference::HelpTopic(HelpTopicId::from("printers"));
        assert_eq!(reference.to_string(), "printers");
        assert_eq!(reference.entity(), "help topic");
        let err = DeskflowError::not_found(reference.entity(), &reference);
        assert_eq!(err.to_string(), "help topic not found: printers");
    }
}
