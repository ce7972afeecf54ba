// SPDX-FileCopyrightText: 2026 Deskflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Deskflow helpdesk.
//!
//! This crate provides the domain types shared by every other crate (the
//! ticket aggregate, transfer records, identifiers, roles), the
//! [`DeskflowError`] type, and the collaborator traits through which the
//! workflow engine reaches storage, routing catalogs, the classifier, and
//! email delivery.

pub mod error;
pub mod ticket;
pub mod traits;
pub mod transfer;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::{DeskflowError, ErrorKind};
pub use ticket::{NewTicket, RatingInput, Ticket, TicketFilter, TicketPatch};
pub use transfer::{TransferDraft, TransferRecord};
pub use types::{
    Actor, Classification, Department, DepartmentId, FileId, HelpTopic, HelpTopicId, MessageId,
    NotificationKind, OutgoingEmail, Role, TicketId, TicketStatus, TrainingExample,
    TrainingReport, TransferId, User, UserId,
};

pub use traits::{
    Classifier, DepartmentCatalog, EmailSender, FileStore, HelpTopicCatalog, MessageStore,
    SequenceGenerator, TicketRepository, TransferRepository, UserDirectory,
};
pub use traits::sequence::TICKET_SEQUENCE;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_collaborator_traits_are_object_safe() {
        // Fails to compile if any trait stops being usable behind `dyn`.
        fn _assert(
            _: &dyn UserDirectory,
            _: &dyn DepartmentCatalog,
            _: &dyn HelpTopicCatalog,
            _: &dyn MessageStore,
            _: &dyn FileStore,
            _: &dyn Classifier,
            _: &dyn EmailSender,
            _: &dyn SequenceGenerator,
            _: &dyn TicketRepository,
            _: &dyn TransferRepository,
        ) {
        }
    }

    #[test]
    fn actor_admin_check() {
        assert!(Actor::new("root", Role::Admin).is_admin());
        assert!(!Actor::new("ana", Role::Agent).is_admin());
    }
}
