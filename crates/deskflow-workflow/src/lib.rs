// SPDX-FileCopyrightText: 2026 Deskflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ticket workflow engine for the Deskflow helpdesk.
//!
//! [`TicketWorkflowEngine`] owns the ticket lifecycle: classification-based
//! creation, guarded status edits, item linking with an audit trail of
//! routing changes ([`TransferLedger`]), coverage checks on re-routing
//! ([`AgentCoverageValidator`]), one-time rating, and cascading deletion.
//! Notifications and counter recalculation run as detached
//! [`SideEffects`].

pub mod coverage;
pub mod engine;
pub mod item;
pub mod ledger;
pub mod side_effects;
pub mod training;
pub mod validation;

pub use coverage::{AgentCoverageValidator, CoverageOutcome};
pub use engine::{Collaborators, TicketWorkflowEngine};
pub use item::{ItemKind, ItemPayload, TicketItem};
pub use ledger::TransferLedger;
pub use side_effects::SideEffects;
pub use training::ClosedTicketExamples;
pub use validation::{Reference, ReferenceValidator};
