// SPDX-FileCopyrightText: 2026 Deskflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Collaborator contracts consumed by the workflow engine.
//!
//! Every trait uses `#[async_trait]` so implementations can be held as
//! `Arc<dyn Trait>` and swapped for in-memory doubles in tests.

pub mod catalog;
pub mod classifier;
pub mod content;
pub mod directory;
pub mod email;
pub mod repository;
pub mod sequence;

pub use catalog::{DepartmentCatalog, HelpTopicCatalog};
pub use classifier::Classifier;
pub use content::{FileStore, MessageStore};
pub use directory::UserDirectory;
pub use email::EmailSender;
pub use repository::{TicketRepository, TransferRepository};
pub use sequence::SequenceGenerator;
