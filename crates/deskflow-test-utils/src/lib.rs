// SPDX-FileCopyrightText: 2026 Deskflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Deskflow integration tests.
//!
//! Provides in-memory collaborators and a harness that wires them, plus a
//! temporary SQLite store, into a [`TicketWorkflowEngine`].
//!
//! # Components
//!
//! - [`InMemoryDirectory`] - users, departments and help topics
//! - [`InMemoryStore`] - message and file stores with injectable delete failures
//! - [`MockClassifier`] - queued classification responses
//! - [`RecordingEmailSender`] - captures outgoing email
//! - [`TestHarness`] - the assembled engine
//!
//! [`TicketWorkflowEngine`]: deskflow_workflow::TicketWorkflowEngine

pub mod directory;
pub mod fixtures;
pub mod harness;
pub mod mock_classifier;
pub mod recording_email;
pub mod stores;

pub use directory::InMemoryDirectory;
pub use harness::{TestHarness, TestHarnessBuilder};
pub use mock_classifier::MockClassifier;
pub use recording_email::RecordingEmailSender;
pub use stores::InMemoryStore;
