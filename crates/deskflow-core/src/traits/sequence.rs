// SPDX-FileCopyrightText: 2026 Deskflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Named monotonic counters for human-facing numbers.

use async_trait::async_trait;

use crate::error::DeskflowError;

/// Counter name used for ticket numbers.
pub const TICKET_SEQUENCE: &str = "Ticket";

#[async_trait]
pub trait SequenceGenerator: Send + Sync + 'static {
    /// Atomically increments the named counter and returns the new value.
    ///
    /// A counter that does not exist yet starts at 1. Implementations must
    /// perform a single read-modify-write so concurrent callers never
    /// observe the same value.
    async fn next(&self, counter: &str) -> Result<i64, DeskflowError>;
}
