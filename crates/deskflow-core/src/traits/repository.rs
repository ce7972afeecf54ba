// SPDX-FileCopyrightText: 2026 Deskflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Persistence for tickets and their transfer records.

use async_trait::async_trait;

use crate::error::DeskflowError;
use crate::ticket::{Ticket, TicketFilter};
use crate::transfer::TransferRecord;
use crate::types::{TicketId, TransferId};

#[async_trait]
pub trait TicketRepository: Send + Sync + 'static {
    async fn insert(&self, ticket: &Ticket) -> Result<(), DeskflowError>;

    /// Writes the full ticket, replacing the stored row.
    async fn save(&self, ticket: &Ticket) -> Result<(), DeskflowError>;

    async fn find_by_id(&self, id: &TicketId) -> Result<Option<Ticket>, DeskflowError>;

    async fn find(&self, filter: &TicketFilter) -> Result<Vec<Ticket>, DeskflowError>;

    /// Removes the ticket row. Returns false when nothing was deleted.
    async fn delete(&self, id: &TicketId) -> Result<bool, DeskflowError>;
}

#[async_trait]
pub trait TransferRepository: Send + Sync + 'static {
    async fn insert(&self, record: &TransferRecord) -> Result<(), DeskflowError>;

    async fn update(&self, record: &TransferRecord) -> Result<(), DeskflowError>;

    async fn find_by_id(&self, id: &TransferId) -> Result<Option<TransferRecord>, DeskflowError>;

    async fn find_by_ticket(&self, ticket: &TicketId) -> Result<Vec<TransferRecord>, DeskflowError>;

    async fn delete(&self, id: &TransferId) -> Result<bool, DeskflowError>;
}
