// SPDX-FileCopyrightText: 2026 Deskflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the ticket, transfer, and sequence traits.

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::debug;

use deskflow_config::model::StorageConfig;
use deskflow_core::{
    DeskflowError, SequenceGenerator, Ticket, TicketFilter, TicketId, TicketRepository,
    TransferId, TransferRecord, TransferRepository,
};

use crate::database::Database;
use crate::queries;

/// SQLite-backed store for tickets, transfer records, and counters.
///
/// The database is lazily opened on the first call to [`SqliteStore::initialize`];
/// every trait method fails with a storage error before that.
pub struct SqliteStore {
    config: StorageConfig,
    db: OnceCell<Database>,
}

impl SqliteStore {
    /// The database connection is not opened until [`initialize`](Self::initialize) is called.
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            db: OnceCell::new(),
        }
    }

    fn db(&self) -> Result<&Database, DeskflowError> {
        self.db.get().ok_or_else(|| DeskflowError::Storage {
            source: "storage not initialized -- call initialize() first".into(),
        })
    }

    /// Open the database and run migrations. Fails if called twice.
    pub async fn initialize(&self) -> Result<(), DeskflowError> {
        let db = Database::open(&self.config.database_path, self.config.wal_mode).await?;
        self.db.set(db).map_err(|_| DeskflowError::Storage {
            source: "storage already initialized".into(),
        })?;
        debug!(path = %self.config.database_path, "SQLite storage initialized");
        Ok(())
    }

    /// Checkpoint the WAL before shutdown.
    pub async fn close(&self) -> Result<(), DeskflowError> {
        self.db()?.checkpoint().await
    }

    /// Current value of a sequence counter without incrementing it.
    pub async fn current_sequence(&self, name: &str) -> Result<Option<i64>, DeskflowError> {
        queries::counters::current_value(self.db()?, name).await
    }
}

#[async_trait]
impl TicketRepository for SqliteStore {
    async fn insert(&self, ticket: &Ticket) -> Result<(), DeskflowError> {
        queries::tickets::insert_ticket(self.db()?, ticket).await?;
        debug!(ticket_id = %ticket.id, number = ticket.number, "ticket inserted");
        Ok(())
    }

    async fn save(&self, ticket: &Ticket) -> Result<(), DeskflowError> {
        if !queries::tickets::update_ticket(self.db()?, ticket).await? {
            return Err(DeskflowError::not_found("ticket", &ticket.id));
        }
        debug!(ticket_id = %ticket.id, status = %ticket.status, "ticket saved");
        Ok(())
    }

    async fn find_by_id(&self, id: &TicketId) -> Result<Option<Ticket>, DeskflowError> {
        queries::tickets::get_ticket(self.db()?, id).await
    }

    async fn find(&self, filter: &TicketFilter) -> Result<Vec<Ticket>, DeskflowError> {
        queries::tickets::find_tickets(self.db()?, filter).await
    }

    async fn delete(&self, id: &TicketId) -> Result<bool, DeskflowError> {
        queries::tickets::delete_ticket(self.db()?, id).await
    }
}

#[async_trait]
impl TransferRepository for SqliteStore {
    async fn insert(&self, record: &TransferRecord) -> Result<(), DeskflowError> {
        queries::transfers::insert_transfer(self.db()?, record).await
    }

    async fn update(&self, record: &TransferRecord) -> Result<(), DeskflowError> {
        if !queries::transfers::update_transfer(self.db()?, record).await? {
            return Err(DeskflowError::not_found("transfer", &record.id));
        }
        Ok(())
    }

    async fn find_by_id(&self, id: &TransferId) -> Result<Option<TransferRecord>, DeskflowError> {
        queries::transfers::get_transfer(self.db()?, id).await
    }

    async fn find_by_ticket(
        &self,
        ticket: &TicketId,
    ) -> Result<Vec<TransferRecord>, DeskflowError> {
        queries::transfers::get_transfers_for_ticket(self.db()?, ticket).await
    }

    async fn delete(&self, id: &TransferId) -> Result<bool, DeskflowError> {
        queries::transfers::delete_transfer(self.db()?, id).await
    }
}

#[async_trait]
impl SequenceGenerator for SqliteStore {
    async fn next(&self, counter: &str) -> Result<i64, DeskflowError> {
        queries::counters::next_value(self.db()?, counter).await
    }
}
