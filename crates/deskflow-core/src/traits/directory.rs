// SPDX-FileCopyrightText: 2026 Deskflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! User directory: authors, agents, and their department coverage.

use async_trait::async_trait;

use crate::error::DeskflowError;
use crate::types::{DepartmentId, User, UserId};

#[async_trait]
pub trait UserDirectory: Send + Sync + 'static {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, DeskflowError>;

    async fn exists_by_id(&self, id: &UserId) -> Result<bool, DeskflowError> {
        Ok(self.find_by_id(id).await?.is_some())
    }

    /// True when the agent covers every department in `departments`.
    async fn covers_departments(
        &self,
        agent: &UserId,
        departments: &[DepartmentId],
    ) -> Result<bool, DeskflowError>;

    /// Every user whose coverage includes `department`.
    async fn users_covering_department(
        &self,
        department: &DepartmentId,
    ) -> Result<Vec<User>, DeskflowError>;

    async fn increment_closed_ticket_count(&self, agent: &UserId) -> Result<(), DeskflowError>;

    /// Recomputes the agent's average rating over their finished tickets.
    async fn recalculate_rating_average(&self, agent: &UserId) -> Result<(), DeskflowError>;
}
