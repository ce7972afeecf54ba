// SPDX-FileCopyrightText: 2026 Deskflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Routing catalog: departments and the help topics they own.

use async_trait::async_trait;

use crate::error::DeskflowError;
use crate::types::{Department, DepartmentId, HelpTopic, HelpTopicId, TrainingExample};

#[async_trait]
pub trait DepartmentCatalog: Send + Sync + 'static {
    async fn find_by_id(&self, id: &DepartmentId) -> Result<Option<Department>, DeskflowError>;

    async fn exists_by_id(&self, id: &DepartmentId) -> Result<bool, DeskflowError> {
        Ok(self.find_by_id(id).await?.is_some())
    }
}

#[async_trait]
pub trait HelpTopicCatalog: Send + Sync + 'static {
    async fn find_by_id(&self, id: &HelpTopicId) -> Result<Option<HelpTopic>, DeskflowError>;

    async fn exists_by_id(&self, id: &HelpTopicId) -> Result<bool, DeskflowError> {
        Ok(self.find_by_id(id).await?.is_some())
    }

    /// The help topic tagged with a classifier label.
    async fn find_by_classification_label(
        &self,
        label: i64,
    ) -> Result<Option<HelpTopic>, DeskflowError>;

    /// Labelled examples of every enabled help topic.
    async fn training_examples(&self) -> Result<Vec<TrainingExample>, DeskflowError>;
}
