// SPDX-FileCopyrightText: 2026 Deskflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Stores for content linked to tickets: conversation messages and uploads.

use async_trait::async_trait;

use crate::error::DeskflowError;
use crate::types::{FileId, MessageId};

#[async_trait]
pub trait MessageStore: Send + Sync + 'static {
    async fn exists_by_id(&self, id: &MessageId) -> Result<bool, DeskflowError>;

    async fn delete_by_id(&self, id: &MessageId) -> Result<(), DeskflowError>;
}

#[async_trait]
pub trait FileStore: Send + Sync + 'static {
    async fn exists_by_id(&self, id: &FileId) -> Result<bool, DeskflowError>;

    async fn delete_by_id(&self, id: &FileId) -> Result<(), DeskflowError>;
}
