// SPDX-FileCopyrightText: 2026 Deskflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Outbound email delivery.

use async_trait::async_trait;

use crate::error::DeskflowError;
use crate::types::OutgoingEmail;

#[async_trait]
pub trait EmailSender: Send + Sync + 'static {
    /// Delivers one email to all of its recipients.
    async fn send(&self, email: &OutgoingEmail) -> Result<(), DeskflowError>;
}
