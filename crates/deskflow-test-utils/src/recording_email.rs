// SPDX-FileCopyrightText: 2026 Deskflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Email sender that keeps every message instead of delivering it.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use deskflow_core::{DeskflowError, EmailSender, OutgoingEmail};

#[derive(Default)]
pub struct RecordingEmailSender {
    sent: Mutex<Vec<OutgoingEmail>>,
    failing: AtomicBool,
}

impl RecordingEmailSender {
    pub fn new() -> Self {
        Self::default()
    }

    /// While set, every send fails and nothing is recorded.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub async fn sent(&self) -> Vec<OutgoingEmail> {
        self.sent.lock().await.clone()
    }

    /// Sent emails whose subject starts with `prefix`.
    pub async fn sent_with_subject(&self, prefix: &str) -> Vec<OutgoingEmail> {
        self.sent
            .lock()
            .await
            .iter()
            .filter(|email| email.subject.starts_with(prefix))
            .cloned()
            .collect()
    }
}

#[async_trait]
impl EmailSender for RecordingEmailSender {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), DeskflowError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(DeskflowError::Email {
                message: "SMTP relay unreachable".into(),
                source: None,
            });
        }
        self.sent.lock().await.push(email.clone());
        Ok(())
    }
}
