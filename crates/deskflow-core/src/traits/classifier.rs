// SPDX-FileCopyrightText: 2026 Deskflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Text classification service used for auto-routing new tickets.

use async_trait::async_trait;

use crate::error::DeskflowError;
use crate::types::{Classification, TrainingExample, TrainingReport};

#[async_trait]
pub trait Classifier: Send + Sync + 'static {
    /// Classifies one ticket description. A failure aborts ticket creation.
    async fn classify(&self, text: &str) -> Result<Classification, DeskflowError>;

    /// Replaces the model's training set and retrains it.
    async fn train(&self, examples: &[TrainingExample]) -> Result<TrainingReport, DeskflowError>;
}
