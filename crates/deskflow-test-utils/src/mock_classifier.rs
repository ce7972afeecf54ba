// SPDX-FileCopyrightText: 2026 Deskflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock classification service for deterministic testing.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use deskflow_core::{Classification, Classifier, DeskflowError, TrainingExample, TrainingReport};

/// A classifier that answers from a FIFO queue of labels.
///
/// When the queue is empty the fallback label is returned. Queued failures
/// surface as classifier errors. Every training call is recorded.
pub struct MockClassifier {
    responses: Arc<Mutex<VecDeque<Result<String, String>>>>,
    fallback: String,
    trained: Arc<Mutex<Vec<Vec<TrainingExample>>>>,
}

impl MockClassifier {
    pub fn new(fallback: impl Into<String>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(VecDeque::new())),
            fallback: fallback.into(),
            trained: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub async fn push_label(&self, label: impl Into<String>) {
        self.responses.lock().await.push_back(Ok(label.into()));
    }

    pub async fn push_failure(&self, message: impl Into<String>) {
        self.responses.lock().await.push_back(Err(message.into()));
    }

    /// Example batches passed to `train`, oldest first.
    pub async fn training_runs(&self) -> Vec<Vec<TrainingExample>> {
        self.trained.lock().await.clone()
    }
}

impl Default for MockClassifier {
    fn default() -> Self {
        Self::new("0")
    }
}

#[async_trait]
impl Classifier for MockClassifier {
    async fn classify(&self, _text: &str) -> Result<Classification, DeskflowError> {
        let next = self.responses.lock().await.pop_front();
        match next.unwrap_or_else(|| Ok(self.fallback.clone())) {
            Ok(label) => Ok(Classification {
                classification: label,
                score: 1.0,
            }),
            Err(message) => Err(DeskflowError::Classifier {
                message,
                source: None,
            }),
        }
    }

    async fn train(&self, examples: &[TrainingExample]) -> Result<TrainingReport, DeskflowError> {
        self.trained.lock().await.push(examples.to_vec());
        Ok(TrainingReport {
            message: "trained".to_string(),
            examples: examples.len(),
        })
    }
}
