// SPDX-FileCopyrightText: 2026 Deskflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `deskflow classify` and `deskflow train`.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use deskflow_classifier::{ClassifierClient, TrainingSet, TrainingSource, retrain_once};
use deskflow_config::DeskflowConfig;
use deskflow_core::{Classifier, DeskflowError, TrainingExample};
use tracing::info;

/// Labelled examples read from a JSON array on disk.
pub struct JsonExamples {
    path: PathBuf,
}

impl JsonExamples {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

#[async_trait]
impl TrainingSource for JsonExamples {
    async fn training_examples(&self) -> Result<Vec<TrainingExample>, DeskflowError> {
        let raw = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            DeskflowError::BadRequest(format!("cannot read {}: {e}", self.path.display()))
        })?;
        serde_json::from_str(&raw).map_err(|e| {
            DeskflowError::BadRequest(format!(
                "invalid training file {}: {e}",
                self.path.display()
            ))
        })
    }
}

pub async fn classify(config: &DeskflowConfig, text: &str) -> Result<(), DeskflowError> {
    let client = ClassifierClient::new(&config.classifier)?;
    let classification = client.classify(text).await?;
    println!(
        "label {} (score {:.3})",
        classification.classification, classification.score
    );
    Ok(())
}

pub async fn train(config: &DeskflowConfig, examples: PathBuf) -> Result<(), DeskflowError> {
    let client = ClassifierClient::new(&config.classifier)?;
    let set = TrainingSet::new().with_source(Arc::new(JsonExamples::new(examples)));
    let report = retrain_once(&client, &set).await?;
    info!(examples = report.examples, "classifier retrained");
    println!("{} ({} examples)", report.message, report.examples);
    Ok(())
}
