// SPDX-FileCopyrightText: 2026 Deskflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Sources of labelled training examples.
//!
//! The training set is the union of every enabled help topic's sample
//! descriptions and the descriptions of closed tickets, each labelled with
//! its help topic's classification.

use std::sync::Arc;

use async_trait::async_trait;
use deskflow_core::{DeskflowError, HelpTopicCatalog, TrainingExample};

/// Anything that can contribute labelled examples to a training run.
#[async_trait]
pub trait TrainingSource: Send + Sync + 'static {
    async fn training_examples(&self) -> Result<Vec<TrainingExample>, DeskflowError>;
}

/// Sample descriptions stored on enabled help topics.
pub struct HelpTopicExamples {
    catalog: Arc<dyn HelpTopicCatalog>,
}

impl HelpTopicExamples {
    pub fn new(catalog: Arc<dyn HelpTopicCatalog>) -> Self {
        Self { catalog }
    }
}

#[async_trait]
impl TrainingSource for HelpTopicExamples {
    async fn training_examples(&self) -> Result<Vec<TrainingExample>, DeskflowError> {
        self.catalog.training_examples().await
    }
}

/// Concatenation of several sources, queried concurrently.
///
/// Any failing source fails the whole set. Blank descriptions are dropped.
#[derive(Default)]
pub struct TrainingSet {
    sources: Vec<Arc<dyn TrainingSource>>,
}

impl TrainingSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_source(mut self, source: Arc<dyn TrainingSource>) -> Self {
        self.sources.push(source);
        self
    }
}

#[async_trait]
impl TrainingSource for TrainingSet {
    async fn training_examples(&self) -> Result<Vec<TrainingExample>, DeskflowError> {
        let batches = futures::future::try_join_all(
            self.sources.iter().map(|source| source.training_examples()),
        )
        .await?;
        Ok(batches
            .into_iter()
            .flatten()
            .filter(|example| !example.description.trim().is_empty())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(Vec<TrainingExample>);

    #[async_trait]
    impl TrainingSource for Fixed {
        async fn training_examples(&self) -> Result<Vec<TrainingExample>, DeskflowError> {
            Ok(self.0.clone())
        }
    }

    struct Broken;

    #[async_trait]
    impl TrainingSource for Broken {
        async fn training_examples(&self) -> Result<Vec<TrainingExample>, DeskflowError> {
            Err(DeskflowError::Internal("catalog offline".into()))
        }
    }

    fn example(description: &str, label: i64) -> TrainingExample {
        TrainingExample {
            description: description.into(),
            label,
        }
    }

    #[tokio::test]
    async fn set_concatenates_sources_in_order_and_drops_blank_descriptions() {
        let set = TrainingSet::new()
            .with_source(Arc::new(Fixed(vec![example("printer jammed", 3)])))
            .with_source(Arc::new(Fixed(vec![
                example("  ", 1),
                example("vpn down", 7),
            ])));

        let examples = set.training_examples().await.unwrap();
        assert_eq!(
            examples,
            vec![example("printer jammed", 3), example("vpn down", 7)]
        );
    }

    #[tokio::test]
    async fn one_failing_source_fails_the_set() {
        let set = TrainingSet::new()
            .with_source(Arc::new(Fixed(vec![example("printer jammed", 3)])))
            .with_source(Arc::new(Broken));

        assert!(set.training_examples().await.is_err());
    }
}
