// SPDX-FileCopyrightText: 2026 Deskflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Closed tickets as classifier training data.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use deskflow_classifier::TrainingSource;
use deskflow_core::{
    DeskflowError, HelpTopicCatalog, HelpTopicId, TicketFilter, TicketRepository, TicketStatus,
    TrainingExample,
};
use tracing::debug;

/// Descriptions of closed tickets, labelled with their help topic's
/// classification. Tickets whose help topic is gone are skipped.
pub struct ClosedTicketExamples {
    tickets: Arc<dyn TicketRepository>,
    help_topics: Arc<dyn HelpTopicCatalog>,
}

impl ClosedTicketExamples {
    pub fn new(tickets: Arc<dyn TicketRepository>, help_topics: Arc<dyn HelpTopicCatalog>) -> Self {
        Self {
            tickets,
            help_topics,
        }
    }
}

#[async_trait]
impl TrainingSource for ClosedTicketExamples {
    async fn training_examples(&self) -> Result<Vec<TrainingExample>, DeskflowError> {
        let closed = self
            .tickets
            .find(&TicketFilter {
                status: Some(TicketStatus::Closed),
                ..TicketFilter::default()
            })
            .await?;

        let mut labels: HashMap<HelpTopicId, Option<i64>> = HashMap::new();
        let mut examples = Vec::with_capacity(closed.len());
        for ticket in closed {
            let label = match labels.get(&ticket.help_topic) {
                Some(label) => *label,
                None => {
                    let label = self
                        .help_topics
                        .find_by_id(&ticket.help_topic)
                        .await?
                        .map(|topic| topic.classification);
                    labels.insert(ticket.help_topic.clone(), label);
                    label
                }
            };
            match label {
                Some(label) => examples.push(TrainingExample {
                    description: ticket.description,
                    label,
                }),
                None => debug!(
                    ticket_id = %ticket.id,
                    help_topic = %ticket.help_topic,
                    "help topic missing, ticket left out of training"
                ),
            }
        }
        Ok(examples)
    }
}
