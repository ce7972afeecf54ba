// SPDX-FileCopyrightText: 2026 Deskflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory user directory and routing catalogs.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use deskflow_core::{
    Department, DepartmentCatalog, DepartmentId, DeskflowError, HelpTopic, HelpTopicCatalog,
    HelpTopicId, TrainingExample, User, UserDirectory, UserId,
};

#[derive(Default)]
struct Records {
    users: Vec<User>,
    departments: Vec<Department>,
    help_topics: Vec<HelpTopic>,
    closed_counts: HashMap<UserId, u32>,
    rating_recalculations: Vec<UserId>,
}

/// Users, departments and help topics held in memory.
///
/// Also records the counter side effects the workflow engine triggers, and
/// can be told to fail the closed-ticket counter.
#[derive(Default)]
pub struct InMemoryDirectory {
    records: Mutex<Records>,
    fail_counter: AtomicBool,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seeded(users: Vec<User>, departments: Vec<Department>, help_topics: Vec<HelpTopic>) -> Self {
        Self {
            records: Mutex::new(Records {
                users,
                departments,
                help_topics,
                ..Records::default()
            }),
            fail_counter: AtomicBool::new(false),
        }
    }

    pub async fn add_user(&self, user: User) {
        self.records.lock().await.users.push(user);
    }

    pub async fn add_department(&self, department: Department) {
        self.records.lock().await.departments.push(department);
    }

    pub async fn add_help_topic(&self, topic: HelpTopic) {
        self.records.lock().await.help_topics.push(topic);
    }

    pub async fn remove_help_topic(&self, id: &HelpTopicId) {
        self.records.lock().await.help_topics.retain(|t| t.id != *id);
    }

    /// Makes `increment_closed_ticket_count` fail from now on.
    pub fn fail_closed_counter(&self, fail: bool) {
        self.fail_counter.store(fail, Ordering::SeqCst);
    }

    pub async fn closed_count(&self, agent: &UserId) -> u32 {
        self.records
            .lock()
            .await
            .closed_counts
            .get(agent)
            .copied()
            .unwrap_or(0)
    }

    /// Agents whose rating average was recalculated, in call order.
    pub async fn rating_recalculations(&self) -> Vec<UserId> {
        self.records.lock().await.rating_recalculations.clone()
    }
}

#[async_trait]
impl UserDirectory for InMemoryDirectory {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, DeskflowError> {
        Ok(self.records.lock().await.users.iter().find(|u| u.id == *id).cloned())
    }

    async fn covers_departments(
        &self,
        agent: &UserId,
        departments: &[DepartmentId],
    ) -> Result<bool, DeskflowError> {
        let records = self.records.lock().await;
        Ok(records
            .users
            .iter()
            .find(|u| u.id == *agent)
            .is_some_and(|u| departments.iter().all(|d| u.departments.contains(d))))
    }

    async fn users_covering_department(
        &self,
        department: &DepartmentId,
    ) -> Result<Vec<User>, DeskflowError> {
        let records = self.records.lock().await;
        Ok(records
            .users
            .iter()
            .filter(|u| u.departments.contains(department))
            .cloned()
            .collect())
    }

    async fn increment_closed_ticket_count(&self, agent: &UserId) -> Result<(), DeskflowError> {
        if self.fail_counter.load(Ordering::SeqCst) {
            return Err(DeskflowError::Internal("counter store unavailable".into()));
        }
        *self
            .records
            .lock()
            .await
            .closed_counts
            .entry(agent.clone())
            .or_default() += 1;
        Ok(())
    }

    async fn recalculate_rating_average(&self, agent: &UserId) -> Result<(), DeskflowError> {
        self.records
            .lock()
            .await
            .rating_recalculations
            .push(agent.clone());
        Ok(())
    }
}

#[async_trait]
impl DepartmentCatalog for InMemoryDirectory {
    async fn find_by_id(&self, id: &DepartmentId) -> Result<Option<Department>, DeskflowError> {
        Ok(self
            .records
            .lock()
            .await
            .departments
            .iter()
            .find(|d| d.id == *id)
            .cloned())
    }
}

#[async_trait]
impl HelpTopicCatalog for InMemoryDirectory {
    async fn find_by_id(&self, id: &HelpTopicId) -> Result<Option<HelpTopic>, DeskflowError> {
        Ok(self
            .records
            .lock()
            .await
            .help_topics
            .iter()
            .find(|t| t.id == *id)
            .cloned())
    }

    async fn find_by_classification_label(
        &self,
        label: i64,
    ) -> Result<Option<HelpTopic>, DeskflowError> {
        Ok(self
            .records
            .lock()
            .await
            .help_topics
            .iter()
            .find(|t| t.enabled && t.classification == label)
            .cloned())
    }

    async fn training_examples(&self) -> Result<Vec<TrainingExample>, DeskflowError> {
        let records = self.records.lock().await;
        Ok(records
            .help_topics
            .iter()
            .filter(|t| t.enabled)
            .flat_map(|t| {
                t.examples.iter().map(|description| TrainingExample {
                    description: description.clone(),
                    label: t.classification,
                })
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;

    #[tokio::test]
    async fn coverage_requires_every_department() {
        let directory = InMemoryDirectory::seeded(
            vec![fixtures::agent("ana", &["d1", "d2"])],
            vec![],
            vec![],
        );
        let ana = UserId::from("ana");
        let d1 = DepartmentId::from("d1");
        let d3 = DepartmentId::from("d3");
        assert!(directory.covers_departments(&ana, &[d1.clone()]).await.unwrap());
        assert!(!directory.covers_departments(&ana, &[d1, d3]).await.unwrap());
        assert!(
            !directory
                .covers_departments(&UserId::from("ghost"), &[])
                .await
                .unwrap()
        );
    }

    #[tokio::test]
    async fn counter_failure_can_be_injected() {
        let directory = InMemoryDirectory::new();
        let ana = UserId::from("ana");
        directory.increment_closed_ticket_count(&ana).await.unwrap();
        directory.fail_closed_counter(true);
        assert!(directory.increment_closed_ticket_count(&ana).await.is_err());
        assert_eq!(directory.closed_count(&ana).await, 1);
    }
}
