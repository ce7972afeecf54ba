// SPDX-FileCopyrightText: 2026 Deskflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end workflow testing.
//!
//! `TestHarness` assembles a [`TicketWorkflowEngine`] over a temporary
//! SQLite store and in-memory collaborators. Every collaborator stays
//! reachable for seeding and assertions.

use std::sync::Arc;

use deskflow_config::DeskflowConfig;
use deskflow_config::model::StorageConfig;
use deskflow_core::{
    Actor, Department, DeskflowError, FileId, HelpTopic, MessageId, NewTicket, Role, Ticket,
    User, UserDirectory, UserId,
};
use deskflow_notify::NotificationSources;
use deskflow_storage::SqliteStore;
use deskflow_workflow::{Collaborators, ItemKind, ItemPayload, TicketWorkflowEngine};

use crate::directory::InMemoryDirectory;
use crate::fixtures;
use crate::mock_classifier::MockClassifier;
use crate::recording_email::RecordingEmailSender;
use crate::stores::InMemoryStore;

/// Builder for creating test environments with configurable options.
pub struct TestHarnessBuilder {
    users: Vec<User>,
    departments: Vec<Department>,
    help_topics: Vec<HelpTopic>,
    messages: Vec<MessageId>,
    files: Vec<FileId>,
    fallback_label: String,
    config: DeskflowConfig,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            users: Vec::new(),
            departments: Vec::new(),
            help_topics: Vec::new(),
            messages: Vec::new(),
            files: Vec::new(),
            fallback_label: "0".to_string(),
            config: DeskflowConfig::default(),
        }
    }

    /// Seeds a small helpdesk:
    ///
    /// - departments `facilities` ("Facilities") and `it` ("IT")
    /// - help topics `printers` (facilities, label 3) and `network` (it, label 5)
    /// - users `author`, `admin`, `agent-a` (facilities), `agent-b` (it),
    ///   `agent-c` (facilities and it)
    /// - messages `m-1`, `m-2` and files `f-1`, `f-2`, `f-3`
    ///
    /// Unqueued classifications fall back to label 3.
    pub fn standard_world(self) -> Self {
        self.with_department(fixtures::department("facilities", "Facilities"))
            .with_department(fixtures::department("it", "IT"))
            .with_help_topic(fixtures::help_topic("printers", "facilities", 3))
            .with_help_topic(fixtures::help_topic("network", "it", 5))
            .with_user(fixtures::author("author"))
            .with_user(fixtures::admin("admin"))
            .with_user(fixtures::agent("agent-a", &["facilities"]))
            .with_user(fixtures::agent("agent-b", &["it"]))
            .with_user(fixtures::agent("agent-c", &["facilities", "it"]))
            .with_message("m-1")
            .with_message("m-2")
            .with_file("f-1")
            .with_file("f-2")
            .with_file("f-3")
            .with_fallback_label("3")
    }

    pub fn with_user(mut self, user: User) -> Self {
        self.users.push(user);
        self
    }

    pub fn with_department(mut self, department: Department) -> Self {
        self.departments.push(department);
        self
    }

    pub fn with_help_topic(mut self, topic: HelpTopic) -> Self {
        self.help_topics.push(topic);
        self
    }

    pub fn with_message(mut self, id: &str) -> Self {
        self.messages.push(MessageId::from(id));
        self
    }

    pub fn with_file(mut self, id: &str) -> Self {
        self.files.push(FileId::from(id));
        self
    }

    /// Label returned when no classification is queued.
    pub fn with_fallback_label(mut self, label: &str) -> Self {
        self.fallback_label = label.to_string();
        self
    }

    /// Adjust the configuration the engine is built with.
    pub fn with_config(mut self, adjust: impl FnOnce(&mut DeskflowConfig)) -> Self {
        adjust(&mut self.config);
        self
    }

    /// Build the test harness, creating the temp database and all collaborators.
    pub async fn build(self) -> Result<TestHarness, DeskflowError> {
        let temp_dir =
            tempfile::TempDir::new().map_err(|e| DeskflowError::Storage { source: e.into() })?;
        let db_path = temp_dir.path().join("test.db");

        let mut config = self.config;
        config.storage = StorageConfig {
            database_path: db_path.to_string_lossy().into_owned(),
            wal_mode: true,
        };

        let store = Arc::new(SqliteStore::new(config.storage.clone()));
        store.initialize().await?;

        let directory = Arc::new(InMemoryDirectory::seeded(
            self.users,
            self.departments,
            self.help_topics,
        ));
        let messages = Arc::new(InMemoryStore::with_ids(self.messages));
        let files = Arc::new(InMemoryStore::with_ids(self.files));
        let classifier = Arc::new(MockClassifier::new(self.fallback_label));
        let email = Arc::new(RecordingEmailSender::new());

        let engine = TicketWorkflowEngine::new(
            Collaborators {
                tickets: store.clone(),
                transfers: store.clone(),
                sequence: store.clone(),
                users: directory.clone(),
                departments: directory.clone(),
                help_topics: directory.clone(),
                messages: messages.clone(),
                files: files.clone(),
                classifier: classifier.clone(),
                email: email.clone(),
            },
            &config,
        );

        Ok(TestHarness {
            engine: Arc::new(engine),
            store,
            directory,
            messages,
            files,
            classifier,
            email,
            config,
            _temp_dir: temp_dir,
        })
    }
}

/// A complete workflow engine over temp storage and in-memory collaborators.
pub struct TestHarness {
    pub engine: Arc<TicketWorkflowEngine>,
    /// SQLite store for tickets, transfers and counters (temp DB, removed on drop).
    pub store: Arc<SqliteStore>,
    /// Users, departments and help topics.
    pub directory: Arc<InMemoryDirectory>,
    pub messages: Arc<InMemoryStore<MessageId>>,
    pub files: Arc<InMemoryStore<FileId>>,
    pub classifier: Arc<MockClassifier>,
    pub email: Arc<RecordingEmailSender>,
    pub config: DeskflowConfig,
    _temp_dir: tempfile::TempDir,
}

impl TestHarness {
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// A harness over [`TestHarnessBuilder::standard_world`].
    pub async fn standard() -> Result<Self, DeskflowError> {
        Self::builder().standard_world().build().await
    }

    /// Waits for every notification and recalculation spawned so far.
    pub async fn settle(&self) {
        self.engine.side_effects().drain().await;
    }

    /// The collaborators a notification dispatcher needs, backed by this harness.
    pub fn notification_sources(&self) -> NotificationSources {
        NotificationSources {
            tickets: self.store.clone(),
            users: self.directory.clone(),
            departments: self.directory.clone(),
            help_topics: self.directory.clone(),
        }
    }

    /// Creates a ticket owned by `owner` with the given description.
    pub async fn create_ticket(&self, owner: &str, description: &str) -> Result<Ticket, DeskflowError> {
        self.engine
            .create(NewTicket {
                title: description.chars().take(40).collect(),
                description: description.to_string(),
                owner: UserId::from(owner),
                ..NewTicket::default()
            })
            .await
    }

    /// Creates a ticket and assigns it to `agent` through the workflow.
    pub async fn assigned_ticket(
        &self,
        owner: &str,
        agent: &str,
        description: &str,
    ) -> Result<Ticket, DeskflowError> {
        let ticket = self.create_ticket(owner, description).await?;
        self.engine
            .add_item(
                &ticket.id,
                &ItemPayload {
                    assigned_to: Some(UserId::from(agent)),
                    ..ItemPayload::default()
                },
                ItemKind::AssignedTo,
            )
            .await
    }

    /// An actor for a seeded user, or a plain `USER` if it is unknown.
    pub async fn actor(&self, id: &str) -> Actor {
        match self.directory.find_by_id(&UserId::from(id)).await {
            Ok(Some(user)) => fixtures::actor(&user),
            _ => Actor::new(id, Role::User),
        }
    }
}
