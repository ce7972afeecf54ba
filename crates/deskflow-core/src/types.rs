// SPDX-FileCopyrightText: 2026 Deskflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared across the workflow engine and its collaborators.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            /// Generates a fresh random identifier (UUID v4).
            pub fn generate() -> Self {
                Self(uuid::Uuid::new_v4().to_string())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }
    };
}

id_type!(
    /// Unique identifier for a ticket.
    TicketId
);
id_type!(
    /// Unique identifier for a user (author or agent).
    UserId
);
id_type!(
    /// Unique identifier for a department.
    DepartmentId
);
id_type!(
    /// Unique identifier for a help topic.
    HelpTopicId
);
id_type!(
    /// Unique identifier for a ticket message.
    MessageId
);
id_type!(
    /// Unique identifier for an uploaded file.
    FileId
);
id_type!(
    /// Unique identifier for a transfer record.
    TransferId
);

/// User roles. Only [`Role::Admin`] carries elevated workflow rights.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    User,
    Agent,
    Boss,
    Director,
    Admin,
}

/// The authenticated caller of a workflow operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub id: UserId,
    pub role: Role,
}

impl Actor {
    pub fn new(id: impl Into<UserId>, role: Role) -> Self {
        Self {
            id: id.into(),
            role,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Ticket lifecycle states.
///
/// `Open -> Assigned -> InProcess -> Stopped / OnHold -> Closed`, with
/// `Canceled` reachable from any non-terminal state.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TicketStatus {
    #[default]
    Open,
    Assigned,
    InProcess,
    Stopped,
    OnHold,
    Canceled,
    Closed,
}

impl TicketStatus {
    /// Closed and canceled tickets are frozen for everyone but administrators.
    pub fn is_terminal(self) -> bool {
        matches!(self, TicketStatus::Canceled | TicketStatus::Closed)
    }
}

/// Workflow events that produce an email.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationKind {
    /// New (or re-pooled) ticket, sent to the department's coverage group.
    Creation,
    /// Assignment notice sent to the new agent.
    AssignmentForAgent,
    /// Assignment notice sent to the ticket author.
    AssignmentForAuthor,
    /// Closure notice sent to the ticket author.
    Closing,
}

/// A user as seen by the workflow engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: Role,
    /// Departments this user covers (agents only).
    #[serde(default)]
    pub departments: Vec<DepartmentId>,
}

impl User {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Department {
    pub id: DepartmentId,
    pub name: String,
}

/// A routing category owned by exactly one department and tagged with the
/// classifier label that selects it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HelpTopic {
    pub id: HelpTopicId,
    pub name: String,
    pub department: DepartmentId,
    pub classification: i64,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Sample descriptions used to train the classifier.
    #[serde(default)]
    pub examples: Vec<String>,
}

fn default_enabled() -> bool {
    true
}

/// One labelled description sent to the classifier for training.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingExample {
    pub description: String,
    pub label: i64,
}

/// Result of classifying one description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    /// Numeric label, as returned by the service (a string of digits).
    pub classification: String,
    #[serde(default)]
    pub score: f64,
}

impl Classification {
    /// Parses the label into the integer stored on help topics.
    pub fn label(&self) -> Result<i64, crate::DeskflowError> {
        self.classification.trim().parse().map_err(|_| {
            crate::DeskflowError::Classifier {
                message: format!("non-numeric classification label `{}`", self.classification),
                source: None,
            }
        })
    }
}

/// Summary returned by the classifier after a training run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingReport {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub examples: usize,
}

/// A rendered email ready for delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    pub to: Vec<String>,
    pub subject: String,
    pub html: String,
}
