// SPDX-FileCopyrightText: 2026 Deskflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Deskflow helpdesk.

use thiserror::Error;

/// The primary error type returned by the workflow engine and its collaborators.
#[derive(Debug, Error)]
pub enum DeskflowError {
    /// A ticket or a referenced entity does not exist.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// Required input is missing or malformed.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// The actor lacks permission for the requested edit or transition.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// The ticket is in a state that forbids the operation.
    #[error("conflict: {0}")]
    Conflict(String),

    /// A one-time operation was already performed (e.g. rating).
    #[error("locked: {0}")]
    Locked(String),

    /// Storage backend errors (database connection, query failure, serialization).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Classification service errors (network failure, non-success response).
    #[error("classifier error: {message}")]
    Classifier {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Email delivery errors (address parsing, SMTP failure).
    #[error("email error: {message}")]
    Email {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration errors.
    #[error("configuration error: {0}")]
    Config(String),

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

/// Coarse classification of a [`DeskflowError`], for callers that map errors
/// onto a transport status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    BadRequest,
    Unauthorized,
    Conflict,
    Locked,
    Unavailable,
    Internal,
}

impl DeskflowError {
    /// Shorthand for a [`DeskflowError::NotFound`].
    pub fn not_found(entity: &'static str, id: impl std::fmt::Display) -> Self {
        DeskflowError::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            DeskflowError::NotFound { .. } => ErrorKind::NotFound,
            DeskflowError::BadRequest(_) => ErrorKind::BadRequest,
            DeskflowError::Unauthorized(_) => ErrorKind::Unauthorized,
            DeskflowError::Conflict(_) => ErrorKind::Conflict,
            DeskflowError::Locked(_) => ErrorKind::Locked,
            DeskflowError::Classifier { .. } | DeskflowError::Email { .. } => {
                ErrorKind::Unavailable
            }
            DeskflowError::Storage { .. }
            | DeskflowError::Config(_)
            | DeskflowError::Internal(_) => ErrorKind::Internal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_formats_entity_and_id() {
        let err = DeskflowError::not_found("ticket", "t-1");
        assert_eq!(err.to_string(), "ticket not found: t-1");
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn workflow_errors_map_to_client_kinds() {
        assert_eq!(
            DeskflowError::Locked("rated".into()).kind(),
            ErrorKind::Locked
        );
        assert_eq!(
            DeskflowError::Conflict("closed".into()).kind(),
            ErrorKind::Conflict
        );
        assert_eq!(
            DeskflowError::Unauthorized("nope".into()).kind(),
            ErrorKind::Unauthorized
        );
    }

    #[test]
    fn infrastructure_errors_are_not_client_errors() {
        let storage = DeskflowError::Storage {
            source: Box::new(std::io::Error::other("disk")),
        };
        assert_eq!(storage.kind(), ErrorKind::Internal);

        let classifier = DeskflowError::Classifier {
            message: "timeout".into(),
            source: None,
        };
        assert_eq!(classifier.kind(), ErrorKind::Unavailable);
    }
}
