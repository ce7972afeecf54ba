// SPDX-FileCopyrightText: 2026 Deskflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory message and file stores.

use std::collections::HashSet;
use std::hash::Hash;

use async_trait::async_trait;
use tokio::sync::Mutex;

use deskflow_core::{DeskflowError, FileId, FileStore, MessageId, MessageStore};

#[derive(Default)]
struct Contents<Id> {
    live: HashSet<Id>,
    failing: HashSet<Id>,
}

/// A set of ids where individual deletes can be made to fail.
pub struct InMemoryStore<Id> {
    contents: Mutex<Contents<Id>>,
}

impl<Id: Eq + Hash + Clone> InMemoryStore<Id> {
    pub fn new() -> Self {
        Self {
            contents: Mutex::new(Contents {
                live: HashSet::new(),
                failing: HashSet::new(),
            }),
        }
    }

    pub fn with_ids(ids: impl IntoIterator<Item = Id>) -> Self {
        Self {
            contents: Mutex::new(Contents {
                live: ids.into_iter().collect(),
                failing: HashSet::new(),
            }),
        }
    }

    pub async fn insert(&self, id: Id) {
        self.contents.lock().await.live.insert(id);
    }

    /// Deleting `id` will fail and leave it in place.
    pub async fn fail_delete(&self, id: Id) {
        self.contents.lock().await.failing.insert(id);
    }

    pub async fn contains(&self, id: &Id) -> bool {
        self.contents.lock().await.live.contains(id)
    }

    pub async fn len(&self) -> usize {
        self.contents.lock().await.live.len()
    }

    async fn exists(&self, id: &Id) -> bool {
        self.contains(id).await
    }

    async fn delete(&self, id: &Id, entity: &str) -> Result<(), DeskflowError> {
        let mut contents = self.contents.lock().await;
        if contents.failing.contains(id) {
            return Err(DeskflowError::Internal(format!("{entity} store refused delete")));
        }
        contents.live.remove(id);
        Ok(())
    }
}

impl<Id: Eq + Hash + Clone> Default for InMemoryStore<Id> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MessageStore for InMemoryStore<MessageId> {
    async fn exists_by_id(&self, id: &MessageId) -> Result<bool, DeskflowError> {
        Ok(self.exists(id).await)
    }

    async fn delete_by_id(&self, id: &MessageId) -> Result<(), DeskflowError> {
        self.delete(id, "message").await
    }
}

#[async_trait]
impl FileStore for InMemoryStore<FileId> {
    async fn exists_by_id(&self, id: &FileId) -> Result<bool, DeskflowError> {
        Ok(self.exists(id).await)
    }

    async fn delete_by_id(&self, id: &FileId) -> Result<(), DeskflowError> {
        self.delete(id, "file").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn failing_delete_keeps_the_record() {
        let store = InMemoryStore::with_ids([FileId::from("a"), FileId::from("b")]);
        store.fail_delete(FileId::from("a")).await;

        assert!(store.delete_by_id(&FileId::from("a")).await.is_err());
        store.delete_by_id(&FileId::from("b")).await.unwrap();

        assert!(store.contains(&FileId::from("a")).await);
        assert_eq!(store.len().await, 1);
    }
}
