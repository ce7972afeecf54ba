// SPDX-FileCopyrightText: 2026 Deskflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Items that can be linked to or unlinked from a ticket.

use deskflow_core::{DepartmentId, FileId, HelpTopicId, MessageId, TransferId, UserId};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::validation::Reference;

/// Which key of an [`ItemPayload`] an add/remove call acts on.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "camelCase")]
#[serde(rename_all = "camelCase")]
pub enum ItemKind {
    Message,
    File,
    Department,
    Transfer,
    AssignedTo,
    HelpTopic,
}

impl ItemKind {
    /// Kinds that can only be set, never unlinked.
    pub fn is_add_only(self) -> bool {
        matches!(
            self,
            ItemKind::Department | ItemKind::AssignedTo | ItemKind::HelpTopic
        )
    }
}

/// Caller-supplied item payload. Callers populate exactly one key.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemPayload {
    #[serde(default)]
    pub message: Option<MessageId>,
    #[serde(default)]
    pub file: Option<FileId>,
    #[serde(default)]
    pub department: Option<DepartmentId>,
    #[serde(default)]
    pub transfer: Option<TransferId>,
    #[serde(default)]
    pub assigned_to: Option<UserId>,
    #[serde(default)]
    pub help_topic: Option<HelpTopicId>,
}

/// One resolved item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TicketItem {
    Message(MessageId),
    File(FileId),
    Department(DepartmentId),
    Transfer(TransferId),
    AssignedTo(UserId),
    HelpTopic(HelpTopicId),
}

impl TicketItem {
    /// Picks the payload key selected by `kind`, or `None` when it is absent.
    pub fn from_payload(kind: ItemKind, payload: &ItemPayload) -> Option<Self> {
        match kind {
            ItemKind::Message => payload.message.clone().map(TicketItem::Message),
            ItemKind::File => payload.file.clone().map(TicketItem::File),
            ItemKind::Department => payload.department.clone().map(TicketItem::Department),
            ItemKind::Transfer => payload.transfer.clone().map(TicketItem::Transfer),
            ItemKind::AssignedTo => payload.assigned_to.clone().map(TicketItem::AssignedTo),
            ItemKind::HelpTopic => payload.help_topic.clone().map(TicketItem::HelpTopic),
        }
    }

    pub fn kind(&self) -> ItemKind {
        match self {
            TicketItem::Message(_) => ItemKind::Message,
            TicketItem::File(_) => ItemKind::File,
            TicketItem::Department(_) => ItemKind::Department,
            TicketItem::Transfer(_) => ItemKind::Transfer,
            TicketItem::AssignedTo(_) => ItemKind::AssignedTo,
            TicketItem::HelpTopic(_) => ItemKind::HelpTopic,
        }
    }

    /// The external entity this item points at.
    pub fn reference(&self) -> Reference {
        match self {
            TicketItem::Message(id) => Reference::Message(id.clone()),
            TicketItem::File(id) => Reference::File(id.clone()),
            TicketItem::Department(id) => Reference::Department(id.clone()),
            TicketItem::Transfer(id) => Reference::Transfer(id.clone()),
            TicketItem::AssignedTo(id) => Reference::User(id.clone()),
            TicketItem::HelpTopic(id) => Reference::HelpTopic(id.clone()),
        }
    }
}

/// Appends `item` unless it is already present. Returns true when added.
pub(crate) fn insert_unique<T: PartialEq>(items: &mut Vec<T>, item: T) -> bool {
    if items.contains(&item) {
        return false;
    }
    items.push(item);
    true
}

/// Removes the first occurrence of `item`. Returns true when something was removed.
pub(crate) fn remove_first<T: PartialEq>(items: &mut Vec<T>, item: &T) -> bool {
    match items.iter().position(|existing| existing == item) {
        Some(index) => {
            items.remove(index);
            true
        }
        None => false,
    }
}
