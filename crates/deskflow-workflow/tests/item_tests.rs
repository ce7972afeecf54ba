// SPDX-FileCopyrightText: 2026 Deskflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Item linking, routing changes and the transfer audit trail.

use deskflow_core::{
    DepartmentId, ErrorKind, FileId, HelpTopicId, MessageId, TicketStatus, TransferDraft,
    TransferId, UserId,
};
use deskflow_test_utils::TestHarness;
use deskflow_workflow::{ItemKind, ItemPayload};

fn assign_to(agent: &str) -> ItemPayload {
    ItemPayload {
        assigned_to: Some(UserId::from(agent)),
        ..ItemPayload::default()
    }
}

fn department(id: &str) -> ItemPayload {
    ItemPayload {
        department: Some(DepartmentId::from(id)),
        ..ItemPayload::default()
    }
}

fn message(id: &str) -> ItemPayload {
    ItemPayload {
        message: Some(MessageId::from(id)),
        ..ItemPayload::default()
    }
}

#[tokio::test]
async fn assignment_appends_one_transfer() {
    let harness = TestHarness::standard().await.unwrap();
    let ticket = harness.create_ticket("author", "Printer jammed").await.unwrap();

    let assigned = harness
        .engine
        .add_item(&ticket.id, &assign_to("agent-a"), ItemKind::AssignedTo)
        .await
        .unwrap();

    assert_eq!(assigned.assigned_to, Some(UserId::from("agent-a")));
    assert_eq!(assigned.status, TicketStatus::Assigned);
    assert!(assigned.assigned_at.is_some());
    assert_eq!(assigned.transfers.len(), 1);

    let records = harness.engine.ledger().for_ticket(&ticket.id).await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].id, assigned.transfers[0]);
    assert_eq!(records[0].pre_assigned, None);
    assert_eq!(records[0].next_assigned, Some(UserId::from("agent-a")));
    assert!(records[0].next_department.is_none());
}

#[tokio::test]
async fn reassignment_records_previous_agent_and_keeps_assigned_at() {
    let harness = TestHarness::standard().await.unwrap();
    let ticket = harness
        .assigned_ticket("author", "agent-a", "Printer jammed")
        .await
        .unwrap();
    let first = harness.engine.find_by_id(&ticket.id).await.unwrap();

    let reassigned = harness
        .engine
        .add_item(&ticket.id, &assign_to("agent-c"), ItemKind::AssignedTo)
        .await
        .unwrap();

    assert_eq!(reassigned.assigned_at, first.assigned_at);
    assert_eq!(reassigned.transfers.len(), 2);
    let record = harness
        .engine
        .ledger()
        .find_by_id(&reassigned.transfers[1])
        .await
        .unwrap();
    assert_eq!(record.pre_assigned, Some(UserId::from("agent-a")));
    assert_eq!(record.next_assigned, Some(UserId::from("agent-c")));
}

#[tokio::test]
async fn moving_to_an_uncovered_department_releases_the_agent() {
    let harness = TestHarness::standard().await.unwrap();
    let ticket = harness
        .assigned_ticket("author", "agent-a", "Printer jammed")
        .await
        .unwrap();
    harness.settle().await;
    let creation_before = harness.email.sent_with_subject("New Ticket").await.len();

    let moved = harness
        .engine
        .add_item(&ticket.id, &department("it"), ItemKind::Department)
        .await
        .unwrap();

    assert_eq!(moved.department, DepartmentId::from("it"));
    assert!(moved.assigned_to.is_none());
    assert_eq!(moved.status, TicketStatus::Open);
    assert!(moved.assigned_at.is_none());
    assert_eq!(moved.transfers.len(), 2);

    let stored = harness.engine.find_by_id(&ticket.id).await.unwrap();
    assert!(stored.assigned_to.is_none());
    assert_eq!(stored.status, TicketStatus::Open);

    let record = harness
        .engine
        .ledger()
        .find_by_id(&moved.transfers[1])
        .await
        .unwrap();
    assert_eq!(record.pre_department, Some(DepartmentId::from("facilities")));
    assert_eq!(record.next_department, Some(DepartmentId::from("it")));

    harness.settle().await;
    let creation = harness.email.sent_with_subject("New Ticket").await;
    assert_eq!(creation.len(), creation_before + 1);
    let mut to = creation.last().unwrap().to.clone();
    to.sort();
    assert_eq!(to, vec!["agent-b@example.com", "agent-c@example.com"]);
}

#[tokio::test]
async fn moving_within_coverage_keeps_the_agent() {
    let harness = TestHarness::standard().await.unwrap();
    let ticket = harness
        .assigned_ticket("author", "agent-c", "Printer jammed")
        .await
        .unwrap();

    let moved = harness
        .engine
        .add_item(&ticket.id, &department("it"), ItemKind::Department)
        .await
        .unwrap();
    assert_eq!(moved.assigned_to, Some(UserId::from("agent-c")));
    assert_eq!(moved.status, TicketStatus::Assigned);
    assert!(moved.assigned_at.is_some());
}

#[tokio::test]
async fn help_topic_change_moves_department_too() {
    let harness = TestHarness::standard().await.unwrap();
    let ticket = harness
        .assigned_ticket("author", "agent-a", "Printer jammed")
        .await
        .unwrap();

    let moved = harness
        .engine
        .add_item(
            &ticket.id,
            &ItemPayload {
                help_topic: Some(HelpTopicId::from("network")),
                ..ItemPayload::default()
            },
            ItemKind::HelpTopic,
        )
        .await
        .unwrap();

    assert_eq!(moved.help_topic, HelpTopicId::from("network"));
    assert_eq!(moved.department, DepartmentId::from("it"));
    assert!(moved.assigned_to.is_none());

    let record = harness
        .engine
        .ledger()
        .find_by_id(moved.transfers.last().unwrap())
        .await
        .unwrap();
    assert_eq!(record.pre_help_topic, Some(HelpTopicId::from("printers")));
    assert_eq!(record.next_help_topic, Some(HelpTopicId::from("network")));
    assert_eq!(record.pre_department, Some(DepartmentId::from("facilities")));
    assert_eq!(record.next_department, Some(DepartmentId::from("it")));
}

#[tokio::test]
async fn messages_are_an_insertion_ordered_set() {
    let harness = TestHarness::standard().await.unwrap();
    let ticket = harness.create_ticket("author", "Printer jammed").await.unwrap();
    let engine = &harness.engine;

    engine.add_item(&ticket.id, &message("m-2"), ItemKind::Message).await.unwrap();
    engine.add_item(&ticket.id, &message("m-1"), ItemKind::Message).await.unwrap();
    let ticket = engine
        .add_item(&ticket.id, &message("m-2"), ItemKind::Message)
        .await
        .unwrap();
    assert_eq!(
        ticket.messages,
        vec![MessageId::from("m-2"), MessageId::from("m-1")]
    );
    assert!(ticket.transfers.is_empty());

    let ticket = engine
        .remove_item(&ticket.id, &message("m-2"), ItemKind::Message)
        .await
        .unwrap();
    assert_eq!(ticket.messages, vec![MessageId::from("m-1")]);

    let ticket = engine
        .remove_item(&ticket.id, &message("m-2"), ItemKind::Message)
        .await
        .unwrap();
    assert_eq!(ticket.messages, vec![MessageId::from("m-1")]);
}

#[tokio::test]
async fn files_and_transfers_can_be_linked() {
    let harness = TestHarness::standard().await.unwrap();
    let ticket = harness.create_ticket("author", "Printer jammed").await.unwrap();
    let record = harness
        .engine
        .ledger()
        .record(TransferDraft::for_ticket(ticket.id.clone()).department(
            DepartmentId::from("facilities"),
            DepartmentId::from("facilities"),
        ))
        .await
        .unwrap();

    harness
        .engine
        .add_item(
            &ticket.id,
            &ItemPayload {
                file: Some(FileId::from("f-1")),
                ..ItemPayload::default()
            },
            ItemKind::File,
        )
        .await
        .unwrap();
    let ticket = harness
        .engine
        .add_item(
            &ticket.id,
            &ItemPayload {
                transfer: Some(record.id.clone()),
                ..ItemPayload::default()
            },
            ItemKind::Transfer,
        )
        .await
        .unwrap();

    assert_eq!(ticket.files, vec![FileId::from("f-1")]);
    assert_eq!(ticket.transfers, vec![record.id]);
}

#[tokio::test]
async fn payload_without_the_selected_key_is_a_no_op() {
    let harness = TestHarness::standard().await.unwrap();
    let ticket = harness.create_ticket("author", "Printer jammed").await.unwrap();
    let before = harness.engine.find_by_id(&ticket.id).await.unwrap();

    let unchanged = harness
        .engine
        .add_item(&ticket.id, &message("m-1"), ItemKind::File)
        .await
        .unwrap();
    assert_eq!(unchanged, before);

    let unchanged = harness
        .engine
        .remove_item(&ticket.id, &ItemPayload::default(), ItemKind::Message)
        .await
        .unwrap();
    assert_eq!(unchanged, before);
}

#[tokio::test]
async fn unknown_item_is_rejected_without_mutation() {
    let harness = TestHarness::standard().await.unwrap();
    let ticket = harness.create_ticket("author", "Printer jammed").await.unwrap();
    let before = harness.engine.find_by_id(&ticket.id).await.unwrap();

    let err = harness
        .engine
        .add_item(&ticket.id, &assign_to("nobody"), ItemKind::AssignedTo)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);

    let err = harness
        .engine
        .add_item(&ticket.id, &department("legal"), ItemKind::Department)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);

    assert_eq!(harness.engine.find_by_id(&ticket.id).await.unwrap(), before);
    assert!(
        harness
            .engine
            .ledger()
            .for_ticket(&ticket.id)
            .await
            .unwrap()
            .is_empty()
    );
}

#[tokio::test]
async fn routing_items_cannot_be_removed() {
    let harness = TestHarness::standard().await.unwrap();
    let ticket = harness
        .assigned_ticket("author", "agent-a", "Printer jammed")
        .await
        .unwrap();
    let before = harness.engine.find_by_id(&ticket.id).await.unwrap();

    let unchanged = harness
        .engine
        .remove_item(&ticket.id, &assign_to("agent-a"), ItemKind::AssignedTo)
        .await
        .unwrap();
    assert_eq!(unchanged, before);
}

#[tokio::test]
async fn ledger_amend_overwrites_populated_fields() {
    let harness = TestHarness::standard().await.unwrap();
    let ticket = harness
        .assigned_ticket("author", "agent-a", "Printer jammed")
        .await
        .unwrap();
    let original = harness
        .engine
        .ledger()
        .find_by_id(&ticket.transfers[0])
        .await
        .unwrap();

    let amended = harness
        .engine
        .ledger()
        .amend(
            &original.id,
            TransferDraft {
                next_assigned: Some(UserId::from("agent-c")),
                ..TransferDraft::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(amended.next_assigned, Some(UserId::from("agent-c")));
    assert_eq!(amended.ticket, original.ticket);
    assert_eq!(amended.created_at, original.created_at);

    let err = harness
        .engine
        .ledger()
        .amend(&TransferId::from("missing"), TransferDraft::default())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);

    let err = harness
        .engine
        .ledger()
        .amend(
            &original.id,
            TransferDraft {
                next_department: Some(DepartmentId::from("legal")),
                ..TransferDraft::default()
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn ledger_requires_a_ticket() {
    let harness = TestHarness::standard().await.unwrap();
    let err = harness
        .engine
        .ledger()
        .record(TransferDraft::default())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::BadRequest);
}
