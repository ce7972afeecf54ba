// SPDX-FileCopyrightText: 2026 Deskflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Creation, edits, rating and deletion through the workflow engine.

use deskflow_classifier::retrain_once;
use deskflow_core::{
    DepartmentId, ErrorKind, FileId, HelpTopicId, MessageId, NewTicket, RatingInput,
    TICKET_SEQUENCE, TicketFilter, TicketPatch, TicketStatus, UserId,
};
use deskflow_test_utils::{TestHarness, fixtures};
use deskflow_workflow::{ItemKind, ItemPayload};

fn new_ticket(description: &str) -> NewTicket {
    NewTicket {
        title: "Help".into(),
        description: description.into(),
        owner: UserId::from("author"),
        ..NewTicket::default()
    }
}

fn close() -> TicketPatch {
    TicketPatch {
        status: Some(TicketStatus::Closed),
        ..TicketPatch::default()
    }
}

#[tokio::test]
async fn creation_is_routed_by_classification() {
    let harness = TestHarness::standard().await.unwrap();
    harness.create_ticket("author", "VPN drops").await.unwrap();
    harness.create_ticket("author", "Toner empty").await.unwrap();
    let before = harness
        .store
        .current_sequence(TICKET_SEQUENCE)
        .await
        .unwrap()
        .unwrap();

    harness.classifier.push_label("3").await;
    let ticket = harness
        .engine
        .create(NewTicket {
            department: Some(DepartmentId::from("it")),
            help_topic: Some(HelpTopicId::from("network")),
            ..new_ticket("Printer not working")
        })
        .await
        .unwrap();

    assert_eq!(ticket.status, TicketStatus::Open);
    assert_eq!(ticket.department, DepartmentId::from("facilities"));
    assert_eq!(ticket.help_topic, HelpTopicId::from("printers"));
    assert_eq!(ticket.number, before + 1);
    assert!(ticket.assigned_to.is_none());
    assert!(ticket.rating.is_none());

    let stored = harness.engine.find_by_id(&ticket.id).await.unwrap();
    assert_eq!(stored.number, ticket.number);
    assert_eq!(stored.department, ticket.department);
}

#[tokio::test]
async fn empty_description_is_rejected_before_numbering() {
    let harness = TestHarness::standard().await.unwrap();
    let err = harness.engine.create(new_ticket("   ")).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::BadRequest);
    assert_eq!(
        harness.store.current_sequence(TICKET_SEQUENCE).await.unwrap(),
        None
    );
}

#[tokio::test]
async fn unknown_reference_aborts_creation() {
    let harness = TestHarness::standard().await.unwrap();
    let err = harness
        .engine
        .create(NewTicket {
            messages: vec![MessageId::from("m-1"), MessageId::from("m-404")],
            ..new_ticket("Printer not working")
        })
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert!(err.to_string().contains("m-404"));
    assert_eq!(
        harness.engine.find(&TicketFilter::default()).await.unwrap_err().kind(),
        ErrorKind::NotFound
    );
}

#[tokio::test]
async fn classifier_failure_aborts_creation() {
    let harness = TestHarness::standard().await.unwrap();
    harness.classifier.push_failure("model not loaded").await;

    let err = harness
        .engine
        .create(new_ticket("Printer not working"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unavailable);
    assert_eq!(
        harness.store.current_sequence(TICKET_SEQUENCE).await.unwrap(),
        None
    );
}

#[tokio::test]
async fn label_without_help_topic_is_not_found() {
    let harness = TestHarness::standard().await.unwrap();
    harness.classifier.push_label("42").await;
    let err = harness
        .engine
        .create(new_ticket("Coffee machine"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert!(err.to_string().contains("classification 42"));
}

#[tokio::test]
async fn creation_deduplicates_links_and_stamps_assignment() {
    let harness = TestHarness::standard().await.unwrap();
    let ticket = harness
        .engine
        .create(NewTicket {
            assigned_to: Some(UserId::from("agent-a")),
            messages: vec![
                MessageId::from("m-2"),
                MessageId::from("m-1"),
                MessageId::from("m-2"),
            ],
            files: vec![FileId::from("f-1")],
            ..new_ticket("Printer not working")
        })
        .await
        .unwrap();

    assert_eq!(
        ticket.messages,
        vec![MessageId::from("m-2"), MessageId::from("m-1")]
    );
    assert_eq!(ticket.files, vec![FileId::from("f-1")]);
    assert!(ticket.assigned_at.is_some());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_creations_never_share_a_number() {
    let harness = TestHarness::standard().await.unwrap();
    let inputs = (0..25)
        .map(|i| new_ticket(&format!("Printer {i} jammed")))
        .collect();

    let results = harness.engine.create_in_bulk(inputs).await;
    let mut numbers: Vec<i64> = results.into_iter().map(|r| r.unwrap().number).collect();
    numbers.sort_unstable();
    assert_eq!(numbers, (1..=25).collect::<Vec<_>>());
}

#[tokio::test]
async fn sequential_creations_are_strictly_increasing() {
    let harness = TestHarness::standard().await.unwrap();
    let mut last = 0;
    for i in 0..5 {
        let ticket = harness
            .create_ticket("author", &format!("Printer {i}"))
            .await
            .unwrap();
        assert!(ticket.number > last);
        last = ticket.number;
    }
}

#[tokio::test]
async fn bulk_creation_reports_each_input() {
    let harness = TestHarness::standard().await.unwrap();
    let results = harness
        .engine
        .create_in_bulk(vec![
            new_ticket("Printer one"),
            new_ticket(""),
            new_ticket("Printer two"),
        ])
        .await;

    assert_eq!(results.len(), 3);
    assert!(results[0].is_ok());
    assert_eq!(
        results[1].as_ref().unwrap_err().kind(),
        ErrorKind::BadRequest
    );
    assert!(results[2].is_ok());
}

#[tokio::test]
async fn find_filters_and_reports_empty_results() {
    let harness = TestHarness::standard().await.unwrap();
    harness.create_ticket("author", "Printer").await.unwrap();
    harness.classifier.push_label("5").await;
    harness.create_ticket("author", "Wifi").await.unwrap();

    let it = harness
        .engine
        .find(&TicketFilter {
            department: Some(DepartmentId::from("it")),
            ..TicketFilter::default()
        })
        .await
        .unwrap();
    assert_eq!(it.len(), 1);
    assert_eq!(it[0].description, "Wifi");

    let err = harness
        .engine
        .find(&TicketFilter {
            status: Some(TicketStatus::Closed),
            ..TicketFilter::default()
        })
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn update_requires_the_assigned_agent_or_an_admin() {
    let harness = TestHarness::standard().await.unwrap();
    let unassigned = harness.create_ticket("author", "Printer").await.unwrap();
    let agent = harness.actor("agent-a").await;

    let err = harness
        .engine
        .update(&unassigned.id, TicketPatch::default(), &agent)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unauthorized);

    let ticket = harness
        .assigned_ticket("author", "agent-a", "Printer jammed")
        .await
        .unwrap();
    let other = harness.actor("agent-c").await;
    let err = harness
        .engine
        .update(&ticket.id, TicketPatch::default(), &other)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unauthorized);

    let admin = harness.actor("admin").await;
    let patched = harness
        .engine
        .update(
            &ticket.id,
            TicketPatch {
                justification: Some("checked by admin".into()),
                ..TicketPatch::default()
            },
            &admin,
        )
        .await
        .unwrap();
    assert_eq!(patched.justification, "checked by admin");
}

#[tokio::test]
async fn update_merges_only_non_empty_fields() {
    let harness = TestHarness::standard().await.unwrap();
    let ticket = harness
        .assigned_ticket("author", "agent-a", "Printer jammed")
        .await
        .unwrap();
    let agent = harness.actor("agent-a").await;

    let updated = harness
        .engine
        .update(
            &ticket.id,
            TicketPatch {
                title: Some(String::new()),
                description: Some("Printer jammed on floor 2".into()),
                status: Some(TicketStatus::InProcess),
                justification: None,
            },
            &agent,
        )
        .await
        .unwrap();

    assert_eq!(updated.title, ticket.title);
    assert_eq!(updated.description, "Printer jammed on floor 2");
    assert_eq!(updated.status, TicketStatus::InProcess);
    assert!(updated.completed_at.is_none());
    assert_eq!(harness.directory.closed_count(&UserId::from("agent-a")).await, 0);
}

#[tokio::test]
async fn closed_ticket_is_frozen_for_non_admins() {
    let harness = TestHarness::standard().await.unwrap();
    let ticket = harness
        .assigned_ticket("author", "agent-a", "Printer jammed")
        .await
        .unwrap();
    let agent = harness.actor("agent-a").await;
    harness.engine.update(&ticket.id, close(), &agent).await.unwrap();
    let before = harness.engine.find_by_id(&ticket.id).await.unwrap();

    let err = harness
        .engine
        .update(
            &ticket.id,
            TicketPatch {
                title: Some("Reopened".into()),
                status: Some(TicketStatus::Open),
                ..TicketPatch::default()
            },
            &agent,
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);
    assert_eq!(harness.engine.find_by_id(&ticket.id).await.unwrap(), before);

    let admin = harness.actor("admin").await;
    let reopened = harness
        .engine
        .update(
            &ticket.id,
            TicketPatch {
                status: Some(TicketStatus::InProcess),
                ..TicketPatch::default()
            },
            &admin,
        )
        .await
        .unwrap();
    assert_eq!(reopened.status, TicketStatus::InProcess);
}

#[tokio::test]
async fn closing_counts_and_notifies_the_author() {
    let harness = TestHarness::standard().await.unwrap();
    let ticket = harness
        .assigned_ticket("author", "agent-a", "Printer jammed")
        .await
        .unwrap();
    let agent = harness.actor("agent-a").await;

    let closed = harness.engine.update(&ticket.id, close(), &agent).await.unwrap();
    assert_eq!(closed.status, TicketStatus::Closed);
    assert!(closed.completed_at.is_some());

    harness.settle().await;
    assert_eq!(harness.directory.closed_count(&UserId::from("agent-a")).await, 1);
    let closing = harness.email.sent_with_subject("Ticket Closed").await;
    assert_eq!(closing.len(), 1);
    assert_eq!(closing[0].to, vec!["author@example.com".to_string()]);
}

#[tokio::test]
async fn counter_failure_does_not_undo_closing() {
    let harness = TestHarness::standard().await.unwrap();
    let ticket = harness
        .assigned_ticket("author", "agent-a", "Printer jammed")
        .await
        .unwrap();
    harness.directory.fail_closed_counter(true);
    let agent = harness.actor("agent-a").await;

    let canceled = harness
        .engine
        .update(
            &ticket.id,
            TicketPatch {
                status: Some(TicketStatus::Canceled),
                ..TicketPatch::default()
            },
            &agent,
        )
        .await
        .unwrap();
    assert_eq!(canceled.status, TicketStatus::Canceled);
    let stored = harness.engine.find_by_id(&ticket.id).await.unwrap();
    assert_eq!(stored.status, TicketStatus::Canceled);
    assert!(stored.completed_at.is_some());
}

#[tokio::test]
async fn rating_happens_once_after_closure() {
    let harness = TestHarness::standard().await.unwrap();
    let ticket = harness
        .assigned_ticket("author", "agent-a", "Printer jammed")
        .await
        .unwrap();
    let author = harness.actor("author").await;
    let agent = harness.actor("agent-a").await;
    let four = RatingInput {
        rating: Some(4),
        comment: Some("quick fix".into()),
    };

    let err = harness
        .engine
        .rate_ticket(&ticket.id, four.clone(), &author)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);

    harness.engine.update(&ticket.id, close(), &agent).await.unwrap();

    let err = harness
        .engine
        .rate_ticket(&ticket.id, four.clone(), &agent)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unauthorized);

    let rated = harness
        .engine
        .rate_ticket(&ticket.id, four, &author)
        .await
        .unwrap();
    assert_eq!(rated.rating, Some(4));
    assert_eq!(rated.comment, "quick fix");

    let admin = harness.actor("admin").await;
    let err = harness
        .engine
        .rate_ticket(
            &ticket.id,
            RatingInput {
                rating: Some(1),
                comment: None,
            },
            &admin,
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Locked);
    let stored = harness.engine.find_by_id(&ticket.id).await.unwrap();
    assert_eq!(stored.rating, Some(4));
    assert_eq!(stored.comment, "quick fix");

    harness.settle().await;
    assert_eq!(
        harness.directory.rating_recalculations().await,
        vec![UserId::from("agent-a")]
    );
}

#[tokio::test]
async fn rating_outside_bounds_is_rejected() {
    let harness = TestHarness::standard().await.unwrap();
    let ticket = harness
        .assigned_ticket("author", "agent-a", "Printer jammed")
        .await
        .unwrap();
    let agent = harness.actor("agent-a").await;
    harness.engine.update(&ticket.id, close(), &agent).await.unwrap();
    let author = harness.actor("author").await;

    let err = harness
        .engine
        .rate_ticket(
            &ticket.id,
            RatingInput {
                rating: Some(9),
                comment: None,
            },
            &author,
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::BadRequest);

    let rated = harness
        .engine
        .rate_ticket(&ticket.id, RatingInput::default(), &author)
        .await
        .unwrap();
    assert_eq!(rated.rating, Some(harness.config.tickets.min_rating));
}

#[tokio::test]
async fn delete_tolerates_a_failing_linked_file() {
    let harness = TestHarness::standard().await.unwrap();
    let ticket = harness
        .engine
        .create(NewTicket {
            messages: vec![MessageId::from("m-1"), MessageId::from("m-2")],
            files: vec![FileId::from("f-1"), FileId::from("f-2"), FileId::from("f-3")],
            ..new_ticket("Printer not working")
        })
        .await
        .unwrap();
    let ticket = harness
        .engine
        .add_item(
            &ticket.id,
            &ItemPayload {
                assigned_to: Some(UserId::from("agent-a")),
                ..ItemPayload::default()
            },
            ItemKind::AssignedTo,
        )
        .await
        .unwrap();
    harness.files.fail_delete(FileId::from("f-2")).await;

    let snapshot = harness.engine.delete(&ticket.id).await.unwrap();

    assert_eq!(snapshot.id, ticket.id);
    assert_eq!(snapshot.files.len(), 3);
    assert_eq!(snapshot.transfers.len(), 1);
    assert_eq!(
        harness.engine.find_by_id(&ticket.id).await.unwrap_err().kind(),
        ErrorKind::NotFound
    );
    assert!(harness.files.contains(&FileId::from("f-2")).await);
    assert!(!harness.files.contains(&FileId::from("f-1")).await);
    assert!(!harness.files.contains(&FileId::from("f-3")).await);
    assert_eq!(harness.messages.len().await, 0);
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
async fn deleting_an_unknown_ticket_is_not_found() {
    let harness = TestHarness::standard().await.unwrap();
    let err = harness
        .engine
        .delete(&"missing".into())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn closed_tickets_feed_retraining() {
    let harness = TestHarness::builder()
        .standard_world()
        .with_help_topic(deskflow_core::HelpTopic {
            examples: vec!["Cannot print".into()],
            ..fixtures::help_topic("scanners", "facilities", 7)
        })
        .build()
        .await
        .unwrap();
    let agent = harness.actor("agent-a").await;
    let printer = harness
        .assigned_ticket("author", "agent-a", "Printer jammed")
        .await
        .unwrap();
    harness.engine.update(&printer.id, close(), &agent).await.unwrap();
    harness.create_ticket("author", "Still open").await.unwrap();

    let examples = harness.engine.training_examples().await.unwrap();
    assert_eq!(examples.len(), 1);
    assert_eq!(examples[0].description, "Printer jammed");
    assert_eq!(examples[0].label, 3);

    let set = harness.engine.training_source();
    let report = retrain_once(harness.classifier.as_ref(), &set).await.unwrap();
    assert_eq!(report.examples, 2);
    assert_eq!(harness.classifier.training_runs().await.len(), 1);

    harness
        .directory
        .remove_help_topic(&HelpTopicId::from("printers"))
        .await;
    assert!(harness.engine.training_examples().await.unwrap().is_empty());
}
