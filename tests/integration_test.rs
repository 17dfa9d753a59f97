// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Integration tests for the contact-submission pipeline.
//!
//! Exercises the pipeline against recording and failing collaborators to
//! validate stage ordering and partial-failure semantics.

mod harness;

use contact_intake::pipeline::SubmitError;
use contact_intake::store::MemoryStore;
use contact_intake::throttle::MemoryThrottle;
use harness::{FailingMailer, FailingStore, RecordingMailer, WINDOW};
use std::sync::Arc;
use std::time::{Duration, Instant};

#[tokio::test]
async fn test_accepted_submission_stores_then_notifies() {
    let throttle = Arc::new(MemoryThrottle::new(WINDOW));
    let store = Arc::new(MemoryStore::new());
    let mailer = Arc::new(RecordingMailer::new());
    let pipeline = harness::pipeline(throttle, store.clone(), mailer.clone());

    let contact = pipeline
        .submit("visitor@example.com", Instant::now())
        .await
        .expect("submission should succeed");
    assert_eq!(contact.email, "visitor@example.com");

    let contacts = store.contacts().await;
    assert_eq!(contacts.len(), 1);

    // Operator alert first, visitor acknowledgment second
    let sent = mailer.sent().await;
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[0].to, "operator@example.com");
    assert_eq!(sent[1].to, "visitor@example.com");
}

#[tokio::test]
async fn test_resubmission_within_window_is_throttled() {
    let throttle = Arc::new(MemoryThrottle::new(WINDOW));
    let store = Arc::new(MemoryStore::new());
    let mailer = Arc::new(RecordingMailer::new());
    let pipeline = harness::pipeline(throttle, store.clone(), mailer.clone());

    let start = Instant::now();
    pipeline
        .submit("visitor@example.com", start)
        .await
        .expect("first submission should succeed");

    let result = pipeline
        .submit("visitor@example.com", start + Duration::from_secs(10))
        .await;
    assert!(matches!(result, Err(SubmitError::RateLimited { .. })));

    // The rejected attempt performed no store write and no send
    assert_eq!(store.contacts().await.len(), 1);
    assert_eq!(mailer.sent().await.len(), 2);
}

#[tokio::test]
async fn test_resubmission_after_window_succeeds_and_advances() {
    let throttle = Arc::new(MemoryThrottle::new(WINDOW));
    let store = Arc::new(MemoryStore::new());
    let mailer = Arc::new(RecordingMailer::new());
    let pipeline = harness::pipeline(throttle.clone(), store.clone(), mailer);

    let start = Instant::now();
    let later = start + Duration::from_secs(31);

    pipeline
        .submit("visitor@example.com", start)
        .await
        .expect("first submission should succeed");
    pipeline
        .submit("visitor@example.com", later)
        .await
        .expect("submission after the window should succeed");

    assert_eq!(store.contacts().await.len(), 2);
    assert_eq!(throttle.last_accepted("visitor@example.com").await, Some(later));
}

#[tokio::test]
async fn test_malformed_identity_touches_nothing() {
    let throttle = Arc::new(MemoryThrottle::new(WINDOW));
    let store = Arc::new(MemoryStore::new());
    let mailer = Arc::new(RecordingMailer::new());
    let pipeline = harness::pipeline(throttle.clone(), store.clone(), mailer.clone());

    for bad in ["", "not-an-email", "a@b", "a b@example.com"] {
        let result = pipeline.submit(bad, Instant::now()).await;
        assert!(
            matches!(result, Err(SubmitError::InvalidEmail(_))),
            "{bad:?} should fail validation"
        );
        assert_eq!(throttle.last_accepted(bad).await, None);
    }

    assert!(store.contacts().await.is_empty());
    assert!(mailer.sent().await.is_empty());
}

#[tokio::test]
async fn test_store_failure_aborts_before_notification() {
    let throttle = Arc::new(MemoryThrottle::new(WINDOW));
    let mailer = Arc::new(RecordingMailer::new());
    let pipeline = harness::pipeline(throttle, Arc::new(FailingStore), mailer.clone());

    let result = pipeline.submit("visitor@example.com", Instant::now()).await;
    assert!(matches!(result, Err(SubmitError::Storage(_))));

    // Zero sends: no notification without a stored record
    assert!(mailer.sent().await.is_empty());
}

#[tokio::test]
async fn test_delivery_failure_leaves_contact_stored() {
    for fail_index in [0, 1] {
        let throttle = Arc::new(MemoryThrottle::new(WINDOW));
        let store = Arc::new(MemoryStore::new());
        let mailer = Arc::new(FailingMailer::failing_on(fail_index));
        let pipeline = harness::pipeline(throttle, store.clone(), mailer);

        let result = pipeline.submit("visitor@example.com", Instant::now()).await;
        assert!(
            matches!(result, Err(SubmitError::Delivery(_))),
            "delivery failure on message {fail_index} should surface"
        );

        // Durability holds despite the notification failure
        let contacts = store.contacts().await;
        assert_eq!(contacts.len(), 1);
        assert_eq!(contacts[0].email, "visitor@example.com");
    }
}

#[tokio::test]
async fn test_concurrent_same_identity_accepts_exactly_one() {
    const ATTEMPTS: usize = 8;

    let throttle = Arc::new(MemoryThrottle::new(WINDOW));
    let store = Arc::new(MemoryStore::new());
    let mailer = Arc::new(RecordingMailer::new());
    let pipeline = Arc::new(harness::pipeline(throttle, store.clone(), mailer.clone()));

    // All attempts share one arrival instant: every request is inside
    // every other request's window.
    let now = Instant::now();
    let mut tasks = Vec::new();
    for _ in 0..ATTEMPTS {
        let pipeline = pipeline.clone();
        tasks.push(tokio::spawn(async move {
            pipeline.submit("visitor@example.com", now).await
        }));
    }

    let mut accepted = 0;
    let mut throttled = 0;
    for task in tasks {
        match task.await.expect("task should not panic") {
            Ok(_) => accepted += 1,
            Err(SubmitError::RateLimited { .. }) => throttled += 1,
            Err(other) => panic!("unexpected failure: {other}"),
        }
    }

    assert_eq!(accepted, 1, "exactly one attempt must win the window");
    assert_eq!(throttled, ATTEMPTS - 1);
    assert_eq!(store.contacts().await.len(), 1);
    assert_eq!(mailer.sent().await.len(), 2);
}
