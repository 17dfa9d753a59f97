// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

#![allow(dead_code)] // shared between test binaries; each uses a subset

//! Test harness for the contact intake pipeline.
//!
//! Provides recording and failing collaborator fakes so tests can observe
//! exactly which store writes and notification sends a scenario performed,
//! without any network or disk I/O.

use async_trait::async_trait;
use contact_intake::config::{CorsConfig, MailConfig};
use contact_intake::handlers::AppState;
use contact_intake::mailer::{DeliveryError, Mailer, NotificationMessage};
use contact_intake::pipeline::SubmissionPipeline;
use contact_intake::store::{Comment, Contact, MemoryStore, Store, StoreError};
use contact_intake::throttle::{MemoryThrottle, ThrottleStore};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

/// Mailer that records every message instead of delivering it.
#[derive(Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<NotificationMessage>>,
}

impl RecordingMailer {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn sent(&self) -> Vec<NotificationMessage> {
        self.sent.lock().await.clone()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, message: &NotificationMessage) -> Result<(), DeliveryError> {
        self.sent.lock().await.push(message.clone());
        Ok(())
    }
}

/// Mailer that fails on the Nth send (0-based) and records the rest.
pub struct FailingMailer {
    fail_index: usize,
    sent: Mutex<Vec<NotificationMessage>>,
}

impl FailingMailer {
    pub fn failing_on(fail_index: usize) -> Self {
        Self {
            fail_index,
            sent: Mutex::new(Vec::new()),
        }
    }

    pub async fn sent(&self) -> Vec<NotificationMessage> {
        self.sent.lock().await.clone()
    }
}

#[async_trait]
impl Mailer for FailingMailer {
    async fn send(&self, message: &NotificationMessage) -> Result<(), DeliveryError> {
        let mut sent = self.sent.lock().await;
        if sent.len() == self.fail_index {
            return Err(DeliveryError::Rejected { status: 502 });
        }
        sent.push(message.clone());
        Ok(())
    }
}

/// Store whose writes always fail.
pub struct FailingStore;

#[async_trait]
impl Store for FailingStore {
    async fn create_contact(&self, _email: &str) -> Result<Contact, StoreError> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }

    async fn list_comments(&self) -> Result<Vec<Comment>, StoreError> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }

    async fn create_comment(&self, _name: &str, _message: &str) -> Result<Comment, StoreError> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }
}

/// Mail configuration pointing at nothing; fakes never dial out.
pub fn mail_config() -> MailConfig {
    MailConfig {
        contact_email: "operator@example.com".to_string(),
        api_key: "test-key".to_string(),
        ..Default::default()
    }
}

pub fn cors_config() -> CorsConfig {
    CorsConfig {
        allowed_origins: vec![
            "https://site.example.org".to_string(),
            "http://localhost:5173".to_string(),
        ],
    }
}

pub const WINDOW: Duration = Duration::from_secs(30);

/// Pipeline wired to the given collaborators with a 30s window.
pub fn pipeline(
    throttle: Arc<MemoryThrottle>,
    store: Arc<dyn Store>,
    mailer: Arc<dyn Mailer>,
) -> SubmissionPipeline {
    SubmissionPipeline::new(throttle, store, mailer, mail_config())
}

/// Full application state over in-memory collaborators, for router tests.
pub fn app_state() -> (Arc<AppState>, Arc<MemoryStore>, Arc<RecordingMailer>) {
    let throttle = Arc::new(MemoryThrottle::new(WINDOW));
    let store = Arc::new(MemoryStore::new());
    let mailer = Arc::new(RecordingMailer::new());

    let state = Arc::new(AppState {
        pipeline: pipeline(throttle.clone(), store.clone(), mailer.clone()),
        store: store.clone(),
        throttle: throttle as Arc<dyn ThrottleStore>,
        cors: cors_config(),
    });

    (state, store, mailer)
}
