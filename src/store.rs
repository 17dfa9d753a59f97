// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Persistence collaborator for contacts and comments.
//!
//! The intake core only needs append and read operations; the engine
//! behind them is deployment-specific and lives behind the [`Store`]
//! trait. [`MemoryStore`] is the in-process implementation and the test
//! double.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;

/// A recorded contact submission. Immutable once stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contact {
    /// Visitor email address
    pub email: String,
    /// When the submission was accepted
    pub received_at: DateTime<Utc>,
}

/// A visitor comment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: Uuid,
    pub name: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

/// Persistence failure.
#[derive(Debug, Error, Clone)]
pub enum StoreError {
    #[error("storage backend unavailable: {0}")]
    Unavailable(String),

    #[error("storage write rejected: {0}")]
    WriteRejected(String),
}

/// Durable persistence for contacts and comments.
///
/// A contact write must either fully succeed or leave no trace; the
/// pipeline relies on this to guarantee that a notification is never
/// sent for a submission that was not stored.
#[async_trait]
pub trait Store: Send + Sync {
    /// Append an accepted contact submission.
    async fn create_contact(&self, email: &str) -> Result<Contact, StoreError>;

    /// All comments, newest first.
    async fn list_comments(&self) -> Result<Vec<Comment>, StoreError>;

    /// Append a visitor comment.
    async fn create_comment(&self, name: &str, message: &str) -> Result<Comment, StoreError>;
}

/// In-memory store.
#[derive(Default)]
pub struct MemoryStore {
    contacts: RwLock<Vec<Contact>>,
    comments: RwLock<Vec<Comment>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of stored contacts, in insertion order.
    pub async fn contacts(&self) -> Vec<Contact> {
        self.contacts.read().await.clone()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn create_contact(&self, email: &str) -> Result<Contact, StoreError> {
        let contact = Contact {
            email: email.to_string(),
            received_at: Utc::now(),
        };
        self.contacts.write().await.push(contact.clone());
        Ok(contact)
    }

    async fn list_comments(&self) -> Result<Vec<Comment>, StoreError> {
        let comments = self.comments.read().await;
        // Appended chronologically; newest first for the caller
        Ok(comments.iter().rev().cloned().collect())
    }

    async fn create_comment(&self, name: &str, message: &str) -> Result<Comment, StoreError> {
        let comment = Comment {
            id: Uuid::new_v4(),
            name: name.to_string(),
            message: message.to_string(),
            created_at: Utc::now(),
        };
        self.comments.write().await.push(comment.clone());
        Ok(comment)
    }
}
