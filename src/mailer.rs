// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Outbound notification dispatch.
//!
//! Every accepted contact submission produces two messages: an alert to the
//! operator and an acknowledgment to the visitor. Delivery goes through the
//! [`Mailer`] trait so the pipeline never performs network I/O directly and
//! tests can substitute a recording fake.
//!
//! [`HttpMailer`] speaks the Brevo transactional-email API: a JSON POST
//! authenticated by an `api-key` header.

use crate::config::MailConfig;
use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

/// A single outbound notification. Transient, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationMessage {
    /// Recipient address
    pub to: String,
    /// Sender display name
    pub sender_name: String,
    pub subject: String,
    pub body: String,
}

/// Delivery failure.
#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("notification credentials missing (api key or contact email)")]
    MissingCredentials,

    #[error("notification transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("notification rejected by provider (status {status})")]
    Rejected { status: u16 },
}

/// Capability to deliver a notification message.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, message: &NotificationMessage) -> Result<(), DeliveryError>;
}

/// Alert to the operator about a new contact submission.
pub fn operator_alert(config: &MailConfig, visitor_email: &str) -> NotificationMessage {
    NotificationMessage {
        to: config.contact_email.clone(),
        sender_name: config.sender_name.clone(),
        subject: "📬 Nouveau contact depuis le site".to_string(),
        body: format!("Un visiteur a laissé son e-mail : {visitor_email}"),
    }
}

/// Acknowledgment to the visitor who submitted their address.
pub fn visitor_ack(config: &MailConfig, visitor_email: &str) -> NotificationMessage {
    NotificationMessage {
        to: visitor_email.to_string(),
        sender_name: format!("{} - {}", config.signature, config.sender_name),
        subject: "Merci pour ton message 🌷".to_string(),
        body: format!(
            "Bonjour 🌸\n\nMerci d’avoir pris contact ! Je te répondrai dès que possible.\n\n{}",
            config.signature
        ),
    }
}

/// Brevo-shaped delivery payload.
#[derive(Debug, Serialize)]
struct SendPayload<'a> {
    sender: Party<'a>,
    to: [Recipient<'a>; 1],
    subject: &'a str,
    #[serde(rename = "textContent")]
    text_content: &'a str,
}

#[derive(Debug, Serialize)]
struct Party<'a> {
    name: &'a str,
    email: &'a str,
}

#[derive(Debug, Serialize)]
struct Recipient<'a> {
    email: &'a str,
}

/// Mailer backed by a transactional-email HTTP API.
pub struct HttpMailer {
    client: reqwest::Client,
    config: MailConfig,
}

impl HttpMailer {
    /// Build a mailer with the delivery timeout from configuration.
    pub fn new(config: MailConfig) -> Result<Self, DeliveryError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()?;
        Ok(Self { client, config })
    }
}

#[async_trait]
impl Mailer for HttpMailer {
    async fn send(&self, message: &NotificationMessage) -> Result<(), DeliveryError> {
        // Credentials are checked at dispatch time so the service can start
        // (and keep storing submissions) while mail is unconfigured.
        if self.config.api_key.is_empty() || self.config.contact_email.is_empty() {
            return Err(DeliveryError::MissingCredentials);
        }

        let payload = SendPayload {
            sender: Party {
                name: &message.sender_name,
                email: &self.config.contact_email,
            },
            to: [Recipient { email: &message.to }],
            subject: &message.subject,
            text_content: &message.body,
        };

        let response = self
            .client
            .post(&self.config.api_url)
            .header("api-key", &self.config.api_key)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(DeliveryError::Rejected {
                status: status.as_u16(),
            });
        }

        debug!(to = %message.to, subject = %message.subject, "Notification delivered");
        Ok(())
    }
}
