// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! The contact-submission pipeline.
//!
//! Orchestrates validation, throttling, persistence, and notification for
//! each submission. Stage order is a hard invariant: the contact is stored
//! before any notification is attempted, so a delivery failure can never
//! lose the record of intent, and a notification can never exist for an
//! unstored submission.

use crate::config::MailConfig;
use crate::mailer::{operator_alert, visitor_ack, DeliveryError, Mailer};
use crate::store::{Contact, Store, StoreError};
use crate::throttle::{ThrottleDecision, ThrottleStore};
use crate::validator::{validate_email, ValidationError};
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{error, info, warn};

/// Why a submission was not (fully) processed.
///
/// Every stage failure maps to exactly one variant; nothing propagates
/// past the pipeline boundary unclassified.
#[derive(Debug, Error)]
pub enum SubmitError {
    /// Client-correctable: the address failed shape validation.
    #[error(transparent)]
    InvalidEmail(#[from] ValidationError),

    /// Client-retryable after the window reopens.
    #[error("too many submissions from this address")]
    RateLimited { retry_after: Duration },

    /// Server-side: nothing was persisted, no notification attempted.
    #[error(transparent)]
    Storage(#[from] StoreError),

    /// Server-side: the contact IS durably stored, only notification
    /// failed. Operator-retriable, not client-fixable.
    #[error(transparent)]
    Delivery(#[from] DeliveryError),
}

/// Orchestrator for contact submissions.
pub struct SubmissionPipeline {
    throttle: Arc<dyn ThrottleStore>,
    store: Arc<dyn Store>,
    mailer: Arc<dyn Mailer>,
    mail: MailConfig,
}

impl SubmissionPipeline {
    pub fn new(
        throttle: Arc<dyn ThrottleStore>,
        store: Arc<dyn Store>,
        mailer: Arc<dyn Mailer>,
        mail: MailConfig,
    ) -> Self {
        Self {
            throttle,
            store,
            mailer,
            mail,
        }
    }

    /// Process one contact submission.
    ///
    /// `now` is the arrival time used for throttle arithmetic; handlers
    /// pass `Instant::now()`, tests pass simulated clocks.
    pub async fn submit(&self, email: &str, now: Instant) -> Result<Contact, SubmitError> {
        validate_email(email)?;

        // Check-and-record is atomic on the throttle store; recording
        // immediately on acceptance closes the duplicate-request race.
        if let ThrottleDecision::Rejected { retry_after } =
            self.throttle.check_and_record(email, now).await
        {
            info!(email, retry_after_secs = retry_after.as_secs(), "Submission throttled");
            return Err(SubmitError::RateLimited { retry_after });
        }

        let contact = match self.store.create_contact(email).await {
            Ok(contact) => contact,
            Err(e) => {
                warn!(email, error = %e, "Contact storage failed");
                return Err(e.into());
            }
        };
        info!(email, "Contact stored");

        for message in [
            operator_alert(&self.mail, email),
            visitor_ack(&self.mail, email),
        ] {
            if let Err(e) = self.mailer.send(&message).await {
                // Partial failure: the contact is already durable
                error!(email, to = %message.to, error = %e, "Notification delivery failed after store");
                return Err(e.into());
            }
        }
        info!(email, "Notifications dispatched");

        Ok(contact)
    }
}
