// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Contact Intake Service
//!
//! This crate provides the public intake backend for the site: it accepts
//! visitor comments and contact-email submissions, persists them, and
//! triggers outbound notification emails.
//!
//! The core is the contact-submission pipeline:
//!
//! - Email shape validation
//! - Per-identity submission throttling (30s window default)
//! - Durable persistence before any notification is attempted
//! - Dual outbound notification (operator alert + visitor acknowledgment)
//!
//! A delivery failure after a successful store is surfaced to the caller as
//! an error; the stored contact remains the durable record of intent.

pub mod config;
pub mod cors;
pub mod handlers;
pub mod mailer;
pub mod pipeline;
pub mod store;
pub mod throttle;
pub mod validator;

pub use config::Config;
pub use mailer::{DeliveryError, Mailer, NotificationMessage};
pub use pipeline::{SubmissionPipeline, SubmitError};
pub use store::{Store, StoreError};
pub use throttle::{MemoryThrottle, ThrottleDecision, ThrottleStore};
