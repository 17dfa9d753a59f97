// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Email address shape validation for contact submissions.
//!
//! This is intake-level validation only: the address must look like
//! `local@domain.tld` with no whitespace. Deliverability is the
//! dispatcher's problem.

use thiserror::Error;
use tracing::debug;

/// Reasons an address fails shape validation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("email address is empty")]
    Empty,

    #[error("email address contains whitespace")]
    ContainsWhitespace,

    #[error("email address is missing local part or domain")]
    MissingPart,

    #[error("email domain has no top-level part: {0}")]
    MissingTld(String),
}

/// Validate the shape of a submitted email address.
///
/// Accepts `local@domain.tld`; rejects empty input, embedded whitespace,
/// and domains without a dot-separated final segment (`a@b`, `a@b.`).
pub fn validate_email(input: &str) -> Result<(), ValidationError> {
    if input.is_empty() {
        return Err(ValidationError::Empty);
    }

    if input.chars().any(char::is_whitespace) {
        debug!(email = %input, "Address contains whitespace");
        return Err(ValidationError::ContainsWhitespace);
    }

    let (local, domain) = match input.split_once('@') {
        Some(parts) => parts,
        None => return Err(ValidationError::MissingPart),
    };

    if local.is_empty() || domain.is_empty() {
        return Err(ValidationError::MissingPart);
    }

    // Domain must carry a dot with non-empty segments on both sides
    match domain.rsplit_once('.') {
        Some((head, tld)) if !head.is_empty() && !tld.is_empty() => Ok(()),
        _ => {
            debug!(email = %input, "Address domain has no TLD");
            Err(ValidationError::MissingTld(domain.to_string()))
        }
    }
}
