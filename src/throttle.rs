// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Per-identity submission throttling.
//!
//! Tracks the last accepted submission time per email address and enforces
//! a minimum interval between acceptances. The state lives behind the
//! [`ThrottleStore`] trait so deployments spanning multiple processes can
//! back it with shared storage; this crate ships the in-memory
//! implementation.
//!
//! The check and the record are a single operation under one lock: two
//! concurrent requests from the same identity inside the window cannot
//! both observe "not throttled".

use async_trait::async_trait;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::debug;

/// Outcome of a throttle check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThrottleDecision {
    /// Submission accepted; the identity's timestamp has been recorded.
    Accepted,
    /// Submission rejected; the identity must wait.
    Rejected {
        /// Time until the window reopens
        retry_after: Duration,
    },
}

impl ThrottleDecision {
    pub fn is_accepted(&self) -> bool {
        matches!(self, ThrottleDecision::Accepted)
    }
}

/// Throttle state keyed by submission identity.
#[async_trait]
pub trait ThrottleStore: Send + Sync {
    /// Atomically check the identity's window and, on acceptance, record
    /// `now` as its last accepted submission time.
    async fn check_and_record(&self, identity: &str, now: Instant) -> ThrottleDecision;

    /// Drop entries whose window closed long enough ago that they can
    /// never influence a decision again.
    async fn evict_stale(&self, now: Instant);
}

/// Entries older than this multiple of the window are safe to evict.
const EVICTION_FACTOR: u32 = 10;

/// In-memory throttle state.
///
/// Keys are the raw identity strings as submitted; case variants of the
/// same address are tracked as distinct identities.
pub struct MemoryThrottle {
    min_interval: Duration,
    entries: RwLock<HashMap<String, Instant>>,
}

impl MemoryThrottle {
    /// Create a throttle enforcing the given minimum interval.
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Last accepted submission time for an identity, if any.
    pub async fn last_accepted(&self, identity: &str) -> Option<Instant> {
        self.entries.read().await.get(identity).copied()
    }
}

#[async_trait]
impl ThrottleStore for MemoryThrottle {
    async fn check_and_record(&self, identity: &str, now: Instant) -> ThrottleDecision {
        let mut entries = self.entries.write().await;

        if let Some(last) = entries.get(identity) {
            let elapsed = now.saturating_duration_since(*last);
            if elapsed < self.min_interval {
                let retry_after = self.min_interval - elapsed;
                debug!(identity, ?retry_after, "Submission throttled");
                return ThrottleDecision::Rejected { retry_after };
            }
        }

        // Overwrite, not accumulate: one timestamp per identity
        entries.insert(identity.to_string(), now);
        ThrottleDecision::Accepted
    }

    async fn evict_stale(&self, now: Instant) {
        let horizon = self.min_interval.saturating_mul(EVICTION_FACTOR);
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, last| now.saturating_duration_since(*last) < horizon);
        let evicted = before - entries.len();
        if evicted > 0 {
            debug!(evicted, remaining = entries.len(), "Evicted stale throttle entries");
        }
    }
}
