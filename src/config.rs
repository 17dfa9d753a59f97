// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Configuration for the contact intake service.
//!
//! Values are loaded from environment variables in `main`; the serde
//! defaults here double as the documented fallbacks.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the contact intake service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server bind address (default: 0.0.0.0:8080)
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Cross-origin configuration
    #[serde(default)]
    pub cors: CorsConfig,

    /// Submission throttling configuration
    #[serde(default)]
    pub throttle: ThrottleConfig,

    /// Outbound notification configuration
    #[serde(default)]
    pub mail: MailConfig,
}

/// Allow-listed origins for cross-origin requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    /// Exact origins permitted to call the API. The first entry is echoed
    /// back to callers whose declared origin is absent or unrecognized.
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: Vec<String>,
}

/// Throttling of repeat submissions from the same email address.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThrottleConfig {
    /// Minimum interval between accepted submissions per identity in
    /// milliseconds (default: 30000)
    #[serde(default = "default_min_interval_ms")]
    pub min_interval_ms: u64,
}

/// Outbound transactional-email configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailConfig {
    /// Transactional email API endpoint
    #[serde(default = "default_mail_api_url")]
    pub api_url: String,

    /// API key for the outbound channel. Empty means unconfigured;
    /// dispatch fails at send time, not at startup.
    #[serde(default)]
    pub api_key: String,

    /// Operator address: receives the alert and appears as the sender of
    /// both outbound messages.
    #[serde(default)]
    pub contact_email: String,

    /// Display name on the operator alert
    #[serde(default = "default_sender_name")]
    pub sender_name: String,

    /// Personal signature on the visitor acknowledgment
    #[serde(default = "default_signature")]
    pub signature: String,

    /// Upper bound on each outbound delivery call in milliseconds
    /// (default: 10000)
    #[serde(default = "default_mail_timeout_ms")]
    pub timeout_ms: u64,
}

// Default value functions
fn default_bind_addr() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_allowed_origins() -> Vec<String> {
    vec![
        "https://a-mes-petits-ecoliers.onrender.com".to_string(),
        "http://localhost:5173".to_string(),
    ]
}

fn default_min_interval_ms() -> u64 {
    30_000
}

fn default_mail_api_url() -> String {
    "https://api.brevo.com/v3/smtp/email".to_string()
}

fn default_sender_name() -> String {
    "À mes petits écoliers".to_string()
}

fn default_signature() -> String {
    "Latifa".to_string()
}

fn default_mail_timeout_ms() -> u64 {
    10_000
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            cors: CorsConfig::default(),
            throttle: ThrottleConfig::default(),
            mail: MailConfig::default(),
        }
    }
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: default_allowed_origins(),
        }
    }
}

impl Default for ThrottleConfig {
    fn default() -> Self {
        Self {
            min_interval_ms: default_min_interval_ms(),
        }
    }
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            api_url: default_mail_api_url(),
            api_key: String::new(),
            contact_email: String::new(),
            sender_name: default_sender_name(),
            signature: default_signature(),
            timeout_ms: default_mail_timeout_ms(),
        }
    }
}

impl ThrottleConfig {
    /// Get the minimum interval between accepted submissions
    pub fn min_interval(&self) -> Duration {
        Duration::from_millis(self.min_interval_ms)
    }
}

impl MailConfig {
    /// Get the outbound delivery timeout
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}
