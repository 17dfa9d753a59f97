// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Origin classification for cross-origin requests.
//!
//! The browser-facing endpoints are called from the site frontend, so every
//! response (errors included) must carry CORS headers or the client cannot
//! read the body. The policy is deliberately non-reflective: a declared
//! origin is echoed back only on an exact allow-list match, everything else
//! gets the configured default origin.

use crate::config::CorsConfig;

/// Determine the origin to echo in `Access-Control-Allow-Origin`.
///
/// Exact match against the allow-list echoes the declared origin;
/// absent or unrecognized origins fall back to the first allow-listed
/// entry, never to the caller-supplied value.
pub fn allowed_origin(declared: Option<&str>, config: &CorsConfig) -> String {
    match declared {
        Some(origin) if config.allowed_origins.iter().any(|o| o == origin) => {
            origin.to_string()
        }
        _ => config.allowed_origins.first().cloned().unwrap_or_default(),
    }
}

/// Build the CORS header set for a request with the given declared origin.
pub fn cors_headers(declared: Option<&str>, config: &CorsConfig) -> [(&'static str, String); 3] {
    [
        (
            "Access-Control-Allow-Origin",
            allowed_origin(declared, config),
        ),
        (
            "Access-Control-Allow-Methods",
            "GET, POST, OPTIONS".to_string(),
        ),
        ("Access-Control-Allow-Headers", "Content-Type".to_string()),
    ]
}
