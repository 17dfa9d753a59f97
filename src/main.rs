// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Contact Intake Service
//!
//! Public intake backend for the site: accepts visitor comments and
//! contact-email submissions, persists them, and dispatches outbound
//! notification emails.
//!
//! ## Configuration
//!
//! Configuration is loaded from environment variables:
//!
//! - `BIND_ADDR`: Server bind address (default: 0.0.0.0:8080)
//! - `ALLOWED_ORIGINS`: Comma-separated allow-listed origins; the first
//!   entry is the fallback echoed to unrecognized callers
//! - `RATE_LIMIT_MS`: Minimum interval between accepted submissions per
//!   email address (default: 30000)
//! - `MAIL_API_URL`: Transactional email API endpoint
//! - `BREVO_API_KEY`: API key for the outbound channel
//! - `CONTACT_EMAIL`: Operator recipient and sender address
//! - `MAIL_TIMEOUT_MS`: Outbound delivery timeout (default: 10000)

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use contact_intake::{
    config::{Config, CorsConfig, MailConfig, ThrottleConfig},
    handlers::{router, AppState},
    mailer::{HttpMailer, Mailer},
    pipeline::SubmissionPipeline,
    store::{MemoryStore, Store},
    throttle::{MemoryThrottle, ThrottleStore},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer().json())
        .with(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    // Load configuration
    let config = load_config();
    info!(
        bind_addr = %config.bind_addr,
        allowed_origins = ?config.cors.allowed_origins,
        min_interval_ms = config.throttle.min_interval_ms,
        mail_configured = !config.mail.api_key.is_empty(),
        "Starting contact intake service"
    );

    // Create application state
    let throttle: Arc<dyn ThrottleStore> =
        Arc::new(MemoryThrottle::new(config.throttle.min_interval()));
    let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
    let mailer: Arc<dyn Mailer> = Arc::new(HttpMailer::new(config.mail.clone())?);
    let pipeline = SubmissionPipeline::new(
        throttle.clone(),
        store.clone(),
        mailer,
        config.mail.clone(),
    );

    let state = Arc::new(AppState {
        pipeline,
        store,
        throttle,
        cors: config.cors.clone(),
    });

    // Spawn throttle eviction task
    let cleanup_state = state.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(60));
        loop {
            interval.tick().await;
            cleanup_state.throttle.evict_stale(Instant::now()).await;
        }
    });

    // Build router
    let app = router(state).layer(TraceLayer::new_for_http());

    // Start server
    let addr: SocketAddr = config.bind_addr.parse()?;
    let listener = TcpListener::bind(addr).await?;
    info!(addr = %addr, "Server listening");

    axum::serve(listener, app).await?;

    Ok(())
}

/// Load configuration from environment variables.
fn load_config() -> Config {
    let defaults = Config::default();

    Config {
        bind_addr: std::env::var("BIND_ADDR").unwrap_or(defaults.bind_addr),
        cors: CorsConfig {
            allowed_origins: std::env::var("ALLOWED_ORIGINS")
                .map(|v| {
                    v.split(',')
                        .map(str::trim)
                        .filter(|o| !o.is_empty())
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or(defaults.cors.allowed_origins),
        },
        throttle: ThrottleConfig {
            min_interval_ms: std::env::var("RATE_LIMIT_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.throttle.min_interval_ms),
        },
        mail: MailConfig {
            api_url: std::env::var("MAIL_API_URL").unwrap_or(defaults.mail.api_url),
            api_key: std::env::var("BREVO_API_KEY").unwrap_or_default(),
            contact_email: std::env::var("CONTACT_EMAIL").unwrap_or_default(),
            sender_name: std::env::var("MAIL_SENDER_NAME").unwrap_or(defaults.mail.sender_name),
            signature: std::env::var("MAIL_SIGNATURE").unwrap_or(defaults.mail.signature),
            timeout_ms: std::env::var("MAIL_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.mail.timeout_ms),
        },
    }
}
