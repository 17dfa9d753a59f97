// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! HTTP handlers for the contact intake service.
//!
//! Every browser-facing response, including every error, carries the CORS
//! headers computed for its request's declared origin; preflight requests
//! short-circuit before any business logic runs.

use crate::config::CorsConfig;
use crate::cors::cors_headers;
use crate::pipeline::{SubmissionPipeline, SubmitError};
use crate::store::Store;
use crate::throttle::ThrottleStore;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

/// User-visible error messages, matching the site frontend's expectations.
const MSG_INVALID_EMAIL: &str = "Adresse e-mail invalide.";
const MSG_RATE_LIMITED: &str = "Trop de tentatives rapprochées.";
const MSG_STORAGE_FAILED: &str = "Impossible d'enregistrer le contact.";
const MSG_EMPTY_COMMENT: &str = "Message vide";
const MSG_SERVER_ERROR: &str = "Erreur serveur";

/// Shared application state.
pub struct AppState {
    pub pipeline: SubmissionPipeline,
    pub store: Arc<dyn Store>,
    pub throttle: Arc<dyn ThrottleStore>,
    pub cors: CorsConfig,
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
}

/// Contact submission request body.
#[derive(Debug, Deserialize)]
pub struct ContactRequest {
    #[serde(default)]
    pub email: String,
}

/// Comment creation request body.
#[derive(Debug, Deserialize)]
pub struct CommentRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Build the service router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/healthz", get(health))
        .route("/api/contact", post(submit_contact).options(preflight))
        .route(
            "/api/comments",
            get(list_comments).post(create_comment).options(preflight),
        )
        .with_state(state)
}

fn declared_origin(headers: &HeaderMap) -> Option<&str> {
    headers.get(header::ORIGIN).and_then(|v| v.to_str().ok())
}

fn json_error(
    status: StatusCode,
    cors: [(&'static str, String); 3],
    message: &str,
) -> Response {
    (status, cors, Json(json!({ "error": message }))).into_response()
}

/// Health check endpoint.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: "contact-intake",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// CORS preflight. Answers before any business logic runs.
pub async fn preflight(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    let cors = cors_headers(declared_origin(&headers), &state.cors);
    (StatusCode::NO_CONTENT, cors).into_response()
}

/// Accept a contact submission.
pub async fn submit_contact(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Result<Json<ContactRequest>, JsonRejection>,
) -> Response {
    let cors = cors_headers(declared_origin(&headers), &state.cors);

    let Json(request) = match body {
        Ok(body) => body,
        Err(rejection) => {
            debug!(error = %rejection, "Unreadable contact request body");
            return json_error(StatusCode::BAD_REQUEST, cors, MSG_INVALID_EMAIL);
        }
    };

    match state.pipeline.submit(&request.email, Instant::now()).await {
        Ok(_) => (StatusCode::OK, cors, Json(json!({ "success": true }))).into_response(),
        Err(SubmitError::InvalidEmail(_)) => {
            json_error(StatusCode::BAD_REQUEST, cors, MSG_INVALID_EMAIL)
        }
        Err(SubmitError::RateLimited { retry_after }) => (
            StatusCode::TOO_MANY_REQUESTS,
            [("Retry-After", retry_after.as_secs().to_string())],
            cors,
            Json(json!({ "error": MSG_RATE_LIMITED })),
        )
            .into_response(),
        Err(SubmitError::Storage(_)) => {
            json_error(StatusCode::INTERNAL_SERVER_ERROR, cors, MSG_STORAGE_FAILED)
        }
        Err(SubmitError::Delivery(e)) => {
            json_error(StatusCode::INTERNAL_SERVER_ERROR, cors, &e.to_string())
        }
    }
}

/// List all comments, newest first.
pub async fn list_comments(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Response {
    let cors = cors_headers(declared_origin(&headers), &state.cors);

    match state.store.list_comments().await {
        Ok(comments) => {
            debug!(count = comments.len(), "Comments listed");
            (StatusCode::OK, cors, Json(json!({ "comments": comments }))).into_response()
        }
        Err(e) => {
            warn!(error = %e, "Comment listing failed");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, cors, MSG_SERVER_ERROR)
        }
    }
}

/// Create a visitor comment.
pub async fn create_comment(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Result<Json<CommentRequest>, JsonRejection>,
) -> Response {
    let cors = cors_headers(declared_origin(&headers), &state.cors);

    let Json(request) = match body {
        Ok(body) => body,
        Err(rejection) => {
            debug!(error = %rejection, "Unreadable comment request body");
            return json_error(StatusCode::BAD_REQUEST, cors, MSG_EMPTY_COMMENT);
        }
    };

    let message = request.message.as_deref().unwrap_or("").trim();
    if message.is_empty() {
        return json_error(StatusCode::BAD_REQUEST, cors, MSG_EMPTY_COMMENT);
    }

    let name = request
        .name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .unwrap_or("Anonyme");

    match state.store.create_comment(name, message).await {
        Ok(comment) => (
            StatusCode::OK,
            cors,
            Json(json!({ "success": true, "comments": [comment] })),
        )
            .into_response(),
        Err(e) => {
            warn!(error = %e, "Comment creation failed");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, cors, MSG_SERVER_ERROR)
        }
    }
}
