// src/error.rs
//! HTTP error envelopes.
//!
//! Client input errors surface as 400 with `{"error": msg}`; any failure
//! during batch processing surfaces as 500 with `{"error", "details"}`.
//! No stack traces or internal state beyond a string description.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::fmt;

#[derive(Debug)]
pub enum ApiError {
    /// Body is not a JSON array of objects (400).
    InvalidShape(String),
    /// An item lacks `commentId` or `text` (400).
    MissingField(String),
    /// Normalization or classifier failure; the whole batch fails (500).
    Internal(anyhow::Error),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidShape(msg) => write!(f, "invalid shape: {msg}"),
            Self::MissingField(msg) => write!(f, "missing field: {msg}"),
            Self::Internal(e) => write!(f, "internal: {e:#}"),
        }
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(e: anyhow::Error) -> Self {
        Self::Internal(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::InvalidShape(msg) | Self::MissingField(msg) => {
                tracing::warn!(error = %msg, "rejected request");
                (StatusCode::BAD_REQUEST, Json(json!({ "error": msg }))).into_response()
            }
            Self::Internal(e) => {
                tracing::error!(error = %format!("{e:#}"), "prediction failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({
                        "error": "Internal server error",
                        "details": format!("{e:#}"),
                    })),
                )
                    .into_response()
            }
        }
    }
}
