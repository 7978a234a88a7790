use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::error;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize)]
pub struct IdResponse {
    pub id: Uuid,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct OkResponse {
    pub ok: String,
}

impl Default for OkResponse {
    fn default() -> Self {
        Self { ok: "ok".into() }
    }
}

pub(crate) fn internal(e: anyhow::Error) -> (StatusCode, String) {
    let message = format!("{e:#}");
    error!(error = %message, "internal error");
    (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
}

pub(crate) fn not_found(what: &str) -> (StatusCode, String) {
    (StatusCode::NOT_FOUND, format!("{what} not found"))
}
