//! Error types for the scoring service

use crate::core::FakeDetectError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Every scoring failure is reported to the caller as a client error
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Invalid JSON body: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Scoring(#[from] FakeDetectError),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        log::debug!("Rejecting scoring request: {self}");
        let body = Json(json!({ "error": self.to_string() }));
        (StatusCode::BAD_REQUEST, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, ServerError>;
