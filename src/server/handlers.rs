//! Request handlers for the scoring service

use super::error::Result;
use super::state::PredictorContext;
use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use log::debug;
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;

/// Per-class probabilities
#[derive(Debug, Clone, Serialize)]
pub struct Confidence {
    pub real_account: f64,
    pub fake_account: f64,
}

/// Response body of `POST /predict`
#[derive(Debug, Clone, Serialize)]
pub struct PredictResponse {
    pub prediction: u8,
    pub is_fake: bool,
    pub probability_fake: f64,
    pub confidence: Confidence,
    /// The request body as received
    pub input_data: Value,
}

/// Score one account. The body is parsed as JSON whatever its content type.
pub async fn predict(
    State(ctx): State<Arc<PredictorContext>>,
    body: Bytes,
) -> Result<Json<PredictResponse>> {
    let input: Value = serde_json::from_slice(&body)?;
    let (_, prediction) = ctx.score(&input)?;

    debug!(
        "Scored account: class {} (p_fake {:.4})",
        prediction.label, prediction.probability_fake
    );

    Ok(Json(PredictResponse {
        prediction: prediction.label,
        is_fake: prediction.is_fake(),
        probability_fake: prediction.probability_fake,
        confidence: Confidence {
            real_account: prediction.probability_real(),
            fake_account: prediction.probability_fake,
        },
        input_data: input,
    }))
}

/// Liveness only; does not re-check the artifacts
pub async fn health_check() -> Json<Value> {
    Json(json!({ "status": "healthy" }))
}

pub async fn handle_404() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Json(json!({ "error": "Not found" })))
}
