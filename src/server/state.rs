//! Application state shared across handlers

use crate::api::TrainedPipeline;
use crate::core::{FeatureVector, Prediction, Result};
use crate::persistence::ArtifactPaths;
use log::info;
use serde_json::Value;

/// Loaded scaler and model, built once at startup and never mutated
#[derive(Debug, Clone)]
pub struct PredictorContext {
    pipeline: TrainedPipeline,
    loaded_at: chrono::DateTime<chrono::Utc>,
}

impl PredictorContext {
    pub fn new(pipeline: TrainedPipeline) -> Self {
        Self {
            pipeline,
            loaded_at: chrono::Utc::now(),
        }
    }

    /// Load both artifacts; fails if either is absent or unreadable
    pub fn load(paths: &ArtifactPaths) -> Result<Self> {
        let ctx = Self::new(paths.load()?);
        info!(
            "Model and scaler loaded from {:?} and {:?} at {}",
            paths.model,
            paths.scaler,
            ctx.loaded_at.to_rfc3339()
        );
        Ok(ctx)
    }

    /// Extract features from a JSON object, scale and classify
    pub fn score(&self, input: &Value) -> Result<(FeatureVector, Prediction)> {
        let features = FeatureVector::from_json(input)?;
        Ok((features, self.pipeline.predict(&features)))
    }

    pub fn pipeline(&self) -> &TrainedPipeline {
        &self.pipeline
    }

    pub fn loaded_at(&self) -> chrono::DateTime<chrono::Utc> {
        self.loaded_at
    }
}
