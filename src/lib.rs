//! Fake social-media account classifier
//!
//! Logistic regression over nine hand-engineered account features, with a
//! standard scaler fit on the training split, JSON artifacts, and a small
//! HTTP scoring service.

pub mod api;
pub mod core;
pub mod data;
pub mod optimizer;
pub mod persistence;
pub mod server;
pub mod solver;
pub mod utils;

// Re-export main types for convenience
pub use crate::api::{EvaluationMetrics, TrainedPipeline, Trainer};
pub use crate::core::traits::*;
pub use crate::core::types::*;
pub use crate::data::FeatureDataset;
pub use crate::optimizer::{LogisticModel, LogisticOptimizer};
pub use crate::persistence::ArtifactPaths;
pub use crate::utils::scaling::StandardScaler;

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
