//! Artifact serialization and persistence
//!
//! A training run produces two JSON artifacts, the fitted scaler and the
//! fitted model, which the scoring service loads at startup.

use crate::api::TrainedPipeline;
use crate::core::{FakeDetectError, Result, FEATURE_NAMES, N_FEATURES};
use crate::optimizer::LogisticModel;
use crate::utils::scaling::StandardScaler;
use log::{info, warn};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

/// Default model artifact filename
pub const DEFAULT_MODEL_FILE: &str = "fake_account_model.json";
/// Default scaler artifact filename
pub const DEFAULT_SCALER_FILE: &str = "scaler.json";

/// Serializable representation of a fitted scaler
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SerializableScaler {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
    pub n_samples_seen: usize,
    pub metadata: ArtifactMetadata,
}

/// Serializable representation of a fitted model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SerializableModel {
    pub weights: Vec<f64>,
    pub bias: f64,
    pub metadata: ArtifactMetadata,
    pub training: TrainingSummary,
}

/// Metadata for tracking and validation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactMetadata {
    /// Library version used to create the artifact
    pub library_version: String,
    /// Feature names in the order the arrays are laid out
    pub feature_names: Vec<String>,
    /// Creation timestamp
    pub created_at: String,
}

/// Training parameters and results for reference
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingSummary {
    pub c: f64,
    pub tolerance: f64,
    pub max_iterations: usize,
    pub test_size: f64,
    pub seed: u64,
    pub iterations: usize,
    pub holdout_accuracy: f64,
    pub holdout_samples: usize,
}

impl ArtifactMetadata {
    fn current() -> Self {
        Self {
            library_version: crate::VERSION.to_string(),
            feature_names: FEATURE_NAMES.iter().map(|s| s.to_string()).collect(),
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Warn when the artifact was fit on a different feature order
    fn check_schema(&self, artifact: &str) {
        let matches = self.feature_names.len() == N_FEATURES
            && self
                .feature_names
                .iter()
                .zip(FEATURE_NAMES.iter())
                .all(|(a, b)| a == b);
        if !matches {
            warn!(
                "{artifact} was fit on features {:?}, this build scores {:?}",
                self.feature_names, FEATURE_NAMES
            );
        }
    }
}

fn fixed<'a>(values: &'a [f64], field: &str) -> Result<&'a [f64; N_FEATURES]> {
    values
        .try_into()
        .map_err(|_| {
            warn!("Artifact field {field} has {} entries", values.len());
            FakeDetectError::DimensionMismatch {
                expected: N_FEATURES,
                actual: values.len(),
            }
        })
}

impl SerializableScaler {
    pub fn from_scaler(scaler: &StandardScaler) -> Self {
        Self {
            mean: scaler.mean.to_vec(),
            scale: scaler.scale.to_vec(),
            n_samples_seen: scaler.n_samples_seen,
            metadata: ArtifactMetadata::current(),
        }
    }

    /// Convert back to a scaler, checking dimensionality
    pub fn to_scaler(&self) -> Result<StandardScaler> {
        self.metadata.check_schema("Scaler");
        Ok(StandardScaler {
            mean: *fixed(&self.mean, "mean")?,
            scale: *fixed(&self.scale, "scale")?,
            n_samples_seen: self.n_samples_seen,
        })
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        save_json(self, path)
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        load_json(path)
    }
}

impl SerializableModel {
    /// Create a serializable model from a trained pipeline
    pub fn from_pipeline(pipeline: &TrainedPipeline) -> Self {
        let model = pipeline.model();
        let config = pipeline.config();
        let holdout = pipeline.holdout();

        Self {
            weights: model.weights().to_vec(),
            bias: model.bias(),
            metadata: ArtifactMetadata::current(),
            training: TrainingSummary {
                c: config.c,
                tolerance: config.tolerance,
                max_iterations: config.max_iterations,
                test_size: config.test_size,
                seed: config.seed,
                iterations: model.iterations(),
                holdout_accuracy: holdout.accuracy(),
                holdout_samples: holdout.total(),
            },
        }
    }

    /// Convert back to a model, checking dimensionality
    pub fn to_model(&self) -> Result<LogisticModel> {
        self.metadata.check_schema("Model");
        LogisticModel::from_slice(&self.weights, self.bias)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        save_json(self, path)
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        load_json(path)
    }

    /// Print model summary
    pub fn print_summary(&self) {
        println!("=== Fake Account Model Summary ===");
        println!("Library Version: {}", self.metadata.library_version);
        println!("Created: {}", self.metadata.created_at);
        println!("Bias: {:.6}", self.bias);
        println!("Weights:");
        for (name, weight) in self.metadata.feature_names.iter().zip(self.weights.iter()) {
            println!("  {name:<20} {weight:>12.6}");
        }
        println!("Training Parameters:");
        println!("  C: {}", self.training.c);
        println!("  Tolerance: {}", self.training.tolerance);
        println!("  Max Iterations: {}", self.training.max_iterations);
        println!("  Iterations Used: {}", self.training.iterations);
        println!("  Test Size: {}", self.training.test_size);
        println!("  Seed: {}", self.training.seed);
        println!(
            "  Holdout Accuracy: {:.2}% ({} samples)",
            self.training.holdout_accuracy * 100.0,
            self.training.holdout_samples
        );
    }
}

/// Locations of the scaler and model artifacts
#[derive(Debug, Clone, PartialEq)]
pub struct ArtifactPaths {
    pub model: PathBuf,
    pub scaler: PathBuf,
}

impl Default for ArtifactPaths {
    fn default() -> Self {
        Self {
            model: PathBuf::from(DEFAULT_MODEL_FILE),
            scaler: PathBuf::from(DEFAULT_SCALER_FILE),
        }
    }
}

impl ArtifactPaths {
    pub fn new(model: impl Into<PathBuf>, scaler: impl Into<PathBuf>) -> Self {
        Self {
            model: model.into(),
            scaler: scaler.into(),
        }
    }

    /// Write both artifacts of a trained pipeline
    pub fn save(&self, pipeline: &TrainedPipeline) -> Result<()> {
        SerializableModel::from_pipeline(pipeline).save_to_file(&self.model)?;
        info!("Model saved to: {:?}", self.model);
        SerializableScaler::from_scaler(pipeline.scaler()).save_to_file(&self.scaler)?;
        info!("Scaler saved to: {:?}", self.scaler);
        Ok(())
    }

    /// Load both artifacts; either one missing is an error
    pub fn load(&self) -> Result<TrainedPipeline> {
        let model = SerializableModel::load_from_file(&self.model)?.to_model()?;
        let scaler = SerializableScaler::load_from_file(&self.scaler)?.to_scaler()?;
        Ok(TrainedPipeline::from_parts(scaler, model))
    }
}

fn save_json<T: Serialize, P: AsRef<Path>>(value: &T, path: P) -> Result<()> {
    let file = File::create(path).map_err(FakeDetectError::IoError)?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, value)
        .map_err(|e| FakeDetectError::SerializationError(e.to_string()))?;
    Ok(())
}

fn load_json<T: DeserializeOwned, P: AsRef<Path>>(path: P) -> Result<T> {
    let file = File::open(path).map_err(FakeDetectError::IoError)?;
    let reader = BufReader::new(file);
    serde_json::from_reader(reader).map_err(|e| FakeDetectError::SerializationError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Trainer;
    use crate::core::{FeatureVector, Sample};
    use tempfile::TempDir;

    fn small_pipeline() -> TrainedPipeline {
        let samples: Vec<Sample> = (0..8)
            .map(|i| {
                let fake = i % 2 == 0;
                let mut values = [0.0; N_FEATURES];
                values[2] = if fake { 3.0 + i as f64 } else { 300.0 + i as f64 };
                values[6] = if fake { 0.0 } else { 1.0 };
                Sample::new(FeatureVector::from_array(values), u8::from(fake))
            })
            .collect();
        Trainer::new().fit(&samples).expect("Training should succeed")
    }

    #[test]
    fn test_artifact_round_trip() -> Result<()> {
        let pipeline = small_pipeline();
        let dir = TempDir::new().expect("Failed to create temp dir");
        let paths = ArtifactPaths::new(dir.path().join("model.json"), dir.path().join("scaler.json"));

        paths.save(&pipeline)?;
        let loaded = paths.load()?;

        assert_eq!(loaded.scaler(), pipeline.scaler());
        assert_eq!(loaded.model().weights(), pipeline.model().weights());
        assert_eq!(loaded.model().bias(), pipeline.model().bias());

        let probe = FeatureVector::from_array([5.0, 0.0, 2.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0]);
        assert_eq!(loaded.predict(&probe), pipeline.predict(&probe));
        Ok(())
    }

    #[test]
    fn test_metadata_recorded() -> Result<()> {
        let pipeline = small_pipeline();
        let dir = TempDir::new().expect("Failed to create temp dir");
        let path = dir.path().join("model.json");

        SerializableModel::from_pipeline(&pipeline).save_to_file(&path)?;
        let loaded = SerializableModel::load_from_file(&path)?;

        assert_eq!(loaded.metadata.feature_names.len(), N_FEATURES);
        assert_eq!(loaded.metadata.feature_names[0], "username_length");
        assert_eq!(loaded.metadata.library_version, env!("CARGO_PKG_VERSION"));
        assert_eq!(loaded.training.c, 1.0);
        assert!(loaded.training.iterations > 0);
        Ok(())
    }

    #[test]
    fn test_wrong_dimension_rejected() {
        let mut serializable = SerializableModel::from_pipeline(&small_pipeline());
        serializable.weights.pop();
        assert!(matches!(
            serializable.to_model(),
            Err(FakeDetectError::DimensionMismatch {
                expected: 9,
                actual: 8
            })
        ));

        let mut scaler = SerializableScaler::from_scaler(small_pipeline().scaler());
        scaler.scale.push(1.0);
        assert!(matches!(
            scaler.to_scaler(),
            Err(FakeDetectError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_missing_artifact() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let paths = ArtifactPaths::new(dir.path().join("absent.json"), dir.path().join("scaler.json"));
        assert!(matches!(paths.load(), Err(FakeDetectError::IoError(_))));
    }

    #[test]
    fn test_corrupt_artifact() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let path = dir.path().join("model.json");
        std::fs::write(&path, "{ not json").expect("Failed to write");
        assert!(matches!(
            SerializableModel::load_from_file(&path),
            Err(FakeDetectError::SerializationError(_))
        ));
    }
}
