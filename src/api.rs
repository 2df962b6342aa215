//! High-level API for training and scoring
//!
//! This module provides a user-friendly interface for the full training run:
//! holdout split, scaling, fitting and evaluation.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use fakedetect::api::Trainer;
//! use fakedetect::FeatureVector;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let pipeline = Trainer::new()
//!     .with_test_size(0.2)
//!     .with_seed(42)
//!     .train_from_csv("fake_accounts_dataset.csv")?;
//!
//! println!("Holdout accuracy: {:.2}%", pipeline.holdout().accuracy() * 100.0);
//!
//! let prediction = pipeline.predict(&FeatureVector::default());
//! println!("fake: {}", prediction.is_fake());
//! # Ok(())
//! # }
//! ```

use crate::core::{Classifier, Dataset, FeatureVector, Prediction, Result, Sample, TrainerConfig};
use crate::data::FeatureDataset;
use crate::optimizer::{LogisticModel, LogisticOptimizer};
use crate::utils::scaling::StandardScaler;
use crate::utils::{split, validation};
use log::info;
use std::path::Path;

/// Logistic regression trainer with builder pattern
#[derive(Debug, Clone, Default)]
pub struct Trainer {
    config: TrainerConfig,
}

impl Trainer {
    /// Create a new trainer with default parameters
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a trainer from an explicit configuration
    pub fn with_config(config: TrainerConfig) -> Self {
        Self { config }
    }

    /// Set inverse regularization strength C
    pub fn with_c(mut self, c: f64) -> Self {
        self.config.c = c;
        self
    }

    /// Set convergence tolerance
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.config.tolerance = tolerance;
        self
    }

    /// Set maximum number of solver iterations
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.config.max_iterations = max_iterations;
        self
    }

    /// Set the held-out fraction
    pub fn with_test_size(mut self, test_size: f64) -> Self {
        self.config.test_size = test_size;
        self
    }

    /// Set the split seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.config.seed = seed;
        self
    }

    /// Get the trainer configuration
    pub fn config(&self) -> &TrainerConfig {
        &self.config
    }

    /// Split, scale, fit and evaluate on a dataset
    pub fn train<D: Dataset>(&self, dataset: &D) -> Result<TrainedPipeline> {
        let samples = dataset.samples();
        let (fake, real, _) = validation::check_label_balance(dataset);
        info!("Dataset has {fake} fake and {real} real accounts");

        let (train, test) =
            split::train_test_split(&samples, self.config.test_size, self.config.seed)?;
        info!(
            "Split {} samples into {} train / {} holdout",
            samples.len(),
            train.len(),
            test.len()
        );

        let pipeline = self.fit(&train)?;
        let holdout = pipeline.evaluate_samples(&test);
        info!("Holdout accuracy: {:.2}%", holdout.accuracy() * 100.0);

        Ok(TrainedPipeline { holdout, ..pipeline })
    }

    /// Fit scaler and model on all given samples, without a holdout
    pub fn fit(&self, samples: &[Sample]) -> Result<TrainedPipeline> {
        validation::validate_both_classes(samples)?;

        let features: Vec<FeatureVector> = samples.iter().map(|s| s.features).collect();
        let labels: Vec<u8> = samples.iter().map(|s| s.label).collect();

        let scaler = StandardScaler::fit(&features)?;
        let scaled = scaler.transform_all(&features);

        info!("Training the model...");
        let model = LogisticOptimizer::new(self.config.clone()).train(&scaled, &labels)?;

        Ok(TrainedPipeline {
            scaler,
            model,
            config: self.config.clone(),
            holdout: EvaluationMetrics::default(),
        })
    }

    /// Train from a CSV file
    pub fn train_from_csv<P: AsRef<Path>>(&self, path: P) -> Result<TrainedPipeline> {
        let dataset = FeatureDataset::from_file(path)?;
        self.train(&dataset)
    }
}

/// Fitted scaler and model with a high-level prediction interface
#[derive(Debug, Clone)]
pub struct TrainedPipeline {
    scaler: StandardScaler,
    model: LogisticModel,
    config: TrainerConfig,
    holdout: EvaluationMetrics,
}

impl TrainedPipeline {
    /// Assemble a pipeline from loaded parts
    pub fn from_parts(scaler: StandardScaler, model: LogisticModel) -> Self {
        Self {
            scaler,
            model,
            config: TrainerConfig::default(),
            holdout: EvaluationMetrics::default(),
        }
    }

    /// Scale then classify a single feature vector
    pub fn predict(&self, features: &FeatureVector) -> Prediction {
        self.model.predict(&self.scaler.transform(features))
    }

    /// Predict multiple feature vectors
    pub fn predict_batch(&self, features: &[FeatureVector]) -> Vec<Prediction> {
        features.iter().map(|fv| self.predict(fv)).collect()
    }

    /// Evaluate on a dataset
    pub fn evaluate<D: Dataset>(&self, dataset: &D) -> EvaluationMetrics {
        self.evaluate_samples(&dataset.samples())
    }

    /// Evaluate on a CSV file
    pub fn evaluate_from_csv<P: AsRef<Path>>(&self, path: P) -> Result<EvaluationMetrics> {
        let dataset = FeatureDataset::from_file(path)?;
        Ok(self.evaluate(&dataset))
    }

    /// Confusion-matrix counts over labeled samples
    pub fn evaluate_samples(&self, samples: &[Sample]) -> EvaluationMetrics {
        let mut tp = 0; // True positives
        let mut tn = 0; // True negatives
        let mut fp = 0; // False positives
        let mut fn_ = 0; // False negatives

        for sample in samples {
            match (self.predict(&sample.features).is_fake(), sample.label == 1) {
                (true, true) => tp += 1,
                (false, false) => tn += 1,
                (true, false) => fp += 1,
                (false, true) => fn_ += 1,
            }
        }

        EvaluationMetrics::new(tp, tn, fp, fn_)
    }

    /// Metrics on the held-out split (all zero for pipelines built with [`Trainer::fit`])
    pub fn holdout(&self) -> &EvaluationMetrics {
        &self.holdout
    }

    pub fn scaler(&self) -> &StandardScaler {
        &self.scaler
    }

    pub fn model(&self) -> &LogisticModel {
        &self.model
    }

    /// Configuration the pipeline was trained with
    pub fn config(&self) -> &TrainerConfig {
        &self.config
    }
}

/// Detailed evaluation metrics
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EvaluationMetrics {
    pub true_positives: usize,
    pub true_negatives: usize,
    pub false_positives: usize,
    pub false_negatives: usize,
}

impl EvaluationMetrics {
    pub fn new(tp: usize, tn: usize, fp: usize, fn_: usize) -> Self {
        Self {
            true_positives: tp,
            true_negatives: tn,
            false_positives: fp,
            false_negatives: fn_,
        }
    }

    /// Number of evaluated samples
    pub fn total(&self) -> usize {
        self.true_positives + self.true_negatives + self.false_positives + self.false_negatives
    }

    /// Calculate accuracy: (TP + TN) / (TP + TN + FP + FN)
    pub fn accuracy(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            0.0
        } else {
            (self.true_positives + self.true_negatives) as f64 / total as f64
        }
    }

    /// Calculate precision: TP / (TP + FP)
    pub fn precision(&self) -> f64 {
        let denominator = self.true_positives + self.false_positives;
        if denominator == 0 {
            0.0
        } else {
            self.true_positives as f64 / denominator as f64
        }
    }

    /// Calculate recall (sensitivity): TP / (TP + FN)
    pub fn recall(&self) -> f64 {
        let denominator = self.true_positives + self.false_negatives;
        if denominator == 0 {
            0.0
        } else {
            self.true_positives as f64 / denominator as f64
        }
    }

    /// Calculate F1 score: 2 * (precision * recall) / (precision + recall)
    pub fn f1_score(&self) -> f64 {
        let p = self.precision();
        let r = self.recall();
        if p + r == 0.0 {
            0.0
        } else {
            2.0 * (p * r) / (p + r)
        }
    }

    /// Calculate specificity: TN / (TN + FP)
    pub fn specificity(&self) -> f64 {
        let denominator = self.true_negatives + self.false_positives;
        if denominator == 0 {
            0.0
        } else {
            self.true_negatives as f64 / denominator as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::N_FEATURES;

    fn account(followers: f64, age: f64, fake: bool) -> Sample {
        let mut values = [0.0; N_FEATURES];
        values[0] = if fake { 14.0 } else { 8.0 };
        values[2] = followers;
        values[4] = age;
        values[5] = if fake { 0.0 } else { 1.0 };
        Sample::new(FeatureVector::from_array(values), u8::from(fake))
    }

    fn toy_samples() -> Vec<Sample> {
        (0..20)
            .map(|i| {
                let fake = i % 2 == 0;
                let jitter = i as f64;
                if fake {
                    account(5.0 + jitter, 3.0 + jitter, true)
                } else {
                    account(400.0 + jitter, 900.0 + jitter, false)
                }
            })
            .collect()
    }

    #[test]
    fn test_trainer_builder_pattern() {
        let trainer = Trainer::new()
            .with_c(2.0)
            .with_tolerance(1e-6)
            .with_max_iterations(50)
            .with_test_size(0.3)
            .with_seed(7);

        assert_eq!(trainer.config().c, 2.0);
        assert_eq!(trainer.config().tolerance, 1e-6);
        assert_eq!(trainer.config().max_iterations, 50);
        assert_eq!(trainer.config().test_size, 0.3);
        assert_eq!(trainer.config().seed, 7);
    }

    #[test]
    fn test_quick_training() {
        let dataset = FeatureDataset::from_samples(toy_samples()).unwrap();
        let pipeline = Trainer::new().train(&dataset).expect("Training should succeed");

        assert_eq!(pipeline.holdout().total(), 4);
        assert_eq!(pipeline.holdout().accuracy(), 1.0);

        let fake = account(2.0, 1.0, true);
        assert!(pipeline.predict(&fake.features).is_fake());
        let real = account(500.0, 1500.0, false);
        assert!(!pipeline.predict(&real.features).is_fake());
    }

    #[test]
    fn test_fit_requires_both_classes() {
        let only_fake: Vec<Sample> = toy_samples().into_iter().filter(|s| s.label == 1).collect();
        assert!(Trainer::new().fit(&only_fake).is_err());
    }

    #[test]
    fn test_evaluate_samples() {
        let samples = toy_samples();
        let pipeline = Trainer::new().fit(&samples).unwrap();
        let metrics = pipeline.evaluate_samples(&samples);

        assert_eq!(metrics.total(), 20);
        assert_eq!(metrics.true_positives, 10);
        assert_eq!(metrics.true_negatives, 10);
        assert_eq!(pipeline.holdout().total(), 0);
    }

    #[test]
    fn test_evaluation_metrics() {
        let metrics = EvaluationMetrics::new(10, 5, 2, 3);

        assert_eq!(metrics.accuracy(), 0.75); // (10+5)/(10+5+2+3)
        assert_eq!(metrics.precision(), 10.0 / 12.0); // 10/(10+2)
        assert_eq!(metrics.recall(), 10.0 / 13.0); // 10/(10+3)
        assert!(metrics.f1_score() > 0.0);
        assert_eq!(metrics.specificity(), 5.0 / 7.0); // 5/(5+2)
    }

    #[test]
    fn test_evaluation_metrics_empty() {
        let metrics = EvaluationMetrics::default();
        assert_eq!(metrics.accuracy(), 0.0);
        assert_eq!(metrics.precision(), 0.0);
        assert_eq!(metrics.f1_score(), 0.0);
    }
}
