//! Optimization algorithms for logistic regression
//!
//! This module connects the Newton solver to labeled, already-scaled data and
//! wraps the result in a model that can make predictions.

use crate::core::{
    Classifier, FakeDetectError, OptimizationResult, Result, TrainerConfig, N_FEATURES,
};
use crate::solver::NewtonSolver;
use log::info;

/// High-level optimizer that fits a [`LogisticModel`]
pub struct LogisticOptimizer {
    config: TrainerConfig,
}

impl LogisticOptimizer {
    /// Create a new optimizer with the given configuration
    pub fn new(config: TrainerConfig) -> Self {
        Self { config }
    }

    /// Fit a model to scaled inputs and their labels
    pub fn train(&self, x: &[[f64; N_FEATURES]], y: &[u8]) -> Result<LogisticModel> {
        let solver = NewtonSolver::new(self.config.clone());
        let result = solver.solve(x, y)?;

        info!(
            "Solver finished after {} iterations (converged: {}, objective: {:.6})",
            result.iterations, result.converged, result.objective_value
        );

        Ok(LogisticModel::from_result(&result))
    }

    /// Get the optimizer configuration
    pub fn config(&self) -> &TrainerConfig {
        &self.config
    }
}

/// A fitted logistic regression model over scaled inputs
#[derive(Debug, Clone, PartialEq)]
pub struct LogisticModel {
    weights: [f64; N_FEATURES],
    bias: f64,
    iterations: usize,
}

impl LogisticModel {
    /// Create a model from explicit parameters
    pub fn new(weights: [f64; N_FEATURES], bias: f64) -> Self {
        Self {
            weights,
            bias,
            iterations: 0,
        }
    }

    /// Create a model from a weight slice, checking its length
    pub fn from_slice(weights: &[f64], bias: f64) -> Result<Self> {
        let weights: [f64; N_FEATURES] =
            weights
                .try_into()
                .map_err(|_| FakeDetectError::DimensionMismatch {
                    expected: N_FEATURES,
                    actual: weights.len(),
                })?;
        Ok(Self::new(weights, bias))
    }

    pub(crate) fn from_result(result: &OptimizationResult) -> Self {
        Self {
            weights: result.weights,
            bias: result.bias,
            iterations: result.iterations,
        }
    }

    /// Linear weights in feature order
    pub fn weights(&self) -> &[f64; N_FEATURES] {
        &self.weights
    }

    /// Bias term
    pub fn bias(&self) -> f64 {
        self.bias
    }

    /// Solver iterations used to fit this model (0 when loaded or built by hand)
    pub fn iterations(&self) -> usize {
        self.iterations
    }
}

impl Classifier for LogisticModel {
    fn decision_function(&self, x: &[f64; N_FEATURES]) -> f64 {
        self.weights
            .iter()
            .zip(x.iter())
            .map(|(w, v)| w * v)
            .sum::<f64>()
            + self.bias
    }
}
