//! Core type definitions for the fake account classifier

use crate::core::{FakeDetectError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Number of features in the account representation
pub const N_FEATURES: usize = 9;

/// Canonical feature order shared by training data, artifacts and scoring
pub const FEATURE_NAMES: [&str; N_FEATURES] = [
    "username_length",
    "num_posts",
    "num_followers",
    "num_following",
    "account_age_days",
    "has_profile_picture",
    "has_bio",
    "engagement_ratio",
    "is_verified",
];

/// Name of the label column in training data
pub const LABEL_COLUMN: &str = "is_fake";

/// Numeric description of a single account
///
/// Field order is the model's input order; [`FeatureVector::to_array`] and
/// [`FEATURE_NAMES`] must agree with it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureVector {
    pub username_length: f64,
    pub num_posts: f64,
    pub num_followers: f64,
    pub num_following: f64,
    pub account_age_days: f64,
    pub has_profile_picture: f64,
    pub has_bio: f64,
    pub engagement_ratio: f64,
    pub is_verified: f64,
}

impl FeatureVector {
    /// Build from values laid out in [`FEATURE_NAMES`] order
    pub fn from_array(values: [f64; N_FEATURES]) -> Self {
        let [username_length, num_posts, num_followers, num_following, account_age_days, has_profile_picture, has_bio, engagement_ratio, is_verified] =
            values;
        Self {
            username_length,
            num_posts,
            num_followers,
            num_following,
            account_age_days,
            has_profile_picture,
            has_bio,
            engagement_ratio,
            is_verified,
        }
    }

    /// Values in [`FEATURE_NAMES`] order
    pub fn to_array(&self) -> [f64; N_FEATURES] {
        [
            self.username_length,
            self.num_posts,
            self.num_followers,
            self.num_following,
            self.account_age_days,
            self.has_profile_picture,
            self.has_bio,
            self.engagement_ratio,
            self.is_verified,
        ]
    }

    /// Position of a feature name in the canonical order
    pub fn index_of(name: &str) -> Option<usize> {
        FEATURE_NAMES.iter().position(|&n| n == name)
    }

    /// Build from a loosely typed JSON object.
    ///
    /// Absent keys default to 0 and unknown keys are ignored. Numbers,
    /// booleans and numeric strings are accepted; anything else is an error
    /// naming the field.
    pub fn from_json(value: &Value) -> Result<Self> {
        let map = value.as_object().ok_or_else(|| {
            FakeDetectError::ParseError(format!(
                "expected a JSON object of feature values, got {}",
                json_type_name(value)
            ))
        })?;

        let mut values = [0.0; N_FEATURES];
        for (slot, name) in values.iter_mut().zip(FEATURE_NAMES.iter()) {
            *slot = match map.get(*name) {
                None => 0.0,
                Some(Value::Number(n)) => n.as_f64().ok_or_else(|| {
                    FakeDetectError::ParseError(format!("{name}: {n} is not representable as f64"))
                })?,
                Some(Value::Bool(b)) => f64::from(u8::from(*b)),
                Some(Value::String(s)) => match s.trim().parse::<f64>() {
                    Ok(v) if v.is_finite() => v,
                    _ => {
                        return Err(FakeDetectError::ParseError(format!(
                            "{name}: expected a number, got string {s:?}"
                        )))
                    }
                },
                Some(other) => {
                    return Err(FakeDetectError::ParseError(format!(
                        "{name}: expected a number, got {}",
                        json_type_name(other)
                    )))
                }
            };
        }

        Ok(Self::from_array(values))
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Labeled training sample
#[derive(Clone, Debug, PartialEq)]
pub struct Sample {
    pub features: FeatureVector,
    /// 1 for a fake account, 0 for a real one
    pub label: u8,
}

impl Sample {
    /// Create a new sample
    pub fn new(features: FeatureVector, label: u8) -> Self {
        Self { features, label }
    }
}

/// Prediction result containing class and probability
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    /// Predicted class (1 = fake, 0 = real)
    pub label: u8,
    /// Probability of the positive (fake) class
    pub probability_fake: f64,
    /// Raw decision function value
    pub decision_value: f64,
}

impl Prediction {
    /// Create a prediction from a decision value
    pub fn from_decision(decision_value: f64) -> Self {
        Self {
            label: u8::from(decision_value > 0.0),
            probability_fake: sigmoid(decision_value),
            decision_value,
        }
    }

    /// Probability of the negative (real) class
    pub fn probability_real(&self) -> f64 {
        1.0 - self.probability_fake
    }

    pub fn is_fake(&self) -> bool {
        self.label == 1
    }
}

/// Numerically stable logistic function
pub fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

/// Result of the optimization process
#[derive(Debug, Clone)]
pub struct OptimizationResult {
    /// Linear weights in [`FEATURE_NAMES`] order
    pub weights: [f64; N_FEATURES],
    /// Bias term (intercept)
    pub bias: f64,
    /// Number of Newton iterations performed
    pub iterations: usize,
    /// Final penalized negative log-likelihood
    pub objective_value: f64,
    /// Whether the gradient tolerance was reached
    pub converged: bool,
}

/// Configuration for training
#[derive(Debug, Clone)]
pub struct TrainerConfig {
    /// Inverse L2 regularization strength
    pub c: f64,
    /// Convergence tolerance on the max-abs gradient entry
    pub tolerance: f64,
    /// Maximum number of Newton iterations
    pub max_iterations: usize,
    /// Fraction of samples held out for evaluation
    pub test_size: f64,
    /// Seed for the holdout shuffle
    pub seed: u64,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            c: 1.0,
            tolerance: 1e-4,
            max_iterations: 100,
            test_size: 0.2,
            seed: 42,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use serde_json::json;

    #[test]
    fn test_array_order_matches_names() {
        let fv = FeatureVector::from_array([1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0]);
        assert_eq!(fv.username_length, 1.0);
        assert_eq!(fv.account_age_days, 5.0);
        assert_eq!(fv.is_verified, 9.0);
        assert_eq!(fv.to_array(), [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0]);
        assert_eq!(FeatureVector::index_of("engagement_ratio"), Some(7));
        assert_eq!(FeatureVector::index_of(LABEL_COLUMN), None);
    }

    #[test]
    fn test_from_json_defaults_missing_keys() {
        let fv = FeatureVector::from_json(&json!({})).unwrap();
        assert_eq!(fv, FeatureVector::default());

        let fv = FeatureVector::from_json(&json!({
            "username_length": 5,
            "num_followers": 2,
            "account_age_days": 1,
            "not_a_feature": "ignored"
        }))
        .unwrap();
        assert_eq!(fv.to_array(), [5.0, 0.0, 2.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_from_json_accepts_booleans() {
        let fv = FeatureVector::from_json(&json!({"has_bio": true, "is_verified": false})).unwrap();
        assert_eq!(fv.has_bio, 1.0);
        assert_eq!(fv.is_verified, 0.0);
    }

    #[test]
    fn test_from_json_accepts_numeric_strings() {
        let fv = FeatureVector::from_json(&json!({"num_posts": "5", "engagement_ratio": " 0.25 "}))
            .unwrap();
        assert_eq!(fv.num_posts, 5.0);
        assert_eq!(fv.engagement_ratio, 0.25);

        let err = FeatureVector::from_json(&json!({"num_posts": "NaN"})).unwrap_err();
        assert!(err.to_string().contains("num_posts"));
        assert!(FeatureVector::from_json(&json!({"num_followers": "inf"})).is_err());
    }

    #[test]
    fn test_from_json_rejects_bad_values() {
        let err = FeatureVector::from_json(&json!({"num_posts": "many"})).unwrap_err();
        assert!(err.to_string().contains("num_posts"));

        assert!(FeatureVector::from_json(&json!({"num_posts": null})).is_err());
        assert!(FeatureVector::from_json(&json!([1, 2, 3])).is_err());
    }

    #[test]
    fn test_prediction() {
        let pred = Prediction::from_decision(2.0);
        assert_eq!(pred.label, 1);
        assert!(pred.is_fake());
        assert!(pred.probability_fake > 0.5);
        assert_relative_eq!(pred.probability_fake + pred.probability_real(), 1.0, epsilon = 1e-12);

        let neg = Prediction::from_decision(-2.0);
        assert_eq!(neg.label, 0);
        assert!(!neg.is_fake());
        assert_relative_eq!(neg.probability_fake, 1.0 - pred.probability_fake, epsilon = 1e-12);
    }

    #[test]
    fn test_sigmoid_extremes() {
        assert_eq!(sigmoid(0.0), 0.5);
        assert!(sigmoid(-1000.0) >= 0.0);
        assert!(sigmoid(1000.0) <= 1.0);
        assert!(sigmoid(-1000.0).is_finite());
    }

    #[test]
    fn test_trainer_config_default() {
        let config = TrainerConfig::default();
        assert_eq!(config.c, 1.0);
        assert_eq!(config.tolerance, 1e-4);
        assert_eq!(config.max_iterations, 100);
        assert_eq!(config.test_size, 0.2);
        assert_eq!(config.seed, 42);
    }
}
