//! Core traits for the fake account classifier

use crate::core::{Prediction, Sample, N_FEATURES};

/// Dataset abstraction for labeled account data
pub trait Dataset: Send + Sync {
    /// Number of samples in the dataset
    fn len(&self) -> usize;

    /// Get a single sample by index
    ///
    /// # Panics
    /// Panics if index >= len()
    fn get_sample(&self, i: usize) -> Sample;

    /// All samples in dataset order
    fn samples(&self) -> Vec<Sample> {
        (0..self.len()).map(|i| self.get_sample(i)).collect()
    }

    /// Get all labels as a vector
    fn get_labels(&self) -> Vec<u8>;

    /// Check if the dataset is empty
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Fitted binary classifier over already-scaled inputs
pub trait Classifier: Send + Sync {
    /// Raw linear score; positive means fake
    fn decision_function(&self, x: &[f64; N_FEATURES]) -> f64;

    /// Predict a single scaled input
    fn predict(&self, x: &[f64; N_FEATURES]) -> Prediction {
        Prediction::from_decision(self.decision_function(x))
    }

    /// Class probabilities as `[real, fake]`
    fn predict_proba(&self, x: &[f64; N_FEATURES]) -> [f64; 2] {
        let prediction = self.predict(x);
        [prediction.probability_real(), prediction.probability_fake]
    }
}
