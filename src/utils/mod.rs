//! Utility functions for preparing account data

use crate::core::{Dataset, FakeDetectError, FeatureVector, Result, Sample, N_FEATURES};

/// Feature scaling utilities
pub mod scaling {
    use super::*;

    /// Standard (Z-score) scaler: `(x - mean) / scale`
    ///
    /// `scale` is the population standard deviation of the training data; a
    /// constant feature gets scale 1 so it is only centered.
    #[derive(Debug, Clone, PartialEq)]
    pub struct StandardScaler {
        pub mean: [f64; N_FEATURES],
        pub scale: [f64; N_FEATURES],
        pub n_samples_seen: usize,
    }

    impl StandardScaler {
        /// Compute scaling parameters from training data
        pub fn fit(features: &[FeatureVector]) -> Result<Self> {
            if features.is_empty() {
                return Err(FakeDetectError::EmptyDataset);
            }

            let n = features.len() as f64;
            let mut mean = [0.0; N_FEATURES];
            for fv in features {
                for (m, v) in mean.iter_mut().zip(fv.to_array()) {
                    *m += v;
                }
            }
            mean.iter_mut().for_each(|m| *m /= n);

            let mut variance = [0.0; N_FEATURES];
            for fv in features {
                for ((var, m), v) in variance.iter_mut().zip(mean.iter()).zip(fv.to_array()) {
                    *var += (v - m).powi(2);
                }
            }

            let mut scale = [1.0; N_FEATURES];
            for (s, var) in scale.iter_mut().zip(variance) {
                let std = (var / n).sqrt();
                // Constant feature
                if std > 1e-12 {
                    *s = std;
                }
            }

            Ok(Self {
                mean,
                scale,
                n_samples_seen: features.len(),
            })
        }

        /// Transform a single feature vector using fitted parameters
        pub fn transform(&self, features: &FeatureVector) -> [f64; N_FEATURES] {
            let mut out = features.to_array();
            for ((x, m), s) in out.iter_mut().zip(self.mean.iter()).zip(self.scale.iter()) {
                *x = (*x - m) / s;
            }
            out
        }

        /// Transform multiple feature vectors
        pub fn transform_all(&self, features: &[FeatureVector]) -> Vec<[f64; N_FEATURES]> {
            features.iter().map(|fv| self.transform(fv)).collect()
        }
    }

    /// Convenience function: fit and transform in one step
    pub fn fit_transform(
        features: &[FeatureVector],
    ) -> Result<(Vec<[f64; N_FEATURES]>, StandardScaler)> {
        let scaler = StandardScaler::fit(features)?;
        let transformed = scaler.transform_all(features);
        Ok((transformed, scaler))
    }
}

/// Holdout splitting
pub mod split {
    use super::*;
    use rand::rngs::StdRng;
    use rand::seq::SliceRandom;
    use rand::SeedableRng;

    /// Shuffle with a fixed seed and hold out `ceil(test_size * n)` samples.
    ///
    /// Returns `(train, test)`.
    pub fn train_test_split(
        samples: &[Sample],
        test_size: f64,
        seed: u64,
    ) -> Result<(Vec<Sample>, Vec<Sample>)> {
        if !(test_size > 0.0 && test_size < 1.0) {
            return Err(FakeDetectError::InvalidParameter(format!(
                "Test size must be between 0 and 1, got: {test_size}"
            )));
        }

        let n = samples.len();
        let n_test = (test_size * n as f64).ceil() as usize;
        if n_test == 0 || n_test >= n {
            return Err(FakeDetectError::InvalidParameter(format!(
                "Cannot split {n} samples with test size {test_size}: both parts must be non-empty"
            )));
        }

        let mut indices: Vec<usize> = (0..n).collect();
        let mut rng = StdRng::seed_from_u64(seed);
        indices.shuffle(&mut rng);

        let test = indices[..n_test].iter().map(|&i| samples[i].clone()).collect();
        let train = indices[n_test..].iter().map(|&i| samples[i].clone()).collect();
        Ok((train, test))
    }
}

/// Validation and preprocessing utilities
pub mod validation {
    use super::*;

    /// Count `(fake, real)` samples and their ratio
    pub fn check_label_balance<D: Dataset>(dataset: &D) -> (usize, usize, f64) {
        label_balance(&dataset.get_labels())
    }

    pub fn label_balance(labels: &[u8]) -> (usize, usize, f64) {
        let fake = labels.iter().filter(|&&l| l == 1).count();
        let real = labels.len() - fake;
        let ratio = if real > 0 {
            fake as f64 / real as f64
        } else {
            f64::INFINITY
        };
        (fake, real, ratio)
    }

    /// Require both classes to be present
    pub fn validate_both_classes(samples: &[Sample]) -> Result<()> {
        let labels: Vec<u8> = samples.iter().map(|s| s.label).collect();
        let (fake, real, _) = label_balance(&labels);
        if fake == 0 || real == 0 {
            return Err(FakeDetectError::InvalidDataset(format!(
                "Training data needs samples of both classes, got {fake} fake and {real} real"
            )));
        }
        Ok(())
    }
}
