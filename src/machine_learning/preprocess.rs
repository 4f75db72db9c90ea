//! Feature and example normalization applied to data sets in place

use crate::machine_learning::dataset::{DataError, DataSet};

/// A transformation fitted on training data and replayed on test data
pub trait DataPreprocessor {
    /// Fit the preprocessor on `train` and apply it
    fn preprocess_train(&mut self, train: &mut DataSet) -> Result<(), DataError>;

    /// Apply previously fitted parameters to `test`
    fn preprocess_test(&mut self, test: &mut DataSet) -> Result<(), DataError>;
}

/// Centers every feature to mean 0 and scales it to standard deviation 1
///
/// Means and (population) standard deviations are computed over all examples,
/// absent features counting as 0, so normalized data sets are dense.
#[derive(Debug, Clone, Default)]
pub struct FeatureNormalizer {
    means: Vec<f64>,
    std_devs: Vec<f64>,
}

impl FeatureNormalizer {
    pub fn new() -> Self {
        FeatureNormalizer::default()
    }

    /// Fitted `(mean, standard deviation)` per feature position
    pub fn parameters(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.means.iter().copied().zip(self.std_devs.iter().copied())
    }

    fn apply(&self, data: &mut DataSet) {
        let indices = data.feature_indices().to_vec();

        for features in data.feature_values_mut() {
            for (position, &index) in indices.iter().enumerate() {
                let mean = self.means[position];
                let std_dev = self.std_devs[position];

                let mut value = features.get(&index).copied().unwrap_or(0.0) - mean;
                // Constant features are only centered
                if std_dev > 0.0 {
                    value /= std_dev;
                }
                features.insert(index, value);
            }
        }
    }
}

impl DataPreprocessor for FeatureNormalizer {
    fn preprocess_train(&mut self, train: &mut DataSet) -> Result<(), DataError> {
        let n_samples = train.len();
        self.means.clear();
        self.std_devs.clear();

        for &index in train.feature_indices() {
            if n_samples == 0 {
                self.means.push(0.0);
                self.std_devs.push(0.0);
                continue;
            }

            // Calculate mean
            let mut mean = 0.0;
            for example in train.examples() {
                mean += example.feature(index);
            }
            mean /= n_samples as f64;

            // Calculate standard deviation
            let mut variance = 0.0;
            for example in train.examples() {
                let diff = example.feature(index) - mean;
                variance += diff * diff;
            }
            let std_dev = (variance / n_samples as f64).sqrt();

            self.means.push(mean);
            self.std_devs.push(std_dev);
        }

        self.apply(train);
        Ok(())
    }

    fn preprocess_test(&mut self, test: &mut DataSet) -> Result<(), DataError> {
        let found = test.feature_indices().len();
        if found != self.means.len() {
            return Err(DataError::ShapeMismatch {
                expected: self.means.len(),
                found,
            });
        }

        self.apply(test);
        Ok(())
    }
}

/// Scales each example's stored feature values to unit Euclidean length
#[derive(Debug, Clone, Copy, Default)]
pub struct ExampleNormalizer;

impl ExampleNormalizer {
    pub fn new() -> Self {
        ExampleNormalizer
    }
}

impl DataPreprocessor for ExampleNormalizer {
    fn preprocess_train(&mut self, train: &mut DataSet) -> Result<(), DataError> {
        for features in train.feature_values_mut() {
            let norm = features.values().map(|value| value * value).sum::<f64>().sqrt();
            if norm == 0.0 {
                continue;
            }
            for value in features.values_mut() {
                *value /= norm;
            }
        }
        Ok(())
    }

    fn preprocess_test(&mut self, test: &mut DataSet) -> Result<(), DataError> {
        self.preprocess_train(test)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::machine_learning::dataset::{Example, FeatureSpace};

    fn data(rows: &[(f64, f64)]) -> DataSet {
        let space = Arc::new(FeatureSpace::dense(2));
        DataSet::from_examples(
            space,
            rows.iter()
                .map(|&(a, b)| Example::new(1.0).with_feature(0, a).with_feature(1, b)),
        )
        .unwrap()
    }

    #[test]
    fn test_feature_normalizer_zero_mean_unit_variance() {
        let mut train = data(&[(1.0, 5.0), (3.0, 5.0), (5.0, 5.0)]);
        let mut normalizer = FeatureNormalizer::new();
        normalizer.preprocess_train(&mut train).unwrap();

        let column: Vec<f64> = train.examples().iter().map(|e| e.feature(0)).collect();
        let mean: f64 = column.iter().sum::<f64>() / 3.0;
        let variance: f64 = column.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / 3.0;
        assert!(mean.abs() < 1e-12);
        assert!((variance - 1.0).abs() < 1e-12);

        // Constant column is centered, not divided by zero
        assert!(train.examples().iter().all(|e| e.feature(1) == 0.0));
    }

    #[test]
    fn test_feature_normalizer_replays_training_parameters() {
        let mut train = data(&[(0.0, 0.0), (2.0, 4.0)]);
        let mut test = data(&[(1.0, 2.0)]);
        let mut normalizer = FeatureNormalizer::new();
        normalizer.preprocess_train(&mut train).unwrap();
        normalizer.preprocess_test(&mut test).unwrap();

        let example = &test.examples()[0];
        assert!(example.feature(0).abs() < 1e-12);
        assert!(example.feature(1).abs() < 1e-12);
    }

    #[test]
    fn test_feature_normalizer_shape_mismatch() {
        let mut train = data(&[(0.0, 1.0), (1.0, 0.0)]);
        let mut test = DataSet::new(Arc::new(FeatureSpace::dense(3)));
        let mut normalizer = FeatureNormalizer::new();
        normalizer.preprocess_train(&mut train).unwrap();

        let err = normalizer.preprocess_test(&mut test).unwrap_err();
        assert!(matches!(err, DataError::ShapeMismatch { expected: 2, found: 3 }));
    }

    #[test]
    fn test_example_normalizer_unit_length() {
        let mut train = data(&[(3.0, 4.0), (0.0, 0.0)]);
        ExampleNormalizer::new().preprocess_train(&mut train).unwrap();

        let first = &train.examples()[0];
        assert!((first.feature(0) - 0.6).abs() < 1e-12);
        assert!((first.feature(1) - 0.8).abs() < 1e-12);
        assert_eq!(train.examples()[1].feature(0), 0.0);
    }
}
