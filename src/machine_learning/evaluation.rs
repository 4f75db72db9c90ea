//! Accuracy and cross-validated accuracy of classifiers

use rand::RngCore;
use tracing::info;

use crate::machine_learning::core::{Classifier, ClassifierError};
use crate::machine_learning::dataset::DataSet;
use crate::machine_learning::factory::ClassifierFactory;
use crate::machine_learning::split::CrossValidation;

/// Fraction of `data` whose label `classifier` predicts exactly
pub fn accuracy<C: Classifier + ?Sized>(classifier: &C, data: &DataSet) -> Result<f64, ClassifierError> {
    if data.is_empty() {
        return Err(ClassifierError::EmptyDataset);
    }

    let mut correct = 0usize;
    for example in data.examples() {
        if classifier.classify(example)? == example.label() {
            correct += 1;
        }
    }
    Ok(correct as f64 / data.len() as f64)
}

/// Per-fold test accuracy of fresh classifiers trained on the other folds
pub fn cross_validate<F: ClassifierFactory>(
    factory: &F,
    data: &DataSet,
    folds: usize,
    rng: &mut dyn RngCore,
) -> Result<Vec<f64>, ClassifierError> {
    let validation = CrossValidation::new(data, folds, rng)?;
    let mut accuracies = Vec::with_capacity(folds);

    for (fold, split) in validation.splits().enumerate() {
        let mut classifier = factory.create();
        classifier.train(split.train(), rng)?;
        let fold_accuracy = accuracy(&classifier, split.test())?;
        info!(fold, accuracy = fold_accuracy, "cross-validation fold");
        accuracies.push(fold_accuracy);
    }

    Ok(accuracies)
}

/// Arithmetic mean, `None` for an empty slice
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}
