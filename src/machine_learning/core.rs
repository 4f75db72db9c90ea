//! Core traits and error types for classifiers

use rand::RngCore;
use thiserror::Error;

use crate::machine_learning::dataset::{DataError, DataSet, Example};

/// Errors that can occur while training or querying a classifier
#[derive(Debug, Error)]
pub enum ClassifierError {
    /// `classify` or `confidence` was called before a successful `train`
    #[error("classifier has not been trained")]
    NotTrained,

    /// The training data holds no examples (or no labels) to learn from
    #[error("cannot train on a data set without examples")]
    EmptyDataset,

    /// A label was requested that the model never saw during training
    #[error("label {0} was not seen during training")]
    UnknownLabel(f64),

    /// Error raised by the data layer
    #[error(transparent)]
    Data(#[from] DataError),
}

/// Base trait for every classifier, binary or multiclass
///
/// `classify` must only be called after `train` has succeeded; before that it
/// returns [`ClassifierError::NotTrained`]. The scale and sign of
/// `confidence` are model specific: the only contract is that a larger
/// magnitude means the model is more certain.
pub trait Classifier {
    /// Train the classifier from scratch on `data`
    ///
    /// Any randomness (example shuffling) is drawn from `rng`, so seeding it
    /// makes training reproducible.
    fn train(&mut self, data: &DataSet, rng: &mut dyn RngCore) -> Result<(), ClassifierError>;

    /// Predict the label of a single example
    fn classify(&self, example: &Example) -> Result<f64, ClassifierError>;

    /// Model-specific certainty of the prediction for `example`
    fn confidence(&self, example: &Example) -> Result<f64, ClassifierError>;

    /// Predict labels for a batch of examples
    fn classify_batch(&self, examples: &[Example]) -> Result<Vec<f64>, ClassifierError> {
        examples.iter().map(|example| self.classify(example)).collect()
    }
}

impl<C: Classifier + ?Sized> Classifier for Box<C> {
    fn train(&mut self, data: &DataSet, rng: &mut dyn RngCore) -> Result<(), ClassifierError> {
        (**self).train(data, rng)
    }

    fn classify(&self, example: &Example) -> Result<f64, ClassifierError> {
        (**self).classify(example)
    }

    fn confidence(&self, example: &Example) -> Result<f64, ClassifierError> {
        (**self).confidence(example)
    }
}

/// Sign of `value` as a label: `1.0`, `-1.0`, or exactly `0.0` on zero
pub fn sign(value: f64) -> f64 {
    if value > 0.0 {
        1.0
    } else if value < 0.0 {
        -1.0
    } else {
        0.0
    }
}
