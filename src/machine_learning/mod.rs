//! Binary classifiers and multiclass decomposition
//!
//! Linear models (perceptron, gradient descent) and Naive Bayes implement the
//! common [`Classifier`](core::Classifier) contract. The all-vs-all and
//! one-vs-all strategies build multiclass classifiers out of any of them
//! through a [`ClassifierFactory`](factory::ClassifierFactory).

pub mod core;
pub mod dataset;
pub mod split;
pub mod preprocess;
pub mod loss;
pub mod optimizer;
pub mod linear;
pub mod naive_bayes;
pub mod factory;
pub mod config;
pub mod multiclass;
pub mod evaluation;

/// Re-exports of commonly used components
pub mod prelude {
    // Data
    pub use super::dataset::{CsvOptions, DataError, DataSet, Example, FeatureMap, FeatureSpace, LabelIndex};
    pub use super::split::{CrossValidation, DataSetSplit};
    pub use super::preprocess::{DataPreprocessor, ExampleNormalizer, FeatureNormalizer};

    // Binary classifiers
    pub use super::core::{Classifier, ClassifierError};
    pub use super::loss::{Loss, Regularization};
    pub use super::optimizer::{GradientDescentRule, PerceptronRule, UpdateRule};
    pub use super::linear::{GradientDescentClassifier, Hyperplane, LinearClassifier, PerceptronClassifier};
    pub use super::naive_bayes::{NaiveBayesClassifier, NaiveBayesMode};

    // Construction and multiclass
    pub use super::factory::{ClassifierFactory, Model};
    pub use super::config::{ClassifierConfig, ConfigError};
    pub use super::multiclass::{AvaClassifier, OvaClassifier};
    pub use super::evaluation::{accuracy, cross_validate};
}

// Type aliases for convenience
pub type AVA<F> = multiclass::AvaClassifier<F>;
pub type OVA<F> = multiclass::OvaClassifier<F>;
