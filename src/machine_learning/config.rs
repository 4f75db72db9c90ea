//! Declarative classifier configuration
//!
//! A configuration names one of the built-in models and its hyperparameters.
//! Omitted hyperparameters take the same defaults as the model constructors.
//!
//! ```toml
//! kind = "gradient_descent"
//! loss = "hinge"
//! regularization = "l2"
//! eta = 0.05
//! iterations = 30
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::machine_learning::factory::{ClassifierFactory, Model};
use crate::machine_learning::linear::{GradientDescentClassifier, PerceptronClassifier, DEFAULT_ITERATIONS};
use crate::machine_learning::loss::{Loss, Regularization};
use crate::machine_learning::naive_bayes::{NaiveBayesClassifier, NaiveBayesMode, DEFAULT_SMOOTHING};
use crate::machine_learning::optimizer::{DEFAULT_ETA, DEFAULT_LAMBDA};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse classifier config: {0}")]
    ParseToml(#[from] toml::de::Error),
}

/// Hyperparameters of one built-in classifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ClassifierConfig {
    Perceptron {
        #[serde(default = "default_iterations")]
        iterations: usize,
        #[serde(default = "default_shuffle")]
        shuffle: bool,
    },
    GradientDescent {
        #[serde(default = "default_iterations")]
        iterations: usize,
        #[serde(default = "default_shuffle")]
        shuffle: bool,
        #[serde(default)]
        loss: Loss,
        #[serde(default)]
        regularization: Regularization,
        #[serde(default = "default_eta")]
        eta: f64,
        #[serde(default = "default_lambda")]
        lambda: f64,
    },
    NaiveBayes {
        #[serde(default = "default_smoothing")]
        lambda: f64,
        #[serde(default)]
        mode: NaiveBayesMode,
    },
}

fn default_iterations() -> usize {
    DEFAULT_ITERATIONS
}

fn default_shuffle() -> bool {
    true
}

fn default_eta() -> f64 {
    DEFAULT_ETA
}

fn default_lambda() -> f64 {
    DEFAULT_LAMBDA
}

fn default_smoothing() -> f64 {
    DEFAULT_SMOOTHING
}

impl ClassifierConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        ClassifierConfig::from_toml_str(&text)
    }

    /// Builds a fresh, untrained model
    pub fn build(&self) -> Model {
        match *self {
            ClassifierConfig::Perceptron { iterations, shuffle } => PerceptronClassifier::new()
                .with_iterations(iterations)
                .with_shuffle(shuffle)
                .into(),
            ClassifierConfig::GradientDescent {
                iterations,
                shuffle,
                loss,
                regularization,
                eta,
                lambda,
            } => GradientDescentClassifier::new()
                .with_iterations(iterations)
                .with_shuffle(shuffle)
                .with_loss(loss)
                .with_regularization(regularization)
                .with_eta(eta)
                .with_lambda(lambda)
                .into(),
            ClassifierConfig::NaiveBayes { lambda, mode } => {
                NaiveBayesClassifier::new().with_lambda(lambda).with_mode(mode).into()
            }
        }
    }
}

impl ClassifierFactory for ClassifierConfig {
    type Output = Model;

    fn create(&self) -> Model {
        self.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_fill_missing_fields() {
        let config = ClassifierConfig::from_toml_str("kind = \"perceptron\"").unwrap();
        assert_eq!(
            config,
            ClassifierConfig::Perceptron {
                iterations: DEFAULT_ITERATIONS,
                shuffle: true
            }
        );
    }

    #[test]
    fn test_gradient_descent_config() {
        let text = r#"
            kind = "gradient_descent"
            loss = "hinge"
            regularization = "l1"
            eta = 0.1
        "#;
        let config = ClassifierConfig::from_toml_str(text).unwrap();
        match config {
            ClassifierConfig::GradientDescent {
                loss,
                regularization,
                eta,
                lambda,
                ..
            } => {
                assert_eq!(loss, Loss::Hinge);
                assert_eq!(regularization, Regularization::L1);
                assert_eq!(eta, 0.1);
                assert_eq!(lambda, DEFAULT_LAMBDA);
            }
            other => panic!("unexpected config {:?}", other),
        }
    }

    #[test]
    fn test_naive_bayes_builds_matching_model() {
        let config =
            ClassifierConfig::from_toml_str("kind = \"naive_bayes\"\nlambda = 0.5\nmode = \"positive_features_only\"")
                .unwrap();
        match config.create() {
            Model::NaiveBayes(model) => {
                assert_eq!(model.lambda(), 0.5);
                assert_eq!(model.mode(), NaiveBayesMode::PositiveFeaturesOnly);
            }
            other => panic!("unexpected model {:?}", other),
        }
    }

    #[test]
    fn test_unknown_kind_is_error() {
        assert!(matches!(
            ClassifierConfig::from_toml_str("kind = \"decision_tree\""),
            Err(ConfigError::ParseToml(_))
        ));
    }
}
