//! Producing fresh base classifiers for multiclass decomposition

use rand::RngCore;

use crate::machine_learning::core::{Classifier, ClassifierError};
use crate::machine_learning::dataset::{DataSet, Example};
use crate::machine_learning::linear::{GradientDescentClassifier, PerceptronClassifier};
use crate::machine_learning::naive_bayes::NaiveBayesClassifier;

/// Source of fresh, untrained classifiers
///
/// Every call to `create` must return a new instance; decompositions never
/// reuse one classifier across sub-problems.
pub trait ClassifierFactory {
    type Output: Classifier;

    fn create(&self) -> Self::Output;
}

impl<C, F> ClassifierFactory for F
where
    C: Classifier,
    F: Fn() -> C,
{
    type Output = C;

    fn create(&self) -> C {
        self()
    }
}

/// Any of the built-in binary classifiers
#[derive(Debug, Clone)]
pub enum Model {
    Perceptron(PerceptronClassifier),
    GradientDescent(GradientDescentClassifier),
    NaiveBayes(NaiveBayesClassifier),
}

impl Classifier for Model {
    fn train(&mut self, data: &DataSet, rng: &mut dyn RngCore) -> Result<(), ClassifierError> {
        match self {
            Model::Perceptron(model) => model.train(data, rng),
            Model::GradientDescent(model) => model.train(data, rng),
            Model::NaiveBayes(model) => model.train(data, rng),
        }
    }

    fn classify(&self, example: &Example) -> Result<f64, ClassifierError> {
        match self {
            Model::Perceptron(model) => model.classify(example),
            Model::GradientDescent(model) => model.classify(example),
            Model::NaiveBayes(model) => model.classify(example),
        }
    }

    fn confidence(&self, example: &Example) -> Result<f64, ClassifierError> {
        match self {
            Model::Perceptron(model) => model.confidence(example),
            Model::GradientDescent(model) => model.confidence(example),
            Model::NaiveBayes(model) => model.confidence(example),
        }
    }
}

impl From<PerceptronClassifier> for Model {
    fn from(model: PerceptronClassifier) -> Self {
        Model::Perceptron(model)
    }
}

impl From<GradientDescentClassifier> for Model {
    fn from(model: GradientDescentClassifier) -> Self {
        Model::GradientDescent(model)
    }
}

impl From<NaiveBayesClassifier> for Model {
    fn from(model: NaiveBayesClassifier) -> Self {
        Model::NaiveBayes(model)
    }
}
