//! Linear binary classifiers: perceptron and gradient descent
//!
//! Both learners share the same model, a hyperplane `w · x + b`, and the same
//! training loop. They differ only in the [`UpdateRule`] applied to each
//! example.

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::sync::Arc;

use ndarray::Array1;
use rand::seq::SliceRandom;
use rand::RngCore;
use tracing::debug;

use crate::machine_learning::core::{sign, Classifier, ClassifierError};
use crate::machine_learning::dataset::{DataSet, Example, FeatureSpace};
use crate::machine_learning::loss::{Loss, Regularization};
use crate::machine_learning::optimizer::{GradientDescentRule, PerceptronRule, UpdateRule};

/// Number of passes over the training data unless configured otherwise
pub const DEFAULT_ITERATIONS: usize = 10;

/// A separating hyperplane over a fixed feature space
#[derive(Debug, Clone, PartialEq)]
pub struct Hyperplane {
    space: Arc<FeatureSpace>,
    weights: Array1<f64>,
    bias: f64,
}

impl Hyperplane {
    /// Hyperplane with every weight and the bias set to zero
    pub fn zeroed(space: Arc<FeatureSpace>) -> Self {
        let weights = Array1::zeros(space.len());
        Hyperplane {
            space,
            weights,
            bias: 0.0,
        }
    }

    /// Signed distance `b + Σ w[i]·x[i]` over the example's stored features
    ///
    /// Features outside the hyperplane's space carry no weight.
    pub fn distance(&self, example: &Example) -> f64 {
        let mut sum = self.bias;
        for (index, value) in example.features() {
            if let Some(position) = self.space.position(index) {
                sum += self.weights[position] * value;
            }
        }
        sum
    }

    /// Side of the hyperplane: `1.0`, `-1.0`, or `0.0` exactly on it
    pub fn prediction(&self, example: &Example) -> f64 {
        sign(self.distance(example))
    }

    pub fn weight(&self, index: usize) -> Option<f64> {
        self.space.position(index).map(|position| self.weights[position])
    }

    pub fn weight_mut(&mut self, index: usize) -> Option<&mut f64> {
        let position = self.space.position(index)?;
        self.weights.get_mut(position)
    }

    /// `(feature index, weight)` pairs in ascending index order
    pub fn weights(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.space.indices().iter().copied().zip(self.weights.iter().copied())
    }

    pub fn bias(&self) -> f64 {
        self.bias
    }

    pub fn set_bias(&mut self, bias: f64) {
        self.bias = bias;
    }

    pub fn feature_space(&self) -> &Arc<FeatureSpace> {
        &self.space
    }
}

impl Display for Hyperplane {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let rendered: Vec<String> = self
            .weights()
            .map(|(index, weight)| format!("{}:{}", index, weight))
            .collect();
        write!(f, "{}", rendered.join(" "))
    }
}

/// Linear classifier trained online with update rule `R`
#[derive(Debug, Clone)]
pub struct LinearClassifier<R> {
    rule: R,
    iterations: usize,
    shuffle: bool,
    hyperplane: Option<Hyperplane>,
}

/// Mistake-driven perceptron
pub type PerceptronClassifier = LinearClassifier<PerceptronRule>;

/// Gradient descent on an exponential or hinge surrogate loss
pub type GradientDescentClassifier = LinearClassifier<GradientDescentRule>;

impl<R: UpdateRule> LinearClassifier<R> {
    /// Creates an untrained classifier using `rule`
    pub fn with_rule(rule: R) -> Self {
        LinearClassifier {
            rule,
            iterations: DEFAULT_ITERATIONS,
            shuffle: true,
            hyperplane: None,
        }
    }

    /// Sets the number of passes over the training data
    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    /// Whether to reshuffle the examples before every pass
    ///
    /// With shuffling off, every pass visits examples in data set order.
    pub fn with_shuffle(mut self, shuffle: bool) -> Self {
        self.shuffle = shuffle;
        self
    }

    pub fn set_iterations(&mut self, iterations: usize) {
        self.iterations = iterations;
    }

    pub fn iterations(&self) -> usize {
        self.iterations
    }

    pub fn rule(&self) -> &R {
        &self.rule
    }

    /// The learned hyperplane, once trained
    pub fn hyperplane(&self) -> Option<&Hyperplane> {
        self.hyperplane.as_ref()
    }

    /// Signed distance of `example` from the learned hyperplane
    pub fn distance(&self, example: &Example) -> Result<f64, ClassifierError> {
        self.hyperplane
            .as_ref()
            .map(|hyperplane| hyperplane.distance(example))
            .ok_or(ClassifierError::NotTrained)
    }
}

impl PerceptronClassifier {
    pub fn new() -> Self {
        LinearClassifier::with_rule(PerceptronRule)
    }
}

impl Default for PerceptronClassifier {
    fn default() -> Self {
        PerceptronClassifier::new()
    }
}

impl GradientDescentClassifier {
    /// Exponential loss, no regularization, default learning rate and lambda
    pub fn new() -> Self {
        LinearClassifier::with_rule(GradientDescentRule::default())
    }

    pub fn with_loss(mut self, loss: Loss) -> Self {
        self.rule.loss = loss;
        self
    }

    pub fn with_regularization(mut self, regularization: Regularization) -> Self {
        self.rule.regularization = regularization;
        self
    }

    /// Sets the learning rate
    pub fn with_eta(mut self, eta: f64) -> Self {
        self.rule.eta = eta;
        self
    }

    /// Sets the regularization strength
    pub fn with_lambda(mut self, lambda: f64) -> Self {
        self.rule.lambda = lambda;
        self
    }
}

impl Default for GradientDescentClassifier {
    fn default() -> Self {
        GradientDescentClassifier::new()
    }
}

impl<R: UpdateRule> Classifier for LinearClassifier<R> {
    fn train(&mut self, data: &DataSet, rng: &mut dyn RngCore) -> Result<(), ClassifierError> {
        let mut hyperplane = Hyperplane::zeroed(Arc::clone(data.feature_space()));
        let mut order: Vec<&Example> = data.examples().iter().collect();

        for pass in 0..self.iterations {
            if self.shuffle {
                order.shuffle(rng);
            }

            let mut total_loss = 0.0;
            let mut updates = 0usize;
            for example in &order {
                let distance = hyperplane.distance(example);
                total_loss += self.rule.loss(example.label(), distance);
                if self.rule.update(&mut hyperplane, example, distance) {
                    updates += 1;
                }
            }

            debug!(pass, total_loss, updates, "linear training pass");
        }

        self.hyperplane = Some(hyperplane);
        Ok(())
    }

    fn classify(&self, example: &Example) -> Result<f64, ClassifierError> {
        self.distance(example).map(sign)
    }

    /// Absolute distance from the hyperplane; unbounded, not a probability
    fn confidence(&self, example: &Example) -> Result<f64, ClassifierError> {
        self.distance(example).map(f64::abs)
    }
}

impl<R> Display for LinearClassifier<R> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match &self.hyperplane {
            Some(hyperplane) => write!(f, "{}", hyperplane),
            None => write!(f, "<untrained>"),
        }
    }
}
