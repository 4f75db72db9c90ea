//! Per-example update rules for linear classifiers

use crate::machine_learning::core::sign;
use crate::machine_learning::dataset::Example;
use crate::machine_learning::linear::Hyperplane;
use crate::machine_learning::loss::{Loss, Regularization};

pub const DEFAULT_ETA: f64 = 0.01;
pub const DEFAULT_LAMBDA: f64 = 0.01;

/// Trait for online update rules
pub trait UpdateRule {
    /// Update `hyperplane` after seeing `example`, whose distance from the
    /// hyperplane before the update is `distance`
    ///
    /// Returns whether an update was applied.
    fn update(&self, hyperplane: &mut Hyperplane, example: &Example, distance: f64) -> bool;

    /// Loss of the current hyperplane on one example, for progress reporting
    fn loss(&self, label: f64, distance: f64) -> f64;
}

/// Mistake-driven perceptron rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PerceptronRule;

impl UpdateRule for PerceptronRule {
    fn update(&self, hyperplane: &mut Hyperplane, example: &Example, distance: f64) -> bool {
        let label = example.label();
        if sign(distance) == label {
            return false;
        }

        for (index, value) in example.features() {
            if let Some(weight) = hyperplane.weight_mut(index) {
                *weight += value * label;
            }
        }
        hyperplane.set_bias(hyperplane.bias() + label);
        true
    }

    /// Zero-one loss
    fn loss(&self, label: f64, distance: f64) -> f64 {
        if sign(distance) == label {
            0.0
        } else {
            1.0
        }
    }
}

/// Stochastic gradient step on a surrogate loss with optional regularization
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradientDescentRule {
    pub loss: Loss,
    pub regularization: Regularization,
    /// Learning rate
    pub eta: f64,
    /// Regularization strength
    pub lambda: f64,
}

impl Default for GradientDescentRule {
    fn default() -> Self {
        GradientDescentRule {
            loss: Loss::default(),
            regularization: Regularization::default(),
            eta: DEFAULT_ETA,
            lambda: DEFAULT_LAMBDA,
        }
    }
}

impl GradientDescentRule {
    fn step(&self, current: f64, label: f64, value: f64, loss_factor: f64) -> f64 {
        current + self.eta * (label * value * loss_factor - self.lambda * self.regularization.factor(current))
    }
}

impl UpdateRule for GradientDescentRule {
    fn update(&self, hyperplane: &mut Hyperplane, example: &Example, distance: f64) -> bool {
        let label = example.label();
        // One factor per example, taken before any weight moves
        let loss_factor = self.loss.update_factor(label, distance);

        for (index, value) in example.features() {
            if let Some(weight) = hyperplane.weight_mut(index) {
                *weight = self.step(*weight, label, value, loss_factor);
            }
        }

        let bias = self.step(hyperplane.bias(), label, 1.0, loss_factor);
        hyperplane.set_bias(bias);
        true
    }

    fn loss(&self, label: f64, distance: f64) -> f64 {
        self.loss.value(label, distance)
    }
}
