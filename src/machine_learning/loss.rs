//! Surrogate losses and weight regularizers for linear models

use serde::{Deserialize, Serialize};

/// Surrogate loss minimized by gradient descent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Loss {
    /// `exp(-y * d)`
    #[default]
    Exponential,
    /// `max(0, 1 - y * d)`
    Hinge,
}

impl Loss {
    /// Loss value for an example with `label` at hyperplane distance `distance`
    pub fn value(self, label: f64, distance: f64) -> f64 {
        let margin = label * distance;
        match self {
            Loss::Exponential => (-margin).exp(),
            Loss::Hinge => (1.0 - margin).max(0.0),
        }
    }

    /// Multiplier applied to `label * value` in the weight update
    ///
    /// For hinge loss this is the margin-violation indicator (1 or 0), not
    /// the loss value itself.
    pub fn update_factor(self, label: f64, distance: f64) -> f64 {
        let margin = label * distance;
        match self {
            Loss::Exponential => (-margin).exp(),
            Loss::Hinge => {
                if margin < 1.0 {
                    1.0
                } else {
                    0.0
                }
            }
        }
    }
}

/// Penalty applied to weights during gradient descent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Regularization {
    #[default]
    None,
    L1,
    L2,
}

impl Regularization {
    /// Derivative of the penalty at `weight`
    pub fn factor(self, weight: f64) -> f64 {
        match self {
            Regularization::None => 0.0,
            // f64::signum maps 0.0 to 1.0
            Regularization::L1 if weight == 0.0 => 0.0,
            Regularization::L1 => weight.signum(),
            Regularization::L2 => weight,
        }
    }
}
