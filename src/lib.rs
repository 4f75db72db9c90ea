//! Binary classification and multiclass decomposition
//!
//! This crate provides a uniform classifier contract, two linear learners
//! (perceptron and regularized gradient descent), a Naive Bayes model, and
//! the all-vs-all and one-vs-all strategies that combine binary classifiers
//! into multiclass predictors. Data sets are sparse and every source of
//! randomness is passed in explicitly, so training is reproducible.

pub mod machine_learning;
pub mod logging;

// Create a prelude module for convenient imports
pub mod prelude {
    pub use crate::machine_learning::prelude::*;
}

// Version and crate information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const CRATE_NAME: &str = env!("CARGO_PKG_NAME");
