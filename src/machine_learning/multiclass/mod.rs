//! Multiclass classification by decomposition into binary sub-problems
//!
//! Both strategies relabel copies of the training data to `+1`/`-1`, train one
//! fresh base classifier per sub-problem and combine the base classifiers'
//! predictions and confidences into a single label.
//!
//! Each sub-problem is trained with its own `StdRng`, seeded from the caller's
//! random source in sub-problem order before any training starts. Sequential
//! and parallel training therefore produce identical models.

pub mod ava;
pub mod ova;

pub use ava::AvaClassifier;
pub use ova::OvaClassifier;

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use rayon::prelude::*;
use tracing::trace;

use crate::machine_learning::core::{Classifier, ClassifierError};
use crate::machine_learning::dataset::DataSet;
use crate::machine_learning::factory::ClassifierFactory;

/// Label assigned to examples of the class a sub-classifier should claim
pub const POSITIVE: f64 = 1.0;
/// Label assigned to every other example of a sub-problem
pub const NEGATIVE: f64 = -1.0;

fn train_one<F: ClassifierFactory>(
    factory: &F,
    problem: &DataSet,
    seed: u64,
) -> Result<F::Output, ClassifierError> {
    let mut classifier = factory.create();
    let mut rng = StdRng::seed_from_u64(seed);
    classifier.train(problem, &mut rng)?;
    trace!(examples = problem.len(), "trained sub-classifier");
    Ok(classifier)
}

/// Train one fresh classifier per sub-problem, returned in sub-problem order
///
/// `build(i)` materializes sub-problem `i` right before it is trained and the
/// copy is dropped afterwards, so sequential training holds a single
/// relabeled copy of the data at a time.
pub(crate) fn train_sub_problems<F, B>(
    factory: &F,
    count: usize,
    build: B,
    rng: &mut dyn RngCore,
    parallel: bool,
) -> Result<Vec<F::Output>, ClassifierError>
where
    F: ClassifierFactory + Sync,
    F::Output: Send,
    B: Fn(usize) -> DataSet + Sync,
{
    let seeds: Vec<u64> = (0..count).map(|_| rng.next_u64()).collect();

    if parallel {
        seeds
            .par_iter()
            .enumerate()
            .map(|(i, &seed)| train_one(factory, &build(i), seed))
            .collect()
    } else {
        seeds
            .iter()
            .enumerate()
            .map(|(i, &seed)| train_one(factory, &build(i), seed))
            .collect()
    }
}

/// Position of the first maximum
pub(crate) fn first_max(scores: &[f64]) -> Option<usize> {
    let mut best: Option<usize> = None;
    for (i, &score) in scores.iter().enumerate() {
        match best {
            Some(b) if score <= scores[b] => {}
            _ => best = Some(i),
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use super::*;
    use crate::machine_learning::dataset::{Example, FeatureSpace};

    /// Records how many sub-problems existed when it was trained
    struct BuildCounter {
        built: Arc<AtomicUsize>,
        seen: usize,
    }

    impl Classifier for BuildCounter {
        fn train(&mut self, _data: &DataSet, _rng: &mut dyn RngCore) -> Result<(), ClassifierError> {
            self.seen = self.built.load(Ordering::SeqCst);
            Ok(())
        }

        fn classify(&self, _example: &Example) -> Result<f64, ClassifierError> {
            Ok(POSITIVE)
        }

        fn confidence(&self, _example: &Example) -> Result<f64, ClassifierError> {
            Ok(0.0)
        }
    }

    #[test]
    fn test_sequential_training_builds_problems_lazily() {
        let built = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&built);
        let factory = move || BuildCounter {
            built: Arc::clone(&counter),
            seen: 0,
        };
        let data = DataSet::new(Arc::new(FeatureSpace::dense(1)));

        let classifiers = train_sub_problems(
            &factory,
            3,
            |_| {
                built.fetch_add(1, Ordering::SeqCst);
                data.empty_like()
            },
            &mut StdRng::seed_from_u64(0),
            false,
        )
        .unwrap();

        let seen: Vec<usize> = classifiers.iter().map(|c| c.seen).collect();
        assert_eq!(seen, vec![1, 2, 3]);
    }

    #[test]
    fn test_first_max_prefers_earliest_tie() {
        assert_eq!(first_max(&[1.0, 3.0, 3.0, -2.0]), Some(1));
        assert_eq!(first_max(&[0.0, 0.0]), Some(0));
        assert_eq!(first_max(&[]), None);
    }
}
