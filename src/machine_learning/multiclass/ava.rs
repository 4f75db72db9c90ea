//! All-vs-all decomposition: one binary classifier per pair of labels

use rand::RngCore;
use tracing::info;

use crate::machine_learning::core::{Classifier, ClassifierError};
use crate::machine_learning::dataset::{DataSet, Example, LabelIndex};
use crate::machine_learning::factory::ClassifierFactory;
use crate::machine_learning::multiclass::{first_max, train_sub_problems, NEGATIVE, POSITIVE};

#[derive(Debug, Clone)]
struct PairClassifier<C> {
    positive: usize,
    negative: usize,
    classifier: C,
}

/// All-vs-all multiclass classifier
///
/// For labels with ids `i < k`, the `(i, k)` classifier is trained on the
/// examples of `i` (relabeled `+1`) and `k` (relabeled `-1`) only. At
/// prediction time each pair adds `prediction · confidence` to label `i` and
/// subtracts it from label `k`; the highest total wins, ties going to the
/// label seen first in the training data.
///
/// The vote assumes a non-negative confidence, as the linear classifiers
/// produce. Naive Bayes reports a log-probability (usually negative) as its
/// confidence, which flips the direction of every pair's vote; prefer
/// [`OvaClassifier`](super::OvaClassifier) for it.
#[derive(Debug, Clone)]
pub struct AvaClassifier<F: ClassifierFactory> {
    factory: F,
    parallel: bool,
    labels: LabelIndex,
    pairs: Vec<PairClassifier<F::Output>>,
}

impl<F: ClassifierFactory> AvaClassifier<F> {
    pub fn new(factory: F) -> Self {
        AvaClassifier {
            factory,
            parallel: false,
            labels: LabelIndex::new(),
            pairs: Vec::new(),
        }
    }

    /// Train the pair classifiers on the rayon thread pool
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Labels known to the trained ensemble, in id order
    pub fn labels(&self) -> &LabelIndex {
        &self.labels
    }

    /// Trained pair classifiers keyed by `(positive label, negative label)`
    pub fn sub_classifiers(&self) -> impl Iterator<Item = ((f64, f64), &F::Output)> + '_ {
        self.pairs.iter().map(move |pair| {
            let positive = self.labels.as_slice()[pair.positive];
            let negative = self.labels.as_slice()[pair.negative];
            ((positive, negative), &pair.classifier)
        })
    }

    /// Accumulated vote of every label for `example`, in label id order
    pub fn scores(&self, example: &Example) -> Result<Vec<f64>, ClassifierError> {
        if self.labels.is_empty() {
            return Err(ClassifierError::NotTrained);
        }

        let mut scores = vec![0.0; self.labels.len()];
        for pair in &self.pairs {
            let prediction = pair.classifier.classify(example)?;
            let confidence = pair.classifier.confidence(example)?;
            let weighted = prediction * confidence;

            scores[pair.positive] += weighted;
            scores[pair.negative] -= weighted;
        }
        Ok(scores)
    }
}

fn pair_problem(data: &DataSet, positive: usize, negative: usize) -> DataSet {
    let mut problem = data.empty_like();
    for (id, example) in data.labeled_examples() {
        if id == positive {
            problem.push_trusted(example.relabeled(POSITIVE));
        } else if id == negative {
            problem.push_trusted(example.relabeled(NEGATIVE));
        }
    }
    problem
}

impl<F> Classifier for AvaClassifier<F>
where
    F: ClassifierFactory + Sync,
    F::Output: Send,
{
    fn train(&mut self, data: &DataSet, rng: &mut dyn RngCore) -> Result<(), ClassifierError> {
        let labels = data.labels().clone();
        if labels.is_empty() {
            return Err(ClassifierError::EmptyDataset);
        }

        let n = labels.len();
        let keys: Vec<(usize, usize)> = (0..n)
            .flat_map(|i| ((i + 1)..n).map(move |k| (i, k)))
            .collect();

        info!(
            labels = n,
            sub_problems = keys.len(),
            parallel = self.parallel,
            "training all-vs-all classifier"
        );
        let classifiers = train_sub_problems(
            &self.factory,
            keys.len(),
            |i| {
                let (positive, negative) = keys[i];
                pair_problem(data, positive, negative)
            },
            rng,
            self.parallel,
        )?;

        self.pairs = keys
            .into_iter()
            .zip(classifiers)
            .map(|((positive, negative), classifier)| PairClassifier {
                positive,
                negative,
                classifier,
            })
            .collect();
        self.labels = labels;
        Ok(())
    }

    fn classify(&self, example: &Example) -> Result<f64, ClassifierError> {
        let scores = self.scores(example)?;
        let best = first_max(&scores).ok_or(ClassifierError::NotTrained)?;
        Ok(self.labels.as_slice()[best])
    }

    /// Ensemble confidence is not modelled; always `0.0` once trained
    fn confidence(&self, _example: &Example) -> Result<f64, ClassifierError> {
        if self.labels.is_empty() {
            return Err(ClassifierError::NotTrained);
        }
        Ok(0.0)
    }
}
