//! One-vs-all decomposition: one binary classifier per label

use rand::RngCore;
use tracing::info;

use crate::machine_learning::core::{Classifier, ClassifierError};
use crate::machine_learning::dataset::{DataSet, Example, LabelIndex};
use crate::machine_learning::factory::ClassifierFactory;
use crate::machine_learning::multiclass::{train_sub_problems, NEGATIVE, POSITIVE};

/// One-vs-all multiclass classifier
///
/// The classifier for label `L` is trained on every example, relabeled `+1`
/// when its label is `L` and `-1` otherwise.
///
/// Prediction prefers any positive claim: among classifiers predicting `+1`
/// the most confident wins. When no classifier claims the example, the label
/// whose classifier rejected it least confidently is returned instead.
#[derive(Debug, Clone)]
pub struct OvaClassifier<F: ClassifierFactory> {
    factory: F,
    parallel: bool,
    labels: LabelIndex,
    classifiers: Vec<F::Output>,
}

impl<F: ClassifierFactory> OvaClassifier<F> {
    pub fn new(factory: F) -> Self {
        OvaClassifier {
            factory,
            parallel: false,
            labels: LabelIndex::new(),
            classifiers: Vec::new(),
        }
    }

    /// Train the per-label classifiers on the rayon thread pool
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn labels(&self) -> &LabelIndex {
        &self.labels
    }

    /// Trained classifiers keyed by the label they claim
    pub fn sub_classifiers(&self) -> impl Iterator<Item = (f64, &F::Output)> + '_ {
        self.labels.iter().zip(self.classifiers.iter())
    }
}

fn one_vs_rest_problem(data: &DataSet, target: usize) -> DataSet {
    let mut problem = data.empty_like();
    for (id, example) in data.labeled_examples() {
        let label = if id == target { POSITIVE } else { NEGATIVE };
        problem.push_trusted(example.relabeled(label));
    }
    problem
}

impl<F> Classifier for OvaClassifier<F>
where
    F: ClassifierFactory + Sync,
    F::Output: Send,
{
    fn train(&mut self, data: &DataSet, rng: &mut dyn RngCore) -> Result<(), ClassifierError> {
        let labels = data.labels().clone();
        if labels.is_empty() {
            return Err(ClassifierError::EmptyDataset);
        }


        info!(
            labels = labels.len(),
            examples = data.len(),
            parallel = self.parallel,
            "training one-vs-all classifier"
        );
        self.classifiers = train_sub_problems(
            &self.factory,
            labels.len(),
            |target| one_vs_rest_problem(data, target),
            rng,
            self.parallel,
        )?;
        self.labels = labels;
        Ok(())
    }

    fn classify(&self, example: &Example) -> Result<f64, ClassifierError> {
        // (label id, confidence)
        let mut most_confident_positive: Option<(usize, f64)> = None;
        let mut least_confident_negative: Option<(usize, f64)> = None;

        for (id, classifier) in self.classifiers.iter().enumerate() {
            let prediction = classifier.classify(example)?;
            let confidence = classifier.confidence(example)?;

            if prediction > 0.0 {
                match most_confident_positive {
                    Some((_, best)) if confidence <= best => {}
                    _ => most_confident_positive = Some((id, confidence)),
                }
            } else {
                match least_confident_negative {
                    Some((_, best)) if confidence >= best => {}
                    _ => least_confident_negative = Some((id, confidence)),
                }
            }
        }

        most_confident_positive
            .or(least_confident_negative)
            .map(|(id, _)| self.labels.as_slice()[id])
            .ok_or(ClassifierError::NotTrained)
    }

    /// Ensemble confidence is not modelled; always `0.0` once trained
    fn confidence(&self, _example: &Example) -> Result<f64, ClassifierError> {
        if self.labels.is_empty() {
            return Err(ClassifierError::NotTrained);
        }
        Ok(0.0)
    }
}
