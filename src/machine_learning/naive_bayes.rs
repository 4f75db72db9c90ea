//! Bernoulli Naive Bayes over positive feature occurrences

use std::sync::Arc;

use ndarray::{Array1, Array2};
use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::machine_learning::core::{Classifier, ClassifierError};
use crate::machine_learning::dataset::{DataSet, Example, FeatureSpace, LabelIndex};

/// Additive smoothing used unless configured otherwise
pub const DEFAULT_SMOOTHING: f64 = 1.0;

/// Which features contribute to an example's likelihood
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NaiveBayesMode {
    /// Every feature of the training space: present ones with `p`, absent ones
    /// with `1 - p`
    #[default]
    AllFeatures,
    /// Only the example's positive features
    PositiveFeaturesOnly,
}

#[derive(Debug, Clone)]
struct FrequencyTables {
    space: Arc<FeatureSpace>,
    labels: LabelIndex,
    /// Examples per label id
    label_counts: Array1<f64>,
    /// Positive occurrences, indexed by `[label id, feature position]`
    feature_counts: Array2<f64>,
    total: f64,
}

/// Naive Bayes classifier modelling `p(feature present | label)`
#[derive(Debug, Clone)]
pub struct NaiveBayesClassifier {
    lambda: f64,
    mode: NaiveBayesMode,
    tables: Option<FrequencyTables>,
}

impl NaiveBayesClassifier {
    pub fn new() -> Self {
        NaiveBayesClassifier {
            lambda: DEFAULT_SMOOTHING,
            mode: NaiveBayesMode::default(),
            tables: None,
        }
    }

    /// Sets the smoothing constant
    pub fn with_lambda(mut self, lambda: f64) -> Self {
        self.lambda = lambda;
        self
    }

    pub fn with_mode(mut self, mode: NaiveBayesMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn set_lambda(&mut self, lambda: f64) {
        self.lambda = lambda;
    }

    /// Switch to positive-features-only inference (`true`) or all features
    pub fn set_use_only_positive_features(&mut self, positive_only: bool) {
        self.mode = if positive_only {
            NaiveBayesMode::PositiveFeaturesOnly
        } else {
            NaiveBayesMode::AllFeatures
        };
    }

    pub fn lambda(&self) -> f64 {
        self.lambda
    }

    pub fn mode(&self) -> NaiveBayesMode {
        self.mode
    }

    fn tables(&self) -> Result<&FrequencyTables, ClassifierError> {
        self.tables.as_ref().ok_or(ClassifierError::NotTrained)
    }

    fn label_id(&self, label: f64) -> Result<usize, ClassifierError> {
        self.tables()?
            .labels
            .id_of(label)
            .ok_or(ClassifierError::UnknownLabel(label))
    }

    /// Smoothed `p(feature present | label)`
    pub fn feature_prob(&self, feature: usize, label: f64) -> Result<f64, ClassifierError> {
        let id = self.label_id(label)?;
        let tables = self.tables()?;
        let position = tables.space.position(feature);
        Ok(self.smoothed(tables, id, position))
    }

    /// `log10 p(label) + Σ log10 p(feature | label)` under the current mode
    pub fn log_prob(&self, example: &Example, label: f64) -> Result<f64, ClassifierError> {
        let id = self.label_id(label)?;
        Ok(self.log_prob_by_id(self.tables()?, example, id))
    }

    fn smoothed(&self, tables: &FrequencyTables, id: usize, position: Option<usize>) -> f64 {
        let count = position.map_or(0.0, |position| tables.feature_counts[[id, position]]);
        (count + self.lambda) / (tables.label_counts[id] + 2.0 * self.lambda)
    }

    fn log_prob_by_id(&self, tables: &FrequencyTables, example: &Example, id: usize) -> f64 {
        let prior = (tables.label_counts[id] / tables.total).log10();

        let likelihood: f64 = match self.mode {
            NaiveBayesMode::PositiveFeaturesOnly => example
                .features()
                .filter(|&(_, value)| value > 0.0)
                .map(|(index, _)| self.smoothed(tables, id, tables.space.position(index)).log10())
                .sum(),
            NaiveBayesMode::AllFeatures => tables
                .space
                .indices()
                .iter()
                .enumerate()
                .map(|(position, &index)| {
                    let p = self.smoothed(tables, id, Some(position));
                    if example.feature(index) > 0.0 {
                        p.log10()
                    } else {
                        (1.0 - p).log10()
                    }
                })
                .sum(),
        };

        prior + likelihood
    }

    /// Most probable label and its log probability; the first label wins ties
    fn best_label(&self, example: &Example) -> Result<(f64, f64), ClassifierError> {
        let tables = self.tables()?;
        let mut best: Option<(f64, f64)> = None;

        for (id, label) in tables.labels.iter().enumerate() {
            let log_prob = self.log_prob_by_id(tables, example, id);
            match best {
                Some((_, best_prob)) if log_prob <= best_prob => {}
                _ => best = Some((label, log_prob)),
            }
        }

        best.ok_or(ClassifierError::NotTrained)
    }
}

impl Default for NaiveBayesClassifier {
    fn default() -> Self {
        NaiveBayesClassifier::new()
    }
}

impl Classifier for NaiveBayesClassifier {
    /// Single counting pass; `rng` is unused
    fn train(&mut self, data: &DataSet, _rng: &mut dyn RngCore) -> Result<(), ClassifierError> {
        if data.is_empty() {
            return Err(ClassifierError::EmptyDataset);
        }

        let space = Arc::clone(data.feature_space());
        let labels = data.labels().clone();
        let mut label_counts = Array1::zeros(labels.len());
        let mut feature_counts = Array2::zeros((labels.len(), space.len()));

        for (id, example) in data.labeled_examples() {
            label_counts[id] += 1.0;

            for (index, value) in example.features() {
                if value <= 0.0 {
                    continue;
                }
                if let Some(position) = space.position(index) {
                    feature_counts[[id, position]] += 1.0;
                }
            }
        }

        self.tables = Some(FrequencyTables {
            space,
            labels,
            label_counts,
            feature_counts,
            total: data.len() as f64,
        });
        Ok(())
    }

    fn classify(&self, example: &Example) -> Result<f64, ClassifierError> {
        self.best_label(example).map(|(label, _)| label)
    }

    /// Log probability of the winning label (not comparable to linear models)
    fn confidence(&self, example: &Example) -> Result<f64, ClassifierError> {
        self.best_label(example).map(|(_, log_prob)| log_prob)
    }
}
