//! Sparse examples, feature spaces and labeled data sets

use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Sparse mapping from feature index to feature value
pub type FeatureMap = BTreeMap<usize, f64>;

/// Errors raised while building, loading or transforming data sets
#[derive(Debug, Error)]
pub enum DataError {
    /// A feature index outside the data set's feature space
    #[error("feature index {index} is not part of the feature space")]
    UnknownFeature { index: usize },

    /// Labels must be finite so they can be compared for equality
    #[error("label {0} is not a finite number")]
    InvalidLabel(f64),

    /// Number of features differs from the one a preprocessor was fitted on
    #[error("expected {expected} features, found {found}")]
    ShapeMismatch { expected: usize, found: usize },

    #[error("split fraction {0} must lie within [0, 1]")]
    InvalidFraction(f64),

    #[error("cannot build {folds} folds from {examples} examples")]
    InvalidFolds { folds: usize, examples: usize },

    /// Malformed input while parsing a text source
    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A single labeled, sparse feature vector
///
/// Absent feature indices have the value `0.0`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Example {
    label: f64,
    features: FeatureMap,
}

impl Example {
    /// Creates an example with no features
    pub fn new(label: f64) -> Self {
        Example {
            label,
            features: FeatureMap::new(),
        }
    }

    /// Creates an example from `(index, value)` pairs
    pub fn from_features<I>(label: f64, features: I) -> Self
    where
        I: IntoIterator<Item = (usize, f64)>,
    {
        Example {
            label,
            features: features.into_iter().collect(),
        }
    }

    /// Adds a feature, builder style
    pub fn with_feature(mut self, index: usize, value: f64) -> Self {
        self.features.insert(index, value);
        self
    }

    pub fn label(&self) -> f64 {
        self.label
    }

    pub fn set_label(&mut self, label: f64) {
        self.label = label;
    }

    /// Copy of this example carrying a different label
    pub fn relabeled(&self, label: f64) -> Self {
        Example {
            label,
            features: self.features.clone(),
        }
    }

    /// Value of a feature, `0.0` when the example does not store it
    pub fn feature(&self, index: usize) -> f64 {
        self.features.get(&index).copied().unwrap_or(0.0)
    }

    pub fn contains_feature(&self, index: usize) -> bool {
        self.features.contains_key(&index)
    }

    pub fn set_feature(&mut self, index: usize, value: f64) {
        self.features.insert(index, value);
    }

    pub fn remove_feature(&mut self, index: usize) -> Option<f64> {
        self.features.remove(&index)
    }

    /// Stored features in ascending index order
    pub fn features(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.features.iter().map(|(&index, &value)| (index, value))
    }

    pub fn feature_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.features.keys().copied()
    }

    /// Number of stored (explicit) features
    pub fn feature_count(&self) -> usize {
        self.features.len()
    }
}

/// The universe of feature indices a data set draws from
///
/// Indices are kept sorted and mapped to contiguous positions `0..len`, so
/// models can store per-feature state in dense arrays.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FeatureSpace {
    indices: Vec<usize>,
    positions: HashMap<usize, usize>,
    names: HashMap<usize, String>,
}

impl FeatureSpace {
    /// Creates a feature space from arbitrary indices (duplicates are ignored)
    pub fn new<I: IntoIterator<Item = usize>>(indices: I) -> Self {
        let mut indices: Vec<usize> = indices.into_iter().collect();
        indices.sort_unstable();
        indices.dedup();

        let positions = indices
            .iter()
            .enumerate()
            .map(|(position, &index)| (index, position))
            .collect();

        FeatureSpace {
            indices,
            positions,
            names: HashMap::new(),
        }
    }

    /// Feature space with indices `0..width`
    pub fn dense(width: usize) -> Self {
        FeatureSpace::new(0..width)
    }

    /// Feature space with indices `0..names.len()`, one name per index
    pub fn with_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: HashMap<usize, String> = names
            .into_iter()
            .enumerate()
            .map(|(index, name)| (index, name.into()))
            .collect();
        let mut space = FeatureSpace::dense(names.len());
        space.names = names;
        space
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// All feature indices, ascending
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// Dense position of a feature index
    pub fn position(&self, index: usize) -> Option<usize> {
        self.positions.get(&index).copied()
    }

    pub fn contains(&self, index: usize) -> bool {
        self.positions.contains_key(&index)
    }

    pub fn name(&self, index: usize) -> Option<&str> {
        self.names.get(&index).map(String::as_str)
    }
}

/// Canonical label ids in first-seen order
///
/// Id `i` maps back to the `i`-th distinct label observed. Labels are finite,
/// so `==` is a total equality over them.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LabelIndex {
    labels: Vec<f64>,
}

impl LabelIndex {
    pub fn new() -> Self {
        LabelIndex::default()
    }

    /// Returns the id of `label`, registering it if unseen
    pub(crate) fn observe(&mut self, label: f64) -> usize {
        match self.id_of(label) {
            Some(id) => id,
            None => {
                self.labels.push(label);
                self.labels.len() - 1
            }
        }
    }

    pub fn id_of(&self, label: f64) -> Option<usize> {
        self.labels.iter().position(|&known| known == label)
    }

    pub fn label(&self, id: usize) -> Option<f64> {
        self.labels.get(id).copied()
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.labels.iter().copied()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.labels
    }
}

/// Options for loading a data set from delimited text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CsvOptions {
    pub delimiter: char,
    /// First line holds column names
    pub has_header: bool,
    /// Column holding the label; the last column when `None`
    pub label_column: Option<usize>,
}

impl Default for CsvOptions {
    fn default() -> Self {
        CsvOptions {
            delimiter: ',',
            has_header: false,
            label_column: None,
        }
    }
}

/// An ordered collection of examples over a shared feature space
#[derive(Debug, Clone)]
pub struct DataSet {
    space: Arc<FeatureSpace>,
    examples: Vec<Example>,
    label_ids: Vec<usize>,
    labels: LabelIndex,
}

impl DataSet {
    /// Creates an empty data set over `space`
    pub fn new(space: Arc<FeatureSpace>) -> Self {
        DataSet {
            space,
            examples: Vec::new(),
            label_ids: Vec::new(),
            labels: LabelIndex::new(),
        }
    }

    /// Creates a data set from examples, validating each one
    pub fn from_examples<I>(space: Arc<FeatureSpace>, examples: I) -> Result<Self, DataError>
    where
        I: IntoIterator<Item = Example>,
    {
        let mut data = DataSet::new(space);
        for example in examples {
            data.push(example)?;
        }
        Ok(data)
    }

    /// Empty data set sharing this one's feature space
    pub fn empty_like(&self) -> Self {
        DataSet::new(Arc::clone(&self.space))
    }

    /// Appends an example
    ///
    /// Fails if the label is not finite or a feature index lies outside the
    /// feature space.
    pub fn push(&mut self, example: Example) -> Result<(), DataError> {
        if !example.label().is_finite() {
            return Err(DataError::InvalidLabel(example.label()));
        }
        if let Some(index) = example.feature_indices().find(|&index| !self.space.contains(index)) {
            return Err(DataError::UnknownFeature { index });
        }

        self.push_trusted(example);
        Ok(())
    }

    /// Appends an example already known to satisfy the data set's invariants
    pub(crate) fn push_trusted(&mut self, example: Example) {
        let id = self.labels.observe(example.label());
        self.label_ids.push(id);
        self.examples.push(example);
    }

    /// New data set over the same space holding copies of the given rows
    pub(crate) fn subset(&self, rows: &[usize]) -> Self {
        let mut subset = self.empty_like();
        for &row in rows {
            subset.push_trusted(self.examples[row].clone());
        }
        subset
    }

    pub fn examples(&self) -> &[Example] {
        &self.examples
    }

    /// Examples paired with the id of their label in [`DataSet::labels`]
    pub fn labeled_examples(&self) -> impl Iterator<Item = (usize, &Example)> + '_ {
        self.label_ids.iter().copied().zip(self.examples.iter())
    }

    pub fn len(&self) -> usize {
        self.examples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.examples.is_empty()
    }

    /// Distinct labels observed so far, in first-seen order
    pub fn labels(&self) -> &LabelIndex {
        &self.labels
    }

    pub fn feature_space(&self) -> &Arc<FeatureSpace> {
        &self.space
    }

    pub fn feature_indices(&self) -> &[usize] {
        self.space.indices()
    }

    /// Mutable access to every example's feature values
    ///
    /// Labels stay read-only so the label index cannot drift from the data.
    pub fn feature_values_mut(&mut self) -> impl Iterator<Item = &mut FeatureMap> + '_ {
        self.examples.iter_mut().map(|example| &mut example.features)
    }

    /// Load a data set from a delimited text file
    pub fn from_csv<P: AsRef<Path>>(path: P, options: &CsvOptions) -> Result<Self, DataError> {
        let file = File::open(path)?;
        DataSet::from_csv_reader(BufReader::new(file), options)
    }

    /// Load a data set from delimited text
    ///
    /// Every column except the label column becomes a feature, numbered by its
    /// order among the feature columns. Zero values are not stored.
    pub fn from_csv_reader<R: BufRead>(reader: R, options: &CsvOptions) -> Result<Self, DataError> {
        let mut header: Option<Vec<String>> = None;
        let mut rows: Vec<(usize, Vec<f64>)> = Vec::new();
        let mut width: Option<usize> = None;

        for (line_idx, line) in reader.lines().enumerate() {
            let line = line?;
            let line_number = line_idx + 1;
            if line.trim().is_empty() {
                continue;
            }

            let cells: Vec<&str> = line.split(options.delimiter).map(str::trim).collect();

            match width {
                Some(expected) if expected != cells.len() => {
                    return Err(DataError::Parse {
                        line: line_number,
                        message: format!("expected {} columns, found {}", expected, cells.len()),
                    });
                }
                None => width = Some(cells.len()),
                _ => {}
            }

            if options.has_header && header.is_none() {
                header = Some(cells.iter().map(|cell| cell.to_string()).collect());
                continue;
            }

            let values = cells
                .iter()
                .map(|cell| {
                    cell.parse::<f64>().map_err(|err| DataError::Parse {
                        line: line_number,
                        message: format!("invalid number {:?}: {}", cell, err),
                    })
                })
                .collect::<Result<Vec<f64>, DataError>>()?;
            rows.push((line_number, values));
        }

        let width = width.unwrap_or(0);
        if width == 0 {
            return Ok(DataSet::new(Arc::new(FeatureSpace::default())));
        }

        let label_column = options.label_column.unwrap_or(width - 1);
        if label_column >= width {
            return Err(DataError::Parse {
                line: 1,
                message: format!("label column {} out of bounds for {} columns", label_column, width),
            });
        }

        // Feature columns keep their relative order once the label column is removed
        let space = match header {
            Some(names) => FeatureSpace::with_names(
                names
                    .into_iter()
                    .enumerate()
                    .filter(|&(col, _)| col != label_column)
                    .map(|(_, name)| name),
            ),
            None => FeatureSpace::dense(width - 1),
        };

        let mut data = DataSet::new(Arc::new(space));
        for (line_number, values) in rows {
            let label = values[label_column];
            let features = values
                .iter()
                .enumerate()
                .filter(|&(col, _)| col != label_column)
                .map(|(_, &value)| value)
                .enumerate()
                .filter(|&(_, value)| value != 0.0);

            data.push(Example::from_features(label, features))
                .map_err(|err| DataError::Parse {
                    line: line_number,
                    message: err.to_string(),
                })?;
        }

        Ok(data)
    }
}
