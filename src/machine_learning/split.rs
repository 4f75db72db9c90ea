//! Train/test splits and k-fold cross-validation

use rand::seq::SliceRandom;
use rand::RngCore;

use crate::machine_learning::dataset::{DataError, DataSet};

/// A pair of disjoint training and testing data sets
#[derive(Debug, Clone)]
pub struct DataSetSplit {
    train: DataSet,
    test: DataSet,
}

impl DataSetSplit {
    pub fn train(&self) -> &DataSet {
        &self.train
    }

    pub fn test(&self) -> &DataSet {
        &self.test
    }

    /// Mutable access to both halves, e.g. for preprocessing
    pub fn parts_mut(&mut self) -> (&mut DataSet, &mut DataSet) {
        (&mut self.train, &mut self.test)
    }

    pub fn into_parts(self) -> (DataSet, DataSet) {
        (self.train, self.test)
    }
}

impl DataSet {
    /// Randomly split into a training part holding `fraction` of the examples
    /// (rounded) and a testing part holding the rest
    pub fn split(&self, fraction: f64, rng: &mut dyn RngCore) -> Result<DataSetSplit, DataError> {
        if !(0.0..=1.0).contains(&fraction) {
            return Err(DataError::InvalidFraction(fraction));
        }

        let mut rows: Vec<usize> = (0..self.len()).collect();
        rows.shuffle(rng);

        let n_train = (self.len() as f64 * fraction).round() as usize;
        let (train_rows, test_rows) = rows.split_at(n_train);

        Ok(DataSetSplit {
            train: self.subset(train_rows),
            test: self.subset(test_rows),
        })
    }
}

/// K-fold partition of a data set
///
/// Examples are shuffled once and dealt round-robin into the folds, so fold
/// sizes differ by at most one.
#[derive(Debug, Clone)]
pub struct CrossValidation<'a> {
    data: &'a DataSet,
    folds: Vec<Vec<usize>>,
}

impl<'a> CrossValidation<'a> {
    pub fn new(data: &'a DataSet, folds: usize, rng: &mut dyn RngCore) -> Result<Self, DataError> {
        if folds == 0 || folds > data.len() {
            return Err(DataError::InvalidFolds {
                folds,
                examples: data.len(),
            });
        }

        let mut rows: Vec<usize> = (0..data.len()).collect();
        rows.shuffle(rng);

        let mut partition = vec![Vec::new(); folds];
        for (i, row) in rows.into_iter().enumerate() {
            partition[i % folds].push(row);
        }

        Ok(CrossValidation {
            data,
            folds: partition,
        })
    }

    pub fn num_folds(&self) -> usize {
        self.folds.len()
    }

    /// Fold `fold` as the test set, all other folds as the training set
    pub fn validation_set(&self, fold: usize) -> Option<DataSetSplit> {
        let test_rows = self.folds.get(fold)?;
        let train_rows: Vec<usize> = self
            .folds
            .iter()
            .enumerate()
            .filter(|&(i, _)| i != fold)
            .flat_map(|(_, rows)| rows.iter().copied())
            .collect();

        Some(DataSetSplit {
            train: self.data.subset(&train_rows),
            test: self.data.subset(test_rows),
        })
    }

    /// Every validation split in fold order
    pub fn splits(&self) -> impl Iterator<Item = DataSetSplit> + '_ {
        (0..self.num_folds()).filter_map(move |fold| self.validation_set(fold))
    }
}
