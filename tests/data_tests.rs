// tests/data_tests.rs
//! Tests for loading, splitting, preprocessing and evaluation

use std::collections::BTreeSet;
use std::io::Write;
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tempfile::NamedTempFile;

use classkit::machine_learning::evaluation::mean;
use classkit::machine_learning::prelude::*;

/// Examples labeled by parity whose feature 0 holds their row number
fn numbered(n: usize) -> DataSet {
    let space = Arc::new(FeatureSpace::dense(1));
    let examples = (0..n).map(|row| {
        let label = if row % 2 == 0 { 1.0 } else { -1.0 };
        Example::new(label).with_feature(0, (row + 1) as f64)
    });
    DataSet::from_examples(space, examples).unwrap()
}

fn rows(data: &DataSet) -> Vec<usize> {
    data.examples().iter().map(|e| e.feature(0) as usize - 1).collect()
}

#[test]
fn test_load_csv_file_with_header() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "class;sunny;windy").unwrap();
    writeln!(file, "1;1;0").unwrap();
    writeln!(file, "-1;0;2.5").unwrap();
    writeln!(file).unwrap();
    writeln!(file, "1;3;1").unwrap();

    let options = CsvOptions {
        delimiter: ';',
        has_header: true,
        label_column: Some(0),
    };
    let data = DataSet::from_csv(file.path(), &options).unwrap();

    assert_eq!(data.len(), 3);
    assert_eq!(data.labels().as_slice(), &[1.0, -1.0]);
    assert_eq!(data.feature_indices(), &[0, 1]);
    assert_eq!(data.feature_space().name(0), Some("sunny"));
    assert_eq!(data.feature_space().name(1), Some("windy"));

    let first = &data.examples()[0];
    assert_eq!(first.feature(0), 1.0);
    assert!(!first.contains_feature(1));
    assert_eq!(data.examples()[1].feature(1), 2.5);
}

#[test]
fn test_load_missing_csv_file() {
    let result = DataSet::from_csv("/nonexistent/classkit/data.csv", &CsvOptions::default());
    assert!(matches!(result, Err(DataError::Io(_))));
}

#[test]
fn test_split_partitions_examples() {
    let data = numbered(10);
    let split = data.split(0.7, &mut StdRng::seed_from_u64(1)).unwrap();

    assert_eq!(split.train().len(), 7);
    assert_eq!(split.test().len(), 3);

    let mut all: Vec<usize> = rows(split.train());
    all.extend(rows(split.test()));
    all.sort_unstable();
    assert_eq!(all, (0..10).collect::<Vec<_>>());

    assert!(matches!(
        data.split(1.5, &mut StdRng::seed_from_u64(1)),
        Err(DataError::InvalidFraction(_))
    ));
}

#[test]
fn test_cross_validation_folds_cover_data_once() {
    let data = numbered(10);
    let validation = CrossValidation::new(&data, 3, &mut StdRng::seed_from_u64(5)).unwrap();
    assert_eq!(validation.num_folds(), 3);

    let mut seen = BTreeSet::new();
    let mut sizes = Vec::new();
    for split in validation.splits() {
        assert_eq!(split.train().len() + split.test().len(), 10);

        let train: BTreeSet<usize> = rows(split.train()).into_iter().collect();
        for row in rows(split.test()) {
            assert!(!train.contains(&row));
            assert!(seen.insert(row), "row {} tested twice", row);
        }
        sizes.push(split.test().len());
    }

    assert_eq!(seen.len(), 10);
    sizes.sort_unstable();
    assert_eq!(sizes, vec![3, 3, 4]);
    assert!(validation.validation_set(3).is_none());
}

#[test]
fn test_cross_validation_rejects_bad_fold_counts() {
    let data = numbered(4);
    for folds in [0, 5] {
        assert!(matches!(
            CrossValidation::new(&data, folds, &mut StdRng::seed_from_u64(0)),
            Err(DataError::InvalidFolds { .. })
        ));
    }
}

#[test]
fn test_cross_validate_naive_bayes_on_separable_data() {
    let space = Arc::new(FeatureSpace::dense(2));
    let examples = (0..12).map(|i| {
        if i % 2 == 0 {
            Example::new(1.0).with_feature(0, 1.0)
        } else {
            Example::new(-1.0).with_feature(1, 1.0)
        }
    });
    let data = DataSet::from_examples(space, examples).unwrap();

    let accuracies = cross_validate(&NaiveBayesClassifier::new, &data, 4, &mut StdRng::seed_from_u64(8)).unwrap();
    assert_eq!(accuracies, vec![1.0; 4]);
    assert_eq!(mean(&accuracies), Some(1.0));
    assert_eq!(mean(&[]), None);
}

#[test]
fn test_accuracy_requires_examples() {
    let mut classifier = PerceptronClassifier::new();
    let data = numbered(4);
    classifier.train(&data, &mut StdRng::seed_from_u64(0)).unwrap();

    let empty = data.empty_like();
    assert!(matches!(accuracy(&classifier, &empty), Err(ClassifierError::EmptyDataset)));
}

#[test]
fn test_normalizer_fitted_on_train_split_only() {
    let data = numbered(8);
    let mut split = data.split(0.5, &mut StdRng::seed_from_u64(4)).unwrap();
    let mut normalizer = FeatureNormalizer::new();

    let (train, test) = split.parts_mut();
    normalizer.preprocess_train(train).unwrap();
    normalizer.preprocess_test(test).unwrap();

    let train_mean: f64 = train.examples().iter().map(|e| e.feature(0)).sum::<f64>() / train.len() as f64;
    assert!(train_mean.abs() < 1e-10);

    let (center, scale) = normalizer.parameters().next().unwrap();
    let original = rows(&data.split(0.5, &mut StdRng::seed_from_u64(4)).unwrap().into_parts().1);
    for (example, row) in test.examples().iter().zip(original) {
        let expected = ((row + 1) as f64 - center) / scale;
        assert!((example.feature(0) - expected).abs() < 1e-10);
    }

    let mut wider = DataSet::new(Arc::new(FeatureSpace::dense(3)));
    assert!(matches!(
        normalizer.preprocess_test(&mut wider),
        Err(DataError::ShapeMismatch { expected: 1, found: 3 })
    ));
}

#[test]
fn test_example_normalizer_before_training() {
    let space = Arc::new(FeatureSpace::dense(2));
    let mut data = DataSet::from_examples(
        space,
        vec![
            Example::new(1.0).with_feature(0, 3.0).with_feature(1, 4.0),
            Example::new(-1.0).with_feature(1, -2.0),
        ],
    )
    .unwrap();

    ExampleNormalizer::new().preprocess_train(&mut data).unwrap();
    assert!((data.examples()[0].feature(0) - 0.6).abs() < 1e-12);
    assert!((data.examples()[0].feature(1) - 0.8).abs() < 1e-12);
    assert!((data.examples()[1].feature(1) + 1.0).abs() < 1e-12);

    let mut classifier = PerceptronClassifier::new();
    classifier.train(&data, &mut StdRng::seed_from_u64(0)).unwrap();
    assert_eq!(accuracy(&classifier, &data).unwrap(), 1.0);
}

#[test]
fn test_config_file_builds_factory() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "kind = \"gradient_descent\"").unwrap();
    writeln!(file, "loss = \"hinge\"").unwrap();
    writeln!(file, "regularization = \"l2\"").unwrap();
    writeln!(file, "eta = 0.05").unwrap();

    let config = ClassifierConfig::from_toml_file(file.path()).unwrap();
    match config {
        ClassifierConfig::GradientDescent { loss, regularization, eta, .. } => {
            assert_eq!(loss, Loss::Hinge);
            assert_eq!(regularization, Regularization::L2);
            assert_eq!(eta, 0.05);
        }
        other => panic!("unexpected config {:?}", other),
    }

    let missing = ClassifierConfig::from_toml_file("/nonexistent/classkit/model.toml");
    assert!(matches!(missing, Err(ConfigError::Read { .. })));
}

#[test]
fn test_logging_init_is_idempotent() {
    assert!(classkit::logging::init().is_ok());
    assert!(classkit::logging::init().is_ok());
}
