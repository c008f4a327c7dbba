//! This file provides the dimensionality/accuracy analyzer.
//! It fits a PCA over a feature matrix once, measures a baseline
//! accuracy on the unreduced data, and sweeps classification
//! accuracy against the number of leading components retained.

use colored::Colorize;

use std::fmt;
use std::time::Instant;

use crate::Result;
use crate::common::checker::check_analysis_input;
use crate::common::constants::{DEFAULT_SEED, DEFAULT_TEST_RATIO};
use crate::model::{Classifier, Pca, RandomForest, Transformer};
use super::split::{accuracy_score, split_indices};

const WIDTH: usize = 9;


/// Builds a fresh classifier for every train/score cycle.
type ClassifierFactory = Box<dyn Fn() -> Box<dyn Classifier>>;


/// A struct that builds `PcaAnalysis`.
/// `PcaAnalysisBuilder` keeps the split parameters and the
/// classifier factory until `build` validates the input and
/// fits the reducer.
pub struct PcaAnalysisBuilder<'a> {
    features: &'a [Vec<f64>],
    labels: &'a [i64],
    seed: u64,
    test_ratio: f64,
    data_name: String,
    factory: Option<ClassifierFactory>,
    verbose: bool,
}


impl<'a> PcaAnalysisBuilder<'a> {
    /// Construct a new instance of `PcaAnalysisBuilder`
    /// over a row-major feature matrix and its aligned labels.
    /// By default, the parameters are set as follows;
    /// ```text
    /// seed: DEFAULT_SEED == 42,
    /// test_ratio: DEFAULT_TEST_RATIO == 0.3,
    /// data_name: "data",
    /// classifier: a RandomForest seeded with `seed`,
    /// verbose: false,
    /// ```
    #[inline]
    pub fn new(features: &'a [Vec<f64>], labels: &'a [i64]) -> Self {
        Self {
            features,
            labels,
            seed: DEFAULT_SEED,
            test_ratio: DEFAULT_TEST_RATIO,
            data_name: String::from("data"),
            factory: None,
            verbose: false,
        }
    }


    /// Set the seed reused by every train/test split.
    /// Default value is `42`.
    #[inline]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }


    /// Set the fraction of samples held out for testing.
    /// Default value is `0.3`.
    #[inline]
    pub fn test_ratio(mut self, ratio: f64) -> Self {
        assert!(
            0f64 < ratio && ratio < 1f64,
            "Test ratio should be in `(0, 1)`."
        );
        self.test_ratio = ratio;
        self
    }


    /// Set the name of the data, used in figure file names.
    /// Default value is `data`.
    #[inline]
    pub fn data_name<S: AsRef<str>>(mut self, name: S) -> Self {
        self.data_name = name.as_ref().to_string();
        self
    }


    /// Set the classifier factory.
    /// The factory is called once per train/score cycle,
    /// so every accuracy is measured on a fresh instance.
    /// By default, the analyzer trains a [`RandomForest`]
    /// seeded with the analyzer seed.
    #[inline]
    pub fn classifier<C, F>(mut self, factory: F) -> Self
        where C: Classifier + 'static,
              F: Fn() -> C + 'static,
    {
        self.factory = Some(Box::new(move || Box::new(factory())));
        self
    }


    /// Set the verbose parameter.
    /// If `true`, `accuracy_vs_components` prints one line per
    /// swept component count and the total wall-clock duration.
    /// Default value is `false`.
    #[inline]
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }


    /// Validate the input, fit the reducer over the full matrix,
    /// and measure the baseline accuracy on the unreduced matrix.
    ///
    /// Fitting the baseline runs one full train/score cycle,
    /// so construction takes as long as one sweep step.
    ///
    /// Fails with [`Error::DegenerateInput`](crate::Error) when the
    /// input cannot be split and fitted: fewer than two samples or
    /// features, ragged rows, a label count mismatch,
    /// or a single class.
    pub fn build(self) -> Result<PcaAnalysis> {
        check_analysis_input(self.features, self.labels)?;

        let seed = self.seed;
        let factory = self.factory.unwrap_or_else(|| {
            Box::new(move || Box::new(RandomForest::new().seed(seed)))
        });
        let classifier_name = factory().name().to_string();

        let features = self.features.to_vec();
        let labels = self.labels.to_vec();
        let n_features = features[0].len();

        let mut pca = Pca::new();
        let reduced = pca.fit_transform(&features);

        let baseline = held_out_accuracy(
            &features, &labels, self.test_ratio, seed, &factory,
        );

        Ok(PcaAnalysis {
            features,
            labels,
            reduced,
            pca,
            factory,
            baseline,
            n_features,
            seed,
            test_ratio: self.test_ratio,
            data_name: self.data_name,
            classifier_name,
            verbose: self.verbose,
        })
    }
}


/// The dimensionality/accuracy analyzer.
///
/// Everything the analyzer needs is fixed at construction:
/// the feature matrix, the labels, the fitted reducer, the split
/// parameters, and the baseline accuracy of the unreduced data.
/// Every operation afterwards is repeatable; two instances built
/// from identical inputs produce identical series.
///
/// Baseline and swept accuracies reuse the same split seed, so
/// they are comparable, though not identical: the split depends
/// only on the data shape and order, never on the column count.
///
/// # Example
/// ```
/// use accidata::analysis::PcaAnalysisBuilder;
/// use accidata::model::DecisionTreeBuilder;
///
/// let features = vec![
///     vec![0.0, 0.1, 0.3], vec![0.2, 0.0, 0.1],
///     vec![0.1, 0.2, 0.0], vec![0.3, 0.1, 0.2],
///     vec![5.0, 5.1, 5.3], vec![5.2, 5.0, 5.1],
///     vec![5.1, 5.2, 5.0], vec![5.3, 5.1, 5.2],
/// ];
/// let labels = vec![0, 0, 0, 0, 1, 1, 1, 1];
///
/// let analysis = PcaAnalysisBuilder::new(&features, &labels)
///     .test_ratio(0.25)
///     .data_name("blobs")
///     .classifier(|| DecisionTreeBuilder::new().build())
///     .build()
///     .unwrap();
///
/// // Three features: the sweep retains 1 then 2 components.
/// let series = analysis.accuracy_vs_components(None);
/// assert_eq!(series.len(), 2);
/// ```
pub struct PcaAnalysis {
    features: Vec<Vec<f64>>,
    labels: Vec<i64>,
    reduced: Vec<Vec<f64>>,
    pca: Pca,
    factory: ClassifierFactory,
    baseline: f64,
    n_features: usize,
    seed: u64,
    test_ratio: f64,
    data_name: String,
    classifier_name: String,
    verbose: bool,
}


// Manual impl: `factory` is a boxed closure and cannot be `Debug`.
impl fmt::Debug for PcaAnalysis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PcaAnalysis")
            .field("features", &self.features)
            .field("labels", &self.labels)
            .field("reduced", &self.reduced)
            .field("pca", &self.pca)
            .field("baseline", &self.baseline)
            .field("n_features", &self.n_features)
            .field("seed", &self.seed)
            .field("test_ratio", &self.test_ratio)
            .field("data_name", &self.data_name)
            .field("classifier_name", &self.classifier_name)
            .field("verbose", &self.verbose)
            .finish_non_exhaustive()
    }
}


impl PcaAnalysis {
    /// The cumulative explained-variance ratio over the first
    /// `1..=M` components, ascending in component count.
    /// The sequence is non-decreasing and its last entry is `1`
    /// up to floating-point rounding.
    ///
    /// Pure computation; render the returned series with
    /// [`save_variance_profile`](crate::analysis::save_variance_profile)
    /// if a figure is wanted.
    pub fn explained_variance_profile(&self) -> Vec<f64> {
        let mut running = 0f64;
        self.pca.explained_variance_ratio()
            .iter()
            .map(|ratio| {
                running += ratio;
                running
            })
            .collect::<Vec<_>>()
    }


    /// Held-out accuracy for every number of leading components
    /// from `1` to `limit - 1`, with `limit` defaulting to the
    /// number of features. Every entry retrains a fresh classifier
    /// on the component prefix with the same split parameters as
    /// the baseline, so the returned series has `limit - 1` entries
    /// and is directly comparable to
    /// [`baseline_accuracy`](Self::baseline_accuracy).
    ///
    /// This is the expensive operation: it runs `limit - 1` full
    /// train/score cycles. Bound `limit` when the feature count is
    /// large or the classifier is slow. Render the returned series
    /// with
    /// [`save_accuracy_curve`](crate::analysis::save_accuracy_curve)
    /// if a figure is wanted.
    pub fn accuracy_vs_components(&self, limit: Option<usize>) -> Vec<f64> {
        let limit = limit.unwrap_or(self.n_features)
            .min(self.n_features)
            .max(1);

        let now = Instant::now();
        let mut series = Vec::with_capacity(limit - 1);
        for i in 1..limit {
            let prefix = self.reduced.iter()
                .map(|row| row[..i].to_vec())
                .collect::<Vec<_>>();
            let accuracy = held_out_accuracy(
                &prefix, &self.labels, self.test_ratio, self.seed,
                &self.factory,
            );

            if self.verbose {
                println!(
                    "{}    {}",
                    format!("  [{i: >4} / {} components]", limit - 1)
                        .bold()
                        .red(),
                    format!("[accuracy {accuracy:>WIDTH$.4}]")
                        .bold()
                        .green(),
                );
            }

            series.push(accuracy);
        }

        if self.verbose {
            let seconds = now.elapsed().as_secs_f64();
            println!(
                "{}",
                format!("  [swept {} component counts in {seconds:.2}s]",
                    limit - 1,
                )
                .bold()
                .yellow(),
            );
        }

        series
    }


    /// Held-out accuracy of a classifier trained on the original,
    /// unreduced feature matrix. Computed once at construction.
    #[inline]
    pub fn baseline_accuracy(&self) -> f64 {
        self.baseline
    }


    /// The number of feature columns, which bounds the number of
    /// components.
    #[inline]
    pub fn n_features(&self) -> usize {
        self.n_features
    }


    /// The name of the classifier the factory builds,
    /// used in figure captions.
    #[inline]
    pub fn classifier_name(&self) -> &str {
        &self.classifier_name
    }


    /// The name given to the data, used in figure file names.
    #[inline]
    pub fn data_name(&self) -> &str {
        &self.data_name
    }


    /// The share of variance each component explains, descending.
    #[inline]
    pub fn variance_ratio(&self) -> &[f64] {
        self.pca.explained_variance_ratio()
    }


    /// The reduced matrix: one row per input row, components
    /// ordered by descending explained variance.
    #[inline]
    pub fn reduced_data(&self) -> &[Vec<f64>] {
        &self.reduced[..]
    }


    /// The number of rows of the input matrix.
    #[inline]
    pub fn n_samples(&self) -> usize {
        self.features.len()
    }
}


/// One train/score cycle: split deterministically, fit a fresh
/// classifier on the train partition, score on the test partition.
fn held_out_accuracy(
    data: &[Vec<f64>],
    labels: &[i64],
    test_ratio: f64,
    seed: u64,
    factory: &ClassifierFactory,
) -> f64
{
    let (train_ix, test_ix) = split_indices(labels.len(), test_ratio, seed);

    let x_train = train_ix.iter()
        .map(|&i| data[i].clone())
        .collect::<Vec<_>>();
    let y_train = train_ix.iter()
        .map(|&i| labels[i])
        .collect::<Vec<_>>();
    let x_test = test_ix.iter()
        .map(|&i| data[i].clone())
        .collect::<Vec<_>>();
    let y_test = test_ix.iter()
        .map(|&i| labels[i])
        .collect::<Vec<_>>();

    let mut classifier = factory();
    classifier.fit(&x_train, &y_train);
    let predictions = classifier.predict(&x_test);

    accuracy_score(&y_test, &predictions)
}
