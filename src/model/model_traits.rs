//! This file defines the two capability contracts
//! the analyzer consumes its models through.
//! Any concrete type satisfying a contract is interchangeable.


/// A trait that defines the behavior of a classifier.
/// You only need to implement the `fit`, `predict_row`,
/// and `name` methods.
pub trait Classifier {
    /// Fit the classifier to the given feature rows and labels.
    /// `features[i]` is the feature row of the `i`-th sample and
    /// `labels[i]` is its class.
    fn fit(&mut self, features: &[Vec<f64>], labels: &[i64]);


    /// Predicts the label of a single feature row.
    fn predict_row(&self, row: &[f64]) -> i64;


    /// Predicts the labels of every row of `features`.
    fn predict(&self, features: &[Vec<f64>]) -> Vec<i64> {
        features.iter()
            .map(|row| self.predict_row(row))
            .collect::<Vec<_>>()
    }


    /// A short human-readable name of the classifier,
    /// used in figure captions.
    fn name(&self) -> &str;
}


/// A trait that defines the behavior of a feature-space transformer.
/// You only need to implement the `fit_transform` method.
pub trait Transformer {
    /// Fit the transformer over the full matrix `features`
    /// and return the transformed matrix.
    /// The output has one row per input row.
    fn fit_transform(&mut self, features: &[Vec<f64>]) -> Vec<Vec<f64>>;
}
