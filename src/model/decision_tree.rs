//! This file provides a CART-style decision tree classifier.
//! The tree splits on Gini impurity and supports
//! an arbitrary number of classes.

use rayon::prelude::*;
use serde::{Serialize, Deserialize};

use std::collections::BTreeMap;

use super::model_traits::Classifier;


/// The maximal depth set as default.
pub const DEFAULT_MAX_DEPTH: usize = 30;
/// The minimal number of samples a node needs to split, set as default.
pub const DEFAULT_MIN_SAMPLES_SPLIT: usize = 2;


/// A struct that builds `DecisionTree`.
/// `DecisionTreeBuilder` keeps the parameters
/// for constructing `DecisionTree`.
///
/// # Example
/// ```
/// use accidata::model::DecisionTreeBuilder;
///
/// let tree = DecisionTreeBuilder::new()
///     .max_depth(4)
///     .min_samples_split(2)
///     .build();
/// ```
#[derive(Debug, Clone)]
pub struct DecisionTreeBuilder {
    max_depth: usize,
    min_samples_split: usize,
}


impl DecisionTreeBuilder {
    /// Construct a new instance of [`DecisionTreeBuilder`].
    /// By default, the parameters are set as follows;
    /// ```text
    /// max_depth: DEFAULT_MAX_DEPTH == 30,
    /// min_samples_split: DEFAULT_MIN_SAMPLES_SPLIT == 2,
    /// ```
    #[inline]
    pub fn new() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            min_samples_split: DEFAULT_MIN_SAMPLES_SPLIT,
        }
    }


    /// Specify the maximal depth of the tree.
    /// Default maximal depth is `30`.
    #[inline]
    pub fn max_depth(mut self, depth: usize) -> Self {
        assert!(depth > 0, "Tree must have positive depth");
        self.max_depth = depth;
        self
    }


    /// Specify the minimal number of samples a node needs to be split.
    /// Default value is `2`.
    #[inline]
    pub fn min_samples_split(mut self, min_samples: usize) -> Self {
        assert!(min_samples >= 2, "A split needs at least 2 samples");
        self.min_samples_split = min_samples;
        self
    }


    /// Build a `DecisionTree`. This method consumes `self`.
    #[inline]
    pub fn build(self) -> DecisionTree {
        DecisionTree {
            max_depth: self.max_depth,
            min_samples_split: self.min_samples_split,
            root: None,
        }
    }
}


impl Default for DecisionTreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}


/// Enumeration of `BranchNode` and `LeafNode`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
enum Node {
    /// A node that has two children.
    Branch(BranchNode),

    /// A node that has no child.
    Leaf(LeafNode),
}


/// Represents the branch nodes of the decision tree.
/// A row with `row[feature] < threshold` descends left,
/// every other row descends right.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct BranchNode {
    feature: usize,
    threshold: f64,
    left: Box<Node>,
    right: Box<Node>,
}


/// Represents the leaf nodes of the decision tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct LeafNode {
    label: i64,
}


impl Node {
    #[inline]
    fn label(&self, row: &[f64]) -> i64 {
        match self {
            Self::Branch(node) => {
                if row[node.feature] < node.threshold {
                    node.left.label(row)
                } else {
                    node.right.label(row)
                }
            },
            Self::Leaf(node) => node.label,
        }
    }
}


/// The decision tree classifier grown by recursive binary splitting.
/// At every node the tree scans all features for the threshold
/// minimizing the weighted Gini impurity of the two children.
/// Ties between equally good splits always resolve to the
/// lowest feature index, so fitting is deterministic.
///
/// An unfitted tree predicts the label `0` for every row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree {
    max_depth: usize,
    min_samples_split: usize,
    root: Option<Node>,
}


impl DecisionTree {
    fn grow(
        &self,
        features: &[Vec<f64>],
        labels: &[i64],
        indices: Vec<usize>,
        depth: usize,
    ) -> Node
    {
        let counts = count_labels(labels, &indices);
        let n_node = indices.len();

        if depth == 0
            || n_node < self.min_samples_split
            || counts.len() < 2
        {
            return Node::Leaf(LeafNode { label: majority(&counts) });
        }

        let split = best_split(features, labels, &indices);
        let (feature, threshold) = match split {
            Some(rule) => rule,
            None => {
                return Node::Leaf(LeafNode { label: majority(&counts) });
            },
        };

        let mut lindices = Vec::new();
        let mut rindices = Vec::new();
        for i in indices {
            if features[i][feature] < threshold {
                lindices.push(i);
            } else {
                rindices.push(i);
            }
        }

        // The threshold lies between two observed values,
        // so both sides are non-empty; this is a safeguard.
        if lindices.is_empty() || rindices.is_empty() {
            return Node::Leaf(LeafNode { label: majority(&counts) });
        }

        let left = self.grow(features, labels, lindices, depth - 1);
        let right = self.grow(features, labels, rindices, depth - 1);

        Node::Branch(BranchNode {
            feature,
            threshold,
            left: Box::new(left),
            right: Box::new(right),
        })
    }
}


impl Classifier for DecisionTree {
    fn fit(&mut self, features: &[Vec<f64>], labels: &[i64]) {
        if features.is_empty() || labels.is_empty() {
            self.root = None;
            return;
        }

        let indices = (0..features.len()).collect::<Vec<_>>();
        let root = self.grow(features, labels, indices, self.max_depth);
        self.root = Some(root);
    }


    fn predict_row(&self, row: &[f64]) -> i64 {
        self.root.as_ref()
            .map(|root| root.label(row))
            .unwrap_or(0)
    }


    fn name(&self) -> &str {
        "DecisionTree"
    }
}


/// Count how often each label occurs among `indices`.
#[inline]
fn count_labels(labels: &[i64], indices: &[usize]) -> BTreeMap<i64, usize> {
    let mut counts = BTreeMap::new();
    for &i in indices {
        *counts.entry(labels[i]).or_insert(0usize) += 1;
    }
    counts
}


/// The most frequent label.
/// A tie resolves to the smallest label.
#[inline]
pub(super) fn majority(counts: &BTreeMap<i64, usize>) -> i64 {
    let mut best_label = 0i64;
    let mut best_count = 0usize;
    for (&label, &count) in counts {
        if count > best_count {
            best_label = label;
            best_count = count;
        }
    }
    best_label
}


/// Gini impurity `1 - sum((c / n)^2)` of one label histogram.
#[inline]
fn gini(counts: &BTreeMap<i64, usize>, n: f64) -> f64 {
    let sum = counts.values()
        .map(|&count| {
            let p = count as f64 / n;
            p * p
        })
        .sum::<f64>();
    1f64 - sum
}


/// Scan every feature for the split minimizing the weighted Gini
/// impurity of the two children.
/// Candidate thresholds are the midpoints between consecutive
/// distinct values, so both children are guaranteed non-empty.
/// Returns `None` when no feature takes two distinct values.
fn best_split(
    features: &[Vec<f64>],
    labels: &[i64],
    indices: &[usize],
) -> Option<(usize, f64)>
{
    let n_feature = features[0].len();
    let n_node = indices.len() as f64;

    let candidates = (0..n_feature)
        .into_par_iter()
        .map(|feature| {
            let mut pairs = indices.iter()
                .map(|&i| (features[i][feature], labels[i]))
                .collect::<Vec<_>>();
            pairs.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap());

            let mut right = BTreeMap::new();
            for &(_, label) in &pairs {
                *right.entry(label).or_insert(0usize) += 1;
            }
            let mut left: BTreeMap<i64, usize> = BTreeMap::new();

            let mut best: Option<(f64, f64)> = None;
            for k in 1..pairs.len() {
                let (value, label) = pairs[k - 1];
                *left.entry(label).or_insert(0) += 1;
                let depleted = right.get_mut(&label)
                    .map(|count| {
                        *count -= 1;
                        *count == 0
                    })
                    .unwrap_or(false);
                if depleted {
                    right.remove(&label);
                }

                // Only split between distinct values.
                if pairs[k].0 <= value {
                    continue;
                }

                let n_left = k as f64;
                let n_right = n_node - n_left;
                let score = (n_left * gini(&left, n_left)
                    + n_right * gini(&right, n_right))
                    / n_node;

                let threshold = value + (pairs[k].0 - value) / 2f64;
                if best.map_or(true, |(s, _)| score < s) {
                    best = Some((score, threshold));
                }
            }

            best.map(|(score, threshold)| (feature, threshold, score))
        })
        .collect::<Vec<_>>();

    // Keep the first feature among equally scored splits.
    candidates.into_iter()
        .flatten()
        .fold(None, |best: Option<(usize, f64, f64)>, candidate| {
            match best {
                Some((_, _, score)) if score <= candidate.2 => best,
                _ => Some(candidate),
            }
        })
        .map(|(feature, threshold, _)| (feature, threshold))
}
