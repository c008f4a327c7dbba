//! This file provides a random forest classifier,
//! the default model of the analyzer.
//! Trees are fitted on bootstrap samples over random feature
//! subsets and vote by majority.

use fixedbitset::FixedBitSet;
use rand::prelude::*;
use rayon::prelude::*;

use std::collections::BTreeMap;

use crate::common::constants::DEFAULT_SEED;
use super::decision_tree::{
    majority,
    DecisionTreeBuilder,
    DecisionTree,
    DEFAULT_MAX_DEPTH,
    DEFAULT_MIN_SAMPLES_SPLIT,
};
use super::model_traits::Classifier;


/// The number of trees set as default.
pub const DEFAULT_N_TREES: usize = 100;

/// Per-tree seeds step through the sequence
/// `seed + t * GOLDEN_STEP (mod 2^64)`,
/// so every tree owns an independent generator
/// derived from the forest seed alone.
const GOLDEN_STEP: u64 = 0x9E37_79B9_7F4A_7C15;


/// One fitted tree together with the feature subset it was grown on.
#[derive(Debug, Clone)]
struct BaggedTree {
    tree: DecisionTree,
    features: FixedBitSet,
}


impl BaggedTree {
    /// Project a full-width row onto this tree's feature subset
    /// and predict.
    #[inline]
    fn predict_row(&self, row: &[f64]) -> i64 {
        let projected = self.features.ones()
            .map(|j| row[j])
            .collect::<Vec<_>>();
        self.tree.predict_row(&projected)
    }
}


/// A random forest: seeded bootstrap bagging of [`DecisionTree`]s.
///
/// Every tree trains on a bootstrap resample of the rows and on a
/// random subset of `ceil(sqrt(M))` features, held in a bit mask.
/// Each tree derives its own generator from the forest seed,
/// so fitting is reproducible and the parallel fit produces
/// exactly the trees the sequential order would.
/// Prediction is a majority vote; a tie resolves to the smallest
/// label, so the vote is deterministic as well.
///
/// An unfitted forest predicts the label `0` for every row.
///
/// # Example
/// ```
/// use accidata::model::{Classifier, RandomForest};
///
/// let features = vec![
///     vec![0.0, 0.1], vec![0.2, 0.0], vec![0.1, 0.2],
///     vec![5.0, 5.1], vec![5.2, 5.0], vec![5.1, 5.2],
/// ];
/// let labels = vec![0, 0, 0, 1, 1, 1];
///
/// let mut forest = RandomForest::new()
///     .n_trees(25)
///     .seed(42);
/// forest.fit(&features, &labels);
///
/// assert_eq!(forest.predict_row(&[0.1, 0.1]), 0);
/// assert_eq!(forest.predict_row(&[5.1, 5.1]), 1);
/// ```
#[derive(Debug, Clone)]
pub struct RandomForest {
    n_trees: usize,
    max_depth: usize,
    min_samples_split: usize,
    seed: u64,
    trees: Vec<BaggedTree>,
}


impl RandomForest {
    /// Construct a new instance of `RandomForest`.
    /// By default, the parameters are set as follows;
    /// ```text
    /// n_trees: DEFAULT_N_TREES == 100,
    /// max_depth: DEFAULT_MAX_DEPTH == 30,
    /// min_samples_split: DEFAULT_MIN_SAMPLES_SPLIT == 2,
    /// seed: DEFAULT_SEED == 42,
    /// ```
    #[inline]
    pub fn new() -> Self {
        Self {
            n_trees: DEFAULT_N_TREES,
            max_depth: DEFAULT_MAX_DEPTH,
            min_samples_split: DEFAULT_MIN_SAMPLES_SPLIT,
            seed: DEFAULT_SEED,
            trees: Vec::new(),
        }
    }


    /// Set the number of trees.
    /// Default value is `100`.
    #[inline]
    pub fn n_trees(mut self, n_trees: usize) -> Self {
        assert!(n_trees > 0, "A forest needs at least one tree");
        self.n_trees = n_trees;
        self
    }


    /// Set the maximal depth of every tree.
    /// Default value is `30`.
    #[inline]
    pub fn max_depth(mut self, depth: usize) -> Self {
        assert!(depth > 0, "Trees must have positive depth");
        self.max_depth = depth;
        self
    }


    /// Set the minimal number of samples a tree node needs to split.
    /// Default value is `2`.
    #[inline]
    pub fn min_samples_split(mut self, min_samples: usize) -> Self {
        assert!(min_samples >= 2, "A split needs at least 2 samples");
        self.min_samples_split = min_samples;
        self
    }


    /// Set the seed of the randomness
    /// for bootstrapping and feature subsetting.
    /// Default value is `42`.
    #[inline]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }


    /// The number of fitted trees. Zero before fitting.
    #[inline]
    pub fn n_fitted_trees(&self) -> usize {
        self.trees.len()
    }


    /// Grow one tree from its derived seed.
    fn grow_tree(
        &self,
        tree_seed: u64,
        features: &[Vec<f64>],
        labels: &[i64],
    ) -> BaggedTree
    {
        let n_sample = features.len();
        let n_feature = features[0].len();
        let n_subset = subset_size(n_feature);

        let mut rng = StdRng::seed_from_u64(tree_seed);

        let rows = (0..n_sample)
            .map(|_| rng.gen_range(0..n_sample))
            .collect::<Vec<_>>();

        let mut shuffled = (0..n_feature).collect::<Vec<_>>();
        shuffled.shuffle(&mut rng);
        let mut mask = FixedBitSet::with_capacity(n_feature);
        for &feature in shuffled.iter().take(n_subset) {
            mask.insert(feature);
        }

        // `ones()` iterates ascending,
        // so the projected column order is stable.
        let columns = mask.ones().collect::<Vec<_>>();
        let x = rows.iter()
            .map(|&i| {
                columns.iter()
                    .map(|&j| features[i][j])
                    .collect::<Vec<_>>()
            })
            .collect::<Vec<_>>();
        let y = rows.iter()
            .map(|&i| labels[i])
            .collect::<Vec<_>>();

        let mut tree = DecisionTreeBuilder::new()
            .max_depth(self.max_depth)
            .min_samples_split(self.min_samples_split)
            .build();
        tree.fit(&x, &y);

        BaggedTree { tree, features: mask }
    }
}


impl Default for RandomForest {
    fn default() -> Self {
        Self::new()
    }
}


impl Classifier for RandomForest {
    fn fit(&mut self, features: &[Vec<f64>], labels: &[i64]) {
        if features.is_empty() || labels.is_empty() {
            self.trees.clear();
            return;
        }

        self.trees = (0..self.n_trees as u64)
            .into_par_iter()
            .map(|t| {
                let tree_seed = self.seed
                    .wrapping_add(t.wrapping_mul(GOLDEN_STEP));
                self.grow_tree(tree_seed, features, labels)
            })
            .collect::<Vec<_>>();
    }


    fn predict_row(&self, row: &[f64]) -> i64 {
        let mut votes = BTreeMap::new();
        for tree in &self.trees {
            *votes.entry(tree.predict_row(row)).or_insert(0usize) += 1;
        }
        majority(&votes)
    }


    fn predict(&self, features: &[Vec<f64>]) -> Vec<i64> {
        features.par_iter()
            .map(|row| self.predict_row(row))
            .collect::<Vec<_>>()
    }


    fn name(&self) -> &str {
        "RandomForest"
    }
}


/// Features drawn per tree: `ceil(sqrt(n_feature))`,
/// clamped to the valid range.
#[inline]
fn subset_size(n_feature: usize) -> usize {
    let root = (n_feature as f64).sqrt().ceil() as usize;
    root.clamp(1, n_feature.max(1))
}
