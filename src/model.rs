//! The files in `model/` define the capability contracts of the
//! analyzer (`Classifier`, `Transformer`) and the concrete models
//! shipped with the crate.

/// Provides the `Classifier` and `Transformer` traits.
pub mod model_traits;

/// Defines principal component analysis.
pub mod pca;

/// Defines the decision tree classifier.
pub mod decision_tree;

/// Defines the random forest classifier.
pub mod random_forest;


pub use model_traits::{Classifier, Transformer};

pub use pca::Pca;

pub use decision_tree::{
    DecisionTree,
    DecisionTreeBuilder,
};

pub use random_forest::RandomForest;
