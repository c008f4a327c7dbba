//! The files in `analysis/` define the dimensionality/accuracy
//! analyzer, its deterministic train/test split, the table-to-matrix
//! bridge, and the figure renderers.

/// Provides the analyzer.
pub mod pca_analysis;

/// Provides the deterministic split and the accuracy measure.
pub mod split;

/// Provides the table-to-matrix bridge.
pub mod matrix;

/// Provides the figure renderers.
pub mod plot;


pub use pca_analysis::{PcaAnalysis, PcaAnalysisBuilder};

pub use split::{accuracy_score, split_indices};

pub use matrix::dataframe_to_matrix;

pub use plot::{save_accuracy_curve, save_variance_profile};
