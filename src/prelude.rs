//! Exports the pipeline entry points and the analysis tools.
//!
pub use crate::{
    Error,
    Result,
};


pub use crate::cleaning::{
    clean_table,
    Table,
};


pub use crate::merge::{
    // The one-call surface
    merge_year_data,

    // The configurable pipeline and its diagnostics
    MergePipeline,
    MergeReport,
    JoinStep,
    TableRows,
};


pub use crate::transform::{
    // Per-value conversions
    age_from_birth_year,
    hex_to_decimal,
    lane_count,
    length_to_centimetres,
    time_bucket,

    // Per-year categorical remapping
    ContiguousRemap,
};


pub use crate::model::{
    // Capability contracts
    Classifier,
    Transformer,

    // Concrete models
    Pca,
    DecisionTree,
    DecisionTreeBuilder,
    RandomForest,
};


pub use crate::analysis::{
    // The analyzer
    PcaAnalysis,
    PcaAnalysisBuilder,

    // Split and scoring helpers
    accuracy_score,
    split_indices,

    // Table-to-matrix bridge
    dataframe_to_matrix,

    // Figure renderers
    save_accuracy_curve,
    save_variance_profile,
};


pub use crate::common::constants::UNKNOWN;
