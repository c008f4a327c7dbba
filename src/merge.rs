//! The files in `merge/` define the orchestrator that joins the
//! four cleaned yearly tables into one flat record-per-victim table,
//! and the row-count report of a run.

/// Provides the merge orchestrator.
pub mod pipeline;

/// Provides the row-count diagnostics.
pub mod report;


pub use pipeline::{merge_year_data, MergePipeline, DEFAULT_DATA_DIR};

pub use report::{JoinStep, MergeReport, TableRows};
