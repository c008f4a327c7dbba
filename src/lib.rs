#![warn(missing_docs)]

//!
//! A crate that cleans and merges the yearly road-accident tables
//! (four related CSV files per year: victims, vehicles, locations,
//! and circumstances) and measures how much classification accuracy
//! survives dimensionality reduction.
//!
//! The crate consists of two independent halves.
//!
//! - Preprocessing
//!     [`merge_year_data`] cleans each table with declarative
//!     per-table rules (drop columns, convert values, rename,
//!     narrow) and joins the four into one record-per-victim table
//!     keyed by the accident id. Every kept column is narrowed to
//!     the smallest integer width declared for it, and narrowing
//!     fails loudly instead of wrapping around.
//!
//! - Analysis
//!     [`PcaAnalysis`](crate::analysis::PcaAnalysis) fits a
//!     principal component analysis over a numeric feature matrix,
//!     measures a baseline accuracy on the unreduced data, and
//!     sweeps held-out accuracy against the number of leading
//!     components retained. Splits are seeded and deterministic,
//!     so every series is reproducible.
//!
//! The two halves meet in
//! [`dataframe_to_matrix`](crate::analysis::dataframe_to_matrix),
//! which turns a merged table into the matrix/label pair the
//! analyzer consumes.

pub mod common;
pub mod transform;
pub mod cleaning;
pub mod merge;
pub mod model;
pub mod analysis;
pub mod prelude;

mod error;


pub use error::{Error, Result};

pub use cleaning::{clean_table, Table};

pub use merge::{merge_year_data, MergePipeline, MergeReport};

pub use analysis::{PcaAnalysis, PcaAnalysisBuilder};
