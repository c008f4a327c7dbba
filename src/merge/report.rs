//! This file defines the row-count diagnostics of a merge run.
//! Inner joins silently drop unmatched rows; the report makes the
//! loss visible without changing the join semantics.

use serde::{Serialize, Deserialize};


/// Row counts of one inner join.
/// `rows_dropped` counts the left-side rows that found no match
/// and were discarded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinStep {
    /// The table joined in.
    pub table: String,

    /// Rows before the join.
    pub rows_before: usize,

    /// Rows after the join.
    pub rows_after: usize,

    /// Rows the join dropped.
    pub rows_dropped: usize,
}


impl JoinStep {
    pub(super) fn new(
        table: &str,
        rows_before: usize,
        rows_after: usize,
    ) -> Self
    {
        Self {
            table: table.to_string(),
            rows_before,
            rows_after,
            rows_dropped: rows_before.saturating_sub(rows_after),
        }
    }
}


/// Row counts of the four cleaned tables, before any join.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRows {
    /// Victims.
    pub usagers: usize,

    /// Vehicles.
    pub vehicules: usize,

    /// Locations.
    pub lieux: usize,

    /// Circumstances.
    pub carcteristiques: usize,
}


/// What one `merge_year_data` run did, row count by row count:
/// the size of every cleaned source table, every join in execution
/// order, and the size of the final merged table.
///
/// Persisted beside the merged table as
/// `merge-report-{year}.json` when persistence is requested.
///
/// # Example
/// ```no_run
/// use accidata::MergePipeline;
///
/// let (merged, report) = MergePipeline::new(2023)
///     .run_with_report()
///     .unwrap();
///
/// assert_eq!(report.merged_rows, merged.height());
/// if report.total_rows_dropped() > 0 {
///     eprintln!("{} victim rows lost to joins", report.total_rows_dropped());
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeReport {
    /// The year the run merged.
    pub year: i64,

    /// Rows of every cleaned table.
    pub table_rows: TableRows,

    /// The three joins, in execution order.
    pub joins: Vec<JoinStep>,

    /// Rows of the final merged table.
    pub merged_rows: usize,
}


impl MergeReport {
    /// Rows lost across every join of the run.
    #[inline]
    pub fn total_rows_dropped(&self) -> usize {
        self.joins.iter()
            .map(|step| step.rows_dropped)
            .sum()
    }
}
