//! This file provides the merge orchestrator:
//! it cleans the four yearly tables and joins them into one flat
//! record-per-victim table.

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use log::{info, warn};
use polars::prelude::*;

use crate::{Error, Result};
use crate::cleaning::{clean_table, Table};
use super::report::{JoinStep, MergeReport, TableRows};


/// The directory the yearly source files live under, as default.
pub const DEFAULT_DATA_DIR: &str = "./data";


/// Cleans and merges the four tables of one year.
///
/// Victims join vehicles on the vehicle id, which is dropped once
/// spent; the result joins locations and circumstances on the
/// accident id, which stays as the primary key of the merged table.
/// All three joins are inner, so rows without a match are dropped;
/// the pipeline logs every loss and reports the counts.
///
/// A run recomputes everything from the source files, so two runs
/// over an unchanged snapshot return row-for-row identical tables.
///
/// # Example
/// ```no_run
/// use accidata::MergePipeline;
///
/// let merged = MergePipeline::new(2023)
///     .data_dir("/srv/accidents")
///     .persist(true)
///     .run()
///     .unwrap();
/// println!("{merged}");
/// ```
#[derive(Debug, Clone)]
pub struct MergePipeline {
    year: i64,
    data_dir: PathBuf,
    persist: bool,
}


impl MergePipeline {
    /// Construct a new instance of `MergePipeline` for one year.
    /// By default, the parameters are set as follows;
    /// ```text
    /// data_dir: "./data",
    /// persist: false,
    /// ```
    #[inline]
    pub fn new(year: i64) -> Self {
        Self {
            year,
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            persist: false,
        }
    }


    /// Set the directory holding the year-scoped source directories.
    /// Default value is `./data`.
    #[inline]
    pub fn data_dir<P: AsRef<Path>>(mut self, dir: P) -> Self {
        self.data_dir = dir.as_ref().to_path_buf();
        self
    }


    /// Persist the merged table and its report beside the source
    /// files after a successful run.
    /// Default value is `false`.
    #[inline]
    pub fn persist(mut self, persist: bool) -> Self {
        self.persist = persist;
        self
    }


    /// Run the pipeline and return the merged table.
    pub fn run(&self) -> Result<DataFrame> {
        self.run_with_report().map(|(merged, _)| merged)
    }


    /// Run the pipeline and return the merged table together with
    /// the row-count report of the run.
    pub fn run_with_report(&self) -> Result<(DataFrame, MergeReport)> {
        let usagers =
            clean_table(Table::Usagers, self.year, &self.data_dir)?;
        let vehicules =
            clean_table(Table::Vehicules, self.year, &self.data_dir)?;
        let lieux =
            clean_table(Table::Lieux, self.year, &self.data_dir)?;
        let carcteristiques =
            clean_table(Table::Carcteristiques, self.year, &self.data_dir)?;

        let table_rows = TableRows {
            usagers: usagers.height(),
            vehicules: vehicules.height(),
            lieux: lieux.height(),
            carcteristiques: carcteristiques.height(),
        };
        let mut joins = Vec::with_capacity(3);

        let merged = usagers.inner_join(
            &vehicules, ["id_vehicule"], ["id_vehicule"],
        )?;
        joins.push(log_join(JoinStep::new(
            "vehicules", table_rows.usagers, merged.height(),
        )));

        // The vehicle id only connects victims to vehicles;
        // spent after the first join.
        let merged = merged.drop("id_vehicule")?;

        let rows_before = merged.height();
        let merged = merged.inner_join(&lieux, ["Num_Acc"], ["Num_Acc"])?;
        joins.push(log_join(JoinStep::new(
            "lieux", rows_before, merged.height(),
        )));

        let rows_before = merged.height();
        let mut merged = merged.inner_join(
            &carcteristiques, ["Num_Acc"], ["Num_Acc"],
        )?;
        joins.push(log_join(JoinStep::new(
            "carcteristiques", rows_before, merged.height(),
        )));

        let report = MergeReport {
            year: self.year,
            table_rows,
            joins,
            merged_rows: merged.height(),
        };

        if self.persist {
            self.persist_artifacts(&mut merged, &report)?;
        }

        Ok((merged, report))
    }


    /// Write the merged table as an Arrow IPC snapshot and the
    /// report as JSON, both into the year directory.
    /// The snapshot is an opaque cache, not a public wire format.
    fn persist_artifacts(
        &self,
        merged: &mut DataFrame,
        report: &MergeReport,
    ) -> Result<()>
    {
        let year_dir = self.data_dir.join(self.year.to_string());

        let table_path =
            year_dir.join(format!("merged-data-{}.ipc", self.year));
        let file = File::create(&table_path)
            .map_err(|source| Error::Io {
                path: table_path.clone(),
                source,
            })?;
        IpcWriter::new(file).finish(merged)?;

        let report_path =
            year_dir.join(format!("merge-report-{}.json", self.year));
        let encoded = serde_json::to_string_pretty(report)?;
        fs::write(&report_path, encoded)
            .map_err(|source| Error::Io {
                path: report_path.clone(),
                source,
            })?;

        info!(
            "persisted {} and {}",
            table_path.display(),
            report_path.display(),
        );
        Ok(())
    }
}


/// Clean and merge the four tables of `year` from the default data
/// directory. With `persist`, the merged table and its report are
/// written back beside the source files.
///
/// This is the plain-function surface over [`MergePipeline`];
/// use the pipeline itself to point at another directory or to
/// inspect the row-count report.
///
/// # Example
/// ```no_run
/// use accidata::merge_year_data;
///
/// let merged = merge_year_data(2023, false).unwrap();
/// assert!(merged.height() > 0);
/// ```
#[inline]
pub fn merge_year_data(year: i64, persist: bool) -> Result<DataFrame> {
    MergePipeline::new(year)
        .persist(persist)
        .run()
}


/// Log one join, warning when it dropped rows.
fn log_join(step: JoinStep) -> JoinStep {
    if step.rows_dropped > 0 {
        warn!(
            "inner join with {}: dropped {} of {} rows without a match",
            step.table, step.rows_dropped, step.rows_before,
        );
    }
    info!("joined {}: {} rows", step.table, step.rows_after);
    step
}
