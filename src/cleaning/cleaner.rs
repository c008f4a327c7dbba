//! This file provides the generic cleaning routine.
//! Every table goes through the same sequence:
//! read, drop, transform, rename, narrow.
//! The table-specific knowledge lives in `rules.rs`.

use std::fmt;
use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use log::info;
use polars::prelude::*;

use crate::{Error, Result};
use crate::transform::{
    age_from_birth_year,
    hex_to_decimal,
    lane_count,
    length_to_centimetres,
    time_bucket,
    ContiguousRemap,
};
use super::rules::{
    ColumnRule,
    TableRules,
    Width,
    CARCTERISTIQUES,
    LIEUX,
    USAGERS,
    VEHICULES,
};


/// The four yearly source tables.
///
/// Each variant knows its file stem,
/// so `Table::Lieux.file_name(2023)` is `lieux-2023.csv`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Table {
    /// Victims, one row per person involved in an accident.
    Usagers,

    /// Vehicles, one row per vehicle.
    Vehicules,

    /// Locations, one row per accident site.
    Lieux,

    /// Circumstances, one row per accident.
    Carcteristiques,
}


impl Table {
    /// Returns the cleaning recipe of this table.
    #[inline]
    pub(crate) fn rules(self) -> &'static TableRules {
        match self {
            Self::Usagers => &USAGERS,
            Self::Vehicules => &VEHICULES,
            Self::Lieux => &LIEUX,
            Self::Carcteristiques => &CARCTERISTIQUES,
        }
    }


    /// The source file name of this table for the given year.
    #[inline]
    pub fn file_name(self, year: i64) -> String {
        format!("{}-{year}.csv", self.rules().name)
    }
}


impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.rules().name)
    }
}


/// Load one raw table for the given year from
/// `{data_dir}/{year}/{table}-{year}.csv` and clean it:
/// drop the unused columns, run the per-column conversions,
/// rename, and narrow every kept column to its declared width.
///
/// Fails when the source file is absent, when a column named by the
/// rules is missing (the source schema drifts across years),
/// when a raw value does not match the shape a transform expects,
/// or when a value does not fit the width its column narrows to.
///
/// # Example
/// ```no_run
/// use accidata::{clean_table, Table};
///
/// let lieux = clean_table(Table::Lieux, 2023, "./data").unwrap();
/// println!("{lieux}");
/// ```
pub fn clean_table<P>(table: Table, year: i64, data_dir: P) -> Result<DataFrame>
    where P: AsRef<Path>,
{
    let rules = table.rules();
    let path = data_dir.as_ref()
        .join(year.to_string())
        .join(table.file_name(year));

    let mut df = read_table(&path, rules)?;

    for column in rules.drop {
        ensure_column(&df, rules.name, column)?;
        df = df.drop(column)?;
    }

    for (column, rule) in rules.transforms {
        ensure_column(&df, rules.name, column)?;
        apply_rule(&mut df, column, *rule, year)?;
    }

    for (old, new) in rules.rename {
        ensure_column(&df, rules.name, old)?;
        df.rename(old, new)?;
    }

    let df = narrow(df, rules.wide)?;

    let (n_row, n_column) = df.shape();
    info!("cleaned {}-{year}: {n_row} rows, {n_column} columns", rules.name);

    Ok(df)
}


/// Read one semicolon-separated source file.
/// The columns listed in `rules.read_as_text` are forced to text
/// so the type inference cannot eat leading zeros,
/// hex digits, comma decimals, or error tokens.
fn read_table(path: &Path, rules: &TableRules) -> Result<DataFrame> {
    let file = File::open(path)
        .map_err(|source| Error::Io { path: path.to_path_buf(), source })?;

    let overrides = rules.read_as_text.iter()
        .map(|column| Field::new(column, DataType::Utf8))
        .collect::<Schema>();

    let df = CsvReader::new(file)
        .has_header(true)
        .with_separator(b';')
        .with_dtypes(Some(Arc::new(overrides)))
        .finish()?;

    Ok(df)
}


/// Check that `column` exists before a rule touches it,
/// so a schema drift fails with the table and column name
/// instead of a generic lookup error.
fn ensure_column(df: &DataFrame, table: &str, column: &str) -> Result<()> {
    if df.get_column_names().contains(&column) {
        return Ok(());
    }

    Err(Error::MissingColumn {
        table: table.to_string(),
        column: column.to_string(),
    })
}


/// Replace `column` by its converted form.
fn apply_rule(
    df: &mut DataFrame,
    column: &str,
    rule: ColumnRule,
    year: i64,
) -> Result<()>
{
    let series = df.column(column)?;
    let cleaned = match rule {
        ColumnRule::BirthYearToAge => birth_year_to_age(series, year)?,
        ColumnRule::HexToDecimal => text_rule(series, column, hex_to_decimal)?,
        ColumnRule::LengthToCentimetres => {
            text_rule(series, column, length_to_centimetres)?
        },
        ColumnRule::LaneCount => text_rule(series, column, lane_count)?,
        ColumnRule::TimeBucket => text_rule(series, column, time_bucket)?,
        ColumnRule::Remap => remap_rule(series, column)?,
    };

    df.with_column(cleaned)?;
    Ok(())
}


/// Missing birth years become the age sentinel,
/// every other row becomes `year - birth`.
fn birth_year_to_age(series: &Series, year: i64) -> Result<Series> {
    // The inference may deliver the year as integer or float,
    // depending on the vintage of the source file.
    let years = series.cast(&DataType::Int64)?;
    let ages = years.i64()?
        .into_iter()
        .map(|birth| age_from_birth_year(birth, year))
        .collect::<Vec<_>>();

    Ok(Series::new(series.name(), ages))
}


/// Run a pure text conversion over a column forced to Utf8 at read.
/// A missing value aborts the cleaning;
/// the source files mark unknowns with sentinels, not with holes.
fn text_rule<F>(series: &Series, column: &str, convert: F) -> Result<Series>
    where F: Fn(&str) -> Result<i64>,
{
    let ca = series.utf8()?;
    let count = ca.null_count();
    if count > 0 {
        return Err(Error::MissingValues {
            column: column.to_string(),
            count,
        });
    }

    let values = ca.into_no_null_iter()
        .map(|raw| convert(raw).map_err(|e| e.in_column(column)))
        .collect::<Result<Vec<_>>>()?;

    Ok(Series::new(series.name(), values))
}


/// Replace the raw codes of a categorical column by their
/// per-year contiguous indices.
fn remap_rule(series: &Series, column: &str) -> Result<Series> {
    let ca = series.utf8()?;
    let count = ca.null_count();
    if count > 0 {
        return Err(Error::MissingValues {
            column: column.to_string(),
            count,
        });
    }

    let remap = ContiguousRemap::from_values(ca.into_no_null_iter());
    let values = ca.into_no_null_iter()
        .map(|raw| {
            remap.apply(raw)
                .expect("The remap was built from this very column")
        })
        .collect::<Vec<_>>();

    Ok(Series::new(series.name(), values))
}


/// Cast every column to its final width:
/// Int8 by default, Int16 or Int64 for the declared wide columns.
/// A value outside the target range aborts the cleaning;
/// silent wraparound would corrupt every statistic computed downstream.
fn narrow(mut df: DataFrame, wide: &[(&str, Width)]) -> Result<DataFrame> {
    let columns = df.get_column_names()
        .into_iter()
        .map(String::from)
        .collect::<Vec<_>>();

    for column in columns {
        let width = wide.iter()
            .find(|(name, _)| *name == column)
            .map(|(_, width)| *width);

        let series = df.column(&column)?;
        let narrowed = narrow_series(series, width)?;
        df.with_column(narrowed)?;
    }

    Ok(df)
}


/// Cast one column, checking the value range first.
fn narrow_series(series: &Series, width: Option<Width>) -> Result<Series> {
    // Going through Int64 catches stray floats and
    // turns a NaN into a detectable null.
    let as_i64 = series.cast(&DataType::Int64)?;

    let count = as_i64.null_count();
    if count > 0 {
        return Err(Error::MissingValues {
            column: series.name().to_string(),
            count,
        });
    }

    let (dtype, name, min, max) = match width {
        None => (DataType::Int8, "int8", i8::MIN as i64, i8::MAX as i64),
        Some(Width::I16) => {
            (DataType::Int16, "int16", i16::MIN as i64, i16::MAX as i64)
        },
        Some(Width::I64) => return Ok(as_i64),
    };

    let out_of_range = as_i64.i64()?
        .into_no_null_iter()
        .find(|value| *value < min || *value > max);
    if let Some(value) = out_of_range {
        return Err(Error::NarrowOverflow {
            column: series.name().to_string(),
            value,
            width: name,
        });
    }

    Ok(as_i64.cast(&dtype)?)
}
