//! This file bridges a merged table into the analyzer:
//! one column becomes the label vector,
//! every other column becomes a feature.

use polars::prelude::*;

use crate::{Error, Result};


/// Split a table into a row-major `f64` feature matrix and an `i64`
/// label vector taken from the column named `target`.
/// Column order is preserved, so feature `j` is the `j`-th
/// non-target column of the table.
///
/// Fails when `target` is absent, when a column cannot be read as
/// numbers, or when any value is missing.
///
/// # Example
/// ```
/// use polars::prelude::*;
/// use accidata::analysis::dataframe_to_matrix;
///
/// let df = DataFrame::new(vec![
///     Series::new("age", &[30i64, -1, 52]),
///     Series::new("grav", &[1i64, 3, 2]),
/// ]).unwrap();
///
/// let (features, labels) = dataframe_to_matrix(&df, "grav").unwrap();
/// assert_eq!(features, vec![vec![30.0], vec![-1.0], vec![52.0]]);
/// assert_eq!(labels, vec![1, 3, 2]);
/// ```
pub fn dataframe_to_matrix(
    df: &DataFrame,
    target: &str,
) -> Result<(Vec<Vec<f64>>, Vec<i64>)>
{
    if !df.get_column_names().contains(&target) {
        return Err(Error::MissingColumn {
            table: String::from("merged"),
            column: target.to_string(),
        });
    }

    let labels = df.column(target)?.cast(&DataType::Int64)?;
    let labels = labels.i64()?;
    let count = labels.null_count();
    if count > 0 {
        return Err(Error::MissingValues {
            column: target.to_string(),
            count,
        });
    }
    let labels = labels.into_no_null_iter().collect::<Vec<_>>();

    let mut columns = Vec::new();
    for series in df.get_columns() {
        if series.name() == target {
            continue;
        }

        let cast = series.cast(&DataType::Float64)?;
        let ca = cast.f64()?;
        let count = ca.null_count();
        if count > 0 {
            return Err(Error::MissingValues {
                column: series.name().to_string(),
                count,
            });
        }
        columns.push(ca.into_no_null_iter().collect::<Vec<_>>());
    }

    let features = (0..df.height())
        .map(|i| {
            columns.iter()
                .map(|column| column[i])
                .collect::<Vec<_>>()
        })
        .collect::<Vec<_>>();

    Ok((features, labels))
}
