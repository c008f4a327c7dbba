//! This file defines some functions that check some pre-conditions
//! E.g., Shape of the analyzer input

use std::collections::HashSet;

use crate::{Error, Result};


/// Check whether the feature matrix and label vector form a sample
/// the analyzer can split and fit.
/// Rejects anything a split or a fit would choke on later:
/// fewer than two rows, fewer than two feature columns, ragged rows,
/// a label vector of the wrong length, or a single class.
#[inline]
pub(crate) fn check_analysis_input(
    features: &[Vec<f64>],
    labels: &[i64],
) -> Result<()>
{
    let n_sample = features.len();
    if n_sample < 2 {
        return Err(Error::DegenerateInput(format!(
            "expected at least 2 samples, got {n_sample}"
        )));
    }

    if labels.len() != n_sample {
        return Err(Error::DegenerateInput(format!(
            "{} labels for {n_sample} samples",
            labels.len(),
        )));
    }

    let n_feature = features[0].len();
    if n_feature < 2 {
        return Err(Error::DegenerateInput(format!(
            "expected at least 2 features, got {n_feature}"
        )));
    }

    if let Some(row) = features.iter().find(|row| row.len() != n_feature) {
        return Err(Error::DegenerateInput(format!(
            "ragged feature matrix: expected {n_feature} columns, \
             found a row with {}",
            row.len(),
        )));
    }

    let n_class = labels.iter().collect::<HashSet<_>>().len();
    if n_class < 2 {
        return Err(Error::DegenerateInput(format!(
            "expected at least 2 classes, got {n_class}"
        )));
    }

    Ok(())
}
