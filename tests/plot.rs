use std::fs;
use std::path::PathBuf;

use accidata::analysis::{save_accuracy_curve, save_variance_profile};
use accidata::Error;


fn scratch_dir(name: &str) -> PathBuf {
    std::env::temp_dir()
        .join(format!("accidata-{name}-{}", std::process::id()))
}


#[test]
fn the_variance_figure_lands_under_its_data_name() {
    let dir = scratch_dir("plot-variance");

    let profile = vec![0.62, 0.85, 0.95, 1.0];
    let path = save_variance_profile(&profile, "toy", None, &dir).unwrap();

    assert_eq!(path, dir.join("ComponentVsVariance_toy.png"));
    assert!(fs::metadata(&path).unwrap().len() > 0);
}


#[test]
fn a_suffix_distinguishes_figure_variants() {
    let dir = scratch_dir("plot-suffix");

    let profile = vec![0.7, 1.0];
    let path = save_variance_profile(
        &profile, "accidents-2023", Some("annot"), &dir,
    ).unwrap();

    assert_eq!(
        path,
        dir.join("ComponentVsVariance_accidents-2023_annot.png"),
    );
}


#[test]
fn the_accuracy_figure_draws_curve_and_baseline() {
    let dir = scratch_dir("plot-accuracy");

    let series = vec![0.55, 0.71, 0.80, 0.79];
    let path = save_accuracy_curve(
        &series, 0.82, "RandomForest", "toy", None, &dir,
    ).unwrap();

    assert_eq!(path, dir.join("ComponentVsAccuracy_toy.png"));
    assert!(fs::metadata(&path).unwrap().len() > 0);
}


#[test]
fn an_empty_series_cannot_be_drawn() {
    let dir = scratch_dir("plot-empty");

    let err = save_variance_profile(&[], "toy", None, &dir).unwrap_err();
    assert!(matches!(err, Error::Plot(_)));

    let err = save_accuracy_curve(&[], 0.5, "RandomForest", "toy", None, &dir)
        .unwrap_err();
    assert!(matches!(err, Error::Plot(_)));
}
