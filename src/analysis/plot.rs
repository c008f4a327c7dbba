//! This file renders the two diagnostic figures from series the
//! analyzer computed. Rendering is separate from computation,
//! so the analyzer stays testable without touching a backend;
//! call these with the returned series when a figure is wanted.

use plotters::prelude::*;

use std::fmt::Display;
use std::fs;
use std::path::{Path, PathBuf};

use crate::{Error, Result};

const FIGURE_SIZE: (u32, u32) = (640, 480);


/// Render the cumulative explained-variance profile to
/// `{out_dir}/ComponentVsVariance_{data_name}[_{suffix}].png`
/// and return the written path.
/// The directory is created when absent.
///
/// # Example
/// ```no_run
/// use accidata::analysis::{PcaAnalysisBuilder, save_variance_profile};
///
/// # let (features, labels): (Vec<Vec<f64>>, Vec<i64>) = (vec![], vec![]);
/// let analysis = PcaAnalysisBuilder::new(&features, &labels)
///     .data_name("accidents-2023")
///     .build()
///     .unwrap();
///
/// let profile = analysis.explained_variance_profile();
/// let path = save_variance_profile(
///     &profile, analysis.data_name(), None, "./img",
/// ).unwrap();
/// println!("wrote {}", path.display());
/// ```
pub fn save_variance_profile<P>(
    profile: &[f64],
    data_name: &str,
    suffix: Option<&str>,
    out_dir: P,
) -> Result<PathBuf>
    where P: AsRef<Path>,
{
    if profile.is_empty() {
        return Err(Error::Plot(
            String::from("the variance profile is empty; nothing to draw")
        ));
    }

    let path = figure_path(
        out_dir.as_ref(), "ComponentVsVariance", data_name, suffix,
    )?;

    let render_path = path.clone();
    let root = BitMapBackend::new(&render_path, FIGURE_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(plot_error)?;

    let x_max = profile.len().max(2) as f64;
    let mut chart = ChartBuilder::on(&root)
        .caption(
            "Number of components vs. Explained Variance Ratio",
            ("sans-serif", 22),
        )
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(1f64..x_max, 0f64..1.05f64)
        .map_err(plot_error)?;

    chart.configure_mesh()
        .x_desc("Number of Components")
        .y_desc("Explained Variance Ratio")
        .draw()
        .map_err(plot_error)?;

    let points = profile.iter()
        .enumerate()
        .map(|(i, &ratio)| ((i + 1) as f64, ratio));
    chart.draw_series(LineSeries::new(points, &BLUE))
        .map_err(plot_error)?;

    root.present().map_err(plot_error)?;

    Ok(path)
}


/// Render the accuracy-per-retained-components curve to
/// `{out_dir}/ComponentVsAccuracy_{data_name}[_{suffix}].png`
/// and return the written path.
/// The red horizontal line marks `baseline`, the accuracy of the
/// unreduced data, as the reference the curve is judged against.
/// The directory is created when absent.
pub fn save_accuracy_curve<P>(
    series: &[f64],
    baseline: f64,
    classifier_name: &str,
    data_name: &str,
    suffix: Option<&str>,
    out_dir: P,
) -> Result<PathBuf>
    where P: AsRef<Path>,
{
    if series.is_empty() {
        return Err(Error::Plot(
            String::from("the accuracy series is empty; nothing to draw")
        ));
    }

    let path = figure_path(
        out_dir.as_ref(), "ComponentVsAccuracy", data_name, suffix,
    )?;

    let render_path = path.clone();
    let root = BitMapBackend::new(&render_path, FIGURE_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(plot_error)?;

    let x_max = series.len().max(2) as f64;
    let caption = format!(
        "{classifier_name} accuracy vs. retained components"
    );
    let mut chart = ChartBuilder::on(&root)
        .caption(caption, ("sans-serif", 22))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(1f64..x_max, 0f64..1.05f64)
        .map_err(plot_error)?;

    chart.configure_mesh()
        .x_desc("Leading components retained")
        .y_desc("Accuracy")
        .draw()
        .map_err(plot_error)?;

    let points = series.iter()
        .enumerate()
        .map(|(i, &accuracy)| ((i + 1) as f64, accuracy));
    chart.draw_series(LineSeries::new(points, &BLUE))
        .map_err(plot_error)?
        .label("reduced data")
        .legend(|(x, y)| {
            PathElement::new(vec![(x, y), (x + 20, y)], BLUE)
        });

    chart.draw_series(LineSeries::new(
            [(1f64, baseline), (x_max, baseline)],
            &RED,
        ))
        .map_err(plot_error)?
        .label("original accuracy")
        .legend(|(x, y)| {
            PathElement::new(vec![(x, y), (x + 20, y)], RED)
        });

    chart.configure_series_labels()
        .border_style(BLACK)
        .background_style(WHITE.mix(0.8))
        .draw()
        .map_err(plot_error)?;

    root.present().map_err(plot_error)?;

    Ok(path)
}


/// `{out_dir}/{kind}_{data_name}[_{suffix}].png`,
/// creating `out_dir` when absent.
fn figure_path(
    out_dir: &Path,
    kind: &str,
    data_name: &str,
    suffix: Option<&str>,
) -> Result<PathBuf>
{
    fs::create_dir_all(out_dir)
        .map_err(|source| Error::Io {
            path: out_dir.to_path_buf(),
            source,
        })?;

    let mut name = format!("{kind}_{data_name}");
    if let Some(suffix) = suffix {
        name.push('_');
        name.push_str(suffix);
    }
    name.push_str(".png");

    Ok(out_dir.join(name))
}


#[inline]
fn plot_error<E: Display>(error: E) -> Error {
    Error::Plot(error.to_string())
}
