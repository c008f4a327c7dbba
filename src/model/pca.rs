//! This file provides the principal component analysis used by the
//! analyzer to re-project a feature matrix onto an orthogonal basis
//! ordered by descending explained variance.

use rayon::prelude::*;
use serde::{Serialize, Deserialize};

use super::model_traits::Transformer;


/// Maximal number of Jacobi sweeps over the covariance matrix.
/// Convergence is quadratic, so this bound is never reached
/// for the matrix sizes this crate works with.
const MAX_SWEEPS: usize = 100;


/// Principal component analysis over a row-major feature matrix.
///
/// Fitting centers every column on its mean, builds the sample
/// covariance matrix, and diagonalizes it with cyclic Jacobi
/// rotations. The components are sorted by descending eigenvalue,
/// so the first output column always carries the largest share of
/// the variance. The whole computation is deterministic;
/// no randomness is involved.
///
/// # Example
/// ```
/// use accidata::model::{Pca, Transformer};
///
/// let features = vec![
///     vec![1.0, 2.0],
///     vec![2.0, 4.0],
///     vec![3.0, 6.0],
/// ];
///
/// let mut pca = Pca::new();
/// let reduced = pca.fit_transform(&features);
///
/// assert_eq!(reduced.len(), 3);
/// // The rows are perfectly collinear,
/// // so the first component explains all the variance.
/// assert!(pca.explained_variance_ratio()[0] > 0.999);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Pca {
    mean: Vec<f64>,
    components: Vec<Vec<f64>>,
    explained_variance: Vec<f64>,
    explained_variance_ratio: Vec<f64>,
}


impl Pca {
    /// Construct an unfitted instance.
    /// Call [`Transformer::fit_transform`] to fit it.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }


    /// The share of the total variance each component explains,
    /// ordered by descending component. Empty before fitting.
    #[inline]
    pub fn explained_variance_ratio(&self) -> &[f64] {
        &self.explained_variance_ratio[..]
    }


    /// The variance each component carries
    /// (the eigenvalues of the covariance matrix), descending.
    #[inline]
    pub fn explained_variance(&self) -> &[f64] {
        &self.explained_variance[..]
    }


    /// The fitted components. `components()[c]` is the unit-length
    /// loading vector of the `c`-th component.
    #[inline]
    pub fn components(&self) -> &[Vec<f64>] {
        &self.components[..]
    }


    /// Project rows onto the fitted components.
    /// The rows must have the same number of columns
    /// as the matrix the instance was fitted on.
    #[inline]
    pub fn transform(&self, features: &[Vec<f64>]) -> Vec<Vec<f64>> {
        features.par_iter()
            .map(|row| {
                let centered = row.iter()
                    .zip(&self.mean)
                    .map(|(x, mu)| x - mu)
                    .collect::<Vec<_>>();
                self.components.iter()
                    .map(|component| dot(&centered, component))
                    .collect::<Vec<_>>()
            })
            .collect::<Vec<_>>()
    }
}


impl Transformer for Pca {
    /// Fit the components over `features` and return the projection
    /// of every row, with the same shape as the input.
    fn fit_transform(&mut self, features: &[Vec<f64>]) -> Vec<Vec<f64>> {
        let n_sample = features.len();
        if n_sample == 0 {
            return Vec::new();
        }
        let n_feature = features[0].len();

        self.mean = (0..n_feature)
            .map(|j| {
                features.iter().map(|row| row[j]).sum::<f64>()
                    / n_sample as f64
            })
            .collect::<Vec<_>>();

        let columns = (0..n_feature)
            .map(|j| {
                features.iter()
                    .map(|row| row[j] - self.mean[j])
                    .collect::<Vec<_>>()
            })
            .collect::<Vec<Vec<_>>>();

        // Sample covariance, normalized by `n - 1`.
        let denominator = n_sample.saturating_sub(1).max(1) as f64;
        let covariance = (0..n_feature)
            .into_par_iter()
            .map(|i| {
                (0..n_feature)
                    .map(|j| dot(&columns[i], &columns[j]) / denominator)
                    .collect::<Vec<_>>()
            })
            .collect::<Vec<_>>();

        let (eigenvalues, eigenvectors) = jacobi_eigen(covariance);

        // Order the components by descending eigenvalue.
        let mut order = (0..n_feature).collect::<Vec<_>>();
        order.sort_by(|&i, &j| {
            eigenvalues[j].partial_cmp(&eigenvalues[i]).unwrap()
        });

        self.explained_variance = order.iter()
            .map(|&i| eigenvalues[i].max(0f64))
            .collect::<Vec<_>>();
        self.components = order.iter()
            .map(|&c| {
                (0..n_feature).map(|k| eigenvectors[k][c])
                    .collect::<Vec<_>>()
            })
            .collect::<Vec<_>>();

        let total = self.explained_variance.iter()
            .sum::<f64>()
            .max(f64::MIN_POSITIVE);
        self.explained_variance_ratio = self.explained_variance.iter()
            .map(|variance| variance / total)
            .collect::<Vec<_>>();

        self.transform(features)
    }
}


#[inline]
fn dot(lhs: &[f64], rhs: &[f64]) -> f64 {
    lhs.iter()
        .zip(rhs)
        .map(|(l, r)| l * r)
        .sum::<f64>()
}


/// Diagonalize a symmetric matrix by cyclic Jacobi rotations.
/// Returns the eigenvalues and the matrix whose columns are the
/// matching eigenvectors, both in unspecified order.
fn jacobi_eigen(mut matrix: Vec<Vec<f64>>) -> (Vec<f64>, Vec<Vec<f64>>) {
    let size = matrix.len();
    let mut basis = (0..size)
        .map(|i| {
            (0..size).map(|j| if i == j { 1f64 } else { 0f64 })
                .collect::<Vec<_>>()
        })
        .collect::<Vec<_>>();

    for _ in 0..MAX_SWEEPS {
        let mut rotated = false;
        for p in 0..size {
            for q in p+1..size {
                let apq = matrix[p][q];
                let scale = (matrix[p][p].abs() + matrix[q][q].abs())
                    .max(f64::MIN_POSITIVE);
                if apq.abs() <= 1e-14 * scale {
                    continue;
                }
                rotated = true;

                let theta = (matrix[q][q] - matrix[p][p]) / (2f64 * apq);
                let sign = if theta >= 0f64 { 1f64 } else { -1f64 };
                let t = sign / (theta.abs() + (theta * theta + 1f64).sqrt());
                let c = 1f64 / (t * t + 1f64).sqrt();
                let s = t * c;

                for k in 0..size {
                    if k == p || k == q {
                        continue;
                    }
                    let akp = matrix[k][p];
                    let akq = matrix[k][q];
                    matrix[k][p] = c * akp - s * akq;
                    matrix[p][k] = matrix[k][p];
                    matrix[k][q] = s * akp + c * akq;
                    matrix[q][k] = matrix[k][q];
                }
                let app = matrix[p][p];
                let aqq = matrix[q][q];
                matrix[p][p] = app - t * apq;
                matrix[q][q] = aqq + t * apq;
                matrix[p][q] = 0f64;
                matrix[q][p] = 0f64;

                for row in basis.iter_mut() {
                    let vp = row[p];
                    let vq = row[q];
                    row[p] = c * vp - s * vq;
                    row[q] = s * vp + c * vq;
                }
            }
        }
        if !rotated {
            break;
        }
    }

    let eigenvalues = (0..size)
        .map(|i| matrix[i][i])
        .collect::<Vec<_>>();

    (eigenvalues, basis)
}
