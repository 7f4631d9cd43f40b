//! General eigendecomposition for real square matrices
//!
//! Eigenvalues come from the real Schur form A = Z·T·Zᵀ, read off the
//! quasi-triangular T (1x1 blocks are real, 2x2 blocks hold conjugate
//! pairs). Eigenvectors are the null space of (A − λI), computed in complex
//! arithmetic by Gaussian elimination with complete pivoting.
//!
//! Eigenvector convention: unit Euclidean norm, and the leading component of
//! largest modulus is real and positive. A real eigenvalue of a real matrix
//! always yields a real eigenvector.

use crate::config::ServiceConfig;
use crate::error::MatrixError;
use crate::matrix::Matrix;
use log::debug;
use nalgebra::linalg::Schur;
use nalgebra::{Complex, DMatrix, DVector};
use std::cmp::Ordering;

pub type C64 = Complex<f64>;

/// Decimal places kept by [`dominant_eigenpair`]
pub const DOMINANT_DECIMALS: i32 = 4;

/// Numerical knobs of the eigen solver
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EigenSettings {
    /// Tolerance relative to the largest entry, for grouping equal
    /// eigenvalues and for rank decisions
    pub tolerance: f64,
    /// Schur iteration budget; 0 means unbounded
    pub max_iterations: usize,
}

impl Default for EigenSettings {
    fn default() -> Self {
        Self::from(&ServiceConfig::default())
    }
}

impl From<&ServiceConfig> for EigenSettings {
    fn from(config: &ServiceConfig) -> Self {
        Self {
            tolerance: config.eigen_tolerance,
            max_iterations: config.max_schur_iterations,
        }
    }
}

/// Eigenvalues and the matching eigenvectors, stored as columns
#[derive(Debug, Clone, PartialEq)]
pub struct EigenDecomposition {
    pub values: DVector<C64>,
    pub vectors: DMatrix<C64>,
}

/// A = P·D·P⁻¹
#[derive(Debug, Clone, PartialEq)]
pub struct Diagonalization {
    pub p: DMatrix<C64>,
    pub d: DMatrix<C64>,
    pub p_inverse: DMatrix<C64>,
}

impl Diagonalization {
    /// P·D·P⁻¹, which should reproduce the original matrix
    pub fn reconstruct(&self) -> DMatrix<C64> {
        &self.p * &self.d * &self.p_inverse
    }
}

/// The largest eigenvalue and its eigenvector, rounded
#[derive(Debug, Clone, PartialEq)]
pub struct DominantEigenpair {
    pub value: C64,
    pub vector: DVector<C64>,
}

/// Full eigendecomposition of a square matrix
pub fn eigen_decompose(
    m: &Matrix,
    settings: &EigenSettings,
) -> Result<EigenDecomposition, MatrixError> {
    let a = m.as_dmatrix();
    let n = a.nrows();
    let values = eigenvalues(a, settings)?;
    debug!("Eigenvalues of {}x{} matrix: {:?}", n, n, values.as_slice());

    let a_c: DMatrix<C64> = a.map(|x| C64::new(x, 0.0));
    // Eigenvalues closer than this are treated as one repeated eigenvalue.
    let merge_distance = settings.tolerance * a.amax();
    let mut vectors = DMatrix::<C64>::zeros(n, n);
    let mut assigned = vec![false; n];

    for i in 0..n {
        if assigned[i] {
            continue;
        }
        let lambda = values[i];
        let cluster: Vec<usize> = (i..n)
            .filter(|&j| !assigned[j] && (values[j] - lambda).norm() <= merge_distance)
            .collect();

        let basis = null_space(shift(&a_c, lambda), cluster.len(), settings.tolerance);
        if basis.len() < cluster.len() {
            debug!(
                "Eigenvalue {} has multiplicity {} with {} eigenvectors",
                lambda,
                cluster.len(),
                basis.len()
            );
        }

        for (slot, &j) in cluster.iter().enumerate() {
            let v = if slot < basis.len() {
                basis[slot].clone()
            } else if values[j] != lambda {
                // A nearby but distinct eigenvalue gets its own null space.
                null_space(shift(&a_c, values[j]), 1, settings.tolerance).remove(0)
            } else {
                // A defective eigenvalue repeats its last eigenvector, leaving P singular.
                basis[basis.len() - 1].clone()
            };
            vectors.set_column(j, &v);
            assigned[j] = true;
        }
    }

    Ok(EigenDecomposition { values: DVector::from_vec(values), vectors })
}

/// Diagonalize A = P·D·P⁻¹; fails when the eigenvectors do not span the space
pub fn diagonalize(m: &Matrix, settings: &EigenSettings) -> Result<Diagonalization, MatrixError> {
    let EigenDecomposition { values, vectors } = eigen_decompose(m, settings)?;
    let d = DMatrix::from_diagonal(&values);
    let p_inverse = vectors
        .clone()
        .try_inverse()
        .filter(|inv| inv.iter().all(|z| z.re.is_finite() && z.im.is_finite()))
        .ok_or_else(|| {
            MatrixError::Singular("the eigenvector matrix P is not invertible".to_string())
        })?;
    Ok(Diagonalization { p: vectors, d, p_inverse })
}

/// The eigenvalue that sorts highest, with its eigenvector, rounded to
/// [`DOMINANT_DECIMALS`] places
///
/// Eigenvalues are ordered by real part, then imaginary part; the first
/// maximum wins.
pub fn dominant_eigenpair(
    m: &Matrix,
    settings: &EigenSettings,
) -> Result<DominantEigenpair, MatrixError> {
    let eig = eigen_decompose(m, settings)?;
    let index = argmax(eig.values.as_slice());
    let value = round_complex(eig.values[index], DOMINANT_DECIMALS);
    let vector = eig.vectors.column(index).map(|z| round_complex(z, DOMINANT_DECIMALS));
    Ok(DominantEigenpair { value, vector })
}

/// Lexicographic comparison on (re, im)
pub fn compare_eigenvalues(a: &C64, b: &C64) -> Ordering {
    let by = |x: f64, y: f64| x.partial_cmp(&y).unwrap_or(Ordering::Equal);
    by(a.re, b.re).then(by(a.im, b.im))
}

/// Index of the first maximum under [`compare_eigenvalues`]
pub fn argmax(values: &[C64]) -> usize {
    let mut best = 0;
    for (i, v) in values.iter().enumerate().skip(1) {
        if compare_eigenvalues(v, &values[best]) == Ordering::Greater {
            best = i;
        }
    }
    best
}

/// Round half away from zero to `decimals` places
pub fn round_decimals(x: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    let rounded = (x * factor).round() / factor;
    if rounded.is_finite() {
        rounded
    } else {
        x
    }
}

fn round_complex(z: C64, decimals: i32) -> C64 {
    C64::new(round_decimals(z.re, decimals), round_decimals(z.im, decimals))
}

fn eigenvalues(a: &DMatrix<f64>, settings: &EigenSettings) -> Result<Vec<C64>, MatrixError> {
    if a.nrows() == 1 {
        return Ok(vec![C64::new(a[(0, 0)], 0.0)]);
    }
    let schur = Schur::try_new(a.clone(), f64::EPSILON, settings.max_iterations)
        .ok_or(MatrixError::NoConvergence(settings.max_iterations))?;
    Ok(schur.complex_eigenvalues().iter().copied().collect())
}

/// A − λI
fn shift(a: &DMatrix<C64>, lambda: C64) -> DMatrix<C64> {
    let mut shifted = a.clone();
    for k in 0..a.nrows() {
        shifted[(k, k)] -= lambda;
    }
    shifted
}

/// Basis of the null space of a square matrix, at most `max_dim` vectors and
/// never fewer than one
///
/// Pivots below `tolerance` times the largest entry count as zero. The last
/// column is always left free, so a matrix that is only numerically singular
/// still yields a vector.
fn null_space(mut a: DMatrix<C64>, max_dim: usize, tolerance: f64) -> Vec<DVector<C64>> {
    let n = a.nrows();
    let scale = a.iter().map(|z| z.norm()).fold(0.0, f64::max);
    let threshold = tolerance * scale;
    let mut cols: Vec<usize> = (0..n).collect();
    let mut rank = 0;

    while rank + 1 < n {
        let (mut p, mut q, mut best) = (rank, rank, 0.0);
        for j in rank..n {
            for i in rank..n {
                let modulus = a[(i, j)].norm();
                if modulus > best {
                    best = modulus;
                    p = i;
                    q = j;
                }
            }
        }
        if best <= threshold {
            break;
        }
        a.swap_rows(rank, p);
        a.swap_columns(rank, q);
        cols.swap(rank, q);

        let pivot = a[(rank, rank)];
        for i in (rank + 1)..n {
            let factor = a[(i, rank)] / pivot;
            for j in rank..n {
                let upper = a[(rank, j)];
                a[(i, j)] -= factor * upper;
            }
        }
        rank += 1;
    }

    (rank..n)
        .take(max_dim.max(1))
        .map(|free| {
            let mut x = DVector::<C64>::zeros(n);
            x[free] = C64::new(1.0, 0.0);
            for i in (0..rank).rev() {
                let mut acc = C64::new(0.0, 0.0);
                for j in (i + 1)..n {
                    acc += a[(i, j)] * x[j];
                }
                x[i] = -acc / a[(i, i)];
            }
            let mut v = DVector::<C64>::zeros(n);
            for (pos, &col) in cols.iter().enumerate() {
                v[col] = x[pos];
            }
            normalize_eigenvector(v)
        })
        .collect()
}

/// Unit norm, leading component of largest modulus made real and positive
fn normalize_eigenvector(mut v: DVector<C64>) -> DVector<C64> {
    let norm = v.iter().map(|z| z.norm_sqr()).sum::<f64>().sqrt();
    if norm == 0.0 || !norm.is_finite() {
        return v;
    }
    let largest = v.iter().map(|z| z.norm()).fold(0.0, f64::max);
    let lead = v
        .iter()
        .position(|z| z.norm() >= largest * (1.0 - 1e-12))
        .unwrap_or(0);
    let phase = v[lead].conj().unscale(v[lead].norm());
    for z in v.iter_mut() {
        *z = (*z * phase).unscale(norm);
    }
    v[lead] = C64::new(v[lead].norm(), 0.0);
    v
}
