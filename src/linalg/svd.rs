use alloc::vec::Vec;

use num_traits::Float;
use rand::Rng;
use rand_distr::StandardNormal;
use tracing::{debug, trace, warn};

use crate::dynmatrix::{try_buffer, DynMatrix};
use crate::error::{Error, Result};
use crate::traits::FloatScalar;

/// Settings for the power-iteration SVD.
#[derive(Debug, Clone, Copy)]
pub struct SvdSettings<T> {
    /// Iteration stops once the cosine between successive iterates exceeds
    /// `1 - tolerance`.
    pub tolerance: T,
    /// Iterations per singular triplet after which the current iterate is
    /// accepted.
    pub max_iter: usize,
}

impl Default for SvdSettings<f64> {
    fn default() -> Self {
        Self {
            tolerance: 1e-10,
            max_iter: 10_000,
        }
    }
}

impl Default for SvdSettings<f32> {
    fn default() -> Self {
        Self {
            tolerance: 1e-10,
            max_iter: 10_000,
        }
    }
}

// ── f64 kernels ─────────────────────────────────────────────────────

fn norm(x: &[f64]) -> f64 {
    Float::sqrt(x.iter().map(|v| v * v).sum::<f64>())
}

fn dot(x: &[f64], y: &[f64]) -> f64 {
    x.iter().zip(y).map(|(a, b)| a * b).sum()
}

/// Gram matrix of a row-major `rows × cols` buffer: `AᵀA` when
/// `rows > cols`, otherwise `AAᵀ`. Returns the matrix and its order.
fn gram(a: &[f64], rows: usize, cols: usize) -> Result<(Vec<f64>, usize)> {
    if rows > cols {
        let mut b = try_buffer(cols * cols, 0.0)?;
        for r in 0..rows {
            let row = &a[r * cols..(r + 1) * cols];
            for i in 0..cols {
                let ri = row[i];
                for j in 0..cols {
                    b[i * cols + j] += ri * row[j];
                }
            }
        }
        Ok((b, cols))
    } else {
        let mut b = try_buffer(rows * rows, 0.0)?;
        for i in 0..rows {
            for j in 0..rows {
                b[i * rows + j] = dot(&a[i * cols..(i + 1) * cols], &a[j * cols..(j + 1) * cols]);
            }
        }
        Ok((b, rows))
    }
}

/// Dominant eigenvector of the Gram matrix of `a`, by power iteration.
///
/// The start vector has independent standard normal entries drawn from
/// `rng`. If `‖B·x‖ <= floor` the residual counts as exhausted and the
/// current iterate is returned unchanged. After `max_iter` iterations the
/// current iterate is accepted as well: with clustered singular values it
/// lies in the dominant subspace, and deflation against the original matrix
/// still yields an exact triplet. Returns the unit iterate and the number of
/// iterations used.
///
/// Fails with [`Error::ConvergenceFailure`] only when the iterate stops
/// being finite.
pub(crate) fn power_iteration<R: Rng + ?Sized>(
    a: &[f64],
    rows: usize,
    cols: usize,
    rng: &mut R,
    tolerance: f64,
    floor: f64,
    max_iter: usize,
) -> Result<(Vec<f64>, usize)> {
    let (b, dim) = gram(a, rows, cols)?;

    let mut x: Vec<f64> = (0..dim).map(|_| rng.sample(StandardNormal)).collect();
    let nx = norm(&x);
    if nx == 0.0 {
        x[0] = 1.0;
    } else {
        x.iter_mut().for_each(|v| *v /= nx);
    }

    let mut y = try_buffer(dim, 0.0)?;
    for iter in 1..=max_iter {
        for (i, yi) in y.iter_mut().enumerate() {
            *yi = dot(&b[i * dim..(i + 1) * dim], &x);
        }
        let ny = norm(&y);
        if !ny.is_finite() {
            return Err(Error::ConvergenceFailure { iterations: iter });
        }
        if ny <= floor {
            warn!(iterations = iter, "power iteration hit a vanishing residual");
            return Ok((x, iter));
        }
        y.iter_mut().for_each(|v| *v /= ny);

        let cos = dot(&x, &y);
        core::mem::swap(&mut x, &mut y);
        if Float::abs(cos) > 1.0 - tolerance {
            return Ok((x, iter));
        }
    }

    warn!(iterations = max_iter, "power iteration reached its cap, accepting the iterate");
    Ok((x, max_iter))
}

/// Singular value decomposition by power iteration with deflation.
///
/// Computes `k = min(rows, cols)` singular triplets so that
/// `A ≈ U · diag(S) · V`, where U is `rows × k` with the left singular
/// vectors as columns and V is `k × cols` with the right singular vectors
/// as rows. Triplets are stored in extraction order, which for well
/// separated spectra is descending.
///
/// Each triplet starts from a random vector, so the caller supplies the
/// random number generator; a seeded generator makes the result
/// reproducible. All arithmetic runs in `f64`.
///
/// # Example
///
/// ```
/// use densela::{DynMatrix, SvdDecomposition};
/// use rand::{rngs::StdRng, SeedableRng};
///
/// let a = DynMatrix::from_rows(3, 2, &[3.0_f64, 0.0, 0.0, 2.0, 0.0, 0.0]);
/// let mut rng = StdRng::seed_from_u64(7);
/// let svd = SvdDecomposition::new(&a, &mut rng).unwrap();
///
/// let s = svd.singular_values();
/// assert!((s[0] - 3.0).abs() < 1e-6);
/// assert!((s[1] - 2.0).abs() < 1e-6);
/// ```
#[derive(Debug, Clone)]
pub struct SvdDecomposition<T> {
    u: DynMatrix<T>,
    s: Vec<T>,
    v: DynMatrix<T>,
}

impl<T: FloatScalar> SvdDecomposition<T> {
    /// Decompose `a` with default settings.
    pub fn new<R: Rng + ?Sized>(a: &DynMatrix<T>, rng: &mut R) -> Result<Self>
    where
        SvdSettings<T>: Default,
    {
        Self::with_settings(a, rng, &SvdSettings::default())
    }

    /// Decompose `a` with explicit settings.
    ///
    /// A triplet that has not converged after `settings.max_iter` iterations
    /// keeps its last iterate. Fails with [`Error::ConvergenceFailure`] if
    /// `a` holds non-finite values.
    pub fn with_settings<R: Rng + ?Sized>(
        a: &DynMatrix<T>,
        rng: &mut R,
        settings: &SvdSettings<T>,
    ) -> Result<Self> {
        let (rows, cols) = a.shape();
        let k = rows.min(cols);
        debug!(rows, cols, "SVD by power iteration");

        let orig: Vec<f64> = a.as_slice().iter().map(|x| x.widen()).collect();
        let mut residual = orig.clone();
        let eps = T::eps().widen();
        let tol = settings.tolerance.widen();
        let floor = f64::EPSILON * dot(&orig, &orig);
        let mut found: Vec<Vec<f64>> = Vec::with_capacity(k);

        let mut u64s = try_buffer(rows * k, 0.0_f64)?;
        let mut v64s = try_buffer(k * cols, 0.0_f64)?;
        let mut sigmas = try_buffer(k, 0.0_f64)?;

        for i in 0..k {
            let (mut x, iterations) =
                power_iteration(&residual, rows, cols, rng, tol, floor, settings.max_iter)?;
            orthogonalize(&mut x, &found);
            found.push(x.clone());

            // `x` is the right vector when rows > cols, otherwise the left.
            let (u, v, sigma) = if rows > cols {
                let mut u: Vec<f64> = (0..rows)
                    .map(|r| dot(&orig[r * cols..(r + 1) * cols], &x))
                    .collect();
                let sigma = norm(&u);
                scale_or_zero(&mut u, sigma, eps);
                (u, x, sigma)
            } else {
                let mut v: Vec<f64> = (0..cols)
                    .map(|c| (0..rows).map(|r| orig[r * cols + c] * x[r]).sum::<f64>())
                    .collect();
                let sigma = norm(&v);
                scale_or_zero(&mut v, sigma, eps);
                (x, v, sigma)
            };
            trace!(index = i, sigma, iterations, "singular triplet");

            for r in 0..rows {
                let su = sigma * u[r];
                for c in 0..cols {
                    residual[r * cols + c] -= su * v[c];
                }
                u64s[r * k + i] = u[r];
            }
            v64s[i * cols..(i + 1) * cols].copy_from_slice(&v);
            sigmas[i] = sigma;
        }

        Ok(Self {
            u: DynMatrix::from_vec(rows, k, u64s.into_iter().map(T::narrow).collect()),
            s: sigmas.into_iter().map(T::narrow).collect(),
            v: DynMatrix::from_vec(k, cols, v64s.into_iter().map(T::narrow).collect()),
        })
    }

    /// Singular values, in extraction order.
    #[inline]
    pub fn singular_values(&self) -> &[T] {
        &self.s
    }

    /// Left singular vectors as columns, `rows × k`.
    #[inline]
    pub fn u(&self) -> &DynMatrix<T> {
        &self.u
    }

    /// Right singular vectors as rows, `k × cols`.
    #[inline]
    pub fn v(&self) -> &DynMatrix<T> {
        &self.v
    }

    /// Number of singular values greater than `tol`.
    pub fn rank(&self, tol: T) -> usize {
        self.s.iter().filter(|&&s| s > tol).count()
    }

    /// `U · diag(S) · V`.
    pub fn reconstruct(&self) -> DynMatrix<T> {
        let k = self.s.len();
        let us = DynMatrix::from_fn(self.u.nrows(), k, |r, i| self.u[(r, i)] * self.s[i]);
        &us * &self.v
    }
}

/// Remove the components of `x` along the unit vectors in `basis`, then
/// renormalize.
fn orthogonalize(x: &mut [f64], basis: &[Vec<f64>]) {
    for b in basis {
        let c = dot(x, b);
        x.iter_mut().zip(b).for_each(|(xi, bi)| *xi -= c * bi);
    }
    let n = norm(x);
    if n > 0.0 {
        x.iter_mut().for_each(|v| *v /= n);
    }
}

/// Divide `x` by `sigma`, or zero it when `sigma <= eps`.
fn scale_or_zero(x: &mut [f64], sigma: f64, eps: f64) {
    if sigma > eps {
        x.iter_mut().for_each(|v| *v /= sigma);
    } else {
        x.iter_mut().for_each(|v| *v = 0.0);
    }
}
