//! Flat row-major `f32` boundary.
//!
//! Every algorithm of the crate is reachable here over caller-owned flat
//! buffers with explicit shapes. Input shapes are validated when a
//! [`FlatMatrix`] is built; every output shape is checked against the shape
//! the operation produces before anything is computed or written, so a
//! failed call leaves the output buffer untouched.
//!
//! ```
//! use densela::flat::{self, FlatMatrix, FlatMatrixMut};
//!
//! let a = FlatMatrix::new(&[4.0, 3.0, 6.0, 3.0], 2, 2).unwrap();
//! let mut buf = [0.0_f32; 4];
//! flat::inverse(&a, &mut FlatMatrixMut::new(&mut buf, 2, 2).unwrap()).unwrap();
//! assert!((buf[0] - -0.5).abs() < 1e-6);
//!
//! // A 2x1 output for a 2x2 inverse is rejected before writing.
//! let mut short = [7.0_f32; 2];
//! let mut out = FlatMatrixMut::new(&mut short, 2, 1).unwrap();
//! assert!(flat::inverse(&a, &mut out).is_err());
//! assert_eq!(short, [7.0, 7.0]);
//! ```

use core::ops::Range;

use rand::Rng;

use crate::dynmatrix::{DynMatrix, DynVector, NormKind};
use crate::error::{check_shape, Error, Result};
use crate::linalg::{LuDecomposition, QrDecomposition, SvdDecomposition};

/// Borrowed row-major input matrix.
#[derive(Debug, Clone, Copy)]
pub struct FlatMatrix<'a> {
    data: &'a [f32],
    rows: usize,
    cols: usize,
}

impl<'a> FlatMatrix<'a> {
    /// Wrap `data` as a `rows × cols` matrix.
    ///
    /// Fails with [`Error::InvalidArgument`] on a zero dimension and with
    /// [`Error::DimensionMismatch`] if `data.len() != rows * cols`.
    pub fn new(data: &'a [f32], rows: usize, cols: usize) -> Result<Self> {
        if rows == 0 || cols == 0 {
            return Err(Error::invalid("shape", "matrix dimensions must be at least 1x1"));
        }
        if rows.checked_mul(cols) != Some(data.len()) {
            return Err(Error::mismatch((rows, cols), (1, data.len())));
        }
        Ok(Self { data, rows, cols })
    }

    /// `(rows, cols)`.
    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// The row-major elements, borrowed for the wrapper's lifetime.
    #[inline]
    pub fn as_slice(&self) -> &'a [f32] {
        self.data
    }

    fn to_dyn(self) -> Result<DynMatrix<f32>> {
        DynMatrix::try_from_rows(self.rows, self.cols, self.data)
    }
}

/// Borrowed row-major output matrix.
#[derive(Debug)]
pub struct FlatMatrixMut<'a> {
    data: &'a mut [f32],
    rows: usize,
    cols: usize,
}

impl<'a> FlatMatrixMut<'a> {
    /// Wrap `data` as a writable `rows × cols` matrix. Same validation as
    /// [`FlatMatrix::new`].
    pub fn new(data: &'a mut [f32], rows: usize, cols: usize) -> Result<Self> {
        if rows == 0 || cols == 0 {
            return Err(Error::invalid("shape", "matrix dimensions must be at least 1x1"));
        }
        if rows.checked_mul(cols) != Some(data.len()) {
            return Err(Error::mismatch((rows, cols), (1, data.len())));
        }
        Ok(Self { data, rows, cols })
    }

    /// `(rows, cols)`.
    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    fn require(&self, rows: usize, cols: usize) -> Result<()> {
        check_shape((rows, cols), self.shape())
    }

    fn store(&mut self, m: &DynMatrix<f32>) -> Result<()> {
        m.write_to(self.data, self.rows, self.cols)
    }
}

fn expect_len(expected: usize, got: usize) -> Result<()> {
    check_shape((1, expected), (1, got))
}

fn square(a: &FlatMatrix<'_>) -> Result<usize> {
    if a.rows != a.cols {
        return Err(Error::NonSquareMatrix {
            rows: a.rows,
            cols: a.cols,
        });
    }
    Ok(a.rows)
}

// ── LU ──────────────────────────────────────────────────────────────

/// Unit lower triangular factor of `a` into an `n × n` output.
pub fn lu_lower(a: &FlatMatrix<'_>, out: &mut FlatMatrixMut<'_>) -> Result<()> {
    let n = square(a)?;
    out.require(n, n)?;
    out.store(&LuDecomposition::new(&a.to_dyn()?)?.l())
}

/// Upper triangular factor of `a` into an `n × n` output.
pub fn lu_upper(a: &FlatMatrix<'_>, out: &mut FlatMatrixMut<'_>) -> Result<()> {
    let n = square(a)?;
    out.require(n, n)?;
    out.store(&LuDecomposition::new(&a.to_dyn()?)?.u())
}

/// Solve `Ax = b` by LU into `x` (length n).
pub fn lu_solve_vector(a: &FlatMatrix<'_>, b: &[f32], x: &mut [f32]) -> Result<()> {
    let n = square(a)?;
    expect_len(n, b.len())?;
    expect_len(n, x.len())?;
    let lu = LuDecomposition::new(&a.to_dyn()?)?;
    lu.solve(&DynVector::try_from_slice(b)?)?.write_to(x, n)
}

/// Solve `AX = B` by LU into an `n × nrhs` output.
pub fn lu_solve_matrix(
    a: &FlatMatrix<'_>,
    b: &FlatMatrix<'_>,
    x: &mut FlatMatrixMut<'_>,
) -> Result<()> {
    let n = square(a)?;
    check_shape((n, b.cols), b.shape())?;
    x.require(n, b.cols)?;
    let lu = LuDecomposition::new(&a.to_dyn()?)?;
    x.store(&lu.solve_matrix(&b.to_dyn()?)?)
}

/// Inverse of `a` into an `n × n` output.
pub fn inverse(a: &FlatMatrix<'_>, out: &mut FlatMatrixMut<'_>) -> Result<()> {
    let n = square(a)?;
    out.require(n, n)?;
    out.store(&LuDecomposition::new(&a.to_dyn()?)?.inverse()?)
}

// ── QR ──────────────────────────────────────────────────────────────

/// Orthogonal factor Q into a `rows × min(rows, cols)` output.
pub fn qr_q(a: &FlatMatrix<'_>, out: &mut FlatMatrixMut<'_>) -> Result<()> {
    let n = square(a)?;
    out.require(n, n)?;
    out.store(&QrDecomposition::new(&a.to_dyn()?)?.q())
}

/// Triangular factor R into a `min(rows, cols) × cols` output.
pub fn qr_r(a: &FlatMatrix<'_>, out: &mut FlatMatrixMut<'_>) -> Result<()> {
    let n = square(a)?;
    out.require(n, n)?;
    out.store(&QrDecomposition::new(&a.to_dyn()?)?.r())
}

/// Solve `Ax = b` by QR into `x` (length n).
pub fn qr_solve_vector(a: &FlatMatrix<'_>, b: &[f32], x: &mut [f32]) -> Result<()> {
    let n = square(a)?;
    expect_len(n, b.len())?;
    expect_len(n, x.len())?;
    let qr = QrDecomposition::new(&a.to_dyn()?)?;
    qr.solve(&DynVector::try_from_slice(b)?)?.write_to(x, n)
}

/// Solve `AX = B` by QR into an `n × nrhs` output.
pub fn qr_solve_matrix(
    a: &FlatMatrix<'_>,
    b: &FlatMatrix<'_>,
    x: &mut FlatMatrixMut<'_>,
) -> Result<()> {
    let n = square(a)?;
    check_shape((n, b.cols), b.shape())?;
    x.require(n, b.cols)?;
    let qr = QrDecomposition::new(&a.to_dyn()?)?;
    x.store(&qr.solve_matrix(&b.to_dyn()?)?)
}

// ── SVD ─────────────────────────────────────────────────────────────

/// Singular values into `out` (length `min(rows, cols)`).
pub fn svd_s<R: Rng + ?Sized>(a: &FlatMatrix<'_>, out: &mut [f32], rng: &mut R) -> Result<()> {
    let k = a.rows.min(a.cols);
    expect_len(k, out.len())?;
    let svd = SvdDecomposition::new(&a.to_dyn()?, rng)?;
    out.copy_from_slice(svd.singular_values());
    Ok(())
}

/// Left singular vectors as columns of a `rows × k` output.
pub fn svd_u<R: Rng + ?Sized>(
    a: &FlatMatrix<'_>,
    out: &mut FlatMatrixMut<'_>,
    rng: &mut R,
) -> Result<()> {
    out.require(a.rows, a.rows.min(a.cols))?;
    out.store(SvdDecomposition::new(&a.to_dyn()?, rng)?.u())
}

/// Right singular vectors as rows of a `k × cols` output.
pub fn svd_v<R: Rng + ?Sized>(
    a: &FlatMatrix<'_>,
    out: &mut FlatMatrixMut<'_>,
    rng: &mut R,
) -> Result<()> {
    out.require(a.rows.min(a.cols), a.cols)?;
    out.store(SvdDecomposition::new(&a.to_dyn()?, rng)?.v())
}

// ── FFT ─────────────────────────────────────────────────────────────

fn spectrum_prefix(
    x: &[f32],
    out: &mut [f32],
    n1: usize,
    n2: usize,
    f: fn(&[f32], usize, usize) -> Result<alloc::vec::Vec<f32>>,
) -> Result<()> {
    if out.len() > x.len() {
        return Err(Error::mismatch((1, x.len()), (1, out.len())));
    }
    let bins = f(x, n1, n2)?;
    out.copy_from_slice(&bins[..out.len()]);
    Ok(())
}

/// Magnitude spectrum of `x` (with `x.len() = n1 · n2`). The first
/// `out.len()` bins are written; `out` may not be longer than `x`.
pub fn fft_abs(x: &[f32], out: &mut [f32], n1: usize, n2: usize) -> Result<()> {
    spectrum_prefix(x, out, n1, n2, crate::fft::fft_abs)
}

/// Phase spectrum of `x`, written like [`fft_abs`].
pub fn fft_phase(x: &[f32], out: &mut [f32], n1: usize, n2: usize) -> Result<()> {
    spectrum_prefix(x, out, n1, n2, crate::fft::fft_phase)
}

/// Swap the two halves of `buf[..n]` in place.
pub fn fftshift(buf: &mut [f32], n: usize) -> Result<()> {
    crate::fft::fftshift(buf, n)
}

// ── Norms ───────────────────────────────────────────────────────────

/// Vector norm selected by `"inf"` or a positive integer `p`.
///
/// ```
/// use densela::flat;
/// assert_eq!(flat::vector_norm("1", &[1.0, -2.0]).unwrap(), 3.0);
/// assert!(flat::vector_norm("0", &[1.0]).is_err());
/// assert!(flat::vector_norm("F", &[1.0]).is_err());
/// ```
pub fn vector_norm(selector: &str, x: &[f32]) -> Result<f32> {
    let kind: NormKind = selector.parse()?;
    DynVector::try_from_slice(x)?.norm_with(kind)
}

/// Matrix norm selected by `"inf"`, a positive integer `p`, or `"F"`.
pub fn matrix_norm(selector: &str, a: &FlatMatrix<'_>) -> Result<f32> {
    let kind: NormKind = selector.parse()?;
    Ok(a.to_dyn()?.norm_with(kind))
}

// ── Dense operations ────────────────────────────────────────────────

/// `out = a · b`.
pub fn matmul(a: &FlatMatrix<'_>, b: &FlatMatrix<'_>, out: &mut FlatMatrixMut<'_>) -> Result<()> {
    check_shape((a.cols, b.cols), b.shape())?;
    out.require(a.rows, b.cols)?;
    out.store(&a.to_dyn()?.try_matmul(&b.to_dyn()?)?)
}

/// `out = a · x`.
pub fn matvec(a: &FlatMatrix<'_>, x: &[f32], out: &mut [f32]) -> Result<()> {
    expect_len(a.cols, x.len())?;
    expect_len(a.rows, out.len())?;
    a.to_dyn()?
        .try_matvec(&DynVector::try_from_slice(x)?)?
        .write_to(out, a.rows)
}

/// `out = a + b`.
pub fn add(a: &FlatMatrix<'_>, b: &FlatMatrix<'_>, out: &mut FlatMatrixMut<'_>) -> Result<()> {
    check_shape(a.shape(), b.shape())?;
    out.require(a.rows, a.cols)?;
    out.store(&a.to_dyn()?.try_add(&b.to_dyn()?)?)
}

/// `out = aᵀ`.
pub fn transpose(a: &FlatMatrix<'_>, out: &mut FlatMatrixMut<'_>) -> Result<()> {
    out.require(a.cols, a.rows)?;
    out.store(&a.to_dyn()?.transpose())
}

/// `xᵀ y`.
pub fn dot(x: &[f32], y: &[f32]) -> Result<f32> {
    DynVector::try_from_slice(x)?.try_dot(&DynVector::try_from_slice(y)?)
}

/// Copy `x[range]` into `out`.
pub fn slice_vector(x: &[f32], range: Range<usize>, out: &mut [f32]) -> Result<()> {
    let v = DynVector::try_from_slice(x)?.slice(range)?;
    v.write_to(out, v.len())
}

/// Copy the block `rows × cols` of `a` into `out`.
pub fn slice_matrix(
    a: &FlatMatrix<'_>,
    rows: Range<usize>,
    cols: Range<usize>,
    out: &mut FlatMatrixMut<'_>,
) -> Result<()> {
    let m = a.to_dyn()?.slice(rows, cols)?;
    out.store(&m)
}

// ── Element-wise math ───────────────────────────────────────────────

macro_rules! flat_map {
    ($($(#[$doc:meta])* $name:ident => $method:ident;)*) => {
        $(
            $(#[$doc])*
            pub fn $name(x: &[f32], out: &mut [f32]) -> Result<()> {
                expect_len(x.len(), out.len())?;
                let v = DynVector::try_from_slice(x)?.$method();
                v.write_to(out, x.len())
            }
        )*
    };
}

flat_map! {
    /// Element-wise absolute value.
    map_abs => abs;
    /// Element-wise sine.
    map_sin => sin;
    /// Element-wise cosine.
    map_cos => cos;
    /// Element-wise tangent.
    map_tan => tan;
    /// Element-wise arcsine.
    map_asin => asin;
    /// Element-wise arccosine.
    map_acos => acos;
    /// Element-wise arctangent.
    map_atan => atan;
    /// Element-wise `e^x`.
    map_exp => exp;
    /// Element-wise natural logarithm.
    map_ln => ln;
    /// Element-wise square root.
    map_sqrt => sqrt;
}

/// Element-wise `x^p`.
pub fn map_powf(x: &[f32], p: f32, out: &mut [f32]) -> Result<()> {
    expect_len(x.len(), out.len())?;
    DynVector::try_from_slice(x)?.powf(p).write_to(out, x.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn flat_matrix_validates_length() {
        assert_eq!(
            FlatMatrix::new(&[1.0, 2.0, 3.0], 2, 2).unwrap_err(),
            Error::DimensionMismatch { expected: (2, 2), got: (1, 3) }
        );
        assert!(matches!(
            FlatMatrix::new(&[], 0, 2),
            Err(Error::InvalidArgument { arg: "shape", .. })
        ));
        let mut buf = [0.0_f32; 5];
        assert!(FlatMatrixMut::new(&mut buf, 2, 2).is_err());
    }

    #[test]
    fn lu_rejects_non_square_and_wrong_output() {
        let a = FlatMatrix::new(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0], 2, 3).unwrap();
        let mut buf = [0.0_f32; 4];
        let mut out = FlatMatrixMut::new(&mut buf, 2, 2).unwrap();
        assert_eq!(
            lu_lower(&a, &mut out).unwrap_err(),
            Error::NonSquareMatrix { rows: 2, cols: 3 }
        );

        let sq = FlatMatrix::new(&[2.0, 1.0, 1.0, 3.0], 2, 2).unwrap();
        let mut wrong = [9.0_f32; 4];
        let mut out = FlatMatrixMut::new(&mut wrong, 4, 1).unwrap();
        assert_eq!(
            lu_upper(&sq, &mut out).unwrap_err(),
            Error::DimensionMismatch { expected: (2, 2), got: (4, 1) }
        );
        assert_eq!(wrong, [9.0; 4]);
    }

    #[test]
    fn lu_and_qr_vector_solves() {
        let a = FlatMatrix::new(&[2.0, 1.0, -1.0, -3.0, -1.0, 2.0, -2.0, 1.0, 2.0], 3, 3).unwrap();
        let b = [8.0, -11.0, -3.0];
        for solve in [lu_solve_vector, qr_solve_vector] {
            let mut x = [0.0_f32; 3];
            solve(&a, &b, &mut x).unwrap();
            for (xi, e) in x.iter().zip([2.0, 3.0, -1.0]) {
                assert!((xi - e).abs() < 1e-4, "{:?}", x);
            }
            let mut short = [0.0_f32; 2];
            assert!(solve(&a, &b, &mut short).is_err());
        }
    }

    #[test]
    fn svd_outputs_are_shape_checked() {
        let a = FlatMatrix::new(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0], 3, 2).unwrap();
        let mut rng = StdRng::seed_from_u64(11);
        let mut s = [0.0_f32; 3];
        assert!(svd_s(&a, &mut s, &mut rng).is_err());
        let mut s = [0.0_f32; 2];
        svd_s(&a, &mut s, &mut rng).unwrap();
        assert!(s[0] > s[1] && s[1] > 0.0);

        let mut ubuf = [0.0_f32; 6];
        svd_u(&a, &mut FlatMatrixMut::new(&mut ubuf, 3, 2).unwrap(), &mut rng).unwrap();
        let mut vbuf = [0.0_f32; 4];
        assert!(svd_v(&a, &mut FlatMatrixMut::new(&mut vbuf, 4, 1).unwrap(), &mut rng).is_err());
    }

    #[test]
    fn svd_of_clustered_spectrum() {
        let data = [1.0_f32, 0.0, 0.0, 0.99995, 0.0, 0.0];
        let a = FlatMatrix::new(&data, 3, 2).unwrap();
        for seed in 0..10 {
            // Same seed for every call so the three outputs belong together.
            let mut s = [0.0_f32; 2];
            let mut ubuf = [0.0_f32; 6];
            let mut vbuf = [0.0_f32; 4];
            svd_s(&a, &mut s, &mut StdRng::seed_from_u64(seed)).unwrap();
            let mut u = FlatMatrixMut::new(&mut ubuf, 3, 2).unwrap();
            svd_u(&a, &mut u, &mut StdRng::seed_from_u64(seed)).unwrap();
            let mut v = FlatMatrixMut::new(&mut vbuf, 2, 2).unwrap();
            svd_v(&a, &mut v, &mut StdRng::seed_from_u64(seed)).unwrap();

            for i in 0..2 {
                let un: f32 = (0..3).map(|r| ubuf[r * 2 + i].powi(2)).sum();
                let vn: f32 = vbuf[i * 2..i * 2 + 2].iter().map(|x| x * x).sum();
                assert!((un.sqrt() - 1.0).abs() < 1e-5, "seed {}: |u{}| = {}", seed, i, un.sqrt());
                assert!((vn.sqrt() - 1.0).abs() < 1e-5, "seed {}: |v{}| = {}", seed, i, vn.sqrt());
            }
            for r in 0..3 {
                for c in 0..2 {
                    let rec: f32 = (0..2).map(|i| ubuf[r * 2 + i] * s[i] * vbuf[i * 2 + c]).sum();
                    assert!((rec - data[r * 2 + c]).abs() < 1e-5, "seed {}: ({}, {})", seed, r, c);
                }
            }
        }
    }

    #[test]
    fn fft_prefix_output() {
        let x = [1.0_f32, 1.0, 1.0, 1.0];
        let mut out = [0.0_f32; 2];
        fft_abs(&x, &mut out, 2, 2).unwrap();
        assert!((out[0] - 4.0).abs() < 1e-6 && out[1].abs() < 1e-6);

        let mut long = [0.0_f32; 5];
        assert!(fft_abs(&x, &mut long, 2, 2).is_err());
        assert!(fft_phase(&x, &mut out, 3, 2).is_err());
    }

    #[test]
    fn dense_helpers() {
        let a = FlatMatrix::new(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0], 2, 3).unwrap();
        let mut t = [0.0_f32; 6];
        transpose(&a, &mut FlatMatrixMut::new(&mut t, 3, 2).unwrap()).unwrap();
        assert_eq!(t, [1.0, 4.0, 2.0, 5.0, 3.0, 6.0]);

        let at = FlatMatrix::new(&t, 3, 2).unwrap();
        let mut c = [0.0_f32; 4];
        matmul(&a, &at, &mut FlatMatrixMut::new(&mut c, 2, 2).unwrap()).unwrap();
        assert_eq!(c, [14.0, 32.0, 32.0, 77.0]);

        let mut y = [0.0_f32; 2];
        matvec(&a, &[1.0, 0.0, 1.0], &mut y).unwrap();
        assert_eq!(y, [4.0, 10.0]);

        assert_eq!(dot(&[1.0, 2.0], &[3.0, 4.0]).unwrap(), 11.0);
        assert!(dot(&[1.0], &[1.0, 2.0]).is_err());

        let mut sum = [0.0_f32; 6];
        add(&a, &a, &mut FlatMatrixMut::new(&mut sum, 2, 3).unwrap()).unwrap();
        assert_eq!(sum[5], 12.0);
    }

    #[test]
    fn norms_and_slices() {
        let a = FlatMatrix::new(&[3.0, -4.0, 0.0, 0.0], 2, 2).unwrap();
        assert_eq!(matrix_norm("F", &a).unwrap(), 5.0);
        assert_eq!(matrix_norm("inf", &a).unwrap(), 4.0);
        assert!(matrix_norm("0", &a).is_err());

        let mut block = [0.0_f32; 2];
        slice_matrix(&a, 0..1, 0..2, &mut FlatMatrixMut::new(&mut block, 1, 2).unwrap()).unwrap();
        assert_eq!(block, [3.0, -4.0]);

        let mut part = [0.0_f32; 2];
        slice_vector(&[1.0, 2.0, 3.0], 1..3, &mut part).unwrap();
        assert_eq!(part, [2.0, 3.0]);
        assert!(slice_vector(&[1.0, 2.0, 3.0], 1..3, &mut [0.0; 3]).is_err());
    }

    #[test]
    fn elementwise_wrappers() {
        let mut out = [0.0_f32; 3];
        map_sqrt(&[1.0, 4.0, 9.0], &mut out).unwrap();
        assert_eq!(out, [1.0, 2.0, 3.0]);
        map_powf(&[1.0, 2.0, 3.0], 2.0, &mut out).unwrap();
        assert_eq!(out, [1.0, 4.0, 9.0]);
        assert!(map_abs(&[1.0, 2.0], &mut out).is_err());
    }
}
