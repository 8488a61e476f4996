use alloc::vec::Vec;

use num_traits::Float;
use tracing::{debug, warn};

use crate::dynmatrix::{try_buffer, DynMatrix, DynVector};
use crate::error::{Error, Result};
use crate::traits::{FloatScalar, MatrixMut, MatrixRef};

/// Householder QR decomposition, in place.
///
/// On return, `a` holds the packed factorization:
/// - Strict upper triangle: R (its diagonal lives in `r_diag`)
/// - Lower triangle including the diagonal: the Householder vectors, with
///   `v_k[k] = 1 + a[k][k] / ‖x‖`
///
/// Column norms are accumulated in `f64` by repeated hypotenuse steps. A
/// column whose norm is below epsilon is left untouched and gets
/// `r_diag[k] = 0`.
pub fn qr_in_place<T: FloatScalar>(a: &mut impl MatrixMut<T>, r_diag: &mut [T]) {
    let m = a.nrows();
    let n = a.ncols();
    let p = m.min(n);
    assert_eq!(r_diag.len(), p, "r_diag length must equal min(M, N)");

    let eps = T::eps().widen();
    for k in 0..p {
        let mut nrm = 0.0_f64;
        for i in k..m {
            nrm = Float::hypot(nrm, a.get(i, k).widen());
        }

        if nrm < eps {
            r_diag[k] = T::zero();
            continue;
        }

        // Sign follows the diagonal so that v_k[k] >= 1.
        if *a.get(k, k) < T::zero() {
            nrm = -nrm;
        }
        let nrm_t = T::narrow(nrm);
        for i in k..m {
            let v = *a.get(i, k) / nrm_t;
            *a.get_mut(i, k) = v;
        }
        let vkk = *a.get(k, k) + T::one();
        *a.get_mut(k, k) = vkk;

        for j in (k + 1)..n {
            let mut s = T::zero();
            for i in k..m {
                s = s + *a.get(i, k) * *a.get(i, j);
            }
            s = -s / vkk;
            for i in k..m {
                let v = *a.get(i, j) + s * *a.get(i, k);
                *a.get_mut(i, j) = v;
            }
        }

        r_diag[k] = -nrm_t;
    }
}

/// QR decomposition of a square matrix.
///
/// Stores the packed Householder vectors, the strict upper triangle of R
/// and R's diagonal.
///
/// # Example
///
/// ```
/// use densela::{DynMatrix, QrDecomposition};
///
/// let a = DynMatrix::from_rows(3, 3, &[
///     12.0_f64, -51.0, 4.0,
///     6.0, 167.0, -68.0,
///     -4.0, 24.0, -41.0,
/// ]);
/// let qr = QrDecomposition::new(&a).unwrap();
/// let (q, r) = (qr.q(), qr.r());
///
/// // Q^T * Q ≈ I, R upper triangular
/// let qtq = &q.transpose() * &q;
/// assert!((qtq[(0, 0)] - 1.0).abs() < 1e-10);
/// assert!(qtq[(0, 1)].abs() < 1e-10);
/// assert_eq!(r[(2, 0)], 0.0);
/// ```
#[derive(Debug, Clone)]
pub struct QrDecomposition<T> {
    qr: DynMatrix<T>,
    r_diag: Vec<T>,
}

impl<T: FloatScalar> QrDecomposition<T> {
    /// Decompose `a`. Fails with [`Error::NonSquareMatrix`] when `a` is not
    /// square; rank deficiency is reported by
    /// [`is_full_rank`](Self::is_full_rank).
    pub fn new(a: &DynMatrix<T>) -> Result<Self> {
        if !a.is_square() {
            return Err(Error::NonSquareMatrix {
                rows: a.nrows(),
                cols: a.ncols(),
            });
        }
        debug!(n = a.nrows(), "QR decomposition");
        let mut qr = a.clone();
        let mut r_diag = try_buffer(a.nrows(), T::zero())?;
        qr_in_place(&mut qr, &mut r_diag);
        let out = Self { qr, r_diag };
        if !out.is_full_rank() {
            warn!(n = a.nrows(), "QR decomposition is rank deficient");
        }
        Ok(out)
    }

    fn p(&self) -> usize {
        self.r_diag.len()
    }

    /// `false` if any diagonal entry of R is exactly zero.
    pub fn is_full_rank(&self) -> bool {
        self.r_diag.iter().all(|&d| d != T::zero())
    }

    /// Diagonal of R.
    #[inline]
    pub fn r_diag(&self) -> &[T] {
        &self.r_diag
    }

    /// Orthogonal factor Q, `rows × min(rows, cols)`.
    ///
    /// Built by accumulating the reflections backwards, from the last column
    /// to the first, onto an identity seed.
    pub fn q(&self) -> DynMatrix<T> {
        let m = self.qr.nrows();
        let p = self.p();
        let mut q = DynMatrix::zeros(m, p, T::zero());
        for k in (0..p).rev() {
            q[(k, k)] = T::one();
            if self.r_diag[k] == T::zero() {
                continue;
            }
            let vkk = self.qr[(k, k)];
            for j in k..p {
                let mut s = T::zero();
                for i in k..m {
                    s = s + self.qr[(i, k)] * q[(i, j)];
                }
                s = -s / vkk;
                for i in k..m {
                    q[(i, j)] = q[(i, j)] + s * self.qr[(i, k)];
                }
            }
        }
        q
    }

    /// Upper triangular factor R, `min(rows, cols) × cols`.
    pub fn r(&self) -> DynMatrix<T> {
        DynMatrix::from_fn(self.p(), self.qr.ncols(), |i, j| {
            if i < j {
                self.qr[(i, j)]
            } else if i == j {
                self.r_diag[i]
            } else {
                T::zero()
            }
        })
    }

    /// Solve `Ax = b`.
    ///
    /// Fails with [`Error::DimensionMismatch`] if `b.len() != n` and with
    /// [`Error::RankDeficient`] if R has a zero on its diagonal.
    pub fn solve(&self, b: &DynVector<T>) -> Result<DynVector<T>> {
        let n = self.qr.nrows();
        if b.len() != n {
            return Err(Error::mismatch((1, n), (1, b.len())));
        }
        let x = self.solve_matrix(&DynMatrix::from_vec(n, 1, b.as_slice().to_vec()))?;
        Ok(DynVector::from_vec(x.into_vec()))
    }

    /// Solve `AX = B` column-wise. `B` must have `n` rows.
    pub fn solve_matrix(&self, b: &DynMatrix<T>) -> Result<DynMatrix<T>> {
        let m = self.qr.nrows();
        let n = self.qr.ncols();
        if b.nrows() != m {
            return Err(Error::mismatch((m, b.ncols()), b.shape()));
        }
        if !self.is_full_rank() {
            return Err(Error::RankDeficient);
        }

        let nrhs = b.ncols();
        let mut x = b.clone();
        let mut s = try_buffer(nrhs, T::zero())?;

        // X = Qᵀ B, one reflection at a time.
        for k in 0..n {
            s.fill(T::zero());
            for i in k..m {
                let v = self.qr[(i, k)];
                for (sj, &xj) in s.iter_mut().zip(x.row_as_slice(i, 0)) {
                    *sj = *sj + v * xj;
                }
            }
            let vkk = self.qr[(k, k)];
            for sj in s.iter_mut() {
                *sj = -*sj / vkk;
            }
            for i in k..m {
                let v = self.qr[(i, k)];
                for (xj, &sj) in x.row_as_mut_slice(i, 0).iter_mut().zip(&s) {
                    *xj = *xj + sj * v;
                }
            }
        }

        // Solve R X = Qᵀ B
        for k in (0..n).rev() {
            let d = self.r_diag[k];
            for v in x.row_as_mut_slice(k, 0) {
                *v = *v / d;
            }
            for i in 0..k {
                let r = self.qr[(i, k)];
                let (src, dst) = crate::linalg::split_two_rows(&mut x, k, i);
                for (d, &s) in dst.iter_mut().zip(src.iter()) {
                    *d = *d - s * r;
                }
            }
        }

        Ok(x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_near(a: f64, b: f64, tol: f64, msg: &str) {
        assert!((a - b).abs() < tol, "{}: {} vs {} (diff {})", msg, a, b, (a - b).abs());
    }

    fn check_orthogonal_and_product(a: &DynMatrix<f64>, tol: f64) {
        let qr = QrDecomposition::new(a).unwrap();
        let (q, r) = (qr.q(), qr.r());
        let n = a.nrows();

        let qtq = &q.transpose() * &q;
        for i in 0..n {
            for j in 0..n {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert_near(qtq[(i, j)], expected, tol, "QᵀQ = I");
            }
        }

        let prod = &q * &r;
        for i in 0..n {
            for j in 0..n {
                assert_near(prod[(i, j)], a[(i, j)], tol, "QR = A");
            }
        }
    }

    #[test]
    fn qr_square_3x3() {
        let a = DynMatrix::from_rows(3, 3, &[12.0, -51.0, 4.0, 6.0, 167.0, -68.0, -4.0, 24.0, -41.0]);
        check_orthogonal_and_product(&a, 1e-10);

        let qr = QrDecomposition::new(&a).unwrap();
        // |R[k][k]| are the norms of the orthogonalized columns.
        assert_near(qr.r_diag()[0].abs(), 14.0, 1e-10, "r00");
        assert_near(qr.r_diag()[1].abs(), 175.0, 1e-10, "r11");
        assert_near(qr.r_diag()[2].abs(), 35.0, 1e-10, "r22");
    }

    #[test]
    fn qr_4x4() {
        let a = DynMatrix::from_rows(
            4,
            4,
            &[
                4.0, 1.0, -2.0, 2.0, //
                1.0, 2.0, 0.0, 1.0, //
                -2.0, 0.0, 3.0, -2.0, //
                2.0, 1.0, -2.0, -1.0,
            ],
        );
        check_orthogonal_and_product(&a, 1e-10);
    }

    #[test]
    fn qr_identity() {
        let qr = QrDecomposition::new(&DynMatrix::eye(3, 0.0_f64)).unwrap();
        assert!(qr.is_full_rank());
        let q = qr.q();
        let r = qr.r();
        for i in 0..3 {
            assert_near(q[(i, i)].abs(), 1.0, 1e-14, "Q diag");
            assert_near(r[(i, i)].abs(), 1.0, 1e-14, "R diag");
        }
    }

    #[test]
    fn qr_solve_square() {
        let a = DynMatrix::from_rows(3, 3, &[2.0_f64, 1.0, -1.0, -3.0, -1.0, 2.0, -2.0, 1.0, 2.0]);
        let b = DynVector::from_slice(&[8.0, -11.0, -3.0]);
        let x = QrDecomposition::new(&a).unwrap().solve(&b).unwrap();
        assert_near(x[0], 2.0, 1e-10, "x0");
        assert_near(x[1], 3.0, 1e-10, "x1");
        assert_near(x[2], -1.0, 1e-10, "x2");
    }

    #[test]
    fn qr_solve_matrix() {
        let a = DynMatrix::from_rows(2, 2, &[4.0_f64, 3.0, 6.0, 3.0]);
        let qr = QrDecomposition::new(&a).unwrap();
        let x = qr.solve_matrix(&DynMatrix::eye(2, 0.0)).unwrap();
        let id = &a * &x;
        for i in 0..2 {
            for j in 0..2 {
                assert_near(id[(i, j)], if i == j { 1.0 } else { 0.0 }, 1e-12, "A X = I");
            }
        }
    }

    #[test]
    fn qr_rank_deficient() {
        let a = DynMatrix::from_rows(3, 3, &[1.0_f64, 2.0, 0.0, 2.0, 4.0, 0.0, 3.0, 6.0, 0.0]);
        let qr = QrDecomposition::new(&a).unwrap();
        assert!(!qr.is_full_rank());
        assert_eq!(qr.r_diag()[2], 0.0);
        assert_eq!(
            qr.solve(&DynVector::from_slice(&[1.0, 2.0, 3.0])).unwrap_err(),
            Error::RankDeficient
        );
        // Q stays orthogonal even with a skipped reflection.
        let q = qr.q();
        let qtq = &q.transpose() * &q;
        for i in 0..3 {
            assert_near(qtq[(i, i)], 1.0, 1e-12, "QᵀQ diag");
        }
    }

    #[test]
    fn qr_rejects_non_square_and_bad_rhs() {
        assert_eq!(
            QrDecomposition::new(&DynMatrix::zeros(3, 2, 0.0_f64)).unwrap_err(),
            Error::NonSquareMatrix { rows: 3, cols: 2 }
        );
        let qr = QrDecomposition::new(&DynMatrix::eye(2, 0.0_f64)).unwrap();
        assert!(matches!(
            qr.solve(&DynVector::from_slice(&[1.0, 2.0, 3.0])),
            Err(Error::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn qr_in_place_generic() {
        let mut a = DynMatrix::from_rows(2, 2, &[3.0_f64, 1.0, 4.0, 2.0]);
        let mut r_diag = [0.0; 2];
        qr_in_place(&mut a, &mut r_diag);
        assert_near(r_diag[0].abs(), 5.0, 1e-14, "first column norm");
    }
}
