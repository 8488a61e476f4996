use alloc::vec::Vec;

use tracing::{debug, warn};

use crate::dynmatrix::{try_buffer, DynMatrix, DynVector};
use crate::error::{Error, Result};
use crate::linalg::split_two_rows;
use crate::traits::{FloatScalar, MatrixMut, MatrixRef};

/// Outcome of [`lu_in_place`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LuInfo {
    /// `true` if the number of row swaps was even.
    pub even: bool,
    /// `true` if some pivot had absolute value `<= epsilon`.
    pub singular: bool,
}

/// Crout LU decomposition with partial pivoting, in place.
///
/// On return, `a` contains both factors packed together:
/// - Upper triangle (including diagonal): U
/// - Strict lower triangle: L (diagonal of L is implicitly 1)
///
/// `piv` is filled with the row permutation, so that row `i` of `L·U` is
/// row `piv[i]` of the input. A pivot with `|pivot| <= epsilon` marks the
/// result singular but does not stop the decomposition; sub-diagonal entries
/// are divided by the pivot only when it is non-zero.
pub fn lu_in_place<T: FloatScalar>(a: &mut impl MatrixMut<T>, piv: &mut [usize]) -> LuInfo {
    let n = a.nrows();
    assert_eq!(n, a.ncols(), "LU decomposition requires a square matrix");
    assert_eq!(n, piv.len(), "permutation slice length must match matrix size");

    for (i, p) in piv.iter_mut().enumerate() {
        *p = i;
    }

    let mut info = LuInfo {
        even: true,
        singular: false,
    };
    let mut col: Vec<T> = Vec::with_capacity(n);

    for j in 0..n {
        col.clear();
        col.extend((0..n).map(|i| *a.get(i, j)));

        // Left-looking update: column j sees every previous column.
        for i in 0..n {
            let kmax = i.min(j);
            let s = a.row_as_slice(i, 0)[..kmax]
                .iter()
                .zip(&col[..kmax])
                .fold(T::zero(), |acc, (&l, &c)| acc + l * c);
            col[i] = col[i] - s;
            *a.get_mut(i, j) = col[i];
        }

        let mut p = j;
        for i in (j + 1)..n {
            if col[i].abs() > col[p].abs() {
                p = i;
            }
        }
        if p != j {
            a.swap_rows(p, j);
            piv.swap(p, j);
            info.even = !info.even;
        }

        let pivot = *a.get(j, j);
        if pivot.abs() <= T::eps() {
            if !info.singular {
                warn!(column = j, pivot = pivot.widen(), "LU pivot below epsilon; matrix is singular");
            }
            info.singular = true;
        }
        if pivot != T::zero() {
            for i in (j + 1)..n {
                let v = *a.get(i, j) / pivot;
                *a.get_mut(i, j) = v;
            }
        }
    }

    info
}

/// Solve `Ax = b` given the packed LU factors and permutation.
///
/// `b` (input) and `x` (output) are separate slices of length n. The factors
/// must come from a non-singular decomposition.
pub fn lu_solve<T: FloatScalar>(lu: &impl MatrixRef<T>, piv: &[usize], b: &[T], x: &mut [T]) {
    let n = lu.nrows();

    // Forward substitution with the implicit unit diagonal (solve Ly = Pb)
    for i in 0..n {
        let row = lu.row_as_slice(i, 0);
        let s = row[..i]
            .iter()
            .zip(&x[..i])
            .fold(T::zero(), |acc, (&l, &y)| acc + l * y);
        x[i] = b[piv[i]] - s;
    }

    // Back substitution (solve Ux = y)
    for i in (0..n).rev() {
        let row = lu.row_as_slice(i, 0);
        let s = row[i + 1..]
            .iter()
            .zip(&x[i + 1..])
            .fold(T::zero(), |acc, (&u, &v)| acc + u * v);
        x[i] = (x[i] - s) / row[i];
    }
}

/// LU decomposition of a square matrix.
///
/// Stores the packed L/U factors, the pivot permutation and whether a
/// singular pivot was met. Construction only fails on a non-square input;
/// singularity is reported by [`is_nonsingular`](Self::is_nonsingular) and
/// by the solvers.
///
/// # Example
///
/// ```
/// use densela::{DynMatrix, DynVector, LuDecomposition};
///
/// let a = DynMatrix::from_rows(2, 2, &[2.0_f64, 1.0, 5.0, 3.0]);
/// let lu = LuDecomposition::new(&a).unwrap();
///
/// let b = DynVector::from_slice(&[4.0, 11.0]);
/// let x = lu.solve(&b).unwrap();
/// assert!((x[0] - 1.0).abs() < 1e-12);
/// assert!((x[1] - 2.0).abs() < 1e-12);
/// assert!((lu.det() - 1.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct LuDecomposition<T> {
    lu: DynMatrix<T>,
    piv: Vec<usize>,
    info: LuInfo,
}

impl<T: FloatScalar> LuDecomposition<T> {
    /// Decompose `a`. Fails with [`Error::NonSquareMatrix`] when `a` is not
    /// square.
    pub fn new(a: &DynMatrix<T>) -> Result<Self> {
        if !a.is_square() {
            return Err(Error::NonSquareMatrix {
                rows: a.nrows(),
                cols: a.ncols(),
            });
        }
        let n = a.nrows();
        debug!(n, "LU decomposition");
        let mut lu = a.clone();
        let mut piv = try_buffer(n, 0usize)?;
        let info = lu_in_place(&mut lu, &mut piv);
        Ok(Self { lu, piv, info })
    }

    /// Order of the decomposed matrix.
    #[inline]
    pub fn n(&self) -> usize {
        self.lu.nrows()
    }

    /// `false` if any diagonal entry of U is within epsilon of zero.
    #[inline]
    pub fn is_nonsingular(&self) -> bool {
        !self.info.singular
    }

    /// Unit lower triangular factor L.
    pub fn l(&self) -> DynMatrix<T> {
        DynMatrix::from_fn(self.n(), self.n(), |i, j| {
            if i > j {
                self.lu[(i, j)]
            } else if i == j {
                T::one()
            } else {
                T::zero()
            }
        })
    }

    /// Upper triangular factor U.
    pub fn u(&self) -> DynMatrix<T> {
        DynMatrix::from_fn(self.n(), self.n(), |i, j| {
            if i <= j {
                self.lu[(i, j)]
            } else {
                T::zero()
            }
        })
    }

    /// Row permutation: row `i` of `L·U` is row `pivot()[i]` of A.
    #[inline]
    pub fn pivot(&self) -> &[usize] {
        &self.piv
    }

    /// Packed factors as produced by [`lu_in_place`].
    #[inline]
    pub fn packed(&self) -> &DynMatrix<T> {
        &self.lu
    }

    fn require_nonsingular(&self) -> Result<()> {
        if self.info.singular {
            Err(Error::SingularMatrix)
        } else {
            Ok(())
        }
    }

    /// Solve `Ax = b`.
    ///
    /// Fails with [`Error::DimensionMismatch`] if `b.len() != n` and with
    /// [`Error::SingularMatrix`] if the decomposition met a singular pivot.
    pub fn solve(&self, b: &DynVector<T>) -> Result<DynVector<T>> {
        let n = self.n();
        if b.len() != n {
            return Err(Error::mismatch((1, n), (1, b.len())));
        }
        self.require_nonsingular()?;
        let mut x = try_buffer(n, T::zero())?;
        lu_solve(&self.lu, &self.piv, b.as_slice(), &mut x);
        Ok(DynVector::from_vec(x))
    }

    /// Solve `AX = B` for every column of `B` at once.
    ///
    /// `B` must have `n` rows.
    pub fn solve_matrix(&self, b: &DynMatrix<T>) -> Result<DynMatrix<T>> {
        let n = self.n();
        if b.nrows() != n {
            return Err(Error::mismatch((n, b.ncols()), b.shape()));
        }
        self.require_nonsingular()?;

        let nrhs = b.ncols();
        let mut x = DynMatrix {
            data: try_buffer(n * nrhs, T::zero())?,
            nrows: n,
            ncols: nrhs,
        };
        for (i, &p) in self.piv.iter().enumerate() {
            x.row_as_mut_slice(i, 0).copy_from_slice(b.row_as_slice(p, 0));
        }

        // Solve L·Y = P·B
        for k in 0..n {
            for i in (k + 1)..n {
                let l = self.lu[(i, k)];
                if l == T::zero() {
                    continue;
                }
                let (src, dst) = split_two_rows(&mut x, k, i);
                for (d, &s) in dst.iter_mut().zip(src.iter()) {
                    *d = *d - s * l;
                }
            }
        }

        // Solve U·X = Y
        for k in (0..n).rev() {
            let d = self.lu[(k, k)];
            for v in x.row_as_mut_slice(k, 0) {
                *v = *v / d;
            }
            for i in 0..k {
                let u = self.lu[(i, k)];
                if u == T::zero() {
                    continue;
                }
                let (src, dst) = split_two_rows(&mut x, k, i);
                for (d, &s) in dst.iter_mut().zip(src.iter()) {
                    *d = *d - s * u;
                }
            }
        }

        Ok(x)
    }

    /// Matrix inverse, by solving against the identity.
    pub fn inverse(&self) -> Result<DynMatrix<T>> {
        self.solve_matrix(&DynMatrix::eye(self.n(), T::zero()))
    }

    /// Determinant: product of the diagonal of U times the permutation sign.
    pub fn det(&self) -> T {
        let sign = if self.info.even { T::one() } else { -T::one() };
        (0..self.n()).fold(sign, |d, i| d * self.lu[(i, i)])
    }
}
