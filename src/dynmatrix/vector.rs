use alloc::vec::Vec;
use core::ops::{Index, IndexMut};

use crate::error::{Error, Result};
use crate::traits::{MatrixMut, MatrixRef, Scalar};

use super::DynMatrix;

/// Runtime-length vector: a single-row [`DynMatrix`] with `v[i]` access.
///
/// Right-hand sides and solutions of the LU/QR solvers travel as
/// `DynVector`s.
///
/// ```
/// use densela::DynVector;
///
/// let b = DynVector::from_slice(&[8.0_f64, -11.0, -3.0]);
/// assert_eq!(b.len(), 3);
/// assert_eq!(b[1], -11.0);
/// assert_eq!(b.dot(&b), 194.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DynVector<T> {
    pub(crate) inner: DynMatrix<T>,
}

impl<T: Scalar> DynVector<T> {
    /// Copy `data` into a new vector.
    pub fn from_slice(data: &[T]) -> Self {
        Self {
            inner: DynMatrix::from_rows(1, data.len(), data),
        }
    }

    /// Checked form of [`from_slice`](Self::from_slice); an empty slice is
    /// rejected with [`Error::InvalidArgument`].
    pub fn try_from_slice(data: &[T]) -> Result<Self> {
        let inner = DynMatrix::try_from_rows(1, data.len(), data).map_err(|e| match e {
            Error::InvalidArgument { .. } => Error::invalid("len", "vector length must be at least 1"),
            other => other,
        })?;
        Ok(Self { inner })
    }

    /// Take ownership of `data`.
    pub fn from_vec(data: Vec<T>) -> Self {
        let n = data.len();
        Self {
            inner: DynMatrix::from_vec(1, n, data),
        }
    }

    /// Length-`n` zero vector. `_zero` only pins the element type.
    pub fn zeros(n: usize, _zero: T) -> Self {
        Self::fill(n, T::zero())
    }

    /// Length-`n` vector with every entry set to `value`.
    pub fn fill(n: usize, value: T) -> Self {
        Self {
            inner: DynMatrix::fill(1, n, value),
        }
    }

    /// `Σ self[i]·rhs[i]`. Panics on a length mismatch.
    pub fn dot(&self, rhs: &Self) -> T {
        assert_eq!(
            self.len(),
            rhs.len(),
            "dot product of length-{} and length-{} vectors",
            self.len(),
            rhs.len()
        );
        self.as_slice()
            .iter()
            .zip(rhs.as_slice())
            .fold(T::zero(), |acc, (&x, &y)| acc + x * y)
    }

    /// [`dot`](Self::dot) that reports a length mismatch as
    /// [`Error::DimensionMismatch`].
    pub fn try_dot(&self, rhs: &Self) -> Result<T> {
        if self.len() != rhs.len() {
            return Err(Error::mismatch((1, self.len()), (1, rhs.len())));
        }
        Ok(self.dot(rhs))
    }
}

impl<T> DynVector<T> {
    #[inline]
    pub fn len(&self) -> usize {
        self.inner.ncols
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.inner.data.is_empty()
    }

    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.inner.data
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.inner.data
    }

    /// Give up the vector, keeping its buffer.
    #[inline]
    pub fn into_vec(self) -> Vec<T> {
        self.inner.data
    }
}

impl<T: Copy> DynVector<T> {
    /// Copy into a caller-owned buffer of exactly `len` elements.
    ///
    /// Fails with [`Error::DimensionMismatch`] without writing if `len`
    /// differs from the vector length or from `dest.len()`.
    pub fn write_to(&self, dest: &mut [T], len: usize) -> Result<()> {
        self.inner.write_to(dest, 1, len)
    }
}

// ── Index ───────────────────────────────────────────────────────────

impl<T> Index<usize> for DynVector<T> {
    type Output = T;

    #[inline]
    fn index(&self, i: usize) -> &T {
        &self.as_slice()[i]
    }
}

impl<T> IndexMut<usize> for DynVector<T> {
    #[inline]
    fn index_mut(&mut self, i: usize) -> &mut T {
        &mut self.as_mut_slice()[i]
    }
}

// ── MatrixRef / MatrixMut ───────────────────────────────────────────

impl<T> MatrixRef<T> for DynVector<T> {
    #[inline]
    fn nrows(&self) -> usize {
        1
    }

    #[inline]
    fn ncols(&self) -> usize {
        self.inner.ncols()
    }

    #[inline]
    fn get(&self, row: usize, col: usize) -> &T {
        self.inner.get(row, col)
    }

    #[inline]
    fn row_as_slice(&self, row: usize, col_start: usize) -> &[T] {
        self.inner.row_as_slice(row, col_start)
    }
}

impl<T> MatrixMut<T> for DynVector<T> {
    #[inline]
    fn get_mut(&mut self, row: usize, col: usize) -> &mut T {
        self.inner.get_mut(row, col)
    }

    #[inline]
    fn row_as_mut_slice(&mut self, row: usize, col_start: usize) -> &mut [T] {
        self.inner.row_as_mut_slice(row, col_start)
    }

    #[inline]
    fn swap_rows(&mut self, a: usize, b: usize) {
        self.inner.swap_rows(a, b)
    }
}

// ── Conversions ─────────────────────────────────────────────────────

impl<T> From<DynVector<T>> for DynMatrix<T> {
    fn from(v: DynVector<T>) -> Self {
        v.inner
    }
}

impl<T: Clone> From<&DynVector<T>> for DynMatrix<T> {
    fn from(v: &DynVector<T>) -> Self {
        v.inner.clone()
    }
}
