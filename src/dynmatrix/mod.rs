mod norm;
mod ops;
mod slice;
mod util;
mod vector;

pub use norm::NormKind;
pub use vector::DynVector;

use alloc::vec;
use alloc::vec::Vec;
use core::ops::{Index, IndexMut};

use crate::error::{check_shape, Error, Result};
use crate::traits::{MatrixMut, MatrixRef, Scalar};

/// Reserve and fill a buffer of `len` elements, reporting reservation
/// failure as [`Error::AllocationFailure`] instead of aborting.
pub(crate) fn try_buffer<T: Clone>(len: usize, value: T) -> Result<Vec<T>> {
    let mut data = Vec::new();
    data.try_reserve_exact(len)
        .map_err(|_| Error::AllocationFailure { elements: len })?;
    data.resize(len, value);
    Ok(data)
}

/// Row-major dense matrix with runtime dimensions.
///
/// Element `(i, j)` lives at `i * ncols + j`, so every row is an
/// independently addressable contiguous slice. Dimensions are set at
/// creation and never change. Implements [`MatrixRef`] and [`MatrixMut`],
/// so the generic in-place LU and QR kernels work on it directly.
///
/// ```
/// use densela::DynMatrix;
///
/// let a = DynMatrix::from_rows(2, 3, &[0.5_f32, -1.0, 2.0, 4.0, 0.0, 3.5]);
/// assert_eq!(a.shape(), (2, 3));
/// assert_eq!(a[(1, 2)], 3.5);
/// assert!(!a.is_square());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DynMatrix<T> {
    pub(crate) data: Vec<T>,
    pub(crate) nrows: usize,
    pub(crate) ncols: usize,
}

// ── Constructors ────────────────────────────────────────────────────

impl<T: Scalar> DynMatrix<T> {
    /// All-zero `nrows × ncols` matrix. `_zero` only pins the element type.
    pub fn zeros(nrows: usize, ncols: usize, _zero: T) -> Self {
        Self::fill(nrows, ncols, T::zero())
    }

    /// `nrows × ncols` matrix with every entry set to `value`.
    pub fn fill(nrows: usize, ncols: usize, value: T) -> Self {
        Self {
            data: vec![value; nrows * ncols],
            nrows,
            ncols,
        }
    }

    /// `n × n` identity, the right-hand side [`inverse`] solves against.
    ///
    /// [`inverse`]: crate::LuDecomposition::inverse
    pub fn eye(n: usize, _zero: T) -> Self {
        let mut m = Self::zeros(n, n, T::zero());
        m.data.iter_mut().step_by(n + 1).for_each(|d| *d = T::one());
        m
    }

    /// Copy a row-major slice into a new matrix.
    ///
    /// Panics on a length mismatch; [`try_from_rows`](Self::try_from_rows)
    /// is the checked form used at the flat boundary.
    pub fn from_rows(nrows: usize, ncols: usize, row_major: &[T]) -> Self {
        assert_eq!(
            row_major.len(),
            nrows * ncols,
            "row-major input holds {} elements, a {}x{} matrix needs {}",
            row_major.len(),
            nrows,
            ncols,
            nrows * ncols,
        );
        Self {
            data: row_major.to_vec(),
            nrows,
            ncols,
        }
    }

    /// Checked form of [`from_rows`](Self::from_rows).
    ///
    /// Rejects zero-sized shapes with [`Error::InvalidArgument`] and a slice
    /// of the wrong length with [`Error::DimensionMismatch`] (the `got`
    /// side reports the slice as a single row).
    ///
    /// ```
    /// use densela::{DynMatrix, Error};
    /// let err = DynMatrix::try_from_rows(2, 2, &[1.0_f32, 2.0, 3.0]).unwrap_err();
    /// assert_eq!(err, Error::DimensionMismatch { expected: (2, 2), got: (1, 3) });
    /// ```
    pub fn try_from_rows(nrows: usize, ncols: usize, row_major: &[T]) -> Result<Self> {
        if nrows == 0 || ncols == 0 {
            return Err(Error::invalid("shape", "matrix dimensions must be at least 1x1"));
        }
        if row_major.len() != nrows * ncols {
            return Err(Error::mismatch((nrows, ncols), (1, row_major.len())));
        }
        let mut data = try_buffer(row_major.len(), T::zero())?;
        data.copy_from_slice(row_major);
        Ok(Self { data, nrows, ncols })
    }

    /// Take ownership of a row-major buffer. Panics on a length mismatch.
    pub fn from_vec(nrows: usize, ncols: usize, data: Vec<T>) -> Self {
        assert_eq!(
            data.len(),
            nrows * ncols,
            "row-major input holds {} elements, a {}x{} matrix needs {}",
            data.len(),
            nrows,
            ncols,
            nrows * ncols,
        );
        Self { data, nrows, ncols }
    }
}

impl<T> DynMatrix<T> {
    #[inline]
    pub fn nrows(&self) -> usize {
        self.nrows
    }

    #[inline]
    pub fn ncols(&self) -> usize {
        self.ncols
    }

    /// `(rows, cols)`.
    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        (self.nrows, self.ncols)
    }

    /// LU and QR accept only square input.
    #[inline]
    pub fn is_square(&self) -> bool {
        self.nrows == self.ncols
    }

    /// Build a matrix from `f(row, col)`, visiting entries in storage order.
    ///
    /// ```
    /// use densela::DynMatrix;
    /// let hilbert = DynMatrix::from_fn(3, 3, |i, j| 1.0 / (i + j + 1) as f64);
    /// assert_eq!(hilbert[(2, 2)], 0.2);
    /// assert_eq!(hilbert[(0, 1)], hilbert[(1, 0)]);
    /// ```
    pub fn from_fn(nrows: usize, ncols: usize, f: impl Fn(usize, usize) -> T) -> Self {
        let data = (0..nrows * ncols).map(|k| f(k / ncols, k % ncols)).collect();
        Self { data, nrows, ncols }
    }

    /// Consume the matrix and return its row-major buffer.
    ///
    /// This is the single ownership-transferring conversion to flat form.
    ///
    /// ```
    /// use densela::DynMatrix;
    /// let m = DynMatrix::from_rows(2, 2, &[1, 2, 3, 4]);
    /// assert_eq!(m.into_vec(), vec![1, 2, 3, 4]);
    /// ```
    #[inline]
    pub fn into_vec(self) -> Vec<T> {
        self.data
    }
}

impl<T: Copy> DynMatrix<T> {
    /// Copy the matrix into a caller-owned row-major buffer of shape
    /// `height x width`.
    ///
    /// Fails with [`Error::DimensionMismatch`] without writing anything if
    /// `(height, width)` differs from the matrix shape or `dest` does not
    /// hold exactly `height * width` elements.
    ///
    /// ```
    /// use densela::DynMatrix;
    /// let m = DynMatrix::from_rows(1, 3, &[1.0_f32, 2.0, 3.0]);
    /// let mut out = [0.0_f32; 3];
    /// m.write_to(&mut out, 1, 3).unwrap();
    /// assert_eq!(out, [1.0, 2.0, 3.0]);
    /// assert!(m.write_to(&mut out, 3, 1).is_err());
    /// ```
    pub fn write_to(&self, dest: &mut [T], height: usize, width: usize) -> Result<()> {
        check_shape(self.shape(), (height, width))?;
        if dest.len() != height * width {
            return Err(Error::mismatch((height, width), (1, dest.len())));
        }
        dest.copy_from_slice(&self.data);
        Ok(())
    }
}

// ── MatrixRef / MatrixMut ───────────────────────────────────────────

impl<T> MatrixRef<T> for DynMatrix<T> {
    #[inline]
    fn nrows(&self) -> usize {
        self.nrows
    }

    #[inline]
    fn ncols(&self) -> usize {
        self.ncols
    }

    #[inline]
    fn get(&self, row: usize, col: usize) -> &T {
        &self.data[row * self.ncols + col]
    }

    #[inline]
    fn row_as_slice(&self, row: usize, col_start: usize) -> &[T] {
        let start = row * self.ncols;
        &self.data[start + col_start..start + self.ncols]
    }
}

impl<T> MatrixMut<T> for DynMatrix<T> {
    #[inline]
    fn get_mut(&mut self, row: usize, col: usize) -> &mut T {
        &mut self.data[row * self.ncols + col]
    }

    #[inline]
    fn row_as_mut_slice(&mut self, row: usize, col_start: usize) -> &mut [T] {
        let start = row * self.ncols;
        &mut self.data[start + col_start..start + self.ncols]
    }

    fn swap_rows(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }
        let (lo, hi) = if a < b { (a, b) } else { (b, a) };
        let n = self.ncols;
        let (head, tail) = self.data.split_at_mut(hi * n);
        head[lo * n..lo * n + n].swap_with_slice(&mut tail[..n]);
    }
}

// ── Index ───────────────────────────────────────────────────────────

impl<T> DynMatrix<T> {
    #[inline]
    fn offset(&self, row: usize, col: usize) -> usize {
        assert!(
            row < self.nrows && col < self.ncols,
            "element ({row}, {col}) lies outside a {}x{} matrix",
            self.nrows,
            self.ncols
        );
        row * self.ncols + col
    }
}

impl<T> Index<(usize, usize)> for DynMatrix<T> {
    type Output = T;

    #[inline]
    fn index(&self, (row, col): (usize, usize)) -> &T {
        &self.data[self.offset(row, col)]
    }
}

impl<T> IndexMut<(usize, usize)> for DynMatrix<T> {
    #[inline]
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut T {
        let k = self.offset(row, col);
        &mut self.data[k]
    }
}
