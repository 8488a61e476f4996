use core::ops::Range;

use crate::error::{Error, Result};
use crate::traits::Scalar;

use super::vector::DynVector;
use super::DynMatrix;

/// Reject empty, reversed, or out-of-range bounds against a dimension of
/// length `len`.
fn check_range(range: &Range<usize>, len: usize, arg: &'static str) -> Result<()> {
    if range.start >= range.end {
        return Err(Error::invalid(arg, "range must be non-empty and increasing"));
    }
    if range.end > len {
        return Err(Error::invalid(arg, "range exceeds the dimension"));
    }
    Ok(())
}

impl<T> DynMatrix<T> {
    /// View the entire matrix as a flat slice in row-major order.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// View the entire matrix as a mutable flat slice.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// View row `i` as a slice.
    ///
    /// ```
    /// use densela::DynMatrix;
    /// let m = DynMatrix::from_rows(2, 3, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    /// assert_eq!(m.row(1), &[4.0, 5.0, 6.0]);
    /// ```
    #[inline]
    pub fn row(&self, i: usize) -> &[T] {
        let start = i * self.ncols;
        &self.data[start..start + self.ncols]
    }

    /// Iterate over all elements in row-major order.
    #[inline]
    pub fn iter(&self) -> core::slice::Iter<'_, T> {
        self.data.iter()
    }
}

impl<T: Scalar> DynMatrix<T> {
    /// Copy the sub-matrix covering `rows` × `cols`.
    ///
    /// Empty, reversed, or out-of-range bounds fail with
    /// [`Error::InvalidArgument`].
    ///
    /// ```
    /// use densela::DynMatrix;
    /// let m = DynMatrix::from_fn(4, 4, |i, j| (4 * i + j) as f64);
    /// let s = m.slice(1..3, 2..4).unwrap();
    /// assert_eq!(s.into_vec(), vec![6.0, 7.0, 10.0, 11.0]);
    /// assert!(m.slice(2..2, 0..4).is_err());
    /// ```
    pub fn slice(&self, rows: Range<usize>, cols: Range<usize>) -> Result<Self> {
        check_range(&rows, self.nrows, "rows")?;
        check_range(&cols, self.ncols, "cols")?;
        let mut data = super::try_buffer(rows.len() * cols.len(), T::zero())?;
        let width = cols.len();
        for (k, i) in rows.clone().enumerate() {
            let src = i * self.ncols;
            data[k * width..(k + 1) * width]
                .copy_from_slice(&self.data[src + cols.start..src + cols.end]);
        }
        Ok(DynMatrix {
            data,
            nrows: rows.len(),
            ncols: width,
        })
    }

    /// Copy part of row `i` as a vector.
    pub fn row_vector(&self, i: usize, cols: Range<usize>) -> Result<DynVector<T>> {
        if i >= self.nrows {
            return Err(Error::invalid("row", "row index out of range"));
        }
        check_range(&cols, self.ncols, "cols")?;
        let start = i * self.ncols;
        Ok(DynVector::from_slice(
            &self.data[start + cols.start..start + cols.end],
        ))
    }

    /// Copy part of column `j` as a vector.
    pub fn col_vector(&self, j: usize, rows: Range<usize>) -> Result<DynVector<T>> {
        if j >= self.ncols {
            return Err(Error::invalid("col", "column index out of range"));
        }
        check_range(&rows, self.nrows, "rows")?;
        Ok(DynVector::from_vec(
            rows.map(|i| self.data[i * self.ncols + j]).collect(),
        ))
    }
}

impl<T: Scalar> DynVector<T> {
    /// Copy the elements in `range`.
    ///
    /// ```
    /// use densela::DynVector;
    /// let v = DynVector::from_slice(&[1, 2, 3, 4]);
    /// assert_eq!(v.slice(1..3).unwrap().as_slice(), &[2, 3]);
    /// assert!(v.slice(3..5).is_err());
    /// ```
    pub fn slice(&self, range: Range<usize>) -> Result<Self> {
        check_range(&range, self.len(), "range")?;
        Ok(DynVector::from_slice(&self.as_slice()[range]))
    }
}

impl<'a, T> IntoIterator for &'a DynMatrix<T> {
    type Item = &'a T;
    type IntoIter = core::slice::Iter<'a, T>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn grid() -> DynMatrix<f64> {
        DynMatrix::from_fn(3, 4, |i, j| (10 * i + j) as f64)
    }

    #[test]
    fn slice_block() {
        let s = grid().slice(0..2, 1..3).unwrap();
        assert_eq!(s.shape(), (2, 2));
        assert_eq!(s.into_vec(), vec![1.0, 2.0, 11.0, 12.0]);
    }

    #[test]
    fn slice_whole() {
        let m = grid();
        assert_eq!(m.slice(0..3, 0..4).unwrap(), m);
    }

    #[test]
    #[allow(clippy::reversed_empty_ranges)]
    fn slice_rejects_bad_bounds() {
        let m = grid();
        assert!(matches!(
            m.slice(2..1, 0..1),
            Err(Error::InvalidArgument { arg: "rows", .. })
        ));
        assert!(matches!(
            m.slice(0..1, 3..5),
            Err(Error::InvalidArgument { arg: "cols", .. })
        ));
        assert!(m.slice(0..0, 0..1).is_err());
    }

    #[test]
    fn row_and_col_vectors() {
        let m = grid();
        assert_eq!(m.row_vector(2, 1..4).unwrap().as_slice(), &[21.0, 22.0, 23.0]);
        assert_eq!(m.col_vector(3, 0..3).unwrap().as_slice(), &[3.0, 13.0, 23.0]);
        assert!(m.row_vector(3, 0..1).is_err());
        assert!(m.col_vector(0, 1..4).is_err());
    }

    #[test]
    fn row_view_and_iter() {
        let m = grid();
        assert_eq!(m.row(1), &[10.0, 11.0, 12.0, 13.0]);
        let sum: f64 = (&m).into_iter().sum();
        assert_eq!(sum, 6.0 + 46.0 + 86.0);
    }
}
