//! Error types for densela.

use thiserror::Error;

/// Result type alias using densela's [`Error`].
pub type Result<T> = core::result::Result<T, Error>;

/// Errors returned by decompositions, transforms, and the flat-buffer API.
///
/// Nothing in the crate prints or aborts; every failure surfaces as one of
/// these values at the call that detected it.
///
/// ```
/// use densela::{DynMatrix, Error, LuDecomposition};
///
/// let a = DynMatrix::from_rows(2, 3, &[1.0_f64, 2.0, 3.0, 4.0, 5.0, 6.0]);
/// assert_eq!(
///     LuDecomposition::new(&a).unwrap_err(),
///     Error::NonSquareMatrix { rows: 2, cols: 3 },
/// );
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Shape disagreement between paired arguments, or between a result
    /// and the caller's output buffer.
    #[error("dimension mismatch: expected {}x{}, got {}x{}", .expected.0, .expected.1, .got.0, .got.1)]
    DimensionMismatch {
        /// Expected `(rows, cols)`.
        expected: (usize, usize),
        /// Got `(rows, cols)`.
        got: (usize, usize),
    },

    /// LU or QR given a matrix with `rows != cols`.
    #[error("matrix must be square: got {rows}x{cols}")]
    NonSquareMatrix { rows: usize, cols: usize },

    /// A pivot of the LU decomposition is within machine epsilon of zero.
    #[error("matrix is singular")]
    SingularMatrix,

    /// The QR decomposition has a zero entry on the diagonal of R.
    #[error("matrix is rank deficient")]
    RankDeficient,

    /// Invalid argument provided to an operation.
    #[error("invalid argument '{arg}': {reason}")]
    InvalidArgument {
        /// The argument name.
        arg: &'static str,
        /// Why it was rejected.
        reason: &'static str,
    },

    /// A buffer of the requested number of elements could not be reserved.
    #[error("failed to allocate {elements} elements")]
    AllocationFailure { elements: usize },

    /// Power iteration produced a non-finite iterate, which only non-finite
    /// input causes.
    #[error("power iteration diverged to a non-finite iterate after {iterations} iterations")]
    ConvergenceFailure { iterations: usize },
}

impl Error {
    pub(crate) fn invalid(arg: &'static str, reason: &'static str) -> Self {
        Error::InvalidArgument { arg, reason }
    }

    pub(crate) fn mismatch(expected: (usize, usize), got: (usize, usize)) -> Self {
        Error::DimensionMismatch { expected, got }
    }
}

/// Fail with [`Error::DimensionMismatch`] unless `got == expected`.
#[inline]
pub(crate) fn check_shape(expected: (usize, usize), got: (usize, usize)) -> Result<()> {
    if expected == got {
        Ok(())
    } else {
        Err(Error::mismatch(expected, got))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn display_messages() {
        assert_eq!(
            Error::mismatch((3, 3), (2, 3)).to_string(),
            "dimension mismatch: expected 3x3, got 2x3"
        );
        assert_eq!(
            Error::NonSquareMatrix { rows: 4, cols: 2 }.to_string(),
            "matrix must be square: got 4x2"
        );
        assert_eq!(
            Error::invalid("n", "buffer shorter than n").to_string(),
            "invalid argument 'n': buffer shorter than n"
        );
        assert_eq!(
            Error::ConvergenceFailure { iterations: 7 }.to_string(),
            "power iteration diverged to a non-finite iterate after 7 iterations"
        );
    }

    #[test]
    fn check_shape_reports_both_sides() {
        assert!(check_shape((2, 2), (2, 2)).is_ok());
        assert_eq!(
            check_shape((2, 2), (4, 1)).unwrap_err(),
            Error::DimensionMismatch {
                expected: (2, 2),
                got: (4, 1)
            }
        );
    }
}
