use core::fmt::Debug;
use num_traits::{Float, Num, One, Zero};

/// Trait for types that can be used as matrix elements.
///
/// Blanket-implemented for all types satisfying the bounds.
/// Covers `f32`, `f64`, and all integer types.
pub trait Scalar: Copy + PartialEq + Debug + Zero + One + Num {}

impl<T: Copy + PartialEq + Debug + Zero + One + Num> Scalar for T {}

/// Trait for real floating-point matrix elements.
///
/// Required by the decompositions, norms, the FFT engine, and the
/// element-wise math functions. Implemented for `f32` and `f64`.
///
/// Accumulations that need extra headroom (vector norms, the SVD power
/// iteration, twiddle angles) run in `f64` through [`widen`](Self::widen)
/// and come back through [`narrow`](Self::narrow).
pub trait FloatScalar: Scalar + Float {
    /// Widen to `f64` without loss.
    fn widen(self) -> f64;

    /// Narrow from `f64`, rounding to the nearest representable value.
    fn narrow(x: f64) -> Self;

    /// Machine epsilon of the storage type.
    #[inline]
    fn eps() -> Self {
        <Self as Float>::epsilon()
    }
}

macro_rules! impl_float_scalar {
    ($($t:ty),*) => {
        $(
            impl FloatScalar for $t {
                #[inline] fn widen(self) -> f64 { self as f64 }
                #[inline] fn narrow(x: f64) -> $t { x as $t }
            }
        )*
    };
}

impl_float_scalar!(f32, f64);

/// Read-only access to a matrix-like type.
///
/// Storage is row-major, so each row is a contiguous slice. Algorithms
/// written against this trait work for [`DynMatrix`](crate::DynMatrix)
/// and for single-row [`DynVector`](crate::DynVector)s alike.
pub trait MatrixRef<T> {
    fn nrows(&self) -> usize;
    fn ncols(&self) -> usize;
    fn get(&self, row: usize, col: usize) -> &T;

    /// Row `row`, starting at column `col_start`, as a contiguous slice.
    fn row_as_slice(&self, row: usize, col_start: usize) -> &[T];
}

/// Mutable access to a matrix-like type.
///
/// Extends `MatrixRef` with mutable element access, enabling
/// in-place algorithms (LU, QR) to work generically.
pub trait MatrixMut<T>: MatrixRef<T> {
    fn get_mut(&mut self, row: usize, col: usize) -> &mut T;

    /// Row `row`, starting at column `col_start`, as a mutable slice.
    fn row_as_mut_slice(&mut self, row: usize, col_start: usize) -> &mut [T];

    /// Exchange rows `a` and `b` in place.
    fn swap_rows(&mut self, a: usize, b: usize);
}
