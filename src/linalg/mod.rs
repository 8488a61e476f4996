//! Dense decompositions: LU, QR and power-iteration SVD.
//!
//! Each decomposition has a generic in-place kernel working through
//! [`MatrixMut`](crate::traits::MatrixMut) and an owning struct built on
//! [`DynMatrix`] that exposes the factors and the solvers.

pub(crate) mod lu;
pub(crate) mod qr;
pub(crate) mod svd;

pub use lu::{lu_in_place, lu_solve, LuDecomposition, LuInfo};
pub use qr::{qr_in_place, QrDecomposition};
pub use svd::{SvdDecomposition, SvdSettings};

use crate::dynmatrix::DynMatrix;

/// Mutable views of two different rows of `m`, in argument order.
/// Requires `a != b`.
#[inline]
pub(crate) fn split_two_rows<T>(m: &mut DynMatrix<T>, a: usize, b: usize) -> (&mut [T], &mut [T]) {
    debug_assert_ne!(a, b);
    let n = m.ncols;
    if a < b {
        let (head, tail) = m.data.split_at_mut(b * n);
        (&mut head[a * n..(a + 1) * n], &mut tail[..n])
    } else {
        let (head, tail) = m.data.split_at_mut(a * n);
        (&mut tail[..n], &mut head[b * n..(b + 1) * n])
    }
}
