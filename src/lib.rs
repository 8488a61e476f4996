//! # densela
//!
//! Dense linear algebra and discrete Fourier transforms for small to medium
//! problems, no-std compatible with `alloc`.
//!
//! ## Quick start
//!
//! ```
//! use densela::{DynMatrix, DynVector, LuDecomposition};
//!
//! // Solve a linear system Ax = b
//! let a = DynMatrix::from_rows(3, 3, &[
//!     2.0_f64, 1.0, -1.0,
//!     -3.0, -1.0, 2.0,
//!     -2.0, 1.0, 2.0,
//! ]);
//! let b = DynVector::from_slice(&[8.0, -11.0, -3.0]);
//! let x = LuDecomposition::new(&a).unwrap().solve(&b).unwrap(); // x = [2, 3, -1]
//! assert!((x[1] - 3.0).abs() < 1e-12);
//! ```
//!
//! ## Modules
//!
//! - [`DynMatrix`] / [`DynVector`]: heap-allocated row-major storage with
//!   runtime dimensions. Arithmetic, transpose, norms ([`NormKind`]),
//!   slicing, and element-wise math. Shape-checked `try_*` variants return
//!   [`Error::DimensionMismatch`]; the operator impls panic instead.
//!
//! - [`linalg`]: LU (Crout, partial pivoting), Householder QR, and SVD by
//!   power iteration with deflation. Free functions operate on
//!   `&mut impl MatrixMut<T>` in place; wrapper structs expose the factors
//!   and solvers.
//!
//! - [`fft`]: naive DFT, one-level mixed-radix Cooley-Tukey FFT with a
//!   caller-chosen factorization, magnitude and phase spectra, `fftshift`.
//!
//! - [`flat`]: the same algorithms over caller-owned flat row-major `f32`
//!   buffers with explicit shapes, validated before anything is written.
//!
//! - [`traits`]: [`Scalar`], [`FloatScalar`], and the
//!   [`MatrixRef`] / [`MatrixMut`] access traits the kernels are written
//!   against.
//!
//! ## Diagnostics
//!
//! Decompositions emit [`tracing`] events: `debug` when a factorization
//! starts, `trace` per extracted singular triplet, `warn` on singular
//! pivots, rank deficiency, and exhausted SVD residuals. Install any
//! subscriber to see them.
//!
//! ## Cargo features
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `std`   | yes     | Hardware FPU via system libm; `std::error::Error` for [`Error`] |
//!
//! Without `std`, float math falls back to the pure-Rust `libm`.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod error;
pub mod fft;
pub mod flat;
pub mod linalg;
pub mod traits;

mod dynmatrix;

pub use dynmatrix::{DynMatrix, DynVector, NormKind};
pub use error::{Error, Result};
pub use linalg::{LuDecomposition, QrDecomposition, SvdDecomposition, SvdSettings};
pub use traits::{FloatScalar, MatrixMut, MatrixRef, Scalar};
