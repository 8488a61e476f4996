//! Discrete Fourier transforms.
//!
//! [`dft_naive`] is the O(N²) definition and serves as the sub-transform
//! solver inside [`fft_cooley_tukey`], which splits a length `N = n1·n2`
//! transform into `n1` transforms of length `n2` and `n2` transforms of
//! length `n1`. The factorization is chosen by the caller.
//!
//! Samples are [`num_complex::Complex`] values. Twiddle angles and
//! accumulations are evaluated in `f64` regardless of the sample type.
//!
//! ```
//! use densela::fft::{dft_naive, fft_cooley_tukey};
//! use num_complex::Complex;
//!
//! let x: Vec<Complex<f64>> = (0..6).map(|i| Complex::new(i as f64, 0.0)).collect();
//! let slow = dft_naive(&x);
//! let fast = fft_cooley_tukey(&x, 2, 3).unwrap();
//! for (a, b) in slow.iter().zip(&fast) {
//!     assert!((a - b).norm() < 1e-12);
//! }
//! ```

use alloc::vec::Vec;
use core::f64::consts::PI;

use num_complex::Complex;
use num_traits::Float;
use tracing::debug;

use crate::dynmatrix::try_buffer;
use crate::error::{Error, Result};
use crate::traits::FloatScalar;

type C64 = Complex<f64>;

/// `e^(-2πi·m/n)`, with `m` reduced modulo `n` before the angle is formed.
#[inline]
fn twiddle(m: usize, n: usize) -> C64 {
    let theta = -2.0 * PI * ((m % n) as f64) / (n as f64);
    let (s, c) = Float::sin_cos(theta);
    C64::new(c, s)
}

fn widen<T: FloatScalar>(z: &Complex<T>) -> C64 {
    C64::new(z.re.widen(), z.im.widen())
}

fn narrow<T: FloatScalar>(z: C64) -> Complex<T> {
    Complex::new(T::narrow(z.re), T::narrow(z.im))
}

/// Naive DFT of `x` into `out` (same length).
fn dft_into(x: &[C64], out: &mut [C64]) {
    let n = x.len();
    for (k, o) in out.iter_mut().enumerate() {
        *o = x
            .iter()
            .enumerate()
            .fold(C64::new(0.0, 0.0), |acc, (j, &xj)| acc + xj * twiddle(j * k, n));
    }
}

/// Forward DFT by direct summation, `X[k] = Σ x[n]·e^(−2πi·nk/N)`.
pub fn dft_naive<T: FloatScalar>(x: &[Complex<T>]) -> Vec<Complex<T>> {
    let x64: Vec<C64> = x.iter().map(widen).collect();
    let mut out = alloc::vec![C64::new(0.0, 0.0); x.len()];
    dft_into(&x64, &mut out);
    out.into_iter().map(narrow).collect()
}

fn cooley_tukey_f64(x: &[C64], n1: usize, n2: usize) -> Result<Vec<C64>> {
    let n = x.len();
    if n1 == 0 || n2 == 0 || n1.checked_mul(n2) != Some(n) {
        return Err(Error::invalid("n1", "n1 * n2 must equal the input length"));
    }
    debug!(n, n1, n2, "Cooley-Tukey FFT");

    let zero = C64::new(0.0, 0.0);
    let mut scratch = try_buffer(n, zero)?;
    let mut columns = try_buffer(n, zero)?;

    // n1 columns of length n2: column k1 holds x[k1], x[k1 + n1], ...
    for (k1, col) in scratch.chunks_exact_mut(n2).enumerate() {
        for (k2, c) in col.iter_mut().enumerate() {
            *c = x[n1 * k2 + k1];
        }
    }
    for (src, dst) in scratch.chunks_exact(n2).zip(columns.chunks_exact_mut(n2)) {
        dft_into(src, dst);
    }

    // Twiddle and transpose into n2 rows of length n1.
    for k1 in 0..n1 {
        for k2 in 0..n2 {
            scratch[k2 * n1 + k1] = columns[k1 * n2 + k2] * twiddle(k1 * k2, n);
        }
    }
    let mut rows = columns;
    for (src, dst) in scratch.chunks_exact(n1).zip(rows.chunks_exact_mut(n1)) {
        dft_into(src, dst);
    }

    let mut out = scratch;
    for k1 in 0..n1 {
        for k2 in 0..n2 {
            out[n2 * k1 + k2] = rows[k2 * n1 + k1];
        }
    }
    Ok(out)
}

/// Forward DFT of `x` by one level of mixed-radix Cooley-Tukey with
/// `x.len() = n1 · n2`.
///
/// Fails with [`Error::InvalidArgument`] if `n1 · n2 != x.len()`.
pub fn fft_cooley_tukey<T: FloatScalar>(
    x: &[Complex<T>],
    n1: usize,
    n2: usize,
) -> Result<Vec<Complex<T>>> {
    let x64: Vec<C64> = x.iter().map(widen).collect();
    Ok(cooley_tukey_f64(&x64, n1, n2)?.into_iter().map(narrow).collect())
}

fn real_spectrum<T: FloatScalar>(x: &[T], n1: usize, n2: usize) -> Result<Vec<C64>> {
    let x64: Vec<C64> = x.iter().map(|&v| C64::new(v.widen(), 0.0)).collect();
    cooley_tukey_f64(&x64, n1, n2)
}

/// Magnitude spectrum `|X[k]|` of a real sequence.
///
/// ```
/// use densela::fft::fft_abs;
/// let mag = fft_abs(&[1.0_f32, 1.0, 1.0, 1.0], 2, 2).unwrap();
/// assert!((mag[0] - 4.0).abs() < 1e-6);
/// assert!(mag[1..].iter().all(|m| m.abs() < 1e-6));
/// ```
pub fn fft_abs<T: FloatScalar>(x: &[T], n1: usize, n2: usize) -> Result<Vec<T>> {
    Ok(real_spectrum(x, n1, n2)?
        .into_iter()
        .map(|z| T::narrow(z.norm()))
        .collect())
}

/// Phase spectrum `atan(Im X[k] / Re X[k])` of a real sequence.
///
/// The result lies in `[-π/2, π/2]`. A bin with a zero real part yields
/// `±π/2`, or NaN when the bin is exactly zero.
pub fn fft_phase<T: FloatScalar>(x: &[T], n1: usize, n2: usize) -> Result<Vec<T>> {
    Ok(real_spectrum(x, n1, n2)?
        .into_iter()
        .map(|z| T::narrow(Float::atan(z.im / z.re)))
        .collect())
}

/// Swap the two halves of `buf[..n]`, moving the zero-frequency bin to the
/// centre.
///
/// The first `n / 2` elements trade places with the next `n / 2`; for odd
/// `n` the last element stays put. Fails with [`Error::InvalidArgument`]
/// if `buf` is shorter than `n`.
///
/// ```
/// use densela::fft::fftshift;
/// let mut x = [0, 1, 2, 3, 4, 5];
/// fftshift(&mut x, 6).unwrap();
/// assert_eq!(x, [3, 4, 5, 0, 1, 2]);
/// assert!(fftshift(&mut x, 7).is_err());
/// ```
pub fn fftshift<T>(buf: &mut [T], n: usize) -> Result<()> {
    if buf.len() < n {
        return Err(Error::invalid("n", "buffer shorter than n"));
    }
    let half = n / 2;
    let (lo, hi) = buf.split_at_mut(half);
    lo.swap_with_slice(&mut hi[..half]);
    Ok(())
}
