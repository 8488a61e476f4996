use alloc::vec::Vec;

use crate::traits::{FloatScalar, Scalar};

use super::vector::DynVector;
use super::DynMatrix;

// ── Map ─────────────────────────────────────────────────────────────

impl<T: Copy> DynMatrix<T> {
    /// Apply a function to every element, producing a new matrix.
    ///
    /// ```
    /// use densela::DynMatrix;
    /// let m = DynMatrix::from_rows(2, 2, &[1.0_f64, 4.0, 9.0, 16.0]);
    /// let r = m.map(|x: f64| x.sqrt());
    /// assert_eq!(r[(0, 0)], 1.0);
    /// assert_eq!(r[(1, 1)], 4.0);
    /// ```
    pub fn map<U>(&self, f: impl Fn(T) -> U) -> DynMatrix<U> {
        let data: Vec<U> = self.data.iter().map(|&x| f(x)).collect();
        DynMatrix {
            data,
            nrows: self.nrows,
            ncols: self.ncols,
        }
    }
}

impl<T: Copy> DynVector<T> {
    /// Apply a function to every element, producing a new vector.
    pub fn map<U>(&self, f: impl Fn(T) -> U) -> DynVector<U> {
        DynVector {
            inner: self.inner.map(f),
        }
    }
}

// ── Element-wise math ───────────────────────────────────────────────

macro_rules! elementwise {
    ($($(#[$doc:meta])* $name:ident => $f:path;)*) => {
        impl<T: FloatScalar> DynMatrix<T> {
            $(
                $(#[$doc])*
                pub fn $name(&self) -> Self {
                    self.map($f)
                }
            )*
        }

        impl<T: FloatScalar> DynVector<T> {
            $(
                $(#[$doc])*
                pub fn $name(&self) -> Self {
                    self.map($f)
                }
            )*
        }
    };
}

elementwise! {
    /// Element-wise absolute value.
    abs => num_traits::Float::abs;
    /// Element-wise sine (radians).
    sin => num_traits::Float::sin;
    /// Element-wise cosine (radians).
    cos => num_traits::Float::cos;
    /// Element-wise tangent (radians).
    tan => num_traits::Float::tan;
    /// Element-wise arcsine. Values outside `[-1, 1]` give NaN.
    asin => num_traits::Float::asin;
    /// Element-wise arccosine. Values outside `[-1, 1]` give NaN.
    acos => num_traits::Float::acos;
    /// Element-wise arctangent.
    atan => num_traits::Float::atan;
    /// Element-wise `e^x`.
    exp => num_traits::Float::exp;
    /// Element-wise natural logarithm.
    ln => num_traits::Float::ln;
    /// Element-wise square root. Negative values give NaN.
    sqrt => num_traits::Float::sqrt;
}

impl<T: FloatScalar> DynMatrix<T> {
    /// Raise every element to the power `p`.
    ///
    /// ```
    /// use densela::DynMatrix;
    /// let m = DynMatrix::from_rows(1, 3, &[1.0_f32, 2.0, 3.0]);
    /// assert_eq!(m.powf(2.0).into_vec(), vec![1.0, 4.0, 9.0]);
    /// ```
    pub fn powf(&self, p: T) -> Self {
        self.map(|x| x.powf(p))
    }
}

impl<T: FloatScalar> DynVector<T> {
    /// Raise every element to the power `p`.
    pub fn powf(&self, p: T) -> Self {
        self.map(|x| x.powf(p))
    }
}

// ── Column access ───────────────────────────────────────────────────

impl<T: Scalar> DynMatrix<T> {
    /// Extract column `j` as a `DynVector`.
    ///
    /// ```
    /// use densela::DynMatrix;
    /// let m = DynMatrix::from_rows(2, 2, &[1.0, 2.0, 3.0, 4.0]);
    /// let c = m.col(1);
    /// assert_eq!(c.as_slice(), &[2.0, 4.0]);
    /// ```
    pub fn col(&self, j: usize) -> DynVector<T> {
        DynVector::from_vec((0..self.nrows).map(|i| self[(i, j)]).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::f64::consts::{FRAC_PI_2, FRAC_PI_4};

    fn assert_near(a: f64, b: f64, tol: f64, msg: &str) {
        assert!((a - b).abs() < tol, "{}: {} vs {} (diff {})", msg, a, b, (a - b).abs());
    }

    #[test]
    fn map_changes_type() {
        let m = DynMatrix::from_rows(2, 2, &[1.0_f64, 2.0, 3.0, 4.0]);
        let r = m.map(|x| x as f32 * 2.0);
        assert_eq!(r[(1, 1)], 8.0_f32);
        assert_eq!(r.shape(), (2, 2));
    }

    #[test]
    fn trig() {
        let m = DynMatrix::from_rows(1, 3, &[0.0_f64, FRAC_PI_4, FRAC_PI_2]);
        let s = m.sin();
        let c = m.cos();
        assert_near(s[(0, 0)], 0.0, 1e-15, "sin 0");
        assert_near(s[(0, 2)], 1.0, 1e-15, "sin pi/2");
        assert_near(c[(0, 1)], core::f64::consts::FRAC_1_SQRT_2, 1e-15, "cos pi/4");
        assert_near(m.tan()[(0, 1)], 1.0, 1e-12, "tan pi/4");
    }

    #[test]
    fn inverse_trig() {
        let v = DynVector::from_slice(&[1.0_f64, 0.0]);
        assert_near(v.asin()[0], FRAC_PI_2, 1e-15, "asin 1");
        assert_near(v.acos()[1], FRAC_PI_2, 1e-15, "acos 0");
        assert_near(v.atan()[0], FRAC_PI_4, 1e-15, "atan 1");
        assert!(DynVector::from_slice(&[2.0_f64]).asin()[0].is_nan());
    }

    #[test]
    fn exp_ln_sqrt_pow() {
        let v = DynVector::from_slice(&[1.0_f64, 4.0]);
        assert_near(v.exp()[0], core::f64::consts::E, 1e-15, "exp");
        assert_near(v.ln()[0], 0.0, 1e-15, "ln");
        assert_near(v.sqrt()[1], 2.0, 1e-15, "sqrt");
        assert_near(v.powf(1.5)[1], 8.0, 1e-12, "powf");
        assert_eq!(DynVector::from_slice(&[-3.0_f32, 2.0]).abs().as_slice(), &[3.0, 2.0]);
    }

    #[test]
    fn col_copies_one_column() {
        let m = DynMatrix::from_rows(3, 2, &[0.0, 1.0, 0.0, 2.0, 0.0, 3.0]);
        assert_eq!(m.col(1).as_slice(), &[1.0, 2.0, 3.0]);
        assert_eq!(m.col(0).as_slice(), &[0.0; 3]);
    }
}
