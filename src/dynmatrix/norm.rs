use core::str::FromStr;

use num_traits::Float;

use crate::error::{Error, Result};
use crate::traits::FloatScalar;

use super::vector::DynVector;
use super::DynMatrix;

/// Norm selector.
///
/// Parsed from the textual selectors `"inf"`, `"F"` and a positive integer
/// `p`:
///
/// ```
/// use densela::NormKind;
///
/// assert_eq!("inf".parse::<NormKind>().unwrap(), NormKind::Inf);
/// assert_eq!("F".parse::<NormKind>().unwrap(), NormKind::Frobenius);
/// assert_eq!("3".parse::<NormKind>().unwrap(), NormKind::P(3));
/// assert!("0".parse::<NormKind>().is_err());
/// assert!("-2".parse::<NormKind>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NormKind {
    /// Largest absolute element.
    Inf,
    /// `(Σ |x|^p)^(1/p)` over all elements, `p >= 1`.
    P(u32),
    /// Square root of the sum of squares. Matrices only.
    Frobenius,
}

impl FromStr for NormKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "inf" => Ok(NormKind::Inf),
            "F" => Ok(NormKind::Frobenius),
            _ => match s.parse::<u32>() {
                Ok(0) => Err(Error::invalid("norm", "p-norm order must be at least 1")),
                Ok(p) => Ok(NormKind::P(p)),
                Err(_) => Err(Error::invalid(
                    "norm",
                    "expected \"inf\", \"F\" or a positive integer",
                )),
            },
        }
    }
}

/// Entrywise norm over a slice, accumulated in `f64`.
fn entrywise<T: FloatScalar>(data: &[T], kind: NormKind) -> T {
    match kind {
        NormKind::Inf => data
            .iter()
            .fold(T::zero(), |m, &x| if x.abs() > m { x.abs() } else { m }),
        NormKind::P(1) => T::narrow(data.iter().map(|&x| Float::abs(x.widen())).sum()),
        NormKind::P(2) | NormKind::Frobenius => {
            let sum: f64 = data.iter().map(|&x| x.widen() * x.widen()).sum();
            T::narrow(Float::sqrt(sum))
        }
        NormKind::P(p) => {
            let p = f64::from(p);
            let sum: f64 = data.iter().map(|&x| Float::powf(Float::abs(x.widen()), p)).sum();
            T::narrow(Float::powf(sum, 1.0 / p))
        }
    }
}

// ── Vector norms ────────────────────────────────────────────────────

impl<T: FloatScalar> DynVector<T> {
    /// L2 (Euclidean) norm.
    ///
    /// ```
    /// use densela::DynVector;
    /// let v = DynVector::from_slice(&[3.0_f64, 4.0]);
    /// assert!((v.norm() - 5.0).abs() < 1e-12);
    /// ```
    pub fn norm(&self) -> T {
        entrywise(self.as_slice(), NormKind::P(2))
    }

    /// Norm selected by `kind`. [`NormKind::Frobenius`] is rejected with
    /// [`Error::InvalidArgument`].
    ///
    /// ```
    /// use densela::{DynVector, NormKind};
    /// let v = DynVector::from_slice(&[1.0_f32, -2.0, 3.0]);
    /// assert_eq!(v.norm_with(NormKind::Inf).unwrap(), 3.0);
    /// assert_eq!(v.norm_with(NormKind::P(1)).unwrap(), 6.0);
    /// assert!(v.norm_with(NormKind::Frobenius).is_err());
    /// ```
    pub fn norm_with(&self, kind: NormKind) -> Result<T> {
        if kind == NormKind::Frobenius {
            return Err(Error::invalid("norm", "Frobenius norm requires a matrix"));
        }
        Ok(entrywise(self.as_slice(), kind))
    }

    /// Return a unit vector in the same direction.
    ///
    /// A zero vector is returned unchanged.
    pub fn normalize(&self) -> Self {
        let n = self.norm();
        if n == T::zero() {
            return self.clone();
        }
        DynVector::from_vec(self.as_slice().iter().map(|&x| x / n).collect())
    }
}

// ── Matrix norms ────────────────────────────────────────────────────

impl<T: FloatScalar> DynMatrix<T> {
    /// Frobenius norm.
    ///
    /// ```
    /// use densela::DynMatrix;
    /// let m = DynMatrix::from_rows(2, 2, &[1.0_f64, 2.0, 3.0, 4.0]);
    /// assert!((m.frobenius_norm() - 30.0_f64.sqrt()).abs() < 1e-12);
    /// ```
    pub fn frobenius_norm(&self) -> T {
        entrywise(&self.data, NormKind::Frobenius)
    }

    /// Norm selected by `kind`, evaluated entrywise over all elements.
    ///
    /// `Inf` is the largest absolute element and `P(p)` the entrywise
    /// p-norm, so `P(2)` coincides with the Frobenius norm.
    pub fn norm_with(&self, kind: NormKind) -> T {
        entrywise(&self.data, kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_near(a: f64, b: f64, tol: f64, msg: &str) {
        assert!((a - b).abs() < tol, "{}: {} vs {} (diff {})", msg, a, b, (a - b).abs());
    }

    #[test]
    fn parse_selectors() {
        assert_eq!("inf".parse::<NormKind>(), Ok(NormKind::Inf));
        assert_eq!("1".parse::<NormKind>(), Ok(NormKind::P(1)));
        assert_eq!("F".parse::<NormKind>(), Ok(NormKind::Frobenius));
        for bad in ["0", "-1", "", "max", "f", "2.5"] {
            assert!(
                matches!(bad.parse::<NormKind>(), Err(Error::InvalidArgument { arg: "norm", .. })),
                "selector {:?} accepted",
                bad
            );
        }
    }

    #[test]
    fn vector_norms() {
        let v = DynVector::from_slice(&[3.0_f64, -4.0]);
        assert_near(v.norm(), 5.0, 1e-12, "l2");
        assert_near(v.norm_with(NormKind::P(1)).unwrap(), 7.0, 1e-12, "l1");
        assert_near(v.norm_with(NormKind::Inf).unwrap(), 4.0, 1e-12, "inf");
        assert_near(
            v.norm_with(NormKind::P(3)).unwrap(),
            (27.0_f64 + 64.0).powf(1.0 / 3.0),
            1e-12,
            "l3",
        );
    }

    #[test]
    fn frobenius_rejected_on_vector() {
        let v = DynVector::from_slice(&[1.0_f32]);
        assert!(v.norm_with(NormKind::Frobenius).is_err());
    }

    #[test]
    fn matrix_norms_are_entrywise() {
        let m = DynMatrix::from_rows(2, 2, &[1.0_f64, -2.0, 3.0, 4.0]);
        assert_near(m.norm_with(NormKind::Inf), 4.0, 1e-12, "inf");
        assert_near(m.norm_with(NormKind::P(1)), 10.0, 1e-12, "l1");
        assert_near(m.norm_with(NormKind::P(2)), m.frobenius_norm(), 1e-12, "l2 vs F");
        assert_near(m.frobenius_norm(), 30.0_f64.sqrt(), 1e-12, "F");
    }

    #[test]
    fn normalize() {
        let u = DynVector::from_slice(&[3.0_f64, 4.0]).normalize();
        assert_near(u.norm(), 1.0, 1e-12, "unit");
        assert_near(u[0], 0.6, 1e-12, "u0");

        let z = DynVector::zeros(3, 0.0_f64);
        assert_eq!(z.normalize(), z);
    }
}
