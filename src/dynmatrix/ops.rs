use alloc::vec::Vec;
use core::ops::{Add, Mul, Neg, Sub};

use crate::error::{check_shape, Error, Result};
use crate::traits::Scalar;

use super::vector::DynVector;
use super::{try_buffer, DynMatrix};

// ── Fallible kernels ────────────────────────────────────────────────

impl<T: Scalar> DynMatrix<T> {
    fn zip_with(&self, rhs: &Self, f: impl Fn(T, T) -> T) -> Result<Self> {
        check_shape(self.shape(), rhs.shape())?;
        let data: Vec<T> = self
            .data
            .iter()
            .zip(rhs.data.iter())
            .map(|(&a, &b)| f(a, b))
            .collect();
        Ok(DynMatrix {
            data,
            nrows: self.nrows,
            ncols: self.ncols,
        })
    }

    /// Element-wise sum, failing with [`Error::DimensionMismatch`] when the
    /// shapes differ.
    pub fn try_add(&self, rhs: &Self) -> Result<Self> {
        self.zip_with(rhs, |a, b| a + b)
    }

    /// Element-wise difference, failing with [`Error::DimensionMismatch`]
    /// when the shapes differ.
    pub fn try_sub(&self, rhs: &Self) -> Result<Self> {
        self.zip_with(rhs, |a, b| a - b)
    }

    /// Matrix product `(m×n)·(n×p) → m×p`.
    ///
    /// The `expected` side of the mismatch error is `(self.ncols, rhs.ncols)`,
    /// the shape `rhs` would need.
    ///
    /// ```
    /// use densela::DynMatrix;
    /// let a = DynMatrix::from_rows(2, 3, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    /// let b = DynMatrix::from_rows(3, 1, &[1.0, 0.0, -1.0]);
    /// let c = a.try_matmul(&b).unwrap();
    /// assert_eq!(c.into_vec(), vec![-2.0, -2.0]);
    /// assert!(b.try_matmul(&b).is_err());
    /// ```
    pub fn try_matmul(&self, rhs: &Self) -> Result<Self> {
        if self.ncols != rhs.nrows {
            return Err(Error::mismatch((self.ncols, rhs.ncols), rhs.shape()));
        }
        let (m, n, p) = (self.nrows, self.ncols, rhs.ncols);
        let mut data = try_buffer(m * p, T::zero())?;
        for i in 0..m {
            let out = &mut data[i * p..(i + 1) * p];
            for k in 0..n {
                let a_ik = self.data[i * n + k];
                for (o, &b) in out.iter_mut().zip(&rhs.data[k * p..(k + 1) * p]) {
                    *o = *o + a_ik * b;
                }
            }
        }
        Ok(DynMatrix {
            data,
            nrows: m,
            ncols: p,
        })
    }

    /// Matrix–vector product `A·x`.
    pub fn try_matvec(&self, x: &DynVector<T>) -> Result<DynVector<T>> {
        if self.ncols != x.len() {
            return Err(Error::mismatch((1, self.ncols), (1, x.len())));
        }
        let data = (0..self.nrows)
            .map(|i| {
                self.data[i * self.ncols..(i + 1) * self.ncols]
                    .iter()
                    .zip(x.as_slice())
                    .fold(T::zero(), |acc, (&a, &b)| acc + a * b)
            })
            .collect();
        Ok(DynVector::from_vec(data))
    }

    /// Transpose.
    ///
    /// ```
    /// use densela::DynMatrix;
    /// let a = DynMatrix::from_rows(2, 3, &[1, 2, 3, 4, 5, 6]);
    /// assert_eq!(a.transpose().into_vec(), vec![1, 4, 2, 5, 3, 6]);
    /// ```
    pub fn transpose(&self) -> Self {
        DynMatrix::from_fn(self.ncols, self.nrows, |i, j| self.data[j * self.ncols + i])
    }

    /// Multiply every element by `s`.
    pub fn scale(&self, s: T) -> Self {
        DynMatrix {
            data: self.data.iter().map(|&x| x * s).collect(),
            nrows: self.nrows,
            ncols: self.ncols,
        }
    }
}

// ── Operators (panic on shape mismatch) ─────────────────────────────

macro_rules! impl_binop {
    ($trait:ident, $method:ident, $kernel:ident, $sym:literal) => {
        impl<T: Scalar> $trait<&DynMatrix<T>> for &DynMatrix<T> {
            type Output = DynMatrix<T>;

            fn $method(self, rhs: &DynMatrix<T>) -> DynMatrix<T> {
                match self.$kernel(rhs) {
                    Ok(m) => m,
                    Err(_) => panic!(
                        "dimension mismatch: {}x{} {} {}x{}",
                        self.nrows, self.ncols, $sym, rhs.nrows, rhs.ncols,
                    ),
                }
            }
        }

        impl<T: Scalar> $trait for DynMatrix<T> {
            type Output = DynMatrix<T>;

            fn $method(self, rhs: DynMatrix<T>) -> DynMatrix<T> {
                (&self).$method(&rhs)
            }
        }

        impl<T: Scalar> $trait<&DynMatrix<T>> for DynMatrix<T> {
            type Output = DynMatrix<T>;

            fn $method(self, rhs: &DynMatrix<T>) -> DynMatrix<T> {
                (&self).$method(rhs)
            }
        }
    };
}

impl_binop!(Add, add, try_add, "+");
impl_binop!(Sub, sub, try_sub, "-");
impl_binop!(Mul, mul, try_matmul, "*");

impl<T: Scalar> Mul<&DynVector<T>> for &DynMatrix<T> {
    type Output = DynVector<T>;

    fn mul(self, x: &DynVector<T>) -> DynVector<T> {
        match self.try_matvec(x) {
            Ok(v) => v,
            Err(_) => panic!(
                "dimension mismatch: {}x{} * vector of length {}",
                self.nrows,
                self.ncols,
                x.len(),
            ),
        }
    }
}

impl<T: Scalar> Mul<T> for &DynMatrix<T> {
    type Output = DynMatrix<T>;

    fn mul(self, s: T) -> DynMatrix<T> {
        self.scale(s)
    }
}

impl<T: Scalar + Neg<Output = T>> Neg for &DynMatrix<T> {
    type Output = DynMatrix<T>;

    fn neg(self) -> DynMatrix<T> {
        DynMatrix {
            data: self.data.iter().map(|&x| -x).collect(),
            nrows: self.nrows,
            ncols: self.ncols,
        }
    }
}
