//! Element-wise addition and inversion.
//!
//! Both check their preconditions before touching any storage, so a
//! `DimensionMismatch` leaves every operand as it was.

use std::ops::{Add, AddAssign};

use num_traits::{Float, NumCast};

use crate::error::{MatrixError, Result};
use crate::math::matrix::Matrix;

impl<T> Matrix<T> {
    fn ensure_same_size<U>(&self, other: &Matrix<U>) -> Result<()> {
        if self.size() != other.size() {
            return Err(MatrixError::DimensionMismatch {
                left: self.size(),
                right: other.size(),
            });
        }
        Ok(())
    }

    /// `self += rhs`, element by element.
    ///
    /// Sizes are compared first; on mismatch nothing is modified.
    pub fn try_add_assign(&mut self, rhs: &Matrix<T>) -> Result<()>
    where
        T: AddAssign + Clone,
    {
        self.ensure_same_size(rhs)?;
        for (lhs, rhs) in self.iter_mut().zip(rhs.iter()) {
            *lhs += rhs.clone();
        }
        Ok(())
    }

    /// `self + rhs` into a freshly allocated matrix.
    pub fn checked_add(&self, rhs: &Matrix<T>) -> Result<Matrix<T>>
    where
        T: Add<Output = T> + Clone,
    {
        self.ensure_same_size(rhs)?;
        Matrix::try_from_fn(self.size(), |row, col| {
            Ok::<_, anyhow::Error>(self.at(row, col).clone() + rhs.at(row, col).clone())
        })
    }
}

impl<T> Matrix<T>
where
    T: Float,
{
    /// Inverse by Gauss-Jordan elimination with partial pivoting.
    ///
    /// Returns [`MatrixError::Singular`] when no usable pivot is left in a
    /// column. A pivot counts as zero when it is below `n * eps` times the
    /// largest absolute entry of the input.
    pub fn inverse(&self) -> Result<Matrix<T>> {
        let n = self.size();
        let mut work = self.try_clone()?;
        let mut result = Matrix::try_identity(n)?;

        let scale = self.iter().fold(T::zero(), |acc, v| acc.max(v.abs()));
        let tolerance = scale * T::epsilon() * <T as NumCast>::from(n.max(1)).unwrap_or_else(T::one);

        for col in 0..n {
            let pivot_row = (col..n)
                .max_by(|&a, &b| {
                    work.at(a, col)
                        .abs()
                        .partial_cmp(&work.at(b, col).abs())
                        .unwrap_or(std::cmp::Ordering::Equal)
                })
                .unwrap_or(col);

            let pivot = *work.at(pivot_row, col);
            if pivot.is_nan() || pivot.abs() <= tolerance {
                log::debug!("no pivot in column {} of a {}x{} matrix", col, n, n);
                return Err(MatrixError::Singular);
            }

            if pivot_row != col {
                swap_rows(&mut work, pivot_row, col);
                swap_rows(&mut result, pivot_row, col);
            }

            let inv_pivot = pivot.recip();
            scale_row(&mut work, col, inv_pivot);
            scale_row(&mut result, col, inv_pivot);

            for row in 0..n {
                if row == col {
                    continue;
                }
                let factor = *work.at(row, col);
                if factor == T::zero() {
                    continue;
                }
                eliminate(&mut work, row, col, factor);
                eliminate(&mut result, row, col, factor);
            }
        }

        Ok(result)
    }
}

fn swap_rows<T>(m: &mut Matrix<T>, a: usize, b: usize) {
    let n = m.size();
    let (lo, hi) = if a < b { (a, b) } else { (b, a) };
    let (head, tail) = m.as_mut_slice().split_at_mut(hi * n);
    head[lo * n..lo * n + n].swap_with_slice(&mut tail[..n]);
}

fn scale_row<T: Float>(m: &mut Matrix<T>, row: usize, factor: T) {
    for v in m.row_mut(row) {
        *v = *v * factor;
    }
}

/// `m[row] -= factor * m[pivot]`
fn eliminate<T: Float>(m: &mut Matrix<T>, row: usize, pivot: usize, factor: T) {
    let n = m.size();
    for col in 0..n {
        let delta = factor * *m.at(pivot, col);
        let v = m.at_mut(row, col);
        *v = *v - delta;
    }
}
