use std::convert::Infallible;
use std::fmt;
use std::mem;
use std::ops::{Index, IndexMut};
use std::slice::{ChunksExact, ChunksExactMut, Iter, IterMut};

use num_traits::{One, Zero};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{MatrixError, Result};
use crate::math::element::{ElementSource, StdSource};
use crate::math::storage;

/// Dense `n`x`n` matrix whose dimension is chosen at runtime.
///
/// Elements live in one row-major buffer owned by the matrix; the element at
/// `(row, col)` sits at `row * n + col`. The buffer always holds exactly
/// `n * n` constructed elements. Copies are deep: two matrices never share
/// storage.
#[derive(Debug, PartialEq, Eq, Serialize)]
pub struct Matrix<T> {
    n: usize,
    data: Vec<T>,
}

impl<T> Matrix<T> {
    /// Build an `n`x`n` matrix with `lambda` on the diagonal and
    /// `T::default()` everywhere else.
    ///
    /// # Panics
    ///
    /// Panics if `n * n` overflows or the elements cannot be allocated; use
    /// [`Matrix::try_new`] to get an error instead.
    pub fn new(n: usize, lambda: T) -> Self
    where
        T: Default + Clone,
    {
        Self::from_fn(n, |row, col| {
            if row == col {
                lambda.clone()
            } else {
                T::default()
            }
        })
    }

    /// Fallible counterpart of [`Matrix::new`]: allocation failure is
    /// returned instead of aborting.
    pub fn try_new(n: usize, lambda: T) -> Result<Self>
    where
        T: Default + Clone,
    {
        Self::with_source(n, &lambda, &mut StdSource)
    }

    /// Build an `n`x`n` matrix whose elements come from `source`: copies of
    /// `lambda` on the diagonal, `source.try_default()` elsewhere.
    ///
    /// If any element fails, every element built so far is dropped and the
    /// storage released before the error is returned.
    pub fn with_source<S>(n: usize, lambda: &T, source: &mut S) -> Result<Self>
    where
        S: ElementSource<T> + ?Sized,
    {
        let data = storage::try_fill(n, |row, col| {
            if row == col {
                source.try_copy(lambda)
            } else {
                source.try_default()
            }
        })?;
        Ok(Self { n, data })
    }

    /// Build an `n`x`n` matrix with element `(row, col)` set to `f(row, col)`.
    ///
    /// # Panics
    ///
    /// Panics if `n * n` overflows or the storage cannot be allocated; use
    /// [`Matrix::try_from_fn`] to get an error instead.
    pub fn from_fn<F>(n: usize, mut f: F) -> Self
    where
        F: FnMut(usize, usize) -> T,
    {
        match Self::try_from_fn(n, |row, col| Ok::<_, Infallible>(f(row, col))) {
            Ok(m) => m,
            Err(err) => panic!("{}", err),
        }
    }

    /// Like [`Matrix::from_fn`], but `f` may fail. The first failure aborts
    /// construction and nothing built so far survives it.
    pub fn try_from_fn<F, E>(n: usize, mut f: F) -> Result<Self>
    where
        F: FnMut(usize, usize) -> std::result::Result<T, E>,
        E: Into<anyhow::Error>,
    {
        let data = storage::try_fill(n, |row, col| f(row, col).map_err(Into::into))?;
        Ok(Self { n, data })
    }

    /// Wrap a row-major buffer of exactly `n * n` elements.
    pub fn from_vec(n: usize, data: Vec<T>) -> Result<Self> {
        if storage::element_count(n)? != data.len() {
            return Err(MatrixError::Shape { n, len: data.len() });
        }
        Ok(Self { n, data })
    }

    /// Dimension of the matrix (number of rows, which equals the number of columns).
    pub fn size(&self) -> usize {
        self.n
    }

    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    #[inline]
    fn offset(&self, row: usize, col: usize) -> usize {
        assert!(
            row < self.n && col < self.n,
            "index ({}, {}) out of bounds for a {}x{} matrix",
            row,
            col,
            self.n,
            self.n
        );
        row * self.n + col
    }

    /// Element at (`row`, `col`).
    ///
    /// # Panics
    ///
    /// Panics if either index is not below [`Matrix::size`].
    pub fn at(&self, row: usize, col: usize) -> &T {
        let offset = self.offset(row, col);
        &self.data[offset]
    }

    /// Mutable element at (`row`, `col`).
    ///
    /// # Panics
    ///
    /// Panics if either index is not below [`Matrix::size`].
    pub fn at_mut(&mut self, row: usize, col: usize) -> &mut T {
        let offset = self.offset(row, col);
        &mut self.data[offset]
    }

    pub fn get(&self, row: usize, col: usize) -> Option<&T> {
        if row < self.n && col < self.n {
            self.data.get(row * self.n + col)
        } else {
            None
        }
    }

    pub fn get_mut(&mut self, row: usize, col: usize) -> Option<&mut T> {
        if row < self.n && col < self.n {
            self.data.get_mut(row * self.n + col)
        } else {
            None
        }
    }

    /// Row `row` as a slice of `n` elements.
    pub fn row(&self, row: usize) -> &[T] {
        assert!(row < self.n, "row {} out of bounds for a {}x{} matrix", row, self.n, self.n);
        let start = row * self.n;
        &self.data[start..start + self.n]
    }

    pub fn row_mut(&mut self, row: usize) -> &mut [T] {
        assert!(row < self.n, "row {} out of bounds for a {}x{} matrix", row, self.n, self.n);
        let start = row * self.n;
        &mut self.data[start..start + self.n]
    }

    pub fn rows(&self) -> ChunksExact<'_, T> {
        // chunk size must be non-zero; an empty matrix has no data anyway
        self.data.chunks_exact(self.n.max(1))
    }

    pub fn rows_mut(&mut self) -> ChunksExactMut<'_, T> {
        self.data.chunks_exact_mut(self.n.max(1))
    }

    /// All elements in row-major order.
    pub fn iter(&self) -> Iter<'_, T> {
        self.data.iter()
    }

    pub fn iter_mut(&mut self) -> IterMut<'_, T> {
        self.data.iter_mut()
    }

    pub fn diagonal(&self) -> impl Iterator<Item = &T> + '_ {
        self.data.iter().step_by(self.n + 1)
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    pub fn mapv<U, F>(&self, mut f: F) -> Matrix<U>
    where
        F: FnMut(&T) -> U,
    {
        Matrix {
            n: self.n,
            data: self.data.iter().map(|v| f(v)).collect(),
        }
    }

    /// Exchange dimension and storage with `other`. Never allocates.
    pub fn swap(&mut self, other: &mut Matrix<T>) {
        mem::swap(self, other);
    }

    /// Deep copy that reports allocation failure instead of aborting.
    pub fn try_clone(&self) -> Result<Self>
    where
        T: Clone,
    {
        let data = storage::try_fill(self.n, |row, col| Ok(self.data[row * self.n + col].clone()))?;
        Ok(Self { n: self.n, data })
    }

    /// Deep copy with every element produced by `source.try_copy`.
    ///
    /// `self` is only read; a failed copy leaves it exactly as it was.
    pub fn try_clone_with<S>(&self, source: &mut S) -> Result<Self>
    where
        S: ElementSource<T> + ?Sized,
    {
        let data = storage::try_fill(self.n, |row, col| {
            source.try_copy(&self.data[row * self.n + col])
        })?;
        Ok(Self { n: self.n, data })
    }

    /// Replace `self` with a deep copy of `other`.
    ///
    /// The copy is built before `self` is touched and then swapped in, so a
    /// failure leaves `self` unchanged. The previous storage is dropped along
    /// with the temporary.
    ///
    /// Assigning a matrix to itself is rejected at compile time:
    ///
    /// ```compile_fail
    /// use square_matrix::Matrix;
    ///
    /// let mut a = Matrix::new(3, 1);
    /// a.assign(&a).unwrap();
    /// ```
    pub fn assign(&mut self, other: &Matrix<T>) -> Result<()>
    where
        T: Clone,
    {
        let mut copy = other.try_clone()?;
        self.swap(&mut copy);
        Ok(())
    }

    /// [`Matrix::assign`] with elements produced by `source.try_copy`.
    pub fn assign_with<S>(&mut self, other: &Matrix<T>, source: &mut S) -> Result<()>
    where
        S: ElementSource<T> + ?Sized,
    {
        let mut copy = other.try_clone_with(source)?;
        self.swap(&mut copy);
        Ok(())
    }
}

impl<T> Matrix<T>
where
    T: Clone + Zero,
{
    pub fn zeros(n: usize) -> Self {
        Self::from_fn(n, |_, _| T::zero())
    }
}

impl<T> Matrix<T>
where
    T: Clone + Zero + One,
{
    /// # Panics
    ///
    /// Panics if `n * n` overflows or the storage cannot be allocated.
    pub fn identity(n: usize) -> Self {
        match Self::try_identity(n) {
            Ok(m) => m,
            Err(err) => panic!("{}", err),
        }
    }

    /// Identity matrix, reporting allocation failure instead of panicking.
    pub fn try_identity(n: usize) -> Result<Self> {
        Self::try_from_fn(n, |row, col| {
            Ok::<_, Infallible>(if row == col { T::one() } else { T::zero() })
        })
    }
}

impl<T: Clone> Clone for Matrix<T> {
    fn clone(&self) -> Self {
        Self {
            n: self.n,
            data: self.data.clone(),
        }
    }

    /// Copy first, then swap: a panicking element clone leaves `self` intact.
    fn clone_from(&mut self, source: &Self) {
        let mut copy = source.clone();
        self.swap(&mut copy);
    }
}

impl<T> Default for Matrix<T> {
    fn default() -> Self {
        Self {
            n: 0,
            data: Vec::new(),
        }
    }
}

impl<T> Index<(usize, usize)> for Matrix<T> {
    type Output = T;

    fn index(&self, index: (usize, usize)) -> &Self::Output {
        self.at(index.0, index.1)
    }
}

impl<T> IndexMut<(usize, usize)> for Matrix<T> {
    fn index_mut(&mut self, index: (usize, usize)) -> &mut Self::Output {
        self.at_mut(index.0, index.1)
    }
}

impl<T> Index<usize> for Matrix<T> {
    type Output = [T];

    fn index(&self, row: usize) -> &Self::Output {
        self.row(row)
    }
}

impl<T> IndexMut<usize> for Matrix<T> {
    fn index_mut(&mut self, row: usize) -> &mut Self::Output {
        self.row_mut(row)
    }
}

impl<T> TryFrom<Vec<Vec<T>>> for Matrix<T> {
    type Error = MatrixError;

    /// Flatten nested rows; every row must be as long as there are rows.
    fn try_from(rows: Vec<Vec<T>>) -> Result<Self> {
        let n = rows.len();
        if let Some((idx, row)) = rows.iter().enumerate().find(|(_, row)| row.len() != n) {
            return Err(MatrixError::RaggedRow {
                row: idx,
                len: row.len(),
                expected: n,
            });
        }
        let mut data = storage::try_reserve(n)?;
        for row in rows {
            data.extend(row);
        }
        Ok(Self { n, data })
    }
}

impl<T: fmt::Display> fmt::Display for Matrix<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, row) in self.rows().enumerate() {
            if idx > 0 {
                writeln!(f)?;
            }
            write!(f, "[")?;
            for (col, value) in row.iter().enumerate() {
                if col > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}", value)?;
            }
            write!(f, "]")?;
        }
        Ok(())
    }
}

#[derive(Deserialize)]
struct RawMatrix<T> {
    n: usize,
    data: Vec<T>,
}

impl<'de, T> Deserialize<'de> for Matrix<T>
where
    T: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = RawMatrix::<T>::deserialize(deserializer)?;
        Matrix::from_vec(raw.n, raw.data).map_err(serde::de::Error::custom)
    }
}
