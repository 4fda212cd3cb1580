use std::collections::TryReserveError;

use thiserror::Error;

/// Failures raised while building, copying or combining matrices.
///
/// Every variant is returned only after the storage acquired by the failing
/// operation has been released, so a caller holding one of these never
/// holds a half-built matrix.
#[derive(Debug, Error)]
pub enum MatrixError {
    /// `n * n` does not fit in `usize`.
    #[error("cannot size a {n}x{n} matrix: element count overflows usize")]
    CapacityOverflow { n: usize },

    /// The allocator refused to hand out storage for `n * n` elements.
    #[error("failed to allocate storage for a {n}x{n} matrix")]
    Allocation {
        n: usize,
        #[source]
        source: TryReserveError,
    },

    /// Constructing or copying the element at (`row`, `col`) failed.
    #[error("element ({row}, {col}) could not be constructed")]
    Element {
        row: usize,
        col: usize,
        #[source]
        source: anyhow::Error,
    },

    /// A binary operation was given matrices of different sizes.
    #[error("different sizes: {left} and {right}")]
    DimensionMismatch { left: usize, right: usize },

    /// The matrix has no inverse.
    #[error("matrix is singular")]
    Singular,

    /// A flat buffer of `len` elements cannot back an `n`x`n` matrix.
    #[error("buffer of length {len} cannot form a {n}x{n} matrix")]
    Shape { n: usize, len: usize },

    /// Row `row` of a nested-rows input has `len` elements instead of `expected`.
    #[error("row {row} has {len} elements, expected {expected}")]
    RaggedRow {
        row: usize,
        len: usize,
        expected: usize,
    },
}

impl MatrixError {
    pub(crate) fn element(row: usize, col: usize, source: anyhow::Error) -> Self {
        MatrixError::Element { row, col, source }
    }

    /// Operand sizes carried by a [`MatrixError::DimensionMismatch`].
    pub fn dimensions(&self) -> Option<(usize, usize)> {
        match self {
            MatrixError::DimensionMismatch { left, right } => Some((*left, *right)),
            _ => None,
        }
    }
}

/// Result type for matrix operations
pub type Result<T> = std::result::Result<T, MatrixError>;
