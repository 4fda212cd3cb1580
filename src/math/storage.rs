//! Owned row-major buffers for square matrices.
//!
//! Every constructor funnels through [`try_fill`]. The buffer under
//! construction is a plain `Vec`, so an early return (an element error) or
//! an unwind (an element panic) drops the elements pushed so far and frees
//! the allocation before the failure reaches the caller.

use crate::error::{MatrixError, Result};

/// Number of elements backing an `n`x`n` matrix.
pub(crate) fn element_count(n: usize) -> Result<usize> {
    n.checked_mul(n).ok_or(MatrixError::CapacityOverflow { n })
}

/// Reserve room for exactly `n * n` elements without aborting on failure.
pub(crate) fn try_reserve<T>(n: usize) -> Result<Vec<T>> {
    let len = element_count(n)?;
    let mut data = Vec::new();
    data.try_reserve_exact(len)
        .map_err(|source| MatrixError::Allocation { n, source })?;
    log::trace!(
        "reserved {} elements ({} bytes) for a {}x{} matrix",
        len,
        len.saturating_mul(std::mem::size_of::<T>()),
        n,
        n
    );
    Ok(data)
}

/// Build the row-major buffer of an `n`x`n` matrix, one element at a time.
///
/// `fill` is called in row-major order. The first error stops the fill and
/// is returned as [`MatrixError::Element`] tagged with its position.
pub(crate) fn try_fill<T, F>(n: usize, mut fill: F) -> Result<Vec<T>>
where
    F: FnMut(usize, usize) -> anyhow::Result<T>,
{
    let mut data = try_reserve(n)?;
    for row in 0..n {
        for col in 0..n {
            match fill(row, col) {
                Ok(value) => data.push(value),
                Err(source) => {
                    log::debug!(
                        "element ({}, {}) of a {}x{} matrix failed, dropping {} constructed elements",
                        row,
                        col,
                        n,
                        n,
                        data.len()
                    );
                    return Err(MatrixError::element(row, col, source));
                }
            }
        }
    }
    Ok(data)
}
