//! square-matrix: a runtime-sized dense square matrix with value semantics.
//!
//! `Matrix<T>` owns one row-major buffer of `n * n` elements. Construction
//! either yields a fully built matrix or an error after every element built
//! so far has been dropped and the storage freed. Copies are always deep and
//! assignment uses copy-and-swap, so a failed assignment leaves its target
//! untouched.
//!
//! Element types whose construction can fail plug in through
//! [`ElementSource`]; the [`fault`] module provides an injectable source for
//! testing those failure paths.
pub mod config;
pub mod error;
pub mod fault;
pub mod math;

pub use config::FaultConfig;
pub use error::{MatrixError, Result};
pub use math::{ElementSource, Matrix, StdSource};
