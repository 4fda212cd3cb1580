//! The square matrix container and the pieces it is built from.
//!
//! `Matrix` owns a single row-major buffer. All constructors share the
//! fill routine in `storage`, which is where the no-leak-on-failure
//! guarantee lives; `element` defines how fallible element types plug in.
pub mod element;
pub mod matrix;
pub mod ops;
mod storage;

pub use element::{ElementSource, StdSource};
pub use matrix::Matrix;
