//! # tabfn
//!
//! Real functions of one real variable, represented analytically or by
//! tables of samples with linear interpolation and extrapolation.
//!
//! - [`functions`]: the [`MathFunction`] and [`TabulatedFunction`] traits,
//!   array and linked-list storage, factories and closed-form functions
//! - [`operations`]: numerical and tabulated differentiation, point-wise
//!   arithmetic
//! - [`concurrent`]: a lock-based decorator for sharing a table between
//!   threads, and worker tasks
//! - [`io`]: text, binary and object codecs
//!
//! The library logs through the [`log`] facade and installs no logger.

pub mod concurrent;
pub mod functions;
pub mod io;
pub mod operations;

#[cfg(test)]
mod test_utils;

pub use crate::concurrent::SynchronizedTabulatedFunction;
pub use crate::functions::{
    ArrayTabulatedFunction, FunctionError, LinkedListTabulatedFunction, MathFunction, Point,
    StorageKind, TabulatedFunction, TabulatedFunctionFactory,
};
pub use crate::io::CodecError;
pub use crate::operations::DifferentialOperator;
