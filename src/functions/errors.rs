//! Error types shared by tabulated functions, operators and the
//! synchronized decorator.

use thiserror::Error;

/// Failure raised by construction, access or transformation of functions.
///
/// Every variant is reported synchronously to the immediate caller and
/// before any mutation takes place.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FunctionError {
    /// A generic invalid argument that has no more specific variant.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Coordinate sequences of different lengths.
    #[error("Lengths of x-values ({x_len}) and y-values ({y_len}) are different")]
    DifferentLength { x_len: usize, y_len: usize },

    /// Too few samples for the requested table or operation.
    #[error("At least {required} points are required, but {found} were given")]
    TooFewPoints { required: usize, found: usize },

    /// x-values are not strictly increasing.
    #[error("x-values are not strictly increasing at index {index}: {previous} >= {current}")]
    NotStrictlyIncreasing {
        index: usize,
        previous: f64,
        current: f64,
    },

    /// Index outside `0..count`.
    #[error("Index {index} is out of range for a table of {count} points")]
    IndexOutOfRange { index: usize, count: usize },

    /// Step of a differential operator is not a positive finite number.
    #[error("Step must be positive, finite and not NaN, got {0}")]
    InvalidStep(f64),

    /// Two tables that must share their x-grid do not.
    #[error("Inconsistent functions: {0}")]
    InconsistentFunctions(String),

    /// Point-wise division by a zero y-value.
    #[error("Division by zero at index {index}")]
    DivisionByZero { index: usize },

    /// The operation is not supported by the receiver.
    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(&'static str),

    /// An iterator was stepped past its last element.
    #[error("Iterator is exhausted")]
    ExhaustedIterator,

    /// Newton iteration hit a near-zero derivative.
    #[error("Derivative is too small at x = {x}")]
    DerivativeTooSmall { x: f64 },
}

impl FunctionError {
    /// Returns true for the invalid-argument class of failures: bad
    /// coordinate arrays, bad steps and other rejected inputs.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(
            self,
            FunctionError::InvalidArgument(_)
                | FunctionError::DifferentLength { .. }
                | FunctionError::TooFewPoints { .. }
                | FunctionError::NotStrictlyIncreasing { .. }
                | FunctionError::InvalidStep(_)
        )
    }
}
