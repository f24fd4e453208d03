//! # Operations
//!
//! Transformations that turn functions into new functions.
//!
//! - [`stepping`]: finite-difference derivatives of any [`MathFunction`]
//!   with a fixed step
//! - [`tabulated`]: derivatives of tabulated functions computed from their
//!   samples
//! - [`service`]: point-wise arithmetic between tabulated functions on the
//!   same grid
//!
//! [`MathFunction`]: crate::functions::MathFunction

pub mod service;
pub mod stepping;
pub mod tabulated;

pub use service::TabulatedFunctionOperationService;
pub use stepping::{SteppingDerivative, SteppingDifferentialOperator, SteppingScheme};
pub use tabulated::TabulatedDifferentialOperator;

/// An operator mapping a function to its derivative.
pub trait DifferentialOperator<F> {
    type Output;

    fn derive(&self, function: F) -> Self::Output;
}
